use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color flag for testing
fn cadence_cmd() -> Command {
    let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");
    cmd.arg("--no-color");
    cmd.env_remove("CADENCE_RUN_SECRET");
    cmd
}

/// Extract the first "with ID: N" value from command output
fn extract_id_from_output(output: &str) -> String {
    output
        .lines()
        .find_map(|line| line.split("with ID: ").nth(1))
        .expect("Output should contain an ID")
        .trim()
        .to_string()
}

#[test]
fn test_cli_create_lead_success() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    cadence_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "lead",
            "create",
            "Ada Prospect",
            "--email",
            "ada@example.com",
            "--quality",
            "hot",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created lead with ID:"))
        .stdout(predicate::str::contains("Ada Prospect"))
        .stdout(predicate::str::contains("new (hot)"));
}

#[test]
fn test_cli_list_empty_leads() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    cadence_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "lead", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No leads found."));
}

#[test]
fn test_cli_list_leads_after_create() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    cadence_cmd()
        .args(["--database-file", db_arg, "lead", "create", "List Me"])
        .assert()
        .success();

    cadence_cmd()
        .args(["--database-file", db_arg, "lead", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Leads"))
        .stdout(predicate::str::contains("List Me"));
}

#[test]
fn test_cli_update_lead_status() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let output = cadence_cmd()
        .args(["--database-file", db_arg, "lead", "create", "Mover"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let lead_id = extract_id_from_output(&String::from_utf8(output).expect("Invalid UTF-8"));

    cadence_cmd()
        .args([
            "--database-file",
            db_arg,
            "lead",
            "update",
            &lead_id,
            "--status",
            "qualified",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated lead"))
        .stdout(predicate::str::contains("qualified"));
}

#[test]
fn test_cli_sequence_with_steps() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let output = cadence_cmd()
        .args([
            "--database-file",
            db_arg,
            "sequence",
            "create",
            "Welcome",
            "--trigger",
            "new-lead",
            "--description",
            "First touch automation",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let seq_id = extract_id_from_output(&String::from_utf8(output).expect("Invalid UTF-8"));

    cadence_cmd()
        .args([
            "--database-file",
            db_arg,
            "step",
            "add",
            &seq_id,
            "delay",
            "--hours",
            "24",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added step 1"));

    cadence_cmd()
        .args([
            "--database-file",
            db_arg,
            "step",
            "add",
            &seq_id,
            "email",
            "--template",
            "welcome",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added step 2"));

    cadence_cmd()
        .args(["--database-file", db_arg, "sequence", "show", &seq_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome"))
        .stdout(predicate::str::contains("1. wait 24h"))
        .stdout(predicate::str::contains("2. email 'welcome'"));
}

#[test]
fn test_cli_step_add_requires_config() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let output = cadence_cmd()
        .args([
            "--database-file",
            db_arg,
            "sequence",
            "create",
            "Incomplete",
            "--trigger",
            "manual",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let seq_id = extract_id_from_output(&String::from_utf8(output).expect("Invalid UTF-8"));

    cadence_cmd()
        .args(["--database-file", db_arg, "step", "add", &seq_id, "delay"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires --hours"));
}

#[test]
fn test_cli_enroll_and_run_lifecycle() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let output = cadence_cmd()
        .args(["--database-file", db_arg, "lead", "create", "Runner"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let lead_id = extract_id_from_output(&String::from_utf8(output).expect("Invalid UTF-8"));

    let output = cadence_cmd()
        .args([
            "--database-file",
            db_arg,
            "sequence",
            "create",
            "Task drop",
            "--trigger",
            "manual",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let seq_id = extract_id_from_output(&String::from_utf8(output).expect("Invalid UTF-8"));

    cadence_cmd()
        .args([
            "--database-file",
            db_arg,
            "step",
            "add",
            &seq_id,
            "task",
            "--title",
            "Call Runner",
        ])
        .assert()
        .success();

    cadence_cmd()
        .args(["--database-file", db_arg, "enroll", &lead_id, &seq_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created enrollment with ID:"));

    // Enrolling again reports the duplicate instead of double-enrolling
    cadence_cmd()
        .args(["--database-file", db_arg, "enroll", &lead_id, &seq_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("already enrolled"));

    cadence_cmd()
        .args(["--database-file", db_arg, "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 processed"))
        .stdout(predicate::str::contains("task [ok]"));

    // The enrollment completed; the task shows on the lead
    cadence_cmd()
        .args(["--database-file", db_arg, "lead", "show", &lead_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Call Runner"));

    cadence_cmd()
        .args(["--database-file", db_arg, "logs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("task [ok]"));
}

#[test]
fn test_cli_run_with_no_due_enrollments() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    cadence_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No due enrollments."));
}

#[test]
fn test_cli_run_rejects_missing_secret() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    cadence_cmd()
        .env("CADENCE_RUN_SECRET", "hunter2")
        .args(["--database-file", db_arg, "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unauthorized"));

    cadence_cmd()
        .env("CADENCE_RUN_SECRET", "hunter2")
        .args(["--database-file", db_arg, "run", "--secret", "hunter2"])
        .assert()
        .success();
}

#[test]
fn test_cli_delete_and_restore_lead() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let output = cadence_cmd()
        .args(["--database-file", db_arg, "lead", "create", "Ghost"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let lead_id = extract_id_from_output(&String::from_utf8(output).expect("Invalid UTF-8"));

    cadence_cmd()
        .args(["--database-file", db_arg, "lead", "delete", &lead_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted lead"));

    cadence_cmd()
        .args(["--database-file", db_arg, "lead", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No leads found."));

    cadence_cmd()
        .args(["--database-file", db_arg, "lead", "restore", &lead_id])
        .assert()
        .success();

    cadence_cmd()
        .args(["--database-file", db_arg, "lead", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ghost"));
}

#[test]
fn test_cli_default_command_lists_leads() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    cadence_cmd()
        .args(["--database-file", db_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No leads found."));
}
