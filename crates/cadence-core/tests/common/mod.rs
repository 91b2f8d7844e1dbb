use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use cadence_core::{Engine, EngineBuilder, Lead, Messenger};
use tempfile::TempDir;

/// A messaging collaborator that records every send and can be switched
/// into a failing mode.
#[derive(Default)]
pub struct RecordingMessenger {
    pub sent: Mutex<Vec<SentMessage>>,
    fail_sends: AtomicBool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel: &'static str,
    pub lead_id: u64,
    pub recipient: String,
    pub template: String,
}

impl RecordingMessenger {
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("messenger lock poisoned").len()
    }
}

impl Messenger for RecordingMessenger {
    fn send_email(&self, lead: &Lead, template: &str) -> Result<(), String> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err("smtp unavailable".to_string());
        }
        self.sent
            .lock()
            .expect("messenger lock poisoned")
            .push(SentMessage {
                channel: "email",
                lead_id: lead.id,
                recipient: lead.email.clone().unwrap_or_default(),
                template: template.to_string(),
            });
        Ok(())
    }

    fn send_whatsapp(&self, lead: &Lead, phone: &str, template: &str) -> Result<(), String> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err("gateway unavailable".to_string());
        }
        self.sent
            .lock()
            .expect("messenger lock poisoned")
            .push(SentMessage {
                channel: "whatsapp",
                lead_id: lead.id,
                recipient: phone.to_string(),
                template: template.to_string(),
            });
        Ok(())
    }
}

/// Everything an engine test needs: the engine, the recording messenger
/// behind it, and direct access to the database file for assertions.
pub struct TestContext {
    pub _temp_dir: TempDir,
    pub db_path: PathBuf,
    pub engine: Engine,
    pub messenger: Arc<RecordingMessenger>,
}

/// Helper function to create a test engine on a temporary database
pub async fn create_test_engine() -> TestContext {
    create_test_engine_with_secret(None).await
}

/// Same as [`create_test_engine`] but with a scheduler secret configured
pub async fn create_test_engine_with_secret(secret: Option<&str>) -> TestContext {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let messenger = Arc::new(RecordingMessenger::default());
    let engine = EngineBuilder::new()
        .with_database_path(Some(&db_path))
        .with_messenger(messenger.clone())
        .with_run_secret(secret.map(String::from))
        .build()
        .await
        .expect("Failed to create engine");
    TestContext {
        _temp_dir: temp_dir,
        db_path,
        engine,
        messenger,
    }
}
