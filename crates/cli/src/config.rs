use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bloodlink_client::BloodBankClient;
use bloodlink_state::{SessionId, SessionStore, WorkflowStore};
use bloodlink_state_file::FileWorkflowStore;
use bloodlink_state_memory::MemoryWorkflowStore;
use bloodlink_workflow::WorkflowConfig;
use serde::Deserialize;

/// Top-level configuration, loaded from `bloodlink.toml`.
///
/// Every section is optional; a missing file means all defaults.
#[derive(Debug, Default, Deserialize)]
pub struct BloodlinkConfig {
    #[serde(default)]
    pub collaborator: CollaboratorConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub workflow: WorkflowSection,
}

/// Where the request-intake, donor directory, and notification endpoints live.
///
/// # Example
///
/// ```toml
/// [collaborator]
/// endpoint = "https://bloodbank.example.org"
/// request_timeout_secs = 10
/// notify_timeout_secs = 60
/// ```
#[derive(Debug, Deserialize)]
pub struct CollaboratorConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Timeout for create and find calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Timeout for the bulk notify call. Email dispatch is slow.
    #[serde(default = "default_notify_timeout")]
    pub notify_timeout_secs: u64,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout(),
            notify_timeout_secs: default_notify_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8080".to_owned()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_notify_timeout() -> u64 {
    60
}

/// Which workflow store backs the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// One JSON file per session; survives between invocations.
    #[default]
    File,
    /// Lives only as long as the process.
    Memory,
}

#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Directory for session files when `backend = "file"`.
    #[serde(default = "default_session_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_session_name")]
    pub name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            dir: default_session_dir(),
            name: default_session_name(),
        }
    }
}

fn default_session_dir() -> PathBuf {
    PathBuf::from(".bloodlink")
}

fn default_session_name() -> String {
    SessionId::DEFAULT.to_owned()
}

#[derive(Debug, Deserialize)]
pub struct WorkflowSection {
    /// How long a notify status stays on screen.
    #[serde(default = "default_status_display")]
    pub status_display_secs: u64,
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            status_display_secs: default_status_display(),
        }
    }
}

fn default_status_display() -> u64 {
    8
}

impl BloodlinkConfig {
    /// Load `path` if it exists, otherwise use defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        } else {
            toml::from_str("")?
        };
        Ok(config)
    }

    pub fn client(&self) -> anyhow::Result<BloodBankClient> {
        let client = BloodBankClient::builder(&self.collaborator.endpoint)
            .request_timeout(Duration::from_secs(self.collaborator.request_timeout_secs))
            .notify_timeout(Duration::from_secs(self.collaborator.notify_timeout_secs))
            .build()?;
        Ok(client)
    }

    pub fn store(&self) -> anyhow::Result<SessionStore> {
        let session = SessionId::new(self.session.name.as_str())?;
        let backend: Arc<dyn WorkflowStore> = match self.session.backend {
            StoreBackend::File => Arc::new(FileWorkflowStore::new(&self.session.dir)),
            StoreBackend::Memory => Arc::new(MemoryWorkflowStore::new()),
        };
        Ok(SessionStore::new(backend, session))
    }

    pub fn workflow(&self) -> WorkflowConfig {
        WorkflowConfig::default()
            .with_status_display(Duration::from_secs(self.workflow.status_display_secs))
    }
}
