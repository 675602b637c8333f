#![allow(dead_code)]

use loopstudio_common::{AppConfig, StaticTokenProvider};
use loopstudio_connectors::Connector;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::Mutex;
use wiremock::MockServer;

static ENV_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub const TOKEN: &str = "integration_token";

/// RAII guard for setting environment variables that automatically cleans up on drop.
/// Uses a global mutex to ensure thread-safety across concurrent tests.
pub struct EnvGuard {
    _lock: std::sync::MutexGuard<'static, ()>,
    keys: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<(&str, &str)>) -> Self {
        let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let keys: Vec<String> = vars
            .iter()
            .map(|(k, v)| {
                std::env::set_var(k, v);
                k.to_string()
            })
            .collect();
        Self { _lock: lock, keys }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.keys {
            std::env::remove_var(key);
        }
    }
}

/// Configuration pointing every remote URL at `server`.
pub fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.remote.api_url = format!("{}/api/v1.0", server.uri());
    config.remote.app_config_url = format!("{}/app_config.json", server.uri());
    config.remote.auth_url = server.uri();
    config
}

pub fn connector_for(server: &MockServer) -> Connector {
    let provider = Arc::new(StaticTokenProvider::new(TOKEN.to_string().into()));
    Connector::from_config(&config_for(server), provider).unwrap()
}
