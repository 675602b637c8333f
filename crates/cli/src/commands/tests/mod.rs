mod test_helpers;

use loopstudio_common::AppConfig;
use secrecy::SecretString;
use wiremock::MockServer;

/// Configuration pointing every remote URL at `server`.
fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.remote.api_url = format!("{}/api/v1.0", server.uri());
    config.remote.app_config_url = format!("{}/app_config.json", server.uri());
    config.remote.auth_url = server.uri();
    config
}

fn with_token(mut config: AppConfig) -> AppConfig {
    config.auth.token = Some(SecretString::from("cli_token".to_string()));
    config
}
