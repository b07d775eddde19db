//! Authentication test helpers

use quillnest::backend::auth::sessions::create_token;
use quillnest::backend::server::ServerConfig;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "quillnest-test-secret";

/// Server config with a fixed secret and no database
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        upload_dir: std::env::temp_dir().join("quillnest-test-uploads"),
        ..ServerConfig::default()
    }
}

/// A fresh user id and a token for it
pub fn test_user(username: &str) -> (Uuid, String) {
    let id = Uuid::new_v4();
    let token = create_token(id, username, &test_config()).expect("Failed to create test token");
    (id, token)
}
