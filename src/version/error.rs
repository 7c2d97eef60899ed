use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefParseError {
    #[error("'{raw}' does not match the expected format refs/(heads|pull|tags)/<value>")]
    Malformed { raw: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}
