use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenotaxError {
    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("unsupported certificate format: {0}")]
    UnsupportedInput(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RenotaxError>;
