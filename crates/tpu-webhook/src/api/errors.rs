use core::error::Error;

/// API errors
#[derive(Debug, derive_more::Display)]
pub enum ApiError {
    #[display("Server error: {message}")]
    ServerError { message: String },
    #[display("Failed to load TLS material from {path}")]
    TlsConfig { path: String },
}

impl Error for ApiError {}
