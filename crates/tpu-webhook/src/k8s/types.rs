use thiserror::Error;

/// Errors raised while extracting a typed resource from an admission request.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Expected {expected} but got {actual}")]
    UnexpectedKind { expected: String, actual: String },
    #[error("Admission request {uid} carries no object")]
    MissingObject { uid: String },
    #[error("Failed to decode {kind}: {message}")]
    Decode { kind: String, message: String },
}
