use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MutationError>;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("could not deserialize request: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    #[error("malformed admission review: request is nil")]
    MissingRequest,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not unmarshal pod on admission request: {0}")]
    Unmarshal(#[source] serde_json::Error),

    #[error("could not unmarshal pod on admission request: object is missing")]
    MissingObject,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewriteError {
    #[error("private registry or public project environment variables are not set")]
    ConfigurationMissing,
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("could not marshal JSON patch: {0}")]
    Patch(#[source] serde_json::Error),

    #[error("marshaling response: {0}")]
    Response(#[source] serde_json::Error),
}

/// Every way the handling of a single admission request can fail.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl MutationError {
    /// Protocol errors are the caller's fault, everything else means the
    /// webhook itself is broken or misconfigured.
    pub fn status_code(&self) -> StatusCode {
        match self {
            MutationError::Decode(_) | MutationError::Extract(_) => StatusCode::BAD_REQUEST,
            MutationError::Rewrite(_) | MutationError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
