use thiserror::Error;

pub const BODY_SNIPPET_LEN: usize = 160;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("request timed out (15s)")]
    Timeout,

    #[error("{detail}")]
    Transport { detail: String },

    #[error("{message}")]
    Api { message: String },

    #[error("local storage failed: {detail}")]
    Storage { detail: String },
}

impl ApiError {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage {
            detail: err.to_string(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Truncated view of a raw response body, for diagnostics in error messages.
pub fn body_snippet(body: &str) -> &str {
    match body.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
