use std::fmt;

use newsfeed_core::{Article, FeedResult, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FeedLoaded {
        request_id: RequestId,
        result: FeedResult,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkEvent {
    Added(Article),
    Removed(Article),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SourceError {
    pub kind: FailureKind,
    pub message: String,
}

impl SourceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// No response at all: connection refused, DNS, reset.
    Unavailable,
    Timeout,
    /// Provider answered with a non-success status.
    Rejected(u16),
    TooLarge { max_bytes: u64, actual: Option<u64> },
    InvalidBody,
}

impl FailureKind {
    /// Rejections are the provider's verdict; everything else means it was unreachable.
    pub fn is_rejection(&self) -> bool {
        matches!(self, FailureKind::Rejected(_))
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Unavailable => write!(f, "provider unavailable"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Rejected(code) => write!(f, "provider rejected request with status {code}"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidBody => write!(f, "invalid response body"),
        }
    }
}
