use std::fmt;

use thiserror::Error;

use crate::dispatch::Action;

/// Structural problems detected while composing a payload, before anything
/// leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("interactive button messages allow at most {max} reply buttons, got {count}")]
    TooManyButtons { count: usize, max: usize },
    #[error("interactive list messages allow at most {max} sections, got {count}")]
    TooManySections { count: usize, max: usize },
    #[error("{kind} component handle does not belong to this template builder")]
    UnknownComponent { kind: ComponentKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Body,
    Header,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Body => f.write_str("body"),
            ComponentKind::Header => f.write_str("header"),
        }
    }
}

/// Failure of a single HTTP exchange with the platform or the proxy.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("status={status} body={body}")]
    Status { status: u16, body: String },
}

impl TransportError {
    /// HTTP status of a rejected request, when the platform answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

/// Everything that can abort one send invocation.
#[derive(Debug, Error)]
pub enum SendError {
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error("invalid {field} selection: {source}")]
    Selection {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The structured error surfaced to the caller of a dispatch. Carries the
/// action that failed and keeps the original cause reachable via `source()`.
#[derive(Debug, Error)]
#[error("{action} request to WhatsApp API failed: {source}")]
pub struct DispatchError {
    pub action: Action,
    #[source]
    pub source: SendError,
}

impl DispatchError {
    pub fn new(action: Action, source: SendError) -> Self {
        Self { action, source }
    }

    pub fn transport(&self) -> Option<&TransportError> {
        match &self.source {
            SendError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

/// Failure while listing phone numbers or templates for a selection UI.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected {resource} listing: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is not configured")]
    Missing(&'static str),
}
