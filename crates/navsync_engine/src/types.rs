use std::fmt;

/// Host window identifier, as handed out by the browser.
pub type WindowId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub kind: FailureKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn not_configured(what: &str) -> Self {
        Self::new(FailureKind::Configuration, format!("{what} is not configured"))
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for RemoteError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Secret or AI credentials missing. Never retried.
    Configuration,
    InvalidUrl,
    /// Transport failure before a status was received.
    Network,
    Timeout,
    /// Remote answered with a non-2xx status.
    HttpStatus(u16),
    InvalidResponse,
    /// Panel channel was already closed.
    ChannelStale,
    /// The text generator returned nothing usable.
    Generation,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Configuration => write!(f, "configuration error"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::ChannelStale => write!(f, "stale panel channel"),
            FailureKind::Generation => write!(f, "generation failed"),
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        return RemoteError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return RemoteError::new(FailureKind::InvalidResponse, err.to_string());
    }
    RemoteError::new(FailureKind::Network, err.to_string())
}
