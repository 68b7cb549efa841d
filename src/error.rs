/// Why a facade refused a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BootReason {
    /// `boot()` was called on a facade that already booted (or tried to).
    #[error("already-booted")]
    AlreadyBooted,
    /// A verify/acknowledge call arrived before `boot()`.
    #[error("not-booted")]
    NotBooted,
}

impl BootReason {
    fn message_prefix(&self) -> &'static str {
        match self {
            BootReason::AlreadyBooted => "You're only allowed to boot the ",
            BootReason::NotBooted => "You need to boot the ",
        }
    }

    fn message_suffix(&self) -> &'static str {
        match self {
            BootReason::AlreadyBooted => " once",
            BootReason::NotBooted => " service first: call boot() before using it",
        }
    }
}

/// Lifecycle violation on a `Verifier` or `Acknowledger`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{}{}", .reason.message_prefix(), .service, .reason.message_suffix())]
pub struct BootRequiredError {
    pub service: &'static str,
    pub reason: BootReason,
}

impl BootRequiredError {
    pub fn already_booted(service: &'static str) -> Self {
        Self {
            service,
            reason: BootReason::AlreadyBooted,
        }
    }

    pub fn not_booted(service: &'static str) -> Self {
        Self {
            service,
            reason: BootReason::NotBooted,
        }
    }
}

/// Errors raised by a `PublisherClient` while talking to the Play Developer API.
///
/// These never reach the caller of `verify`/`acknowledge`: operations turn them
/// into a [`Failure`](crate::models::Failure) value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response format: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ClientError::Api {
            status,
            message: Some(message.into()),
        }
    }

    /// HTTP status carried by the error, if the request got that far.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(_) | ClientError::Decode(_) => None,
        }
    }

    /// Message carried by the error, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            ClientError::Transport(msg) | ClientError::Decode(msg) => Some(msg.as_str()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlayStoreError {
    #[error(transparent)]
    BootRequired(#[from] BootRequiredError),

    #[error("Invalid credentials file: {0}")]
    Credentials(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

// Helper type for results
pub type Result<T> = std::result::Result<T, PlayStoreError>;
