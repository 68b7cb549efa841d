use serde::{Serialize, Serializer};

use crate::error::ClientError;

const UNKNOWN_ERROR: &str = "Unknown error";

/// A failed call against the Publisher API, returned as a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    code: Option<u16>,
    #[serde(serialize_with = "serialize_message")]
    message: Option<String>,
}

fn message_or_unknown(message: Option<&str>) -> &str {
    match message {
        Some(message) if !message.is_empty() => message,
        _ => UNKNOWN_ERROR,
    }
}

fn serialize_message<S: Serializer>(
    message: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(message_or_unknown(message.as_deref()))
}

impl Failure {
    pub fn new(code: Option<u16>, message: Option<String>) -> Self {
        Self { code, message }
    }

    /// HTTP status of the failed call; `None` when the request never got a response
    pub fn code(&self) -> Option<u16> {
        self.code
    }

    pub fn message(&self) -> &str {
        message_or_unknown(self.message.as_deref())
    }
}

impl From<ClientError> for Failure {
    fn from(error: ClientError) -> Self {
        Self {
            code: error.status_code(),
            message: error.message().map(str::to_string),
        }
    }
}

/// Result of a verification or acknowledgement: a record, or the failure that
/// prevented getting one
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "lowercase")]
pub enum Outcome<T> {
    Success(T),
    Failure(Failure),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(failure) => Outcome::Failure(failure),
        }
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(failure) => Err(failure),
        }
    }
}

impl<T> From<Result<T, ClientError>> for Outcome<T> {
    fn from(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Failure(error.into()),
        }
    }
}
