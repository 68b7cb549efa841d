use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;

/// Purchase state of a one-time product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseState {
    Purchased,
    Canceled,
    Pending,
    /// Field missing from the response
    Unset,
    Unknown(i64),
}

impl PurchaseState {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::Purchased,
            Some(1) => Self::Canceled,
            Some(2) => Self::Pending,
            Some(other) => Self::Unknown(other),
            None => Self::Unset,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchased => "purchased",
            Self::Canceled => "canceled",
            Self::Pending => "pending",
            Self::Unset => "unset",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Consumption state of a one-time product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumptionState {
    NotConsumed,
    Consumed,
    Unset,
    Unknown(i64),
}

impl ConsumptionState {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::NotConsumed,
            Some(1) => Self::Consumed,
            Some(other) => Self::Unknown(other),
            None => Self::Unset,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotConsumed => "not_consumed",
            Self::Consumed => "consumed",
            Self::Unset => "unset",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Payment state of a subscription.
///
/// Google omits `paymentState` once a subscription has lapsed, so `Unset` is a
/// normal value here and must never be read as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    Pending,
    Received,
    Trial,
    /// Pending deferred upgrade/downgrade
    PendingDeferred,
    Unset,
    Unknown(i64),
}

impl PaymentState {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::Pending,
            Some(1) => Self::Received,
            Some(2) => Self::Trial,
            Some(3) => Self::PendingDeferred,
            Some(other) => Self::Unknown(other),
            None => Self::Unset,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Received => "received",
            Self::Trial => "trial",
            Self::PendingDeferred => "pending_deferred",
            Self::Unset => "unset",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Reason a subscription was canceled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    UserCanceled,
    /// Canceled by the system, usually a billing problem
    PaymentFailed,
    Replaced,
    DeveloperCanceled,
    Unset,
    Unknown(i64),
}

impl CancelReason {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::UserCanceled,
            Some(1) => Self::PaymentFailed,
            Some(2) => Self::Replaced,
            Some(3) => Self::DeveloperCanceled,
            Some(other) => Self::Unknown(other),
            None => Self::Unset,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserCanceled => "user_canceled",
            Self::PaymentFailed => "payment_failed",
            Self::Replaced => "replaced",
            Self::DeveloperCanceled => "developer_canceled",
            Self::Unset => "unset",
            Self::Unknown(_) => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcknowledgementState {
    NotAcknowledged,
    Acknowledged,
    Unset,
    Unknown(i64),
}

impl AcknowledgementState {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::NotAcknowledged,
            Some(1) => Self::Acknowledged,
            Some(other) => Self::Unknown(other),
            None => Self::Unset,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAcknowledged => "not_acknowledged",
            Self::Acknowledged => "acknowledged",
            Self::Unset => "unset",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Converts epoch milliseconds to a UTC timestamp, truncated to whole seconds.
pub fn datetime_from_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(millis.div_euclid(1000)).ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

/// Accepts `123`, `"123"` or `null` for an optional integer field.
///
/// The Publisher API encodes int64 values as JSON strings and int32 values as
/// numbers.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
