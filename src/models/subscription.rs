use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::common::{
    datetime_from_millis, lenient_i64, AcknowledgementState, CancelReason, PaymentState,
};

/// `androidpublisher#subscriptionPurchase` as returned by the Publisher API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPurchase {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub start_time_millis: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub expiry_time_millis: Option<i64>,
    #[serde(default)]
    pub auto_renewing: Option<bool>,
    #[serde(default)]
    pub price_currency_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub price_amount_micros: Option<i64>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub developer_payload: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub payment_state: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub cancel_reason: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub user_cancellation_time_millis: Option<i64>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub linked_purchase_token: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub purchase_type: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub acknowledgement_state: Option<i64>,
    #[serde(default)]
    pub obfuscated_external_account_id: Option<String>,
    #[serde(default)]
    pub obfuscated_external_profile_id: Option<String>,
}

/// A successfully fetched subscription purchase
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Subscription {
    purchase: SubscriptionPurchase,
}

impl Subscription {
    pub fn new(purchase: SubscriptionPurchase) -> Self {
        Self { purchase }
    }

    /// Whole days since the expiry date, by calendar date. Negative while the
    /// subscription is still running.
    pub fn overdue_days_on(&self, today: Date) -> Option<i64> {
        self.expires_at()
            .map(|expires_at| (today - expires_at.date()).whole_days())
    }

    pub fn overdue_days(&self) -> Option<i64> {
        self.overdue_days_on(OffsetDateTime::now_utc().date())
    }

    pub fn expired_on(&self, today: Date) -> bool {
        self.overdue_days_on(today).is_some_and(|days| days > 0)
    }

    /// The expiry date has passed. A subscription without expiry is not expired.
    pub fn expired(&self) -> bool {
        self.expired_on(OffsetDateTime::now_utc().date())
    }

    pub fn trial(&self) -> bool {
        self.payment_state() == PaymentState::Trial
    }

    pub fn payment_received(&self) -> bool {
        self.payment_state() == PaymentState::Received
    }

    pub fn payment_pending(&self) -> bool {
        self.payment_state() == PaymentState::Pending
    }

    pub fn payment_failed(&self) -> bool {
        self.cancel_reason() == CancelReason::PaymentFailed
    }

    pub fn canceled_by_user(&self) -> bool {
        self.cancel_reason() == CancelReason::UserCanceled
    }

    pub fn acknowledged(&self) -> bool {
        self.acknowledgement_state() == AcknowledgementState::Acknowledged
    }

    pub fn auto_renewing(&self) -> bool {
        self.purchase.auto_renewing.unwrap_or(false)
    }

    pub fn payment_state(&self) -> PaymentState {
        PaymentState::from_code(self.purchase.payment_state)
    }

    pub fn cancel_reason(&self) -> CancelReason {
        CancelReason::from_code(self.purchase.cancel_reason)
    }

    pub fn acknowledgement_state(&self) -> AcknowledgementState {
        AcknowledgementState::from_code(self.purchase.acknowledgement_state)
    }

    pub fn price_amount_micros(&self) -> Option<i64> {
        self.purchase.price_amount_micros
    }

    /// Price in currency units, e.g. `19.99`
    pub fn price(&self) -> Option<f64> {
        self.purchase
            .price_amount_micros
            .map(|micros| micros as f64 / 1_000_000.0)
    }

    /// ISO 4217 code such as `"GBP"`
    pub fn price_currency_code(&self) -> Option<&str> {
        self.purchase.price_currency_code.as_deref()
    }

    pub fn kind(&self) -> Option<&str> {
        self.purchase.kind.as_deref()
    }

    pub fn developer_payload(&self) -> Option<&str> {
        self.purchase.developer_payload.as_deref()
    }

    pub fn order_id(&self) -> Option<&str> {
        self.purchase.order_id.as_deref()
    }

    pub fn start_time_millis(&self) -> Option<i64> {
        self.purchase.start_time_millis
    }

    pub fn expiry_time_millis(&self) -> Option<i64> {
        self.purchase.expiry_time_millis
    }

    pub fn starts_at(&self) -> Option<OffsetDateTime> {
        self.purchase.start_time_millis.and_then(datetime_from_millis)
    }

    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.purchase.expiry_time_millis.and_then(datetime_from_millis)
    }

    pub fn user_canceled_at(&self) -> Option<OffsetDateTime> {
        self.purchase
            .user_cancellation_time_millis
            .and_then(datetime_from_millis)
    }

    pub fn raw(&self) -> &SubscriptionPurchase {
        &self.purchase
    }
}

impl From<SubscriptionPurchase> for Subscription {
    fn from(purchase: SubscriptionPurchase) -> Self {
        Self::new(purchase)
    }
}
