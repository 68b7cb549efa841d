use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::common::{
    datetime_from_millis, lenient_i64, AcknowledgementState, ConsumptionState, PurchaseState,
};

/// `androidpublisher#productPurchase` as returned by the Publisher API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPurchase {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub purchase_time_millis: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub purchase_state: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub consumption_state: Option<i64>,
    #[serde(default)]
    pub developer_payload: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub purchase_type: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub acknowledgement_state: Option<i64>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub obfuscated_external_account_id: Option<String>,
    #[serde(default)]
    pub obfuscated_external_profile_id: Option<String>,
    #[serde(default)]
    pub region_code: Option<String>,
}

/// A successfully fetched product purchase.
///
/// Check [`Receipt::valid`] before granting anything; a consumed receipt has
/// already been granted once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Receipt {
    purchase: ProductPurchase,
}

impl Receipt {
    pub fn new(purchase: ProductPurchase) -> Self {
        Self { purchase }
    }

    /// The product was purchased and not canceled
    pub fn valid(&self) -> bool {
        self.purchase_state() == PurchaseState::Purchased
    }

    pub fn consumed(&self) -> bool {
        self.consumption_state() == ConsumptionState::Consumed
    }

    pub fn purchase_state(&self) -> PurchaseState {
        PurchaseState::from_code(self.purchase.purchase_state)
    }

    pub fn consumption_state(&self) -> ConsumptionState {
        ConsumptionState::from_code(self.purchase.consumption_state)
    }

    pub fn acknowledgement_state(&self) -> AcknowledgementState {
        AcknowledgementState::from_code(self.purchase.acknowledgement_state)
    }

    pub fn acknowledged(&self) -> bool {
        self.acknowledgement_state() == AcknowledgementState::Acknowledged
    }

    pub fn developer_payload(&self) -> Option<&str> {
        self.purchase.developer_payload.as_deref()
    }

    pub fn kind(&self) -> Option<&str> {
        self.purchase.kind.as_deref()
    }

    pub fn order_id(&self) -> Option<&str> {
        self.purchase.order_id.as_deref()
    }

    pub fn purchase_time_millis(&self) -> Option<i64> {
        self.purchase.purchase_time_millis
    }

    pub fn purchased_at(&self) -> Option<OffsetDateTime> {
        self.purchase.purchase_time_millis.and_then(datetime_from_millis)
    }

    /// The raw payload this receipt wraps
    pub fn raw(&self) -> &ProductPurchase {
        &self.purchase
    }
}

impl From<ProductPurchase> for Receipt {
    fn from(purchase: ProductPurchase) -> Self {
        Self::new(purchase)
    }
}
