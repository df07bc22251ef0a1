use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::consts;

/// Outcome of a payment attempt as counted by the metrics
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Display)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    // Forwarded to the game server and accepted
    #[default]
    #[display("approved")]
    Approved,
    // Below the small amount threshold, never forwarded
    #[display("auto_approved")]
    AutoApproved,
    // The game server answered but refused the grant
    #[display("rejected")]
    Rejected,
    // Request failed validation
    #[display("invalid")]
    Invalid,
    // The game server couldnt be reached
    #[display("gateway_error")]
    GatewayError,
}

/// Card fields as typed in the payment form, built fresh for every submit
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardInput {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub owner_name: String,
    pub email: String,
}

impl CardInput {
    /// Card number safe to log: only the last four digits survive
    pub fn masked_number(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        let last_four: String = digits[digits.len().saturating_sub(4)..].iter().collect();

        format!("**** **** **** {last_four}")
    }
}

/// Body of `POST /api/payment/process`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub card_info: CardInput,
    pub product_name: String,
    /// Digits only, the grouping commas are removed by the caller
    pub product_price: String,
}

/// What the payment page needs from a 2xx answer
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccess {
    pub payment_id: String,
}

/// What the payment page shows for a non 2xx answer or a failed request
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PaymentFailure {
    pub message: String,
}

impl PaymentFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for PaymentFailure {
    fn default() -> Self {
        Self::new(consts::DEFAULT_PAYMENT_ERROR_MESSAGE)
    }
}

/// Full 2xx body returned by the payment endpoint
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub payment_id: String,
    pub message: String,
    pub credit_amount: u32,
    pub auto_processed: bool,
}

impl From<PaymentReceipt> for PaymentSuccess {
    fn from(val: PaymentReceipt) -> Self {
        PaymentSuccess {
            payment_id: val.payment_id,
        }
    }
}

/// Non 2xx body returned by the payment endpoint
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PaymentErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl PaymentErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
