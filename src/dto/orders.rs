use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Course, Transaction};

/// The checkout wizard posts the cart contents as course names plus the
/// bank/UPI reference the customer quotes as proof of payment.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub payer_email: String,
    pub course_names: Vec<String>,
    pub total_amount: i64,
    pub reference: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub transaction: Transaction,
    /// Whether the receipt email actually went out; `false` means the
    /// customer should fetch the local receipt instead.
    pub receipt_emailed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionList {
    pub items: Vec<Transaction>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchasedCourses {
    pub items: Vec<Course>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OwnershipQuery {
    pub course: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OwnershipResponse {
    pub purchased: bool,
}
