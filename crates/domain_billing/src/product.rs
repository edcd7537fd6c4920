//! Products and hierarchy-scoped product filters
//!
//! Product lookups stay with the external collaborator; this module only
//! carries the snapshot type and the pure filters dunning callers combine
//! with the account hierarchy.

use serde::{Deserialize, Serialize};

use core_kernel::{BillingAccountOuid, EpochMillis, ProductOuid};

const SUBSCRIPTION_NAME_PREFIX: &str = "SED4";
const STATUS_ACTIVE: &str = "ACTIVE";

/// A product booked on a billing account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier
    pub ouid: ProductOuid,
    /// Product name; subscription products carry a fixed prefix
    pub name: String,
    /// Billing account the product is booked on
    pub billing_account_ouid: BillingAccountOuid,
    /// Upstream lifecycle status
    pub status: String,
    /// Contract serial number; empty when no contract exists yet
    #[serde(default)]
    pub product_serial_number: String,
    /// When the product term starts
    pub start_date_time: EpochMillis,
    /// When the product term ends
    pub end_date_time: EpochMillis,
}

impl Product {
    /// Returns true if this is a subscription product
    pub fn is_subscription_product(&self) -> bool {
        self.name.starts_with(SUBSCRIPTION_NAME_PREFIX)
    }

    /// Returns true if the product is in active status
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    /// Returns true if the product has a contract
    pub fn has_contract(&self) -> bool {
        !self.product_serial_number.is_empty()
    }
}

/// Retains the products booked on one of the given billing accounts
///
/// Combine with the resolved account hierarchy to scope products to one
/// master billing account and its children.
pub fn products_for_accounts(
    products: Vec<Product>,
    accounts: &[crate::account::BillingAccount],
) -> Vec<Product> {
    products
        .into_iter()
        .filter(|product| {
            accounts
                .iter()
                .any(|account| account.ouid == product.billing_account_ouid)
        })
        .collect()
}

/// Retains only subscription products
pub fn subscription_products(products: Vec<Product>) -> Vec<Product> {
    products
        .into_iter()
        .filter(Product::is_subscription_product)
        .collect()
}
