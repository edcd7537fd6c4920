//! Billing Domain - Overdue-Balance Reconciliation
//!
//! This crate decides which monetary balances on a customer's billing-account
//! hierarchy are genuinely overdue, classified by cause, for downstream
//! collections and dunning decisions.
//!
//! # Reconciliation Pipeline
//!
//! One reconciliation run works on read-only snapshots fetched through the
//! [`BillingPort`] seam and derives everything else in memory:
//!
//! 1. **Hierarchy resolution**: the customer's account list is reduced to the
//!    master billing account plus its children (accounts with a "PARENT"
//!    relationship targeting the master).
//! 2. **Filter and dedup**: due balances are restricted to that hierarchy and
//!    balances sharing a transaction id are merged into one, amounts summed.
//! 3. **Classification**: each balance's category (down payment, bill, bank
//!    fee, combinations, other) is inferred from the ledger codes of its
//!    applied charges.
//! 4. **Due-date inference**: bills take their due date from the matching
//!    settlement note advice; everything else becomes due a configured number
//!    of days after its start date.
//!
//! Balances that are not yet due, or that lack the data to be classified, are
//! excluded from the result; only the latter produce warnings.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillingConfig, ReconciliationService};
//!
//! let service = ReconciliationService::new(port, BillingConfig::default());
//!
//! let overdue = service
//!     .resolve_overdue_balances(&customer_ouid, &master_account, Utc::now())
//!     .await?;
//!
//! for balance in &overdue {
//!     println!("{}: {} minor units", balance.transaction_id, balance.amount);
//! }
//! ```

pub mod account;
pub mod balance;
pub mod charge;
pub mod settlement;
pub mod product;
pub mod config;
pub mod error;
pub mod ports;
pub mod services;

pub use account::{related_billing_accounts, BillingAccount, BillingAccountRelationship};
pub use balance::{
    balances_for_accounts, merge_duplicate_balances, BalanceType, BillingAccountBalance,
};
pub use charge::AppliedBillingCharge;
pub use settlement::{has_final_bill, SettlementNoteAdvice};
pub use product::{products_for_accounts, subscription_products, Product};
pub use config::BillingConfig;
pub use error::BillingError;
pub use ports::BillingPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{FailingCall, MockBillingPort};
pub use services::ReconciliationService;
