//! Billing accounts and the master/child hierarchy
//!
//! A customer holds one master billing account (MBA) and any number of child
//! accounts (CBAs). Master versus child is structural: a child is any account
//! carrying a "PARENT" relationship that targets the master's OUID. Nothing
//! upstream stores the distinction as a field.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BillingAccountOuid, CustomerOuid, EpochMillis};

const BILL_PRESENTATION_POSTMAIL: &str = "POSTMAIL";
const RELATIONSHIP_TYPE_PARENT: &str = "PARENT";

/// A billing account as fetched from the upstream biller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAccount {
    /// Unique identifier
    pub ouid: BillingAccountOuid,
    /// External account name (the MBA is addressed by name upstream)
    pub name: String,
    /// Owning customer
    pub customer_ouid: CustomerOuid,
    /// How bills are presented to the customer ("POSTMAIL" = postal)
    pub bill_presentation_media: String,
    /// When the account was created upstream
    pub date_time_create: EpochMillis,
    /// Relationships to other billing accounts
    #[serde(default)]
    pub billing_account_relationships: Vec<BillingAccountRelationship>,
}

/// A directed relationship between two billing accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAccountRelationship {
    /// Unique identifier
    pub ouid: String,
    /// Relationship type; only "PARENT" is meaningful here
    #[serde(rename = "type")]
    pub relationship_type: String,
    /// The account this relationship points at
    pub target_billing_account_ouid: BillingAccountOuid,
}

impl BillingAccount {
    /// Returns true if the customer receives bills by postal mail
    pub fn is_offline_customer(&self) -> bool {
        self.bill_presentation_media == BILL_PRESENTATION_POSTMAIL
    }

    /// Returns true if the account is still inside its grace period
    ///
    /// Dunning holds off on freshly created accounts: the account is within
    /// its grace period while `now` lies before creation + `grace_period_days`.
    pub fn is_within_grace_period(&self, grace_period_days: u32, now: DateTime<Utc>) -> bool {
        let grace_ends = self.date_time_create.datetime() + Duration::days(i64::from(grace_period_days));
        now < grace_ends
    }

    /// Returns true if this account is a child of the given master account
    pub fn is_child_of(&self, master_ouid: &BillingAccountOuid) -> bool {
        self.billing_account_relationships.iter().any(|rel| {
            rel.relationship_type == RELATIONSHIP_TYPE_PARENT
                && rel.target_billing_account_ouid == *master_ouid
        })
    }
}

/// Reduces a customer's full account list to the accounts relevant for one
/// master billing account
///
/// Returns every child of the master in its original relative order, with the
/// master itself appended last. The master appears exactly once even when the
/// input list contains or duplicates it.
pub fn related_billing_accounts(
    accounts: Vec<BillingAccount>,
    master: &BillingAccount,
) -> Vec<BillingAccount> {
    let mut relevant: Vec<BillingAccount> = accounts
        .into_iter()
        .filter(|account| account.ouid != master.ouid && account.is_child_of(&master.ouid))
        .collect();

    relevant.push(master.clone());
    relevant
}
