//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the arrears
//! system. These fixtures are designed to be consistent and predictable for
//! unit tests: every test that needs "the master account" or "a past due
//! date" reaches for the same values.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{
    BalanceOuid, BillingAccountOuid, ChargeOuid, CustomerOuid, EpochMillis,
    SettlementAdviceOuid, TransactionId,
};
use uuid::Uuid;

/// Fixture for identifier test data
pub struct OuidFixtures;

impl OuidFixtures {
    /// The canonical test customer
    pub fn customer() -> CustomerOuid {
        CustomerOuid::new("CUST-000001")
    }

    /// The canonical master billing account
    pub fn master_account() -> BillingAccountOuid {
        BillingAccountOuid::new("BA-MASTER-01")
    }

    /// The canonical child billing account
    pub fn child_account() -> BillingAccountOuid {
        BillingAccountOuid::new("BA-CHILD-01")
    }

    /// A billing account outside the canonical hierarchy
    pub fn foreign_account() -> BillingAccountOuid {
        BillingAccountOuid::new("BA-FOREIGN-99")
    }

    /// The canonical balance identifier
    pub fn balance() -> BalanceOuid {
        BalanceOuid::new("BAL-000001")
    }

    /// The canonical transaction identifier
    pub fn transaction() -> TransactionId {
        TransactionId::new("TRX-000001")
    }

    /// The canonical charge identifier
    pub fn charge() -> ChargeOuid {
        ChargeOuid::new("CHG-000001")
    }

    /// The canonical settlement advice identifier
    pub fn advice() -> SettlementAdviceOuid {
        SettlementAdviceOuid::new("SNA-000001")
    }

    /// Mints a unique OUID with the given prefix
    ///
    /// Use when a test needs many distinct identifiers and their exact
    /// values do not matter.
    pub fn mint(prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4().simple())
    }

    /// Mints a unique transaction identifier
    pub fn unique_transaction() -> TransactionId {
        TransactionId::new(Self::mint("TRX"))
    }

    /// Mints a unique balance identifier
    pub fn unique_balance() -> BalanceOuid {
        BalanceOuid::new(Self::mint("BAL"))
    }
}

/// Fixture for temporal test data
///
/// The reference timeline: the account was created early 2023, balances
/// started on New Year 2024, bills fell due on Feb 1, and "now" is
/// mid-June 2024. A second advice due in August models the not-yet-due case.
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The instant reconciliation runs at (Jun 15, 2024)
    pub fn reconciliation_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    /// When the canonical billing account was created (Jan 1, 2023)
    pub fn account_created() -> EpochMillis {
        EpochMillis::from(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
    }

    /// Standard balance start date (Jan 1, 2024)
    pub fn balance_start() -> EpochMillis {
        EpochMillis::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    /// A balance start so close to "now" that the due offset has not elapsed
    pub fn recent_balance_start() -> EpochMillis {
        EpochMillis::from(Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap())
    }

    /// Bill issue date for the canonical advice (Jan 15, 2024)
    pub fn bill_date() -> EpochMillis {
        EpochMillis::from(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
    }

    /// A payment-due timestamp safely before "now" (Feb 1, 2024)
    pub fn payment_due_past() -> EpochMillis {
        EpochMillis::from(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
    }

    /// A payment-due timestamp after "now" (Aug 1, 2024)
    pub fn payment_due_future() -> EpochMillis {
        EpochMillis::from(Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap())
    }
}

/// Fixture for ledger-code test data
pub struct LedgerCodeFixtures;

impl LedgerCodeFixtures {
    /// A ledger code classified as a bill charge
    pub fn bill() -> &'static str {
        "BILL_INV_2024_01"
    }

    /// A ledger code classified as a down-payment charge
    pub fn down_payment() -> &'static str {
        "ABSCHLAG_GAS_2024"
    }

    /// A ledger code classified as a bank-fee charge
    pub fn bank_fee() -> &'static str {
        "BANK_FEE_DIRECT_DEBIT"
    }

    /// An excluded ledger code (contributes nothing to classification)
    pub fn excluded() -> &'static str {
        "CANCELLED_BILL_2024_01"
    }

    /// A ledger code matching none of the known markers
    pub fn unclassified() -> &'static str {
        "HARDWARE_METER_RENTAL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_ordering() {
        let now = TemporalFixtures::reconciliation_now();

        assert!(TemporalFixtures::account_created().datetime() < now);
        assert!(TemporalFixtures::balance_start().datetime() < now);
        assert!(!TemporalFixtures::payment_due_past().is_after(now));
        assert!(TemporalFixtures::payment_due_future().is_after(now));
    }

    #[test]
    fn test_canonical_ouids_are_deterministic() {
        assert_eq!(OuidFixtures::customer(), OuidFixtures::customer());
        assert_eq!(OuidFixtures::master_account(), OuidFixtures::master_account());
    }

    #[test]
    fn test_minted_ouids_are_unique() {
        assert_ne!(OuidFixtures::unique_transaction(), OuidFixtures::unique_transaction());
        assert!(OuidFixtures::mint("BAL").starts_with("BAL-"));
    }
}
