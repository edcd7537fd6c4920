//! Settlement note advices
//!
//! A settlement note advice is the statement document the upstream biller
//! issues for a bill-type balance; its payment-due timestamp is the only
//! authoritative due date for bills.

use serde::{Deserialize, Serialize};

use core_kernel::{EpochMillis, SettlementAdviceOuid};

const CATEGORY_LAST: &str = "LAST";
const STATE_SETTLED: &str = "SETTLED";

/// A settlement note advice issued for a billing account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementNoteAdvice {
    /// Unique identifier
    pub ouid: SettlementAdviceOuid,
    /// External document id
    pub id: String,
    /// Date the underlying bill was issued
    pub bill_date: EpochMillis,
    /// When payment for the bill is due
    pub payment_due_date: EpochMillis,
    /// Advice category ("LAST" marks the closing advice of a contract)
    pub category: String,
    /// Advice state ("SETTLED" once payment has been reconciled)
    pub state: String,
}

impl SettlementNoteAdvice {
    /// Returns true if this advice is the settled closing bill of a contract
    pub fn is_final_bill(&self) -> bool {
        self.category == CATEGORY_LAST && self.state == STATE_SETTLED
    }
}

/// Returns true if any advice in the list is a settled final bill
pub fn has_final_bill(advices: &[SettlementNoteAdvice]) -> bool {
    advices.iter().any(SettlementNoteAdvice::is_final_bill)
}
