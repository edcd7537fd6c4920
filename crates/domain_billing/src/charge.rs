//! Applied billing charges and ledger-code classification
//!
//! Every charge carries an opaque general-ledger code whose substrings encode
//! the accounting semantics. Classification reads nothing but that code.

use serde::{Deserialize, Serialize};

use core_kernel::{BillingAccountOuid, ChargeOuid, TransactionId};

/// Ledger markers that exclude a charge from balance-type inference.
const EXCLUDED_LEDGER_MARKERS: [&str; 5] =
    ["CANCELLED", "REJECTED", "RETURN", "REBOOKED", "RECEIVABLE"];

const BILL_MARKER: &str = "BILL";
const DOWN_PAYMENT_MARKER: &str = "ABSCHLAG";
const BANK_FEE_MARKER: &str = "BANK_FEE";

/// A charge applied against a billing transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedBillingCharge {
    /// Unique identifier
    pub ouid: ChargeOuid,
    /// Opaque ledger code encoding the charge semantics as substrings
    #[serde(rename = "glid")]
    pub general_ledger_id: String,
    /// Owning billing account
    pub billing_account_ouid: BillingAccountOuid,
    /// Transaction this charge was applied under
    pub transaction_id: TransactionId,
    /// ISO currency code
    pub currency_code: String,
}

impl AppliedBillingCharge {
    /// Returns true if this charge must be skipped during balance-type inference
    ///
    /// Exclusion is decided before any other classification: an excluded
    /// charge contributes no facts at all, whatever else its ledger code
    /// contains.
    pub fn is_ignored(&self) -> bool {
        EXCLUDED_LEDGER_MARKERS
            .iter()
            .any(|marker| self.general_ledger_id.contains(marker))
    }

    /// Returns true if the ledger code marks a bill charge
    pub fn is_bill(&self) -> bool {
        self.general_ledger_id.contains(BILL_MARKER)
    }

    /// Returns true if the ledger code marks a down-payment charge
    pub fn is_down_payment(&self) -> bool {
        self.general_ledger_id.contains(DOWN_PAYMENT_MARKER)
    }

    /// Returns true if the ledger code marks a bank-fee charge
    pub fn is_bank_fee(&self) -> bool {
        self.general_ledger_id.contains(BANK_FEE_MARKER)
    }
}
