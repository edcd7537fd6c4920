//! Billing account balances: classification, due dates, filtering
//!
//! A balance arrives from the upstream biller as a thin snapshot (amount,
//! status, transaction id, timestamps). Everything that matters for dunning
//! is derived here per reconciliation run:
//!
//! 1. its category, inferred from the associated charges,
//! 2. its due date, inferred from the category (bills follow their settlement
//!    advice, everything else follows its start date),
//! 3. an `ignore` flag marking balances that are not yet due or cannot be
//!    classified.
//!
//! Derived fields are never sent back upstream and are excluded from the wire
//! representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{BalanceOuid, BillingAccountOuid, SettlementAdviceOuid, TransactionId};
use core_kernel::EpochMillis;

use crate::account::BillingAccount;
use crate::charge::AppliedBillingCharge;
use crate::settlement::SettlementNoteAdvice;

/// The category of a balance, inferred from its charges
///
/// The labels are domain-significant: downstream dunning consumers
/// pattern-match on the exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceType {
    /// Only down-payment charges are present
    DownPayment,
    /// At least one bill charge is present
    Bill,
    /// Both down-payment and bank-fee charges are present
    DownPaymentAndBankFee,
    /// Only bank-fee charges are present
    BankFee,
    /// Nothing conclusive could be inferred from the charges
    Other,
}

impl BalanceType {
    /// Returns the literal label downstream consumers match on
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceType::DownPayment => "Abschlag",
            BalanceType::Bill => "Rechnung",
            BalanceType::DownPaymentAndBankFee => "Abschlag und Bankgebühren",
            BalanceType::BankFee => "Bankgebühren",
            BalanceType::Other => "Sonstiges",
        }
    }
}

impl fmt::Display for BalanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A due balance on a billing account
///
/// Wire fields mirror the upstream payload; the remaining fields are
/// computed during reconciliation and skipped by serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAccountBalance {
    /// Unique identifier
    pub ouid: BalanceOuid,
    /// Owning billing account
    pub billing_account_ouid: BillingAccountOuid,
    /// Signed amount in minor currency units
    pub amount: i64,
    /// Upstream status (the due filter happens upstream)
    pub status: String,
    /// Raw upstream type string, unused by classification
    #[serde(rename = "type")]
    pub balance_type: String,
    /// Transaction the balance was booked under; identity for deduplication
    pub transaction_id: TransactionId,
    /// Reference to the settlement advice backing a bill balance, if any
    #[serde(default, with = "advice_ref")]
    pub settlement_note_advice_ouid: Option<SettlementAdviceOuid>,
    /// When the balance period started
    #[serde(rename = "startDateTime")]
    pub start_date: EpochMillis,

    /// Category inferred from the associated charges
    #[serde(skip)]
    pub inferred_balance_type: Option<BalanceType>,
    /// Due date resolved during reconciliation
    #[serde(skip)]
    pub due_date: Option<EpochMillis>,
    /// Set when the balance is not yet due or cannot be classified
    #[serde(skip)]
    pub ignore: bool,
    /// Charges sharing this balance's transaction id
    #[serde(skip)]
    pub charges: Vec<AppliedBillingCharge>,
    /// The advice matched to a bill balance
    #[serde(skip)]
    pub settlement_note_advice: Option<SettlementNoteAdvice>,
}

/// The upstream encodes "no advice" as an empty string; surface it as `None`.
mod advice_ref {
    use super::SettlementAdviceOuid;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(
        value: &Option<SettlementAdviceOuid>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ouid) => serializer.serialize_str(ouid.as_str()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SettlementAdviceOuid>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()).map(SettlementAdviceOuid::new))
    }
}

impl BillingAccountBalance {
    /// Infers the balance category from the associated charges
    ///
    /// Scans the charges in order, skipping excluded ones. The first bill
    /// charge settles the category outright; otherwise down-payment and
    /// bank-fee evidence accumulates across all charges and resolves by
    /// priority: bill, then bank fee with down payment, then down payment,
    /// then bank fee, then other.
    pub fn infer_balance_type(&mut self) {
        let mut is_down_payment = false;
        let mut is_bill = false;
        let mut is_bank_fee = false;

        for charge in &self.charges {
            if charge.is_ignored() {
                continue;
            }
            if charge.is_bill() {
                // One bill charge decides the whole balance.
                is_bill = true;
                break;
            }
            if charge.is_down_payment() {
                is_down_payment = true;
            }
            if charge.is_bank_fee() {
                is_bank_fee = true;
            }
        }

        self.inferred_balance_type =
            Some(type_from_contained_charges(is_down_payment, is_bill, is_bank_fee));
    }

    /// Resolves the due date of a bill balance from its settlement advice
    ///
    /// Only applies to the Bill category. A payment-due timestamp still in
    /// the future marks the balance as not yet due (`ignore = true`), which
    /// is ordinary filtering rather than an error.
    pub fn infer_bill_due_date(&mut self, advice: &SettlementNoteAdvice, now: DateTime<Utc>) {
        if self.inferred_balance_type != Some(BalanceType::Bill) {
            return;
        }

        if advice.payment_due_date.is_after(now) {
            self.ignore = true;
            return;
        }

        self.due_date = Some(advice.payment_due_date);
    }

    /// Resolves the due date of a non-bill balance from its start date
    ///
    /// Only applies to non-Bill categories. The balance becomes due once
    /// `due_date_offset_days` have passed since its start date; until then it
    /// is marked not yet due. The due date itself stays the unmodified start
    /// date.
    pub fn infer_due_date(&mut self, due_date_offset_days: u32, now: DateTime<Utc>) {
        if self.inferred_balance_type == Some(BalanceType::Bill) {
            return;
        }

        if self.start_date.plus_days(due_date_offset_days).is_after(now) {
            self.ignore = true;
            return;
        }

        self.due_date = Some(self.start_date);
    }
}

fn type_from_contained_charges(down_payment: bool, bill: bool, bank_fee: bool) -> BalanceType {
    if bill {
        BalanceType::Bill
    } else if bank_fee && down_payment {
        BalanceType::DownPaymentAndBankFee
    } else if down_payment {
        BalanceType::DownPayment
    } else if bank_fee {
        BalanceType::BankFee
    } else {
        BalanceType::Other
    }
}

/// Retains the balances owned by one of the given accounts, preserving order
pub fn balances_for_accounts(
    balances: Vec<BillingAccountBalance>,
    accounts: &[BillingAccount],
) -> Vec<BillingAccountBalance> {
    balances
        .into_iter()
        .filter(|balance| {
            accounts
                .iter()
                .any(|account| account.ouid == balance.billing_account_ouid)
        })
        .collect()
}

/// Collapses balances sharing a transaction id into one survivor each
///
/// The first-seen balance per transaction id survives, in its original
/// position, and absorbs the amount of every later duplicate. No amount is
/// ever dropped.
pub fn merge_duplicate_balances(
    balances: Vec<BillingAccountBalance>,
) -> Vec<BillingAccountBalance> {
    let mut merged: Vec<BillingAccountBalance> = Vec::with_capacity(balances.len());

    for balance in balances {
        match merged
            .iter_mut()
            .find(|survivor| survivor.transaction_id == balance.transaction_id)
        {
            Some(survivor) => survivor.amount += balance.amount,
            None => merged.push(balance),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_kernel::ChargeOuid;

    fn balance(ouid: &str, account: &str, transaction: &str, amount: i64) -> BillingAccountBalance {
        BillingAccountBalance {
            ouid: BalanceOuid::new(ouid),
            billing_account_ouid: BillingAccountOuid::new(account),
            amount,
            status: "DUE".to_string(),
            balance_type: "BALANCE".to_string(),
            transaction_id: TransactionId::new(transaction),
            settlement_note_advice_ouid: None,
            start_date: EpochMillis::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            inferred_balance_type: None,
            due_date: None,
            ignore: false,
            charges: Vec::new(),
            settlement_note_advice: None,
        }
    }

    fn charge(glid: &str) -> AppliedBillingCharge {
        AppliedBillingCharge {
            ouid: ChargeOuid::new("CHG-1"),
            general_ledger_id: glid.to_string(),
            billing_account_ouid: BillingAccountOuid::new("BA-1"),
            transaction_id: TransactionId::new("TRX-1"),
            currency_code: "EUR".to_string(),
        }
    }

    fn classify(glids: &[&str]) -> BalanceType {
        let mut b = balance("BAL-1", "BA-1", "TRX-1", 100);
        b.charges = glids.iter().map(|g| charge(g)).collect();
        b.infer_balance_type();
        b.inferred_balance_type.unwrap()
    }

    #[test]
    fn test_bill_short_circuits_over_down_payment() {
        assert_eq!(classify(&["ABSCHLAG_2023", "BILL_2023"]), BalanceType::Bill);
    }

    #[test]
    fn test_down_payment_and_bank_fee_combination() {
        assert_eq!(
            classify(&["BANK_FEE_X", "ABSCHLAG_Y"]),
            BalanceType::DownPaymentAndBankFee
        );
    }

    #[test]
    fn test_single_categories() {
        assert_eq!(classify(&["ABSCHLAG_GAS"]), BalanceType::DownPayment);
        assert_eq!(classify(&["BANK_FEE_RETURN_X"]), BalanceType::BankFee);
        assert_eq!(classify(&["SOMETHING_ELSE"]), BalanceType::Other);
    }

    #[test]
    fn test_excluded_charge_contributes_nothing() {
        // CANCELLED wins over the BILL substring inside the same code.
        assert_eq!(classify(&["CANCELLED_BILL_1"]), BalanceType::Other);
    }

    #[test]
    fn test_exclusion_only_skips_the_one_charge() {
        assert_eq!(
            classify(&["REJECTED_BILL", "ABSCHLAG_GAS"]),
            BalanceType::DownPayment
        );
    }

    #[test]
    fn test_balance_type_labels_are_exact() {
        assert_eq!(BalanceType::DownPayment.as_str(), "Abschlag");
        assert_eq!(BalanceType::Bill.as_str(), "Rechnung");
        assert_eq!(
            BalanceType::DownPaymentAndBankFee.as_str(),
            "Abschlag und Bankgebühren"
        );
        assert_eq!(BalanceType::BankFee.as_str(), "Bankgebühren");
        assert_eq!(BalanceType::Other.as_str(), "Sonstiges");
    }

    #[test]
    fn test_dedup_merges_amounts_into_first_seen() {
        let balances = vec![
            balance("BAL-1", "BA-1", "TRX-1", 100),
            balance("BAL-2", "BA-2", "TRX-1", 50),
            balance("BAL-3", "BA-1", "TRX-2", 25),
            balance("BAL-4", "BA-1", "TRX-1", 7),
        ];

        let merged = merge_duplicate_balances(balances);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].ouid.as_str(), "BAL-1");
        assert_eq!(merged[0].amount, 157);
        assert_eq!(merged[1].ouid.as_str(), "BAL-3");
        assert_eq!(merged[1].amount, 25);
    }

    #[test]
    fn test_filter_preserves_order_and_drops_foreign_accounts() {
        let accounts = vec![
            crate::account::BillingAccount {
                ouid: BillingAccountOuid::new("BA-1"),
                name: "A".to_string(),
                customer_ouid: core_kernel::CustomerOuid::new("CUST-1"),
                bill_presentation_media: "EMAIL".to_string(),
                date_time_create: EpochMillis::from_millis(0).unwrap(),
                billing_account_relationships: Vec::new(),
            },
        ];
        let balances = vec![
            balance("BAL-1", "BA-1", "TRX-1", 10),
            balance("BAL-2", "BA-9", "TRX-2", 20),
            balance("BAL-3", "BA-1", "TRX-3", 30),
        ];

        let kept = balances_for_accounts(balances, &accounts);

        let ouids: Vec<&str> = kept.iter().map(|b| b.ouid.as_str()).collect();
        assert_eq!(ouids, vec!["BAL-1", "BAL-3"]);
    }

    #[test]
    fn test_bill_due_date_from_advice() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let advice = SettlementNoteAdvice {
            ouid: SettlementAdviceOuid::new("SNA-1"),
            id: "RE-1".to_string(),
            bill_date: EpochMillis::from(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
            payment_due_date: EpochMillis::from(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            category: "REGULAR".to_string(),
            state: "DUE".to_string(),
        };

        let mut b = balance("BAL-1", "BA-1", "TRX-1", 100);
        b.inferred_balance_type = Some(BalanceType::Bill);
        b.infer_bill_due_date(&advice, now);

        assert!(!b.ignore);
        assert_eq!(b.due_date, Some(advice.payment_due_date));
    }

    #[test]
    fn test_future_bill_is_marked_not_yet_due() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let advice = SettlementNoteAdvice {
            ouid: SettlementAdviceOuid::new("SNA-1"),
            id: "RE-1".to_string(),
            bill_date: EpochMillis::from(now),
            payment_due_date: EpochMillis::from(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            category: "REGULAR".to_string(),
            state: "DUE".to_string(),
        };

        let mut b = balance("BAL-1", "BA-1", "TRX-1", 100);
        b.inferred_balance_type = Some(BalanceType::Bill);
        b.infer_bill_due_date(&advice, now);

        assert!(b.ignore);
        assert_eq!(b.due_date, None);
    }

    #[test]
    fn test_non_bill_due_date_is_unmodified_start() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let mut b = balance("BAL-1", "BA-1", "TRX-1", 100); // start 2024-01-01
        b.inferred_balance_type = Some(BalanceType::DownPayment);
        b.infer_due_date(14, now);

        assert!(!b.ignore);
        assert_eq!(b.due_date, Some(b.start_date));
    }

    #[test]
    fn test_non_bill_within_offset_window_is_not_yet_due() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let mut b = balance("BAL-1", "BA-1", "TRX-1", 100); // start 2024-01-01
        b.inferred_balance_type = Some(BalanceType::DownPayment);
        b.infer_due_date(14, now);

        assert!(b.ignore);
        assert_eq!(b.due_date, None);
    }

    #[test]
    fn test_due_date_guards_by_category() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let mut bill = balance("BAL-1", "BA-1", "TRX-1", 100);
        bill.inferred_balance_type = Some(BalanceType::Bill);
        bill.infer_due_date(14, now);
        assert_eq!(bill.due_date, None); // non-bill rule must not touch bills

        let advice = SettlementNoteAdvice {
            ouid: SettlementAdviceOuid::new("SNA-1"),
            id: "RE-1".to_string(),
            bill_date: EpochMillis::from_millis(0).unwrap(),
            payment_due_date: EpochMillis::from_millis(0).unwrap(),
            category: "REGULAR".to_string(),
            state: "DUE".to_string(),
        };
        let mut down_payment = balance("BAL-2", "BA-1", "TRX-2", 100);
        down_payment.inferred_balance_type = Some(BalanceType::DownPayment);
        down_payment.infer_bill_due_date(&advice, now);
        assert_eq!(down_payment.due_date, None); // bill rule must not touch the rest
    }

    #[test]
    fn test_wire_format_and_derived_field_skipping() {
        let json = r#"{
            "ouid": "BAL-1",
            "billingAccountOuid": "BA-1",
            "amount": -4200,
            "status": "DUE",
            "type": "BALANCE",
            "transactionId": "TRX-1",
            "settlementNoteAdviceOuid": "SNA-1",
            "startDateTime": 1704067200000
        }"#;

        let parsed: BillingAccountBalance = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.amount, -4200);
        assert_eq!(
            parsed.settlement_note_advice_ouid,
            Some(SettlementAdviceOuid::new("SNA-1"))
        );

        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["type"], "BALANCE");
        assert_eq!(value["startDateTime"], 1_704_067_200_000_i64);
        assert!(value.get("ignore").is_none());
        assert!(value.get("charges").is_none());
        assert!(value.get("dueDate").is_none());
    }

    #[test]
    fn test_empty_advice_reference_is_none() {
        let json = r#"{
            "ouid": "BAL-1",
            "billingAccountOuid": "BA-1",
            "amount": 100,
            "status": "DUE",
            "type": "BALANCE",
            "transactionId": "TRX-1",
            "settlementNoteAdviceOuid": "",
            "startDateTime": 0
        }"#;

        let parsed: BillingAccountBalance = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.settlement_note_advice_ouid, None);

        // And a missing field behaves the same.
        let json_missing = r#"{
            "ouid": "BAL-2",
            "billingAccountOuid": "BA-1",
            "amount": 100,
            "status": "DUE",
            "type": "BALANCE",
            "transactionId": "TRX-2",
            "startDateTime": 0
        }"#;
        let parsed: BillingAccountBalance = serde_json::from_str(json_missing).unwrap();
        assert_eq!(parsed.settlement_note_advice_ouid, None);
    }
}
