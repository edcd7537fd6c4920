//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{BalanceOuid, TransactionId};
use domain_billing::balance::BillingAccountBalance;
use proptest::prelude::*;

use crate::builders::BalanceBuilder;

/// Strategy for generating signed amounts in minor currency units
///
/// The range keeps sums of realistic batch sizes far away from i64 overflow.
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..1_000_000_000i64
}

/// Strategy for generating strictly positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating transaction identifiers
pub fn transaction_id_strategy() -> impl Strategy<Value = TransactionId> {
    "TRX-[0-9]{6}".prop_map(TransactionId::new)
}

/// Strategy for generating ledger codes classified as bill charges
pub fn bill_glid_strategy() -> impl Strategy<Value = String> {
    "[a-z]{0,6}".prop_map(|suffix| format!("BILL_{}", suffix))
}

/// Strategy for generating ledger codes classified as down-payment charges
pub fn down_payment_glid_strategy() -> impl Strategy<Value = String> {
    "[a-z]{0,6}".prop_map(|suffix| format!("ABSCHLAG_{}", suffix))
}

/// Strategy for generating ledger codes classified as bank-fee charges
pub fn bank_fee_glid_strategy() -> impl Strategy<Value = String> {
    "[a-z]{0,6}".prop_map(|suffix| format!("BANK_FEE_{}", suffix))
}

/// Strategy for generating ledger codes carrying exactly one
/// classification marker
pub fn classified_glid_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        bill_glid_strategy(),
        down_payment_glid_strategy(),
        bank_fee_glid_strategy(),
    ]
}

/// Strategy for generating excluded ledger codes
pub fn excluded_glid_strategy() -> impl Strategy<Value = String> {
    let marker = prop_oneof![
        Just("CANCELLED"),
        Just("REJECTED"),
        Just("RETURN"),
        Just("REBOOKED"),
        Just("RECEIVABLE"),
    ];
    (marker, "[a-z]{0,6}").prop_map(|(marker, suffix)| format!("{}_{}", marker, suffix))
}

/// Strategy for generating ledger codes matching no known marker
///
/// Markers are uppercase and matching is case-sensitive, so lowercase
/// codes can never be classified.
pub fn unclassified_glid_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{1,16}"
}

/// Strategy for generating a balance batch with colliding transaction ids
///
/// Transaction ids are drawn from a pool of six, so batches of a dozen or
/// more entries reliably contain duplicates to deduplicate. Balance OUIDs
/// enumerate the original positions.
pub fn balance_batch_strategy() -> impl Strategy<Value = Vec<BillingAccountBalance>> {
    proptest::collection::vec((0usize..6usize, amount_minor_strategy()), 0..32).prop_map(
        |entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(position, (pool_slot, amount))| {
                    BalanceBuilder::new()
                        .with_ouid(BalanceOuid::new(format!("BAL-{:04}", position)))
                        .with_transaction(TransactionId::new(format!("TRX-POOL-{}", pool_slot)))
                        .with_amount(amount)
                        .build()
                })
                .collect()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::ChargeBuilder;

    proptest! {
        #[test]
        fn excluded_glids_are_ignored(glid in excluded_glid_strategy()) {
            let charge = ChargeBuilder::new().with_glid(glid).build();
            prop_assert!(charge.is_ignored());
        }

        #[test]
        fn classified_glids_are_never_ignored(glid in classified_glid_strategy()) {
            let charge = ChargeBuilder::new().with_glid(glid).build();
            prop_assert!(!charge.is_ignored());
            prop_assert!(charge.is_bill() || charge.is_down_payment() || charge.is_bank_fee());
        }

        #[test]
        fn unclassified_glids_match_no_marker(glid in unclassified_glid_strategy()) {
            let charge = ChargeBuilder::new().with_glid(glid).build();
            prop_assert!(!charge.is_ignored());
            prop_assert!(!charge.is_bill());
            prop_assert!(!charge.is_down_payment());
            prop_assert!(!charge.is_bank_fee());
        }

        #[test]
        fn balance_batch_positions_are_enumerated(batch in balance_batch_strategy()) {
            for (position, balance) in batch.iter().enumerate() {
                prop_assert_eq!(balance.ouid.as_str(), format!("BAL-{:04}", position));
            }
        }
    }
}
