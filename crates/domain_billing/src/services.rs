//! Reconciliation services
//!
//! `ReconciliationService` drives one reconciliation run: it pulls the
//! customer's account and balance snapshots through the billing port, scopes
//! them to the master account's hierarchy, associates charges, classifies
//! each balance, and resolves due dates. The result is the list of balances
//! that are genuinely overdue right now.
//!
//! Fetch failures abort the run with a [`BillingError`]; classification gaps
//! (a balance without charges, a bill without a matching advice) only drop
//! the affected balance and are reported as warnings.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use core_kernel::{BillingAccountOuid, CustomerOuid, TransactionId};

use crate::account::{related_billing_accounts, BillingAccount};
use crate::balance::{
    balances_for_accounts, merge_duplicate_balances, BalanceType, BillingAccountBalance,
};
use crate::charge::AppliedBillingCharge;
use crate::config::BillingConfig;
use crate::error::BillingError;
use crate::ports::BillingPort;
use crate::settlement::{has_final_bill, SettlementNoteAdvice};

/// Per-run cache of settlement advices, keyed by billing account
type AdviceCache = HashMap<BillingAccountOuid, Vec<SettlementNoteAdvice>>;

/// Application service resolving overdue balances for dunning
pub struct ReconciliationService {
    port: Arc<dyn BillingPort>,
    config: BillingConfig,
}

impl ReconciliationService {
    /// Creates a service over a billing port with the given tunables
    pub fn new(port: Arc<dyn BillingPort>, config: BillingConfig) -> Self {
        Self { port, config }
    }

    /// Resolves the overdue balances of one master account's hierarchy
    ///
    /// Runs the full pipeline against snapshots fetched for `customer_ouid`:
    ///
    /// 1. Fetch billing accounts and due balances (concurrently; neither
    ///    depends on the other), reduce the accounts to the master's
    ///    hierarchy.
    /// 2. Keep the balances owned by that hierarchy and merge duplicates by
    ///    transaction id. An empty set here ends the run with no further
    ///    fetches.
    /// 3. Fetch the applied charges for all surviving transactions in one
    ///    batched call and attach them by transaction id; balances without
    ///    charges are dropped with a warning.
    /// 4. Classify each balance from its charges and resolve its due date;
    ///    bills consult the settlement advices of their account (fetched at
    ///    most once per account and run).
    ///
    /// Returns the balances that are due as of `now`, in pipeline order.
    ///
    /// # Errors
    ///
    /// Any failed upstream fetch aborts the run with no partial result.
    #[instrument(skip(self, master_account), fields(customer_ouid = %customer_ouid, master_ouid = %master_account.ouid))]
    pub async fn resolve_overdue_balances(
        &self,
        customer_ouid: &CustomerOuid,
        master_account: &BillingAccount,
        now: DateTime<Utc>,
    ) -> Result<Vec<BillingAccountBalance>, BillingError> {
        let (accounts, balances) = tokio::join!(
            self.port.fetch_billing_accounts(customer_ouid),
            self.port.fetch_due_balances(customer_ouid),
        );
        let accounts = accounts.map_err(|source| BillingError::BillingAccounts {
            customer_ouid: customer_ouid.clone(),
            source,
        })?;
        let balances = balances.map_err(|source| BillingError::DueBalances {
            customer_ouid: customer_ouid.clone(),
            source,
        })?;

        let relevant_accounts = related_billing_accounts(accounts, master_account);
        let balances = balances_for_accounts(balances, &relevant_accounts);
        let mut balances = merge_duplicate_balances(balances);

        if balances.is_empty() {
            debug!("no due balances within the account hierarchy");
            return Ok(Vec::new());
        }

        let transaction_ids = balances
            .iter()
            .map(|balance| balance.transaction_id.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let charges = self
            .port
            .fetch_applied_charges(&transaction_ids)
            .await
            .map_err(|source| BillingError::AppliedCharges {
                transaction_ids: transaction_ids.clone(),
                source,
            })?;
        attach_charges(&mut balances, charges);

        balances.retain(|balance| {
            if balance.charges.is_empty() {
                warn!(
                    balance_ouid = %balance.ouid,
                    transaction_id = %balance.transaction_id,
                    "dropping balance without applied charges"
                );
                return false;
            }
            true
        });

        let mut advice_cache = AdviceCache::new();
        for balance in &mut balances {
            self.infer_balance_data(balance, &mut advice_cache, now)
                .await?;
        }

        Ok(balances
            .into_iter()
            .filter(|balance| !balance.ignore)
            .collect())
    }

    /// Returns true if the account is still inside the configured grace period
    ///
    /// Dunning callers check this before opening a claim against a freshly
    /// created billing account.
    pub fn is_within_grace_period(&self, account: &BillingAccount, now: DateTime<Utc>) -> bool {
        account.is_within_grace_period(self.config.customer_grace_period_days, now)
    }

    /// Returns true if the billing account has a settled final bill
    ///
    /// # Errors
    ///
    /// Fails when the settlement advices cannot be fetched.
    #[instrument(skip(self), fields(billing_account_ouid = %billing_account_ouid))]
    pub async fn has_final_bill(
        &self,
        billing_account_ouid: &BillingAccountOuid,
    ) -> Result<bool, BillingError> {
        let advices = self
            .port
            .fetch_settlement_advices(billing_account_ouid)
            .await
            .map_err(|source| BillingError::SettlementAdvices {
                billing_account_ouid: billing_account_ouid.clone(),
                source,
            })?;

        Ok(has_final_bill(&advices))
    }

    /// Classifies one balance and resolves its due date
    ///
    /// Non-bill balances follow the offset rule directly. Bills look up the
    /// settlement advice referenced by the balance among the account's
    /// advices; without a match the balance is ignored with a warning.
    async fn infer_balance_data(
        &self,
        balance: &mut BillingAccountBalance,
        advice_cache: &mut AdviceCache,
        now: DateTime<Utc>,
    ) -> Result<(), BillingError> {
        balance.infer_balance_type();

        if balance.inferred_balance_type != Some(BalanceType::Bill) {
            balance.infer_due_date(self.config.due_date_offset_days, now);
            return Ok(());
        }

        if !advice_cache.contains_key(&balance.billing_account_ouid) {
            let advices = self
                .port
                .fetch_settlement_advices(&balance.billing_account_ouid)
                .await
                .map_err(|source| BillingError::SettlementAdvices {
                    billing_account_ouid: balance.billing_account_ouid.clone(),
                    source,
                })?;
            advice_cache.insert(balance.billing_account_ouid.clone(), advices);
        }
        let advices = advice_cache
            .get(&balance.billing_account_ouid)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let matched = balance
            .settlement_note_advice_ouid
            .as_ref()
            .and_then(|reference| advices.iter().find(|advice| advice.ouid == *reference));

        match matched {
            Some(advice) => {
                balance.settlement_note_advice = Some(advice.clone());
                balance.infer_bill_due_date(advice, now);
            }
            None => {
                balance.ignore = true;
                warn!(
                    balance_ouid = %balance.ouid,
                    transaction_id = %balance.transaction_id,
                    "couldn't infer due date for a bill without a matching settlement advice"
                );
            }
        }

        Ok(())
    }
}

/// Hands each balance the charges booked under its transaction
fn attach_charges(balances: &mut [BillingAccountBalance], charges: Vec<AppliedBillingCharge>) {
    let mut by_transaction: HashMap<TransactionId, Vec<AppliedBillingCharge>> = HashMap::new();
    for charge in charges {
        by_transaction
            .entry(charge.transaction_id.clone())
            .or_default()
            .push(charge);
    }

    for balance in balances {
        if let Some(matched) = by_transaction.remove(&balance.transaction_id) {
            balance.charges = matched;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{BalanceOuid, ChargeOuid, EpochMillis};

    fn balance(transaction: &str) -> BillingAccountBalance {
        BillingAccountBalance {
            ouid: BalanceOuid::new(format!("BAL-{}", transaction)),
            billing_account_ouid: BillingAccountOuid::new("BA-1"),
            amount: 100,
            status: "DUE".to_string(),
            balance_type: "BALANCE".to_string(),
            transaction_id: TransactionId::new(transaction),
            settlement_note_advice_ouid: None,
            start_date: EpochMillis::from_millis(0).unwrap(),
            inferred_balance_type: None,
            due_date: None,
            ignore: false,
            charges: Vec::new(),
            settlement_note_advice: None,
        }
    }

    fn charge(ouid: &str, transaction: &str) -> AppliedBillingCharge {
        AppliedBillingCharge {
            ouid: ChargeOuid::new(ouid),
            general_ledger_id: "ABSCHLAG_X".to_string(),
            billing_account_ouid: BillingAccountOuid::new("BA-1"),
            transaction_id: TransactionId::new(transaction),
            currency_code: "EUR".to_string(),
        }
    }

    #[test]
    fn test_attach_charges_groups_by_transaction() {
        let mut balances = vec![balance("TRX-1"), balance("TRX-2")];
        let charges = vec![
            charge("CHG-1", "TRX-1"),
            charge("CHG-2", "TRX-2"),
            charge("CHG-3", "TRX-1"),
        ];

        attach_charges(&mut balances, charges);

        assert_eq!(balances[0].charges.len(), 2);
        assert_eq!(balances[1].charges.len(), 1);
    }

    #[test]
    fn test_attach_charges_leaves_unmatched_balance_empty() {
        let mut balances = vec![balance("TRX-1")];
        attach_charges(&mut balances, vec![charge("CHG-1", "TRX-9")]);

        assert!(balances[0].charges.is_empty());
    }
}
