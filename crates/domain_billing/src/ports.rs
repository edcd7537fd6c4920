//! Billing port - the seam to the upstream biller
//!
//! The reconciliation core never talks to a transport directly. It consumes
//! the four fetch capabilities below through `BillingPort`; adapters own the
//! HTTP plumbing, authentication, and retries, and surface every failure as a
//! `PortError`.
//!
//! # Usage
//!
//! ```rust,ignore
//! struct HttpBillingAdapter { /* client, base url, ... */ }
//!
//! #[async_trait]
//! impl BillingPort for HttpBillingAdapter {
//!     async fn fetch_billing_accounts(
//!         &self,
//!         customer_ouid: &CustomerOuid,
//!     ) -> Result<Vec<BillingAccount>, PortError> {
//!         // GET /billingAccount/customerOuid/{customer_ouid}
//!     }
//!     // ...
//! }
//! ```

use async_trait::async_trait;

use core_kernel::{
    BillingAccountOuid, CustomerOuid, DomainPort, HealthCheckable, PortError,
};

use crate::account::BillingAccount;
use crate::balance::BillingAccountBalance;
use crate::charge::AppliedBillingCharge;
use crate::settlement::SettlementNoteAdvice;

/// The port trait for upstream billing data
///
/// All methods are async and return `Result<T, PortError>` for consistent
/// error handling across adapter implementations. Every call is a read-only
/// snapshot fetch; the core never writes upstream.
#[async_trait]
pub trait BillingPort: DomainPort + HealthCheckable {
    /// Retrieves all billing accounts owned by a customer
    ///
    /// # Arguments
    ///
    /// * `customer_ouid` - The owning customer
    ///
    /// # Returns
    ///
    /// The customer's accounts, masters and children alike; empty if none
    async fn fetch_billing_accounts(
        &self,
        customer_ouid: &CustomerOuid,
    ) -> Result<Vec<BillingAccount>, PortError>;

    /// Retrieves the customer's balances currently in due status
    ///
    /// # Arguments
    ///
    /// * `customer_ouid` - The owning customer
    ///
    /// # Returns
    ///
    /// Due balances across all of the customer's accounts
    async fn fetch_due_balances(
        &self,
        customer_ouid: &CustomerOuid,
    ) -> Result<Vec<BillingAccountBalance>, PortError>;

    /// Retrieves the charges applied under the given transactions
    ///
    /// # Arguments
    ///
    /// * `transaction_ids` - Comma-joined transaction ids, batched into one
    ///   upstream call
    ///
    /// # Returns
    ///
    /// Every applied charge belonging to one of the transactions
    async fn fetch_applied_charges(
        &self,
        transaction_ids: &str,
    ) -> Result<Vec<AppliedBillingCharge>, PortError>;

    /// Retrieves the settlement note advices issued for a billing account
    ///
    /// # Arguments
    ///
    /// * `billing_account_ouid` - The account whose advices to fetch
    ///
    /// # Returns
    ///
    /// All advices for the account, settled or not
    async fn fetch_settlement_advices(
        &self,
        billing_account_ouid: &BillingAccountOuid,
    ) -> Result<Vec<SettlementNoteAdvice>, PortError>;
}

/// Mock implementation of BillingPort for testing
///
/// Serves preloaded snapshots from memory and counts calls per endpoint, so
/// tests can assert fetch behavior (early returns, per-run caching) without
/// any transport.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use core_kernel::{AdapterHealth, HealthCheckResult, TransactionId};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;
    use chrono::Utc;

    /// Selects which endpoint the mock fails on
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailingCall {
        BillingAccounts,
        DueBalances,
        AppliedCharges,
        SettlementAdvices,
    }

    /// In-memory mock implementation of BillingPort
    #[derive(Debug, Default)]
    pub struct MockBillingPort {
        accounts: HashMap<CustomerOuid, Vec<BillingAccount>>,
        balances: HashMap<CustomerOuid, Vec<BillingAccountBalance>>,
        charges: HashMap<TransactionId, Vec<AppliedBillingCharge>>,
        advices: HashMap<BillingAccountOuid, Vec<SettlementNoteAdvice>>,
        failing_call: Option<FailingCall>,

        account_fetches: AtomicUsize,
        balance_fetches: AtomicUsize,
        charge_fetches: AtomicUsize,
        advice_fetches: AtomicUsize,
        charge_queries: RwLock<Vec<String>>,
    }

    impl MockBillingPort {
        /// Creates an empty mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Preloads the billing accounts returned for a customer
        pub fn with_billing_accounts(
            mut self,
            customer_ouid: CustomerOuid,
            accounts: Vec<BillingAccount>,
        ) -> Self {
            self.accounts.insert(customer_ouid, accounts);
            self
        }

        /// Preloads the due balances returned for a customer
        pub fn with_due_balances(
            mut self,
            customer_ouid: CustomerOuid,
            balances: Vec<BillingAccountBalance>,
        ) -> Self {
            self.balances.insert(customer_ouid, balances);
            self
        }

        /// Preloads applied charges, indexed by their transaction id
        pub fn with_applied_charges(mut self, charges: Vec<AppliedBillingCharge>) -> Self {
            for charge in charges {
                self.charges
                    .entry(charge.transaction_id.clone())
                    .or_default()
                    .push(charge);
            }
            self
        }

        /// Preloads the settlement advices returned for a billing account
        pub fn with_settlement_advices(
            mut self,
            billing_account_ouid: BillingAccountOuid,
            advices: Vec<SettlementNoteAdvice>,
        ) -> Self {
            self.advices.insert(billing_account_ouid, advices);
            self
        }

        /// Makes one endpoint fail with a connection error
        pub fn failing_on(mut self, call: FailingCall) -> Self {
            self.failing_call = Some(call);
            self
        }

        /// Number of billing-account fetches served
        pub fn billing_account_fetches(&self) -> usize {
            self.account_fetches.load(Ordering::SeqCst)
        }

        /// Number of due-balance fetches served
        pub fn due_balance_fetches(&self) -> usize {
            self.balance_fetches.load(Ordering::SeqCst)
        }

        /// Number of applied-charge fetches served
        pub fn applied_charge_fetches(&self) -> usize {
            self.charge_fetches.load(Ordering::SeqCst)
        }

        /// Number of settlement-advice fetches served
        pub fn settlement_advice_fetches(&self) -> usize {
            self.advice_fetches.load(Ordering::SeqCst)
        }

        /// The raw transaction-id queries seen by the charge endpoint
        pub async fn charge_queries(&self) -> Vec<String> {
            self.charge_queries.read().await.clone()
        }

        fn injected_failure(&self, call: FailingCall) -> Result<(), PortError> {
            if self.failing_call == Some(call) {
                return Err(PortError::connection("injected connection failure"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockBillingPort {}

    #[async_trait]
    impl HealthCheckable for MockBillingPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-billing-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl BillingPort for MockBillingPort {
        async fn fetch_billing_accounts(
            &self,
            customer_ouid: &CustomerOuid,
        ) -> Result<Vec<BillingAccount>, PortError> {
            self.account_fetches.fetch_add(1, Ordering::SeqCst);
            self.injected_failure(FailingCall::BillingAccounts)?;
            Ok(self.accounts.get(customer_ouid).cloned().unwrap_or_default())
        }

        async fn fetch_due_balances(
            &self,
            customer_ouid: &CustomerOuid,
        ) -> Result<Vec<BillingAccountBalance>, PortError> {
            self.balance_fetches.fetch_add(1, Ordering::SeqCst);
            self.injected_failure(FailingCall::DueBalances)?;
            Ok(self.balances.get(customer_ouid).cloned().unwrap_or_default())
        }

        async fn fetch_applied_charges(
            &self,
            transaction_ids: &str,
        ) -> Result<Vec<AppliedBillingCharge>, PortError> {
            self.charge_fetches.fetch_add(1, Ordering::SeqCst);
            self.charge_queries
                .write()
                .await
                .push(transaction_ids.to_string());
            self.injected_failure(FailingCall::AppliedCharges)?;

            let mut result = Vec::new();
            for id in transaction_ids.split(',').filter(|id| !id.is_empty()) {
                if let Some(charges) = self.charges.get(&TransactionId::new(id)) {
                    result.extend(charges.iter().cloned());
                }
            }
            Ok(result)
        }

        async fn fetch_settlement_advices(
            &self,
            billing_account_ouid: &BillingAccountOuid,
        ) -> Result<Vec<SettlementNoteAdvice>, PortError> {
            self.advice_fetches.fetch_add(1, Ordering::SeqCst);
            self.injected_failure(FailingCall::SettlementAdvices)?;
            Ok(self
                .advices
                .get(billing_account_ouid)
                .cloned()
                .unwrap_or_default())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use core_kernel::EpochMillis;

        fn advice(ouid: &str) -> SettlementNoteAdvice {
            SettlementNoteAdvice {
                ouid: core_kernel::SettlementAdviceOuid::new(ouid),
                id: ouid.to_string(),
                bill_date: EpochMillis::from_millis(0).unwrap(),
                payment_due_date: EpochMillis::from_millis(0).unwrap(),
                category: "REGULAR".to_string(),
                state: "DUE".to_string(),
            }
        }

        #[tokio::test]
        async fn test_counts_and_serves_preloaded_data() {
            let account = BillingAccountOuid::new("BA-1");
            let port = MockBillingPort::new()
                .with_settlement_advices(account.clone(), vec![advice("SNA-1")]);

            let advices = port.fetch_settlement_advices(&account).await.unwrap();
            assert_eq!(advices.len(), 1);
            assert_eq!(port.settlement_advice_fetches(), 1);

            let empty = port
                .fetch_settlement_advices(&BillingAccountOuid::new("BA-404"))
                .await
                .unwrap();
            assert!(empty.is_empty());
            assert_eq!(port.settlement_advice_fetches(), 2);
        }

        #[tokio::test]
        async fn test_injected_failure_only_hits_selected_endpoint() {
            let customer = CustomerOuid::new("CUST-1");
            let port = MockBillingPort::new().failing_on(FailingCall::DueBalances);

            assert!(port.fetch_due_balances(&customer).await.is_err());
            assert!(port.fetch_billing_accounts(&customer).await.is_ok());
        }

        #[tokio::test]
        async fn test_charge_lookup_follows_query_order() {
            let mk = |ouid: &str, trx: &str| AppliedBillingCharge {
                ouid: core_kernel::ChargeOuid::new(ouid),
                general_ledger_id: "BILL_X".to_string(),
                billing_account_ouid: BillingAccountOuid::new("BA-1"),
                transaction_id: TransactionId::new(trx),
                currency_code: "EUR".to_string(),
            };
            let port = MockBillingPort::new()
                .with_applied_charges(vec![mk("CHG-1", "TRX-1"), mk("CHG-2", "TRX-2")]);

            let charges = port.fetch_applied_charges("TRX-2,TRX-1").await.unwrap();
            let ouids: Vec<&str> = charges.iter().map(|c| c.ouid.as_str()).collect();
            assert_eq!(ouids, vec!["CHG-2", "CHG-1"]);
            assert_eq!(port.charge_queries().await, vec!["TRX-2,TRX-1".to_string()]);
        }
    }
}
