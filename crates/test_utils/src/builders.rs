//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else; `build()` returns the real domain snapshot
//! types, ready to preload into a mock port.

use core_kernel::{
    BalanceOuid, BillingAccountOuid, ChargeOuid, CustomerOuid, EpochMillis,
    SettlementAdviceOuid, TransactionId,
};
use domain_billing::account::{BillingAccount, BillingAccountRelationship};
use domain_billing::balance::BillingAccountBalance;
use domain_billing::charge::AppliedBillingCharge;
use domain_billing::settlement::SettlementNoteAdvice;

use crate::fixtures::{LedgerCodeFixtures, OuidFixtures, TemporalFixtures};

/// Builder for billing account snapshots
pub struct BillingAccountBuilder {
    ouid: BillingAccountOuid,
    name: String,
    customer_ouid: CustomerOuid,
    bill_presentation_media: String,
    date_time_create: EpochMillis,
    billing_account_relationships: Vec<BillingAccountRelationship>,
}

impl Default for BillingAccountBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BillingAccountBuilder {
    /// Creates a builder for the canonical master account
    pub fn new() -> Self {
        Self {
            ouid: OuidFixtures::master_account(),
            name: "MBA-0001".to_string(),
            customer_ouid: OuidFixtures::customer(),
            bill_presentation_media: "EMAIL".to_string(),
            date_time_create: TemporalFixtures::account_created(),
            billing_account_relationships: Vec::new(),
        }
    }

    /// Sets the account OUID
    pub fn with_ouid(mut self, ouid: BillingAccountOuid) -> Self {
        self.ouid = ouid;
        self
    }

    /// Sets the external account name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the owning customer
    pub fn with_customer(mut self, customer_ouid: CustomerOuid) -> Self {
        self.customer_ouid = customer_ouid;
        self
    }

    /// Sets the bill presentation media
    pub fn with_presentation_media(mut self, media: impl Into<String>) -> Self {
        self.bill_presentation_media = media.into();
        self
    }

    /// Marks the account as postal ("offline") billing
    pub fn postal(self) -> Self {
        self.with_presentation_media("POSTMAIL")
    }

    /// Sets the creation timestamp
    pub fn with_created_at(mut self, created: EpochMillis) -> Self {
        self.date_time_create = created;
        self
    }

    /// Adds a "PARENT" relationship targeting the given master account
    pub fn child_of(mut self, master_ouid: BillingAccountOuid) -> Self {
        self.billing_account_relationships.push(BillingAccountRelationship {
            ouid: OuidFixtures::mint("REL"),
            relationship_type: "PARENT".to_string(),
            target_billing_account_ouid: master_ouid,
        });
        self
    }

    /// Adds a relationship of an arbitrary type
    pub fn with_relationship(
        mut self,
        relationship_type: impl Into<String>,
        target: BillingAccountOuid,
    ) -> Self {
        self.billing_account_relationships.push(BillingAccountRelationship {
            ouid: OuidFixtures::mint("REL"),
            relationship_type: relationship_type.into(),
            target_billing_account_ouid: target,
        });
        self
    }

    /// Builds the billing account snapshot
    pub fn build(self) -> BillingAccount {
        BillingAccount {
            ouid: self.ouid,
            name: self.name,
            customer_ouid: self.customer_ouid,
            bill_presentation_media: self.bill_presentation_media,
            date_time_create: self.date_time_create,
            billing_account_relationships: self.billing_account_relationships,
        }
    }
}

/// Builder for due-balance snapshots
pub struct BalanceBuilder {
    ouid: BalanceOuid,
    billing_account_ouid: BillingAccountOuid,
    amount: i64,
    status: String,
    balance_type: String,
    transaction_id: TransactionId,
    settlement_note_advice_ouid: Option<SettlementAdviceOuid>,
    start_date: EpochMillis,
}

impl Default for BalanceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceBuilder {
    /// Creates a builder for a due balance on the canonical master account
    pub fn new() -> Self {
        Self {
            ouid: OuidFixtures::balance(),
            billing_account_ouid: OuidFixtures::master_account(),
            amount: 10_000,
            status: "DUE".to_string(),
            balance_type: "BALANCE".to_string(),
            transaction_id: OuidFixtures::transaction(),
            settlement_note_advice_ouid: None,
            start_date: TemporalFixtures::balance_start(),
        }
    }

    /// Sets the balance OUID
    pub fn with_ouid(mut self, ouid: BalanceOuid) -> Self {
        self.ouid = ouid;
        self
    }

    /// Sets the owning billing account
    pub fn with_account(mut self, billing_account_ouid: BillingAccountOuid) -> Self {
        self.billing_account_ouid = billing_account_ouid;
        self
    }

    /// Sets the amount in minor currency units
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the upstream status string
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the transaction identifier
    pub fn with_transaction(mut self, transaction_id: TransactionId) -> Self {
        self.transaction_id = transaction_id;
        self
    }

    /// Sets the settlement advice reference of a bill balance
    pub fn with_advice_reference(mut self, ouid: SettlementAdviceOuid) -> Self {
        self.settlement_note_advice_ouid = Some(ouid);
        self
    }

    /// Sets the balance start date
    pub fn with_start_date(mut self, start_date: EpochMillis) -> Self {
        self.start_date = start_date;
        self
    }

    /// Builds the balance snapshot with all derived fields still unset
    pub fn build(self) -> BillingAccountBalance {
        BillingAccountBalance {
            ouid: self.ouid,
            billing_account_ouid: self.billing_account_ouid,
            amount: self.amount,
            status: self.status,
            balance_type: self.balance_type,
            transaction_id: self.transaction_id,
            settlement_note_advice_ouid: self.settlement_note_advice_ouid,
            start_date: self.start_date,
            inferred_balance_type: None,
            due_date: None,
            ignore: false,
            charges: Vec::new(),
            settlement_note_advice: None,
        }
    }
}

/// Builder for applied-charge snapshots
pub struct ChargeBuilder {
    ouid: ChargeOuid,
    general_ledger_id: String,
    billing_account_ouid: BillingAccountOuid,
    transaction_id: TransactionId,
    currency_code: String,
}

impl Default for ChargeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChargeBuilder {
    /// Creates a builder for a bill charge under the canonical transaction
    pub fn new() -> Self {
        Self {
            ouid: OuidFixtures::charge(),
            general_ledger_id: LedgerCodeFixtures::bill().to_string(),
            billing_account_ouid: OuidFixtures::master_account(),
            transaction_id: OuidFixtures::transaction(),
            currency_code: "EUR".to_string(),
        }
    }

    /// Sets the charge OUID
    pub fn with_ouid(mut self, ouid: ChargeOuid) -> Self {
        self.ouid = ouid;
        self
    }

    /// Sets the general ledger code
    pub fn with_glid(mut self, glid: impl Into<String>) -> Self {
        self.general_ledger_id = glid.into();
        self
    }

    /// Sets the owning billing account
    pub fn with_account(mut self, billing_account_ouid: BillingAccountOuid) -> Self {
        self.billing_account_ouid = billing_account_ouid;
        self
    }

    /// Sets the transaction the charge was applied under
    pub fn with_transaction(mut self, transaction_id: TransactionId) -> Self {
        self.transaction_id = transaction_id;
        self
    }

    /// Sets the currency code
    pub fn with_currency(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = currency_code.into();
        self
    }

    /// Builds the charge snapshot
    pub fn build(self) -> AppliedBillingCharge {
        AppliedBillingCharge {
            ouid: self.ouid,
            general_ledger_id: self.general_ledger_id,
            billing_account_ouid: self.billing_account_ouid,
            transaction_id: self.transaction_id,
            currency_code: self.currency_code,
        }
    }
}

/// Builder for settlement note advice snapshots
pub struct SettlementAdviceBuilder {
    ouid: SettlementAdviceOuid,
    id: String,
    bill_date: EpochMillis,
    payment_due_date: EpochMillis,
    category: String,
    state: String,
}

impl Default for SettlementAdviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SettlementAdviceBuilder {
    /// Creates a builder for a regular advice already past its due date
    pub fn new() -> Self {
        Self {
            ouid: OuidFixtures::advice(),
            id: "RE-2024-0001".to_string(),
            bill_date: TemporalFixtures::bill_date(),
            payment_due_date: TemporalFixtures::payment_due_past(),
            category: "REGULAR".to_string(),
            state: "DUE".to_string(),
        }
    }

    /// Sets the advice OUID
    pub fn with_ouid(mut self, ouid: SettlementAdviceOuid) -> Self {
        self.ouid = ouid;
        self
    }

    /// Sets the external document id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the bill date
    pub fn with_bill_date(mut self, bill_date: EpochMillis) -> Self {
        self.bill_date = bill_date;
        self
    }

    /// Sets the payment-due timestamp
    pub fn with_payment_due(mut self, payment_due_date: EpochMillis) -> Self {
        self.payment_due_date = payment_due_date;
        self
    }

    /// Sets the advice category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the advice state
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Presets category and state to a settled final bill
    pub fn final_bill(self) -> Self {
        self.with_category("LAST").with_state("SETTLED")
    }

    /// Builds the advice snapshot
    pub fn build(self) -> SettlementNoteAdvice {
        SettlementNoteAdvice {
            ouid: self.ouid,
            id: self.id,
            bill_date: self.bill_date,
            payment_due_date: self.payment_due_date,
            category: self.category,
            state: self.state,
        }
    }
}
