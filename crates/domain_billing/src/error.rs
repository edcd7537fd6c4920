//! Billing domain errors
//!
//! A failed fetch aborts the whole reconciliation run: every variant wraps
//! the originating port error together with the identifying key, so callers
//! can tell which collaborator call broke and for which entity.

use thiserror::Error;

use core_kernel::{BillingAccountOuid, CustomerOuid, PortError};

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Billing accounts could not be fetched for the customer
    #[error("couldn't retrieve billing accounts for customer {customer_ouid}")]
    BillingAccounts {
        customer_ouid: CustomerOuid,
        #[source]
        source: PortError,
    },

    /// Due balances could not be fetched for the customer
    #[error("couldn't retrieve due balances for customer {customer_ouid}")]
    DueBalances {
        customer_ouid: CustomerOuid,
        #[source]
        source: PortError,
    },

    /// Applied charges could not be fetched for the transaction set
    #[error("couldn't retrieve applied charges for transactions {transaction_ids}")]
    AppliedCharges {
        transaction_ids: String,
        #[source]
        source: PortError,
    },

    /// Settlement advices could not be fetched for the billing account
    #[error("couldn't retrieve settlement advices for billing account {billing_account_ouid}")]
    SettlementAdvices {
        billing_account_ouid: BillingAccountOuid,
        #[source]
        source: PortError,
    },
}

impl BillingError {
    /// Returns true if retrying the run may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            BillingError::BillingAccounts { source, .. }
            | BillingError::DueBalances { source, .. }
            | BillingError::AppliedCharges { source, .. }
            | BillingError::SettlementAdvices { source, .. } => source.is_transient(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_carries_identifying_key() {
        let error = BillingError::DueBalances {
            customer_ouid: CustomerOuid::new("CUST-17"),
            source: PortError::connection("refused"),
        };
        assert!(error.to_string().contains("CUST-17"));
    }

    #[test]
    fn test_source_chain_reaches_port_error() {
        let error = BillingError::SettlementAdvices {
            billing_account_ouid: BillingAccountOuid::new("BA-1"),
            source: PortError::unexpected_status(500, "boom"),
        };

        let source = std::error::Error::source(&error).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Unexpected status 500: boom"));
    }

    #[test]
    fn test_transience_follows_the_wrapped_error() {
        let transient = BillingError::AppliedCharges {
            transaction_ids: "TRX-1,TRX-2".to_string(),
            source: PortError::connection("reset"),
        };
        let permanent = BillingError::AppliedCharges {
            transaction_ids: "TRX-1".to_string(),
            source: PortError::decode("bad json"),
        };

        assert!(transient.is_transient());
        assert!(!permanent.is_transient());
    }
}
