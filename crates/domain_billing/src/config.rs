//! Billing configuration

use serde::Deserialize;

/// Tunables for the reconciliation pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Days after a non-bill balance's start date before it counts as due
    pub due_date_offset_days: u32,
    /// Days after billing-account creation before dunning may begin
    pub customer_grace_period_days: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            due_date_offset_days: 14,
            customer_grace_period_days: 30,
        }
    }
}

impl BillingConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("BILLING"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BillingConfig::default();
        assert_eq!(config.due_date_offset_days, 14);
        assert_eq!(config.customer_grace_period_days, 30);
    }
}
