//! Comprehensive unit tests for the Ports module
//!
//! Tests cover the PortError taxonomy, transience classification,
//! source chaining, and the health-check contract.

use core_kernel::ports::{
    AdapterHealth, HealthCheckResult, HealthCheckable, PortError,
};
use chrono::Utc;

mod error_taxonomy {
    use super::*;

    #[test]
    fn test_not_found_carries_entity_and_id() {
        let error = PortError::not_found("SettlementNoteAdvice", "SNA-404");
        assert!(error.is_not_found());
        assert_eq!(
            error.to_string(),
            "Not found: SettlementNoteAdvice with id SNA-404"
        );
    }

    #[test]
    fn test_transient_errors() {
        assert!(PortError::connection("refused").is_transient());
        assert!(PortError::Timeout {
            operation: "fetch_billing_accounts".to_string(),
            duration_ms: 30_000,
        }
        .is_transient());
        assert!(PortError::ServiceUnavailable {
            service: "biller".to_string(),
        }
        .is_transient());
        assert!(PortError::RateLimited { retry_after_secs: 5 }.is_transient());
    }

    #[test]
    fn test_permanent_errors() {
        assert!(!PortError::decode("malformed body").is_transient());
        assert!(!PortError::unexpected_status(403, "forbidden").is_transient());
        assert!(!PortError::Unauthorized {
            message: "token expired".to_string(),
        }
        .is_transient());
        assert!(!PortError::internal("bug").is_transient());
    }

    #[test]
    fn test_source_is_preserved() {
        let cause = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow link");
        let error = PortError::Decode {
            message: "truncated response".to_string(),
            source: Some(Box::new(cause)),
        };

        let source = std::error::Error::source(&error).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("slow link"));
    }
}

mod health_checks {
    use super::*;

    struct AlwaysHealthy;

    #[async_trait::async_trait]
    impl HealthCheckable for AlwaysHealthy {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "always-healthy".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 1,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[tokio::test]
    async fn test_health_check_contract() {
        let adapter = AlwaysHealthy;
        let result = adapter.health_check().await;

        assert_eq!(result.adapter_id, "always-healthy");
        assert_eq!(result.status, AdapterHealth::Healthy);
    }

    #[test]
    fn test_adapter_health_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AdapterHealth::Degraded).unwrap(),
            "\"degraded\""
        );
        let parsed: AdapterHealth = serde_json::from_str("\"unhealthy\"").unwrap();
        assert_eq!(parsed, AdapterHealth::Unhealthy);
    }
}
