//! Core Kernel - Foundational types and utilities for the arrears system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Strongly-typed identifiers for upstream billing entities
//! - Wire timestamps (epoch milliseconds) with due-date arithmetic
//! - Port abstractions for external data-access collaborators

pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use temporal::{EpochMillis, TemporalError};
pub use identifiers::{
    BalanceOuid, BillingAccountOuid, ChargeOuid, CustomerOuid,
    ProductOuid, SettlementAdviceOuid, TransactionId,
};
pub use ports::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};
