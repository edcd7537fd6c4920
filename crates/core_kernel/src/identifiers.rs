//! Strongly-typed identifiers for upstream billing entities
//!
//! The upstream biller keys every record by an opaque string OUID. Newtype
//! wrappers prevent accidental mixing of identifier kinds (a customer OUID
//! is never a billing-account OUID) while staying transparent on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an upstream identifier value
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier, returning the underlying string
            pub fn into_string(self) -> String {
                self.0
            }

            /// Returns true if the upstream sent an empty value
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Customer and account identifiers
define_id!(CustomerOuid);
define_id!(BillingAccountOuid);

// Balance and charge identifiers
define_id!(BalanceOuid);
define_id!(ChargeOuid);
define_id!(TransactionId);

// Settlement and product identifiers
define_id!(SettlementAdviceOuid);
define_id!(ProductOuid);
