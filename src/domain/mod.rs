pub mod operator;
pub mod order;
pub mod product;

pub use operator::*;
pub use order::*;
pub use product::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit columns the backend keeps on every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creby: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cretime: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modby: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modtime: Option<DateTime<Utc>>,
}

/// Amounts the backend may send either as `15000` or as `15000.0`.
///
/// Negative or fractional values are refused.
pub(crate) mod whole_number {
    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use std::fmt;

    struct WholeNumber;

    impl Visitor<'_> for WholeNumber {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative whole number")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            u64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<u64, E> {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 {
                Ok(v as u64)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        deserializer.deserialize_any(WholeNumber)
    }
}
