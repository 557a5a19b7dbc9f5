use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// A row of the `cars` table.
///
/// The table is owned by the database; this service only reads it.
/// Whole prices serialize as `20500` even when the column is `numeric(10,2)`
/// and the aggregate reports `20500.00`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "whole_as_integer")]
    pub price: Number,
}

impl Car {
    pub fn new(id: i64, name: impl Into<String>, price: impl Into<Number>) -> Self {
        Self {
            id,
            name: name.into(),
            price: price.into(),
        }
    }
}

/// Largest magnitude below which every integer is exact in an `f64`
const EXACT_F64_INT: f64 = 9_007_199_254_740_992.0;

fn whole_as_integer<'de, D>(deserializer: D) -> Result<Number, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < EXACT_F64_INT => {
            Ok(Number::from(value as i64))
        }
        _ => Ok(number),
    }
}
