//! View-model transformers, one per statistics screen.
//!
//! Every transformer is a pure function of the fetched payload. Payload pieces that
//! are not arrays where arrays are expected read as empty; numbers that are missing
//! or unparseable read as zero.

pub mod allergy;
pub mod blood_sugar;
pub mod goal;
pub mod meal_pattern;
pub mod popular_food;
pub mod service;

use serde::Serialize;
use serde_json::Value;

use crate::models::DataSource;

/// A value tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    pub source: DataSource,
    pub value: T,
}

impl<T> Sourced<T> {
    pub fn api(value: T) -> Self {
        Self {
            source: DataSource::Api,
            value,
        }
    }

    pub fn placeholder(value: T) -> Self {
        Self {
            source: DataSource::Placeholder,
            value,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == DataSource::Placeholder
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / whole` as a percentage with one decimal; zero when `whole` is zero.
pub fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        round1(part / whole * 100.0)
    } else {
        0.0
    }
}

/// `count / max(total, 1)` rendered as e.g. `"12.5%"`.
pub fn rate_string(count: u64, total: u64) -> String {
    let denom = total.max(1) as f64;
    format!("{:.1}%", count as f64 / denom * 100.0)
}

/// Elements of a payload that should be an array; anything else reads as empty.
pub(crate) fn as_rows(payload: &Value) -> &[Value] {
    payload.as_array().map(Vec::as_slice).unwrap_or(&[])
}
