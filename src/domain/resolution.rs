//! Canonical resolution output
//!
//! Every field is always a string. "Not found" is a value, not an error.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::sentinel::{self, observation};

/// Facts about the best-matching catalog product for one identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Formatted price (`R$ 1.234,56`) or the not-found sentinel
    #[serde(rename = "Preco")]
    pub price: String,
    /// Absolute product page URL, empty when unknown
    #[serde(rename = "Link")]
    pub link: String,
    /// Category breadcrumb, em-dash when unavailable
    #[serde(rename = "Classificacao")]
    pub classification: String,
    /// Status note, em-dash when nothing noteworthy happened
    #[serde(rename = "Observacao")]
    pub observation: String,
}

impl ResolutionResult {
    /// A resolved product
    pub fn found(price: String, link: String, classification: String) -> Self {
        Self {
            price,
            link,
            classification,
            observation: sentinel::EM_DASH.to_string(),
        }
    }

    /// Not-found sentinels for price, link and classification, with a status note
    pub fn not_found(observation: impl Into<String>) -> Self {
        Self {
            price: sentinel::PRICE_NOT_FOUND.to_string(),
            link: String::new(),
            classification: sentinel::EM_DASH.to_string(),
            observation: observation.into(),
        }
    }

    /// Every search strategy came back empty
    pub fn no_results() -> Self {
        Self::not_found(observation::NO_RESULTS)
    }

    /// Candidates existed but none could be selected
    pub fn no_match() -> Self {
        Self::not_found(observation::NO_MATCH)
    }

    /// Batch row with neither code nor name
    pub fn empty_row() -> Self {
        Self::not_found(observation::EMPTY_ROW)
    }

    /// A row whose resolution failed outright
    pub fn error(message: impl fmt::Display) -> Self {
        Self::not_found(format!("{}{message}", observation::ERROR_PREFIX))
    }

    /// False when the price carries the not-found sentinel
    pub fn has_price(&self) -> bool {
        self.price != sentinel::PRICE_NOT_FOUND
    }
}
