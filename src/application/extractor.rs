//! Field extraction
//!
//! Turns the chosen candidate into the price, link and breadcrumb strings of
//! a `ResolutionResult`. Missing data degrades to sentinels, never to errors.

use crate::domain::constants::{matching, sentinel, site};
use crate::domain::{CandidateProduct, ResolutionResult};

/// Extracts output fields; owns the storefront base URL used for links
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    base_url: String,
}

impl FieldExtractor {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// All fields of a resolved product
    pub fn extract(&self, candidate: &CandidateProduct) -> ResolutionResult {
        ResolutionResult::found(
            format_price(price(candidate)),
            self.link(candidate),
            breadcrumb(candidate),
        )
    }

    /// Product page URL from the link slug, or from a slug derived from the name
    pub fn link(&self, candidate: &CandidateProduct) -> String {
        let slug = match candidate.link_slug.as_deref() {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => {
                let derived = candidate.name.trim().to_lowercase().replace(' ', "-");
                encode_path(&derived)
            }
        };
        format!("{}/{}{}", self.base_url, slug, site::PRODUCT_PAGE_SUFFIX)
    }
}

/// Percent-encode each `/`-separated piece; the separators stay literal
fn encode_path(raw: &str) -> String {
    raw.split('/')
        .map(|piece| urlencoding::encode(piece).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Price of the first offer, `0.0` when absent
pub fn price(candidate: &CandidateProduct) -> f64 {
    candidate.first_offer_price.unwrap_or(0.0)
}

/// Format as Brazilian reais (`R$ 1.234,56`). Non-finite input yields the
/// not-found sentinel.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return sentinel::PRICE_NOT_FOUND.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.bytes().all(|b| b == b'0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    format!("R$ {sign}{grouped},{frac_part}")
}

/// Category breadcrumb, broadest first, without the storefront root.
///
/// Prefers the structured category tree; otherwise uses the longest
/// slash-delimited path. Falls back to the em-dash sentinel.
pub fn breadcrumb(candidate: &CandidateProduct) -> String {
    let from_tree: Vec<&str> = candidate
        .category_tree
        .iter()
        .map(String::as_str)
        .filter(|name| !name.trim().is_empty() && !is_home_marker(name))
        .collect();
    if !from_tree.is_empty() {
        return from_tree.join(matching::BREADCRUMB_SEPARATOR);
    }

    // First of the longest paths, like a stable max
    let longest = candidate
        .category_paths
        .iter()
        .fold(None::<&String>, |best, path| match best {
            Some(b) if b.chars().count() >= path.chars().count() => Some(b),
            _ => Some(path),
        });

    if let Some(path) = longest {
        let segments: Vec<String> = path
            .trim_matches('/')
            .split('/')
            .filter(|segment| !is_home_marker(segment))
            .map(|segment| segment.replace('-', " ").trim().to_string())
            .filter(|segment| !segment.is_empty())
            .collect();
        if !segments.is_empty() {
            return segments.join(matching::BREADCRUMB_SEPARATOR);
        }
    }

    sentinel::EM_DASH.to_string()
}

fn is_home_marker(name: &str) -> bool {
    let normalized = name.trim().to_lowercase();
    matching::HOME_MARKERS.contains(&normalized.as_str())
}
