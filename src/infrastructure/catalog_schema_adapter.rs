use serde_json::Value;

use crate::domain::{CandidateProduct, CatalogError};

/// Adapter from raw VTEX catalog search records to `CandidateProduct`
pub struct CatalogSchemaAdapter;

impl CatalogSchemaAdapter {
    /// Decode a search response body. The body must be a JSON array; elements
    /// that are not objects are skipped.
    pub fn decode_search_response(
        body: &str,
        url: &str,
    ) -> Result<Vec<CandidateProduct>, CatalogError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| CatalogError::MalformedResponse {
                reason: e.to_string(),
                url: url.to_string(),
            })?;

        let Value::Array(records) = value else {
            return Err(CatalogError::MalformedResponse {
                reason: format!("expected a JSON array, got {}", Self::kind(&value)),
                url: url.to_string(),
            });
        };

        Ok(records.iter().filter_map(Self::candidate_from_json).collect())
    }

    /// Normalize one product record. Missing or ill-typed fields fall back to
    /// empty values.
    pub fn candidate_from_json(record: &Value) -> Option<CandidateProduct> {
        let obj = record.as_object()?;

        let product_id = obj.get("productId").and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        let name = obj
            .get("productName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let link_slug = obj
            .get("linkText")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let category_tree = obj
            .get("categoryTree")
            .and_then(Value::as_array)
            .map(|nodes| {
                nodes
                    .iter()
                    .filter_map(|node| node.get("name").and_then(Value::as_str))
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let category_paths = obj
            .get("categories")
            .and_then(Value::as_array)
            .map(|paths| {
                paths
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let first_offer_price = record
            .pointer("/items/0/sellers/0/commertialOffer/Price")
            .and_then(Self::parse_price);

        Some(CandidateProduct {
            product_id,
            name,
            link_slug,
            category_tree,
            category_paths,
            first_offer_price,
        })
    }

    /// Prices come as JSON numbers, occasionally as numeric strings
    fn parse_price(value: &Value) -> Option<f64> {
        let price = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        price.is_finite().then_some(price)
    }

    const fn kind(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        }
    }
}
