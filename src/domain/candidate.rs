use serde::{Deserialize, Serialize};

/// One catalog record returned by a search, normalized at the client boundary.
///
/// Absent or ill-typed fields in the raw record end up as `None` or empty
/// collections; nothing downstream has to look at the raw JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProduct {
    pub product_id: Option<String>,
    /// Display name, empty when the record had none
    pub name: String,
    /// URL slug (`linkText`) of the product page
    pub link_slug: Option<String>,
    /// Names of the structured category tree, broadest first
    pub category_tree: Vec<String>,
    /// Slash-delimited category paths such as `/Medicamentos/Dor-e-Febre/`
    pub category_paths: Vec<String>,
    /// Price of the first commercial offer of the first item
    pub first_offer_price: Option<f64>,
}

impl CandidateProduct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_link_slug(mut self, slug: impl Into<String>) -> Self {
        self.link_slug = Some(slug.into());
        self
    }

    pub fn with_category_tree<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_tree = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub const fn with_price(mut self, price: f64) -> Self {
        self.first_offer_price = Some(price);
        self
    }
}
