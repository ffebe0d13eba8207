//! Catalog site characteristics and domain constants
//!
//! Sentinel strings are consumed verbatim by the serving and spreadsheet layers.

/// External catalog (VTEX storefront) characteristics
pub mod site {
    /// Default storefront base URL
    pub const BASE_URL: &str = "https://www.saojoaofarmacias.com.br";

    /// Public catalog search endpoint, relative to the base URL
    pub const SEARCH_PATH: &str = "/api/catalog_system/pub/products/search/";

    /// Filter prefix for an exact EAN lookup (`fq=` parameter)
    pub const EAN_FILTER_PREFIX: &str = "alternateIds_Ean:";

    /// Suffix of every product detail page URL
    pub const PRODUCT_PAGE_SUFFIX: &str = "/p";

    /// Default result window for free-text searches (inclusive bounds)
    pub const DEFAULT_SEARCH_FROM: u32 = 0;
    pub const DEFAULT_SEARCH_TO: u32 = 19;
}

/// Placeholder values standing in for "value unavailable"
pub mod sentinel {
    /// Price sentinel, shared by "not found" and "could not be priced"
    pub const PRICE_NOT_FOUND: &str = "Produto não encontrado";

    /// Neutral placeholder for classification and observation
    pub const EM_DASH: &str = "—";

    /// Observation notes
    pub mod observation {
        pub const NO_RESULTS: &str = "Sem resultados";
        pub const NO_MATCH: &str = "Sem match";
        pub const EMPTY_ROW: &str = "Linha vazia";
        pub const ERROR_PREFIX: &str = "Erro: ";
    }
}

/// Matching and classification rules
pub mod matching {
    /// Minimum length for an all-digit term to be treated as a product code
    pub const MIN_CODE_LENGTH: usize = 8;

    /// Category names that denote the storefront root and never appear in a breadcrumb
    pub const HOME_MARKERS: &[&str] = &["início", "inicio", "home"];

    /// Separator between breadcrumb segments
    pub const BREADCRUMB_SEPARATOR: &str = " > ";
}

/// Spreadsheet column headers recognized by the batch input
pub mod columns {
    pub const CODE: &str = "EAN";
    pub const NAME: &str = "NOME";
}
