//! Scripted in-memory catalog for engine tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{CandidateProduct, CatalogError, CatalogSource};

/// What the fake answers for one query
#[derive(Debug, Clone)]
pub enum Reply {
    Products(Vec<CandidateProduct>),
    Fail(CatalogError),
    Panic,
}

/// Replies keyed by query; unknown queries return no products.
/// Every call is recorded as `term:<q>` or `code:<q>`.
#[derive(Debug, Default)]
pub struct ScriptedCatalog {
    by_term: HashMap<String, Reply>,
    by_code: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_term(mut self, term: &str, reply: Reply) -> Self {
        self.by_term.insert(term.to_string(), reply);
        self
    }

    pub fn on_code(mut self, code: &str, reply: Reply) -> Self {
        self.by_code.insert(code.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, key: String, reply: Option<&Reply>) -> Result<Vec<CandidateProduct>, CatalogError> {
        self.calls.lock().unwrap().push(key.clone());
        match reply {
            None => Ok(Vec::new()),
            Some(Reply::Products(products)) => Ok(products.clone()),
            Some(Reply::Fail(error)) => Err(error.clone()),
            Some(Reply::Panic) => panic!("scripted panic for {key}"),
        }
    }
}

#[async_trait]
impl CatalogSource for ScriptedCatalog {
    async fn search_by_term(
        &self,
        term: &str,
        _from: u32,
        _to: u32,
    ) -> Result<Vec<CandidateProduct>, CatalogError> {
        self.answer(format!("term:{term}"), self.by_term.get(term))
    }

    async fn search_by_code(&self, code: &str) -> Result<Vec<CandidateProduct>, CatalogError> {
        self.answer(format!("code:{code}"), self.by_code.get(code))
    }
}

pub fn product(name: &str, slug: &str, price: f64) -> CandidateProduct {
    CandidateProduct::new(name)
        .with_link_slug(slug)
        .with_price(price)
        .with_category_tree(["Início", "Medicamentos"])
}

pub fn timeout() -> CatalogError {
    CatalogError::Timeout {
        seconds: 25,
        url: "https://catalog.test/search".to_string(),
    }
}
