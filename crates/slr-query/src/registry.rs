//! Dialect registry: named dialects registered into a map at
//! construction, no inheritance, composition only.

use crate::dialect::Dialect;
use crate::dialects::{PlainDialect, PubMed, Scopus};
use slr_utils::error::{Result, SlrError};
use std::collections::HashMap;

pub struct DialectRegistry {
    dialects: HashMap<&'static str, Box<dyn Dialect>>,
}

impl DialectRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut dialects: HashMap<&'static str, Box<dyn Dialect>> = HashMap::new();
        let entries: Vec<Box<dyn Dialect>> = vec![
            Box::new(PubMed),
            Box::new(Scopus),
            Box::new(PlainDialect::open_alex()),
            Box::new(PlainDialect::arxiv()),
            Box::new(PlainDialect::web_of_science()),
            Box::new(PlainDialect::ieee()),
            Box::new(PlainDialect::crossref()),
            Box::new(PlainDialect::semantic_scholar()),
        ];
        for dialect in entries {
            dialects.insert(dialect.name(), dialect);
        }
        Self { dialects }
    }

    /// Look up a registered dialect by name, e.g. `"pubmed"`.
    pub fn get(&self, name: &str) -> Result<&dyn Dialect> {
        self.dialects
            .get(name)
            .map(std::convert::AsRef::as_ref)
            .ok_or_else(|| SlrError::validation(format!("unrecognized dialect '{name}'")))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.dialects.contains_key(name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.dialects.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
