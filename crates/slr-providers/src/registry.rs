//! Provider registry: named clients constructed once and looked up by the
//! `database_name` the query plan carries.

use crate::arxiv::ArxivProvider;
use crate::crossref::CrossrefProvider;
use crate::openalex::OpenAlexProvider;
use crate::provider::Provider;
use crate::semantic_scholar::SemanticScholarProvider;
use std::collections::HashMap;

/// Per-provider `(capacity, refill_per_second)` token-bucket settings.
#[derive(Debug, Clone, Copy)]
pub struct RateConfig {
    pub capacity: f64,
    pub refill_per_second: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            capacity: 5.0,
            refill_per_second: 1.0,
        }
    }
}

pub struct ProviderRegistry {
    providers: HashMap<&'static str, Box<dyn Provider>>,
}

impl ProviderRegistry {
    /// Builds the registry with the four executable providers, applying a
    /// per-provider rate override from `rates` (falling back to
    /// [`RateConfig::default`]).
    #[must_use]
    pub fn new(rates: &HashMap<String, RateConfig>) -> Self {
        let rate_for = |name: &str| rates.get(name).copied().unwrap_or_default();

        let mut providers: HashMap<&'static str, Box<dyn Provider>> = HashMap::new();
        let openalex = rate_for("openalex");
        providers.insert(
            "openalex",
            Box::new(OpenAlexProvider::new(openalex.capacity, openalex.refill_per_second)),
        );
        let arxiv = rate_for("arxiv");
        providers.insert("arxiv", Box::new(ArxivProvider::new(arxiv.capacity, arxiv.refill_per_second)));
        let crossref = rate_for("crossref");
        providers.insert(
            "crossref",
            Box::new(CrossrefProvider::new(crossref.capacity, crossref.refill_per_second)),
        );
        let semantic_scholar = rate_for("semantic_scholar");
        providers.insert(
            "semantic_scholar",
            Box::new(SemanticScholarProvider::new(
                semantic_scholar.capacity,
                semantic_scholar.refill_per_second,
            )),
        );
        Self { providers }
    }

    #[must_use]
    pub fn get(&self, database_name: &str) -> Option<&dyn Provider> {
        self.providers.get(database_name).map(std::convert::AsRef::as_ref)
    }

    #[must_use]
    pub fn contains(&self, database_name: &str) -> bool {
        self.providers.contains_key(database_name)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_all_four_executable_providers() {
        let registry = ProviderRegistry::default();
        for name in ["openalex", "arxiv", "crossref", "semantic_scholar"] {
            assert!(registry.contains(name), "missing provider {name}");
        }
    }

    #[test]
    fn unregistered_database_is_none() {
        let registry = ProviderRegistry::default();
        assert!(registry.get("wos").is_none());
    }
}
