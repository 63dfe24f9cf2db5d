//! Provenance tracking: which layer (default, config file, CLI) produced
//! each resolved field, for `slr doctor`-style diagnostics.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    File,
    Cli,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::File => write!(f, "file"),
            Self::Cli => write!(f, "cli"),
        }
    }
}

/// Tracks, per top-level field name, which layer last set it. Each layer
/// overwrites the attribution for the fields it touches, so the map always
/// reflects the winning source.
#[derive(Debug, Clone, Default)]
pub struct SourceAttribution {
    by_field: HashMap<&'static str, ConfigSource>,
}

impl SourceAttribution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &'static str, source: ConfigSource) {
        self.by_field.insert(field, source);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<ConfigSource> {
        self.by_field.get(field).copied()
    }
}
