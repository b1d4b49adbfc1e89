use parking_lot::RwLock;
use std::collections::HashMap;

use super::definition::AnalyzerDefinition;
use crate::core::errors::Result;

/// A selected analyzer name after lookup in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Known(AnalyzerDefinition),
    /// The name has no registry entry; reported per entry, never fatal
    Unknown(String),
}

impl Resolved {
    pub fn name(&self) -> &str {
        match self {
            Self::Known(def) => def.name(),
            Self::Unknown(name) => name,
        }
    }
}

#[derive(Debug, Default)]
struct Entries {
    /// Names in first-registration order
    order: Vec<String>,
    definitions: HashMap<String, AnalyzerDefinition>,
}

/// Registry of analyzers keyed by name
///
/// Reads (`resolve`, `list`) share a read lock; `register` takes the write
/// lock, so a reader never sees a half-written entry. Overwriting an
/// existing name keeps its original position in the listing order.
#[derive(Debug, Default)]
pub struct AnalyzerRegistry {
    entries: RwLock<Entries>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new analyzer, replacing any existing one with the same name
    pub fn register(&self, name: &str, invocation: Vec<String>) -> Result<AnalyzerDefinition> {
        let definition = AnalyzerDefinition::new(name, invocation)?;
        self.insert(definition.clone());
        Ok(definition)
    }

    fn insert(&self, definition: AnalyzerDefinition) {
        let mut entries = self.entries.write();
        let name = definition.name().to_string();
        if entries.definitions.insert(name.clone(), definition).is_none() {
            entries.order.push(name);
        } else {
            tracing::debug!(analyzer = %name, "replaced existing analyzer definition");
        }
    }

    /// Resolve a selection against the registry
    ///
    /// With no selection (or an empty one) every registered analyzer is
    /// returned in registration order. Otherwise names are returned in the
    /// order given, with duplicates dropped and unknown names kept as
    /// [`Resolved::Unknown`].
    pub fn resolve<S: AsRef<str>>(&self, names: Option<&[S]>) -> Vec<Resolved> {
        let entries = self.entries.read();

        match names {
            Some(names) if !names.is_empty() => {
                let mut seen: Vec<&str> = Vec::with_capacity(names.len());
                let mut resolved = Vec::with_capacity(names.len());
                for name in names {
                    let name: &str = name.as_ref();
                    if seen.contains(&name) {
                        continue;
                    }
                    seen.push(name);
                    resolved.push(match entries.definitions.get(name) {
                        Some(def) => Resolved::Known(def.clone()),
                        None => Resolved::Unknown(name.to_string()),
                    });
                }
                resolved
            }
            _ => entries
                .order
                .iter()
                .filter_map(|name| entries.definitions.get(name))
                .cloned()
                .map(Resolved::Known)
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<AnalyzerDefinition> {
        self.entries.read().definitions.get(name).cloned()
    }

    /// All registered analyzer names, in registration order
    pub fn list(&self) -> Vec<String> {
        self.entries.read().order.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
