use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hash};

/// A set of placeholder keys the validator treats as known.
pub trait KeySet {
    fn contains_key(&self, key: &str) -> bool;
}

impl<S: AsRef<str>> KeySet for [S] {
    fn contains_key(&self, key: &str) -> bool {
        self.iter().any(|known| known.as_ref() == key)
    }
}

impl<S: AsRef<str>, const N: usize> KeySet for [S; N] {
    fn contains_key(&self, key: &str) -> bool {
        self.as_slice().contains_key(key)
    }
}

impl<S: AsRef<str>> KeySet for Vec<S> {
    fn contains_key(&self, key: &str) -> bool {
        self.as_slice().contains_key(key)
    }
}

impl<S, H> KeySet for HashSet<S, H>
where
    S: Borrow<str> + Hash + Eq,
    H: BuildHasher,
{
    fn contains_key(&self, key: &str) -> bool {
        self.contains(key)
    }
}

impl<S> KeySet for BTreeSet<S>
where
    S: Borrow<str> + Ord,
{
    fn contains_key(&self, key: &str) -> bool {
        self.contains(key)
    }
}

impl<K: KeySet + ?Sized> KeySet for &K {
    fn contains_key(&self, key: &str) -> bool {
        (**self).contains_key(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub label: String,
}

impl Variable {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    /// The text inserted into a body for this variable, e.g. `{prenom}`.
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self.key)
    }
}

/// Ordered vocabulary of recipient fields that may appear as placeholders.
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    variables: Vec<Variable>,
    index: HashMap<String, usize>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering an existing key replaces its label and keeps its position.
    pub fn register(&mut self, key: impl Into<String>, label: impl Into<String>) {
        let variable = Variable::new(key, label);
        match self.index.get(&variable.key) {
            Some(&slot) => self.variables[slot] = variable,
            None => {
                self.index.insert(variable.key.clone(), self.variables.len());
                self.variables.push(variable);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Variable> {
        self.index.get(key).and_then(|&slot| self.variables.get(slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|variable| variable.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl KeySet for VariableRegistry {
    fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }
}

impl FromIterator<Variable> for VariableRegistry {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        let mut registry = Self::new();
        for variable in iter {
            registry.register(variable.key, variable.label);
        }
        registry
    }
}

static DEFAULT_REGISTRY: Lazy<VariableRegistry> = Lazy::new(|| {
    let mut registry = VariableRegistry::new();
    registry.register("prenom", "First Name");
    registry.register("nom", "Last Name");
    registry.register("segment", "Segment");
    registry.register("zone_geographique", "Zone");
    registry
});

/// The contact-field vocabulary used when no configuration overrides it.
pub fn default_registry() -> &'static VariableRegistry {
    &DEFAULT_REGISTRY
}
