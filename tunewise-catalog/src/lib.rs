//! Modification catalog for tunewise.
//!
//! The catalog is a validated, insertion-ordered list of [`Modification`]s plus the
//! rule tables the engine consults: the category/goal [`AffinityTable`] and the
//! symmetric [`ConflictSet`].

mod affinity;
mod builtin;
mod load;

pub use affinity::{AffinityRow, AffinitySpec, AffinityTable, MAX_WEIGHT};
pub use builtin::builtin_modifications;
pub use load::{CatalogFile, load_catalog, parse_catalog_json, parse_catalog_toml};

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;
use tunewise_types::Modification;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("io error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("unsupported catalog format: {path} (expected .json or .toml)")]
    UnsupportedFormat { path: String },

    #[error("unexpected catalog schema: {found}")]
    Schema { found: String },

    #[error("modification with empty id")]
    EmptyId,

    #[error("duplicate modification id: {0}")]
    DuplicateId(String),

    #[error("{id} lists itself as a {field}")]
    SelfReference { id: String, field: &'static str },

    #[error("{id} lists unknown {field}: {target}")]
    UnknownReference {
        id: String,
        field: &'static str,
        target: String,
    },

    #[error("{id} has an invalid cost range")]
    InvalidCost { id: String },

    #[error("{id} applies to no engine type")]
    NoEngineTypes { id: String },

    #[error("affinity weight for ({category}, {goal}) out of range: {weight}")]
    InvalidAffinity {
        category: String,
        goal: String,
        weight: f64,
    },
}

/// Symmetric conflict relation, stored as ordered id pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictSet {
    pairs: BTreeSet<(String, String)>,
}

impl ConflictSet {
    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    pub fn insert(&mut self, a: &str, b: &str) {
        self.pairs.insert(Self::key(a, b));
    }

    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.pairs.contains(&Self::key(a, b))
    }

    /// Every id `id` conflicts with, sorted.
    pub fn peers<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs.iter().filter_map(move |(a, b)| {
            if a == id {
                Some(b.as_str())
            } else if b == id {
                Some(a.as_str())
            } else {
                None
            }
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Validated, immutable modification catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    mods: Vec<Modification>,
    index: BTreeMap<String, usize>,
    conflicts: ConflictSet,
    affinity: AffinityTable,
}

impl Catalog {
    /// The built-in catalog, validated like any other.
    pub fn try_builtin() -> Result<Self, CatalogError> {
        Self::new(builtin_modifications())
    }

    /// Infallible form of [`Catalog::try_builtin`] for tests and defaults. A
    /// validation failure logs and yields an empty catalog; loaders should use
    /// `try_builtin` so the cause propagates.
    pub fn builtin() -> Self {
        match Self::try_builtin() {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "built-in catalog failed validation");
                Self::empty()
            }
        }
    }

    pub fn empty() -> Self {
        Self {
            mods: Vec::new(),
            index: BTreeMap::new(),
            conflicts: ConflictSet::default(),
            affinity: AffinityTable::builtin(),
        }
    }

    pub fn new(mods: Vec<Modification>) -> Result<Self, CatalogError> {
        Self::with_affinity(mods, AffinityTable::builtin())
    }

    pub fn with_affinity(
        mods: Vec<Modification>,
        affinity: AffinityTable,
    ) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (pos, m) in mods.iter().enumerate() {
            if m.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !m.cost.is_valid() {
                return Err(CatalogError::InvalidCost { id: m.id.clone() });
            }
            if m.engine_types.is_empty() {
                return Err(CatalogError::NoEngineTypes { id: m.id.clone() });
            }
            if index.insert(m.id.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateId(m.id.clone()));
            }
        }

        let mut conflicts = ConflictSet::default();
        for m in &mods {
            check_refs(m, "prerequisite", &m.prerequisites, &index)?;
            check_refs(m, "conflict", &m.conflicts, &index)?;
            for other in &m.conflicts {
                conflicts.insert(&m.id, other);
            }
        }

        debug!(
            modifications = mods.len(),
            conflict_pairs = conflicts.len(),
            "catalog validated"
        );

        Ok(Self {
            mods,
            index,
            conflicts,
            affinity,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Modification> {
        self.index.get(id).map(|&i| &self.mods[i])
    }

    /// Insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Modification> {
        self.mods.iter()
    }

    pub fn modifications(&self) -> &[Modification] {
        &self.mods
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Symmetric: `conflicts(a, b) == conflicts(b, a)`.
    pub fn conflicts(&self, a: &str, b: &str) -> bool {
        self.conflicts.contains(a, b)
    }

    pub fn conflict_set(&self) -> &ConflictSet {
        &self.conflicts
    }

    pub fn affinity(&self) -> &AffinityTable {
        &self.affinity
    }

    /// Finds an entry by id or case-insensitive display name.
    pub fn lookup(&self, key: &str) -> Option<&Modification> {
        let key = key.trim();
        self.get(key)
            .or_else(|| self.mods.iter().find(|m| m.name.eq_ignore_ascii_case(key)))
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_refs(
    m: &Modification,
    field: &'static str,
    refs: &[String],
    index: &BTreeMap<String, usize>,
) -> Result<(), CatalogError> {
    for target in refs {
        if *target == m.id {
            return Err(CatalogError::SelfReference {
                id: m.id.clone(),
                field,
            });
        }
        if !index.contains_key(target) {
            return Err(CatalogError::UnknownReference {
                id: m.id.clone(),
                field,
                target: target.clone(),
            });
        }
    }
    Ok(())
}
