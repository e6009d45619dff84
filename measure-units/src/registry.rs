//! Symbol registry
//!
//! Maps each symbol to the unit that owns it. Entries are only ever added
//! through a single insert-if-absent step, never updated or removed, so a
//! unit observed through the registry is final.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::kind::UnitKind;
use crate::{Unit, Untyped};

/// Process-wide registry, for callers that do not manage their own
static GLOBAL: LazyLock<SymbolRegistry> = LazyLock::new(SymbolRegistry::new);

/// Outcome of an insert-if-absent
#[derive(Debug)]
pub(crate) enum Registration {
    Inserted,
    /// The symbol was already owned; holds the owner
    Existing(Arc<UnitKind>),
}

/// Authority mapping unit symbols to unit identities
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    symbols: RwLock<HashMap<String, Arc<UnitKind>>>,
}

impl SymbolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static SymbolRegistry {
        &GLOBAL
    }

    /// Register `unit` under `symbol` unless the symbol is already owned.
    ///
    /// The absent check and the insert happen under one write lock, so of
    /// two racing callers exactly one inserts and the other sees its unit.
    pub(crate) fn insert_if_absent(&self, symbol: &str, unit: &Arc<UnitKind>) -> Registration {
        if let Some(existing) = self.get(symbol) {
            return Registration::Existing(existing);
        }

        // Entries are inserted whole, so a poisoned map is still consistent.
        let mut symbols = self.symbols.write().unwrap_or_else(PoisonError::into_inner);
        match symbols.entry(symbol.to_string()) {
            Entry::Occupied(entry) => Registration::Existing(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(unit));
                Registration::Inserted
            }
        }
    }

    fn get(&self, symbol: &str) -> Option<Arc<UnitKind>> {
        let symbols = self.symbols.read().unwrap_or_else(PoisonError::into_inner);
        symbols.get(symbol).cloned()
    }

    /// The registered unit owning `symbol`, if any
    pub fn lookup(&self, symbol: &str) -> Option<Unit<Untyped>> {
        self.get(symbol).map(Unit::from_kind)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    pub fn len(&self) -> usize {
        self.symbols.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered symbols, sorted
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .symbols
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        symbols.sort();
        symbols
    }
}
