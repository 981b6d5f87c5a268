use std::collections::HashMap;

use crate::types::Series;

/// Per-scan mapping from symbol to price history.
///
/// Iteration follows insertion order so detector output is reproducible for
/// a given fetch. Built once during the fetch phase and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    order: Vec<String>,
    series: HashMap<String, Series>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series, replacing any existing one but keeping its position.
    pub fn insert(&mut self, symbol: impl Into<String>, series: Series) {
        let symbol = symbol.into();
        if !self.series.contains_key(&symbol) {
            self.order.push(symbol.clone());
        }
        self.series.insert(symbol, series);
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.series.contains_key(symbol)
    }

    /// Merge another store into this one. Symbols already present win.
    pub fn merge(&mut self, other: SeriesStore) {
        let SeriesStore { order, mut series } = other;
        for symbol in order {
            if self.contains(&symbol) {
                continue;
            }
            if let Some(s) = series.remove(&symbol) {
                self.insert(symbol, s);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.order
            .iter()
            .filter_map(|sym| self.series.get(sym).map(|s| (sym.as_str(), s)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
