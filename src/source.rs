// File: ./src/source.rs
//! Access to the raw record tables. Each table is a grid of text cells whose
//! first row holds the column titles.
use anyhow::{Result, anyhow};
use serde_json::Value;
use std::collections::BTreeMap;

pub type Grid = Vec<Vec<String>>;

pub trait RecordSource {
    /// Titles of all tables, in source order.
    fn table_names(&self) -> Result<Vec<String>>;

    fn fetch_table(&self, name: &str) -> Result<Grid>;
}

/// In-memory tables, e.g. loaded from a snapshot or built by tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    order: Vec<String>,
    tables: BTreeMap<String, Grid>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, name: &str, grid: Grid) {
        if !self.tables.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.tables.insert(name.to_string(), grid);
    }

    /// Builder-style variant of [`MemorySource::add_table`] taking string slices.
    pub fn with_table(mut self, name: &str, rows: &[&[&str]]) -> Self {
        let grid = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        self.add_table(name, grid);
        self
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &Grid)> {
        self.order
            .iter()
            .filter_map(|n| self.tables.get(n).map(|g| (n.as_str(), g)))
    }
}

impl RecordSource for MemorySource {
    fn table_names(&self) -> Result<Vec<String>> {
        Ok(self.order.clone())
    }

    fn fetch_table(&self, name: &str) -> Result<Grid> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("cannot fetch table '{}'", name))
    }
}

/// Renders a JSON cell the way a spreadsheet export shows it.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
