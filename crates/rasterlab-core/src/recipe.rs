use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::Result;
use crate::operation::Operation;

/// An ordered list of operations that can be stored as JSON and replayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub name: Option<String>,
    pub operations: Vec<Operation>,
}

impl Recipe {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            name: None,
            operations,
        }
    }

    /// Apply every operation in order. Stops at the first failure; the input
    /// is never modified.
    pub fn apply(&self, input: &PixelBuffer) -> Result<PixelBuffer> {
        let mut current = input.clone();
        for op in &self.operations {
            current = op.apply(&current)?;
        }
        Ok(current)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let recipe: Self = serde_json::from_str(&json)?;
        Ok(recipe)
    }
}
