//! Category colour assignment.

use std::collections::HashMap;

use crate::types::{Colour, Palette};

/// A palette slot handed to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub index: usize,
    pub colour: Colour,
}

/// Binds categories to palette colours for the length of one conversion.
///
/// The first unseen category gets palette index 0, the next unseen one index
/// 1, and so on, wrapping around once the palette is exhausted. A category
/// keeps its colour for the rest of the run.
#[derive(Debug)]
pub struct CategoryColours<'p> {
    palette: &'p Palette,
    table: HashMap<String, usize>,
    next: usize,
}

impl<'p> CategoryColours<'p> {
    pub fn new(palette: &'p Palette) -> Self {
        Self {
            palette,
            table: HashMap::new(),
            next: 0,
        }
    }

    /// Get the swatch for a category, binding a new one on first sight.
    pub fn assign(&mut self, key: &str) -> Swatch {
        let index = match self.table.get(key) {
            Some(&index) => index,
            None => {
                let index = self.next;
                self.next = (self.next + 1) % self.palette.len();
                self.table.insert(key.to_string(), index);
                tracing::debug!(category = key, index, "new category");
                index
            }
        };

        Swatch {
            index,
            colour: self.palette.get(index).unwrap_or(Colour::TRANSPARENT),
        }
    }

    /// Number of distinct categories seen so far.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
