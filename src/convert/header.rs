//! Header row resolution.
//!
//! Maps each required field to the column whose header label matches it
//! exactly. Column order in the input does not matter.

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// A column the converter cannot work without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    CommonName,
    ScientificName,
    Variety,
    Stage,
    Coordinates,
}

impl RequiredField {
    /// Every required field, in reporting order.
    pub const ALL: [RequiredField; 5] = [
        RequiredField::CommonName,
        RequiredField::ScientificName,
        RequiredField::Variety,
        RequiredField::Stage,
        RequiredField::Coordinates,
    ];
}

/// Header labels naming each required field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderLabels {
    pub common_name: String,
    pub scientific_name: String,
    pub variety: String,
    pub stage: String,
    pub coordinates: String,
}

impl Default for HeaderLabels {
    fn default() -> Self {
        Self {
            common_name: "俗名".to_string(),
            scientific_name: "Nom scientifique".to_string(),
            variety: "VARIETE OUCULTIVAR".to_string(),
            stage: "STADE DE DEVELOPPEMENT".to_string(),
            coordinates: "geo_point_2d".to_string(),
        }
    }
}

impl HeaderLabels {
    /// The label bound to a field.
    pub fn label(&self, field: RequiredField) -> &str {
        match field {
            RequiredField::CommonName => &self.common_name,
            RequiredField::ScientificName => &self.scientific_name,
            RequiredField::Variety => &self.variety,
            RequiredField::Stage => &self.stage,
            RequiredField::Coordinates => &self.coordinates,
        }
    }
}

/// Resolved zero-based column positions for every required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub common_name: usize,
    pub scientific_name: usize,
    pub variety: usize,
    pub stage: usize,
    pub coordinates: usize,
}

impl ColumnIndex {
    /// Resolve columns from the header row.
    ///
    /// Fails with `ConvertError::Schema` listing every label that was not
    /// found. When a label appears more than once the first column wins.
    pub fn resolve<'a, I>(header: I, labels: &HeaderLabels) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let header: Vec<&str> = header
            .into_iter()
            .enumerate()
            .map(|(i, cell)| if i == 0 { strip_bom(cell) } else { cell })
            .collect();

        let find = |field: RequiredField| {
            let label = labels.label(field);
            header.iter().position(|cell| *cell == label)
        };

        let mut missing = Vec::new();
        let mut positions = [0usize; 5];
        for (slot, field) in positions.iter_mut().zip(RequiredField::ALL) {
            match find(field) {
                Some(position) => *slot = position,
                None => missing.push(labels.label(field).to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ConvertError::Schema { missing });
        }

        let [common_name, scientific_name, variety, stage, coordinates] = positions;
        Ok(Self {
            common_name,
            scientific_name,
            variety,
            stage,
            coordinates,
        })
    }

    /// The column resolved for a field.
    pub fn position(&self, field: RequiredField) -> usize {
        match field {
            RequiredField::CommonName => self.common_name,
            RequiredField::ScientificName => self.scientific_name,
            RequiredField::Variety => self.variety,
            RequiredField::Stage => self.stage,
            RequiredField::Coordinates => self.coordinates,
        }
    }

    /// The field stored furthest right, which decides the minimum row width.
    pub fn widest(&self) -> (RequiredField, usize) {
        RequiredField::ALL
            .into_iter()
            .map(|field| (field, self.position(field)))
            .max_by_key(|&(_, position)| position)
            .unwrap_or((RequiredField::CommonName, self.common_name))
    }
}

fn strip_bom(cell: &str) -> &str {
    cell.strip_prefix('\u{feff}').unwrap_or(cell)
}
