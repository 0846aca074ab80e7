//! Motor parts and fault keyword mapping
//!
//! The part set is fixed. Wire keys match the dashboard's scene node names.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Shaft,
    Rotor,
    Fan,
    Commutator,
    Casing,
    Brush,
    OuterCasing,
    BrushHolder,
    BackCover,
    Magnet,
}

impl Part {
    pub const ALL: [Part; 10] = [
        Part::Shaft,
        Part::Rotor,
        Part::Fan,
        Part::Commutator,
        Part::Casing,
        Part::Brush,
        Part::OuterCasing,
        Part::BrushHolder,
        Part::BackCover,
        Part::Magnet,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Shaft => "shaft",
            Self::Rotor => "rotor",
            Self::Fan => "fan",
            Self::Commutator => "commutator",
            Self::Casing => "casing",
            Self::Brush => "brush",
            Self::OuterCasing => "outerCasing",
            Self::BrushHolder => "brushHolder",
            Self::BackCover => "backCover",
            Self::Magnet => "magnet",
        }
    }

    /// Look up a part by wire key, ignoring ASCII case
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|part| part.key().eq_ignore_ascii_case(key.trim()))
    }
}

/// Keyword → part table applied to free-text fault descriptions
pub const FAULT_KEYWORDS: [(&str, Part); 5] = [
    ("commutator", Part::Commutator),
    ("severe", Part::Rotor),
    ("brush", Part::Brush),
    ("fan", Part::Fan),
    ("shaft", Part::Shaft),
];

/// Parts implicated by a fault text (case-insensitive substring match)
pub fn parts_for_fault(text: &str) -> BTreeSet<Part> {
    let lower = text.to_lowercase();
    FAULT_KEYWORDS
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .map(|(_, part)| *part)
        .collect()
}
