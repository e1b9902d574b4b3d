//! Label taxonomy for sustainability-marketing claims.
//!
//! Three primary categories, each owning an ordered list of detailed
//! indicator phrases. The primary names are the candidate labels for the
//! top-level classification; the flattened indicators are the candidate
//! labels for the detailed pass.
//!
//! # Categories
//!
//! - Greenwashing: claims that overstate or mislead about environmental impact
//! - Genuine Sustainability: verifiable, evidence-backed commitments
//! - Marketing Hype: green language used as a selling point without substance

use std::collections::HashSet;

/// Primary category names in fixed order.
pub const PRIMARY_LABELS: &[&str] = &["Greenwashing", "Genuine Sustainability", "Marketing Hype"];

const GREENWASHING: &[&str] = &[
    "Misleading environmental claim",
    "Vague sustainability statement",
    "Unsubstantiated green marketing",
    "Overstated eco-friendly benefits",
    "Use of irrelevant green imagery",
];

const GENUINE_SUSTAINABILITY: &[&str] = &[
    "Authentic environmental commitment",
    "Verified sustainable practice",
    "Third-party sustainability certification",
    "Transparency in environmental impact",
    "Evidence-based climate action",
];

const MARKETING_HYPE: &[&str] = &[
    "Generic green buzzwords",
    "Emotional appeal without proof",
    "Sustainability used as a selling point",
    "Trendy environmental phrasing",
];

/// Immutable mapping from primary category to its detailed indicators.
///
/// Every indicator belongs to exactly one category. Use [`LabelTaxonomy::standard`]
/// for the built-in greenwashing taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct LabelTaxonomy {
    groups: &'static [(&'static str, &'static [&'static str])],
}

const STANDARD_GROUPS: &[(&str, &[&str])] = &[
    ("Greenwashing", GREENWASHING),
    ("Genuine Sustainability", GENUINE_SUSTAINABILITY),
    ("Marketing Hype", MARKETING_HYPE),
];

impl Default for LabelTaxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

impl LabelTaxonomy {
    /// The built-in taxonomy: 3 categories, 14 indicators.
    pub const fn standard() -> Self {
        Self {
            groups: STANDARD_GROUPS,
        }
    }

    /// Primary category names, in declaration order.
    pub fn primary_labels(&self) -> Vec<&'static str> {
        self.groups.iter().map(|(category, _)| *category).collect()
    }

    /// Ordered indicators for `category`, or `None` for an unknown category.
    pub fn indicators(&self, category: &str) -> Option<&'static [&'static str]> {
        self.groups
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, indicators)| *indicators)
    }

    /// All indicators across categories, deduplicated, in declaration order.
    pub fn detailed_labels(&self) -> Vec<&'static str> {
        let mut seen = HashSet::new();
        self.groups
            .iter()
            .flat_map(|(_, indicators)| indicators.iter().copied())
            .filter(|label| seen.insert(*label))
            .collect()
    }

    /// The category that owns `indicator`.
    pub fn category_of(&self, indicator: &str) -> Option<&'static str> {
        self.groups
            .iter()
            .find(|(_, indicators)| indicators.contains(&indicator))
            .map(|(category, _)| *category)
    }

    /// Whether `label` is one of the primary category names.
    pub fn is_primary(&self, label: &str) -> bool {
        self.groups.iter().any(|(category, _)| *category == label)
    }
}
