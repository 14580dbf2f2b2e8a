use serde::{Deserialize, Serialize};

/// A recipe row from the corpus
///
/// Loaded once at startup and never mutated afterwards. A recipe's identity
/// is its row position in the loaded corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    /// Recipe name
    pub name: String,
    /// Comma-separated ingredient phrases
    pub ingredients: String,
    /// Preparation steps
    pub steps: String,
}

impl Recipe {
    /// Assembles the full recommendation sentence used for display and narration
    pub fn narration_text(&self) -> String {
        format!(
            "The recommended recipe is {} with ingredients {} and steps: {}.",
            self.name, self.ingredients, self.steps
        )
    }
}
