use std::path::Path;

use anyhow::Context;

use crate::models::Recipe;

/// Loads the recipe corpus from a CSV file
///
/// The file must carry a `name,ingredients,steps` header. The corpus is read
/// once at process start; there is no write path back to the source.
pub fn load_corpus(path: impl AsRef<Path>) -> anyhow::Result<Vec<Recipe>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open corpus file {}", path.display()))?;

    let mut recipes = Vec::new();
    for record in reader.deserialize() {
        let recipe: Recipe =
            record.with_context(|| format!("Malformed recipe row in {}", path.display()))?;
        recipes.push(recipe);
    }

    Ok(recipes)
}
