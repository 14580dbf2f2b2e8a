use crate::{
    error::{AppError, AppResult},
    models::Recipe,
    services::index::{tokenize, TfIdfIndex},
};

/// A matched recipe with its similarity score and corpus row
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub recipe: Recipe,
    pub score: f32,
    pub row: usize,
}

/// Nearest-neighbor recipe matcher over the immutable TF-IDF index
///
/// Constructed once at startup and shared read-only across requests; every
/// lookup is a pure computation with no side effects.
pub struct Matcher {
    recipes: Vec<Recipe>,
    index: TfIdfIndex,
}

impl Matcher {
    /// Builds the matcher, indexing every recipe's ingredient text
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let documents: Vec<Vec<String>> =
            recipes.iter().map(|r| tokenize(&r.ingredients)).collect();
        let index = TfIdfIndex::build(&documents);

        tracing::info!(
            recipes = recipes.len(),
            vocabulary = index.vocab_size(),
            "Built recipe index"
        );

        Self { recipes, index }
    }

    /// Number of recipes in the corpus
    pub fn corpus_size(&self) -> usize {
        self.recipes.len()
    }

    /// Splits raw comma-separated input into trimmed, non-empty ingredients
    ///
    /// Fails with `EmptyQuery` before the index is consulted when nothing
    /// usable remains.
    pub fn parse_ingredients(raw: &str) -> AppResult<Vec<String>> {
        let ingredients: Vec<String> = raw
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        if ingredients.is_empty() {
            return Err(AppError::EmptyQuery);
        }
        Ok(ingredients)
    }

    /// Finds the single best-matching recipe for a raw ingredient list
    ///
    /// Ties on the maximum score resolve to the lowest row index, so results
    /// are deterministic for an unchanged corpus. A maximum similarity of
    /// exactly zero means no vocabulary overlap at all and fails with
    /// `NoMatch` instead of returning an arbitrary recipe.
    pub fn recommend(&self, raw: &str) -> AppResult<Recommendation> {
        let ingredients = Self::parse_ingredients(raw)?;

        let tokens = tokenize(&ingredients.join(" "));
        let query = self.index.encode(&tokens);
        let scores = self.index.scores(&query);

        let mut best: Option<(usize, f32)> = None;
        for (row, &score) in scores.iter().enumerate() {
            // Strictly greater keeps the first occurrence on ties.
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((row, score));
            }
        }

        match best {
            Some((row, score)) if score > 0.0 => Ok(Recommendation {
                recipe: self.recipes[row].clone(),
                score,
                row,
            }),
            _ => Err(AppError::NoMatch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, ingredients: &str) -> Recipe {
        Recipe {
            name: name.to_string(),
            ingredients: ingredients.to_string(),
            steps: format!("Cook the {}.", name),
        }
    }

    fn sample_matcher() -> Matcher {
        Matcher::new(vec![
            recipe("pasta", "tomato, garlic, pasta"),
            recipe("salad", "lettuce, tomato"),
        ])
    }

    #[test]
    fn test_recommend_prefers_higher_weighted_overlap() {
        let matcher = sample_matcher();
        let rec = matcher.recommend("tomato, pasta").unwrap();
        assert_eq!(rec.recipe.name, "pasta");
        assert_eq!(rec.row, 0);
        assert!(rec.score > 0.0);
    }

    #[test]
    fn test_recommend_no_overlap_is_no_match() {
        let matcher = sample_matcher();
        assert!(matches!(
            matcher.recommend("chocolate"),
            Err(AppError::NoMatch)
        ));
    }

    #[test]
    fn test_recommend_empty_input_is_empty_query() {
        let matcher = sample_matcher();
        assert!(matches!(matcher.recommend(""), Err(AppError::EmptyQuery)));
        assert!(matches!(
            matcher.recommend(" , ,  "),
            Err(AppError::EmptyQuery)
        ));
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let matcher = sample_matcher();
        let first = matcher.recommend("tomato").unwrap();
        let second = matcher.recommend("tomato").unwrap();
        assert_eq!(first.recipe, second.recipe);
        assert_eq!(first.row, second.row);
    }

    #[test]
    fn test_tie_breaks_to_lowest_row() {
        let matcher = Matcher::new(vec![
            recipe("first", "tomato, basil"),
            recipe("second", "tomato, basil"),
        ]);
        let rec = matcher.recommend("tomato, basil").unwrap();
        assert_eq!(rec.row, 0);
        assert_eq!(rec.recipe.name, "first");
    }

    #[test]
    fn test_empty_corpus_never_matches() {
        let matcher = Matcher::new(vec![]);
        assert!(matches!(
            matcher.recommend("tomato"),
            Err(AppError::NoMatch)
        ));
    }

    #[test]
    fn test_unknown_terms_are_tolerated_alongside_known_ones() {
        let matcher = sample_matcher();
        let rec = matcher.recommend("durian, lettuce").unwrap();
        assert_eq!(rec.recipe.name, "salad");
    }

    #[test]
    fn test_query_order_is_irrelevant() {
        let matcher = sample_matcher();
        let a = matcher.recommend("pasta, tomato").unwrap();
        let b = matcher.recommend("tomato, pasta").unwrap();
        assert_eq!(a.row, b.row);
    }
}
