use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::{error::AppResult, state::AppState, views};

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    #[serde(default)]
    pub ingredients: String,
}

/// GET /recommendation
///
/// Matches the supplied ingredient list against the corpus and renders the
/// best recipe. Narration is queued fire-and-forget; its failures never
/// affect this response. Matching errors surface as JSON with 400/404 via
/// `AppError`'s response mapping.
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendQuery>,
) -> AppResult<Html<String>> {
    let recommendation = state.matcher.recommend(&params.ingredients)?;

    tracing::info!(
        recipe = %recommendation.recipe.name,
        score = recommendation.score,
        "Recommendation served"
    );

    state
        .narrator
        .narrate_in_background(recommendation.recipe.narration_text());

    Ok(Html(views::recommendation_page(&recommendation)))
}
