use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Extension,
};

use crate::{
    error::AppResult,
    middleware::session::{clear_flash_cookie, Flash, SessionToken},
    state::AppState,
    views,
};

/// Index page; unauthenticated visitors are sent to signup
pub async fn index(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    headers: HeaderMap,
) -> AppResult<Response> {
    if state.session_account_id(&token).await?.is_none() {
        return Ok(Redirect::to("/signup").into_response());
    }

    let flash = Flash::from_headers(&headers);
    Ok((
        AppendHeaders([(header::SET_COOKIE, clear_flash_cookie())]),
        Html(views::index_page(flash.as_ref())),
    )
        .into_response())
}

/// Static about page
pub async fn about() -> Html<String> {
    Html(views::about_page())
}
