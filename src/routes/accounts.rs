use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::session::{
        clear_flash_cookie, clear_session_cookie, session_cookie, Flash, SessionToken,
    },
    models::NewAccount,
    state::AppState,
    views,
};

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Redirect that carries a flash message in a one-shot cookie
fn flash_redirect(to: &str, flash: Flash) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, flash.to_cookie())]),
        Redirect::to(to),
    )
        .into_response()
}

/// Renders a page and clears any consumed flash cookie
fn page_with_flash(headers: &HeaderMap, render: impl Fn(Option<&Flash>) -> String) -> Response {
    let flash = Flash::from_headers(headers);
    (
        AppendHeaders([(header::SET_COOKIE, clear_flash_cookie())]),
        Html(render(flash.as_ref())),
    )
        .into_response()
}

/// GET /signup
pub async fn signup_form(headers: HeaderMap) -> Response {
    page_with_flash(&headers, views::signup_page)
}

/// POST /signup
///
/// Duplicate username or email stays on the form with a flash; success logs
/// the new account in immediately.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    // Treat a blank username field the same as an omitted one.
    let username = form.username.filter(|u| !u.trim().is_empty());

    let created = state
        .accounts
        .create(NewAccount {
            name: form.name,
            phone: form.phone,
            email: form.email,
            username,
            password: form.password,
        })
        .await;

    match created {
        Ok(account) => {
            let token = state.sessions.create(account.id).await?;
            Ok((
                AppendHeaders([
                    (header::SET_COOKIE, session_cookie(&token)),
                    (header::SET_COOKIE, Flash::success("Registration successful!").to_cookie()),
                ]),
                Redirect::to("/"),
            )
                .into_response())
        }
        Err(AppError::DuplicateAccount) => Ok(flash_redirect(
            "/signup",
            Flash::danger(&AppError::DuplicateAccount.to_string()),
        )),
        Err(AppError::Database(e)) => {
            tracing::error!(error = %e, "Account creation failed");
            Ok(flash_redirect(
                "/signup",
                Flash::danger("Error during registration. Please try again."),
            ))
        }
        Err(e) => Err(e),
    }
}

/// Redirects to the dashboard when the request already carries a live session
///
/// Applies to GET and POST alike, so a logged-in user can never re-run the
/// credential check.
async fn already_logged_in(
    state: &AppState,
    token: &SessionToken,
) -> AppResult<Option<Response>> {
    if state.session_account_id(token).await?.is_some() {
        return Ok(Some(flash_redirect(
            "/dashboard",
            Flash::info("You are already logged in."),
        )));
    }
    Ok(None)
}

/// GET /login
pub async fn login_form(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    headers: HeaderMap,
) -> AppResult<Response> {
    if let Some(redirect) = already_logged_in(&state, &token).await? {
        return Ok(redirect);
    }
    Ok(page_with_flash(&headers, views::login_page))
}

/// POST /login
///
/// Wrong username and wrong password produce the same generic flash.
pub async fn login(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if let Some(redirect) = already_logged_in(&state, &token).await? {
        return Ok(redirect);
    }

    match state.accounts.authenticate(&form.username, &form.password).await {
        Ok(account) => {
            let token = state.sessions.create(account.id).await?;
            Ok((
                AppendHeaders([
                    (header::SET_COOKIE, session_cookie(&token)),
                    (header::SET_COOKIE, Flash::success("Login successful!").to_cookie()),
                ]),
                Redirect::to("/dashboard"),
            )
                .into_response())
        }
        Err(AppError::InvalidCredentials) => Ok(flash_redirect(
            "/login",
            Flash::danger(&AppError::InvalidCredentials.to_string()),
        )),
        Err(e) => Err(e),
    }
}

/// GET /dashboard
///
/// A stale or missing session flashes "User not found" and redirects to
/// login rather than surfacing an error.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    headers: HeaderMap,
) -> AppResult<Response> {
    match state.session_account(&token).await? {
        Some(account) => {
            let flash = Flash::from_headers(&headers);
            Ok((
                AppendHeaders([(header::SET_COOKIE, clear_flash_cookie())]),
                Html(views::dashboard_page(flash.as_ref(), &account)),
            )
                .into_response())
        }
        None => Ok(flash_redirect("/login", Flash::danger("User not found"))),
    }
}

/// POST /logout
///
/// Clears the session unconditionally, valid or not.
pub async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> AppResult<Response> {
    if let Some(token) = &token.0 {
        state.sessions.clear(token).await?;
    }

    Ok((
        AppendHeaders([
            (header::SET_COOKIE, clear_session_cookie()),
            (header::SET_COOKIE, Flash::info("You have been logged out.").to_cookie()),
        ]),
        Redirect::to("/signup"),
    )
        .into_response())
}
