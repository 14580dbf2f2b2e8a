//! Server-rendered HTML pages
//!
//! Small format-string templates over a shared layout; no template engine.
//! All user-supplied text is escaped before interpolation.

use crate::{
    middleware::session::Flash,
    models::Account,
    services::Recommendation,
};

/// Escapes text for safe interpolation into HTML
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Shared page layout with optional flash banner
fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let banner = flash
        .map(|f| {
            format!(
                r#"<p class="flash flash-{}">{}</p>"#,
                escape(&f.level),
                escape(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title} - Pantry</title></head>
<body>
<nav><a href="/">Home</a> <a href="/dashboard">Dashboard</a> <a href="/about">About</a></nav>
{banner}
{body}
</body>
</html>"#,
        title = escape(title),
        banner = banner,
        body = body,
    )
}

pub fn index_page(flash: Option<&Flash>) -> String {
    layout(
        "Home",
        flash,
        r#"<h1>What's in your pantry?</h1>
<form action="/recommendation" method="get">
  <input type="text" name="ingredients" placeholder="tomato, garlic, pasta">
  <button type="submit">Find a recipe</button>
</form>
<form action="/logout" method="post"><button type="submit">Log out</button></form>"#,
    )
}

pub fn signup_page(flash: Option<&Flash>) -> String {
    layout(
        "Sign up",
        flash,
        r#"<h1>Sign up</h1>
<form action="/signup" method="post">
  <input type="text" name="name" placeholder="Name" required>
  <input type="text" name="phone" placeholder="Phone" required>
  <input type="email" name="email" placeholder="Email" required>
  <input type="text" name="username" placeholder="Username">
  <input type="password" name="password" placeholder="Password" required>
  <button type="submit">Create account</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#,
    )
}

pub fn login_page(flash: Option<&Flash>) -> String {
    layout(
        "Log in",
        flash,
        r#"<h1>Log in</h1>
<form action="/login" method="post">
  <input type="text" name="username" placeholder="Username" required>
  <input type="password" name="password" placeholder="Password" required>
  <button type="submit">Log in</button>
</form>
<p>New here? <a href="/signup">Sign up</a></p>"#,
    )
}

pub fn dashboard_page(flash: Option<&Flash>, account: &Account) -> String {
    let body = format!(
        r#"<h1>Welcome, {name}</h1>
<ul>
  <li>Email: {email}</li>
  <li>Phone: {phone}</li>
  <li>Username: {username}</li>
</ul>
<form action="/logout" method="post"><button type="submit">Log out</button></form>"#,
        name = escape(&account.name),
        email = escape(&account.email),
        phone = escape(&account.phone),
        username = escape(account.username.as_deref().unwrap_or("-")),
    );
    layout("Dashboard", flash, &body)
}

pub fn recommendation_page(recommendation: &Recommendation) -> String {
    let recipe = &recommendation.recipe;
    let body = format!(
        r#"<h1>Recommended: {name}</h1>
<h2>Ingredients</h2>
<p>{ingredients}</p>
<h2>Steps</h2>
<p>{steps}</p>
<p><a href="/">Try another ingredient list</a></p>"#,
        name = escape(&recipe.name),
        ingredients = escape(&recipe.ingredients),
        steps = escape(&recipe.steps),
    );
    layout("Recommendation", None, &body)
}

pub fn about_page() -> String {
    layout(
        "About",
        None,
        r#"<h1>About Pantry</h1>
<p>Pantry recommends the single recipe whose ingredient list best matches
what you have on hand, ranked by term-weighted similarity, and reads the
result back to you.</p>"#,
    )
}
