//! Server-rendered HTML pages and page protection.
//!
//! The pages are minimal shells; the interesting behavior is the visit
//! counter on the landing page and the sign-in redirects on the protected
//! pages.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use ovenlovin_auth::OptionalUser;
use ovenlovin_core::auth::validate_callback_url;
use ovenlovin_core::storage::SiteStats;

use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct SignInQuery {
    pub callback_url: Option<String>,
}

/// Redirect to the sign-in page, preserving the page the visitor wanted.
fn redirect_to_signin(callback_url: &str) -> Response {
    Redirect::to(&format!(
        "/signin?callback_url={}",
        urlencoding::encode(callback_url)
    ))
    .into_response()
}

/// Handler for GET / - the landing page.
///
/// Records the visit and renders quick stats. A stats failure must not
/// break the page, so it falls back to zeroes.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let stats = match state.visits.record_visit_and_count("/").await {
        Ok(stats) => stats,
        Err(err) => {
            tracing::error!(error = %err, "Failed to record page visit");
            SiteStats::default()
        }
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Oven Lovin'</title>
</head>
<body>
    <h1>Oven Lovin'</h1>
    <p>Share recipes with your community.</p>
    <section class="quick-stats">
        <div><strong>{recipes}</strong> recipes shared</div>
        <div><strong>{users}</strong> home cooks</div>
        <div><strong>{visits}</strong> visits</div>
    </section>
    <nav>
        <a href="/signin">Sign in</a>
        <a href="/profile">My profile</a>
    </nav>
</body>
</html>"#,
        recipes = stats.recipes,
        users = stats.users,
        visits = stats.visits,
    ))
}

/// Handler for GET /signin.
///
/// Already-authenticated visitors are sent on to their destination; the
/// callback URL is only honored when it is a relative path.
pub async fn signin(
    OptionalUser(user): OptionalUser,
    Query(query): Query<SignInQuery>,
) -> Response {
    if user.is_some() {
        let destination = query
            .callback_url
            .as_deref()
            .and_then(validate_callback_url)
            .unwrap_or("/profile");
        return Redirect::to(destination).into_response();
    }

    let callback_param = query
        .callback_url
        .as_deref()
        .and_then(validate_callback_url)
        .map(|url| format!(r#"<input type="hidden" name="callback_url" value="{url}">"#))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Sign In - Oven Lovin'</title>
</head>
<body>
    <h1>Sign In</h1>
    <form method="post" action="/auth/login">
        {callback_param}
        <label>Email <input type="email" name="email" required></label>
        <label>Password <input type="password" name="password" required></label>
        <button type="submit">Sign in</button>
    </form>
    <p>No account yet? Sign up with the same form via <code>/auth/signup</code>.</p>
</body>
</html>"#
    ))
    .into_response()
}

/// Handler for GET /profile - protected page.
///
/// Unauthenticated visitors are redirected to sign-in with a callback URL.
pub async fn profile_page(OptionalUser(user): OptionalUser) -> Response {
    let Some(user) = user else {
        return redirect_to_signin("/profile");
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>My Profile - Oven Lovin'</title>
</head>
<body>
    <h1>Aloha, {name}!</h1>
    <p>Your recipes and favorites load from <code>/api/profile</code>.</p>
</body>
</html>"#,
        name = user.name,
    ))
    .into_response()
}

/// Handler for GET /admin - admin-only page.
///
/// Unauthenticated visitors are sent to sign-in; authenticated non-admins
/// are sent to the not-authorized page.
pub async fn admin_page(OptionalUser(user): OptionalUser) -> Response {
    let Some(user) = user else {
        return redirect_to_signin("/admin");
    };

    if !user.role.is_admin() {
        tracing::warn!(user_id = %user.id, role = %user.role, "Admin page denied");
        return Redirect::to("/not-authorized").into_response();
    }

    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Admin - Oven Lovin'</title>
</head>
<body>
    <h1>Admin Dashboard</h1>
    <p>Users, recipes, and vendors load from <code>/api/admin/stats</code>.</p>
</body>
</html>"#
            .to_string(),
    )
    .into_response()
}

/// Handler for GET /not-authorized.
pub async fn not_authorized() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Not Authorized - Oven Lovin'</title>
</head>
<body>
    <h1>Not Authorized</h1>
    <p>Your account does not have access to this page.</p>
    <a href="/">Back to the kitchen</a>
</body>
</html>"#,
    )
}
