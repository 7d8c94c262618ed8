use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use ovenlovin_auth::auth_routes;

use crate::{
    blob::processing::MAX_FILE_SIZE,
    handlers::{
        admin, favorites, health, ingredients, pages, profile, recipes, reviews, uploads, vendors,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // API routes with CORS
    let api_routes = Router::new()
        // Recipe routes
        .route(
            "/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/recipes/{id}",
            get(recipes::get_recipe)
                .patch(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route(
            "/recipes/{id}/ingredient-matches",
            get(recipes::ingredient_matches),
        )
        // Review routes
        .route(
            "/recipes/{id}/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route("/reviews/{id}", delete(reviews::delete_review))
        .route("/reviews/bulk-delete", post(reviews::bulk_delete_reviews))
        // Favorite routes
        .route("/recipes/{id}/favorite", put(favorites::toggle_favorite))
        // Profile routes
        .route(
            "/profile",
            get(profile::get_profile).patch(profile::update_profile),
        )
        // Vendor and ingredient routes
        .route("/vendors", get(vendors::list_vendors))
        .route("/vendors/me", get(vendors::vendor_home))
        .route(
            "/vendors/{id}",
            patch(vendors::update_vendor).delete(vendors::delete_vendor),
        )
        .route("/ingredients", post(ingredients::create_ingredient))
        .route(
            "/ingredients/{id}",
            patch(ingredients::update_ingredient).delete(ingredients::delete_ingredient),
        )
        // Admin routes
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}", delete(admin::delete_user))
        .route("/admin/users/{id}/role", patch(admin::update_user_role))
        .route("/admin/stats", get(admin::admin_stats))
        // Upload routes
        .route("/upload", post(uploads::upload_image))
        .route("/upload/{id}", delete(uploads::delete_image))
        .route("/uploads", get(uploads::list_images))
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024))
        .layer(cors);

    // Main application router
    Router::new()
        .route("/", get(pages::index))
        .route("/signin", get(pages::signin))
        .route("/profile", get(pages::profile_page))
        .route("/admin", get(pages::admin_page))
        .route("/not-authorized", get(pages::not_authorized))
        .route("/livez", get(health::livez))
        .nest("/api", api_routes)
        .merge(auth_routes().with_state(state.auth.clone()))
        .nest_service("/uploads", ServeDir::new(&state.uploads_dir))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use ovenlovin_core::user::Role;

    async fn test_app() -> (Router, AppState) {
        let state = AppState::new_in_memory().await;
        (create_app(state.clone()), state)
    }

    async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Signs up a new account and returns its session cookie and user JSON.
    async fn signup(app: &Router, email: &str) -> (String, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/signup")
                    .header("Content-Type", "application/json")
                    .body(Body::from(format!(
                        r#"{{"email": "{email}", "password": "hunter2"}}"#
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let cookie = response
            .headers()
            .get("set-cookie")
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        let user = body_json(response).await;
        (cookie, user)
    }

    /// Creates a recipe as the given session and returns its id.
    async fn create_recipe(app: &Router, cookie: &str, body: &str) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/recipes")
                    .header("Content-Type", "application/json")
                    .header("Cookie", cookie)
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }

    /// Promotes a signed-up account to the given role, storage-side.
    async fn promote(state: &AppState, user: &serde_json::Value, role: Role) {
        let id = user["id"].as_str().unwrap().parse().unwrap();
        state.users.update_user_role(id, role).await.unwrap();
    }

    #[tokio::test]
    async fn livez_returns_ok() {
        let (app, _) = test_app().await;

        let response = app
            .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn index_renders_stats_and_counts_visits() {
        let (app, _) = test_app().await;

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();

        assert!(html.contains("Oven Lovin'"));
        assert!(html.contains("<strong>2</strong> visits"));
    }

    #[tokio::test]
    async fn unauthenticated_profile_page_redirects_to_signin() {
        let (app, _) = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert_eq!(location, "/signin?callback_url=%2Fprofile");
    }

    #[tokio::test]
    async fn admin_page_redirects_non_admins_to_not_authorized() {
        let (app, _) = test_app().await;
        let (cookie, _) = signup(&app, "john@foo.com").await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin")
                    .header("Cookie", &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert_eq!(location, "/not-authorized");
    }

    #[tokio::test]
    async fn signup_session_works_and_duplicate_conflicts() {
        let (app, _) = test_app().await;
        let (cookie, user) = signup(&app, "john@foo.com").await;
        assert_eq!(user["email"], "john@foo.com");
        assert!(user.get("password_hash").is_none());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .header("Cookie", &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["email"], "john@foo.com");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/signup")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"email": "john@foo.com", "password": "other"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn login_round_trip_and_non_revealing_failure() {
        let (app, _) = test_app().await;
        signup(&app, "john@foo.com").await;

        // Wrong password and unknown email produce the same response.
        for body in [
            r#"{"email": "john@foo.com", "password": "wrong"}"#,
            r#"{"email": "nobody@foo.com", "password": "hunter2"}"#,
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/auth/login")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let message = response.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(message.as_ref(), b"invalid email or password");
        }

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"email": "john@foo.com", "password": "hunter2"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get("set-cookie")
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .header("Cookie", &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn expired_session_is_unauthorized() {
        use chrono::{Duration, Utc};
        use ovenlovin_core::auth::{generate_session_id, Session};

        let (app, state) = test_app().await;
        let (_, user) = signup(&app, "john@foo.com").await;

        let session = Session {
            id: generate_session_id(),
            user_id: user["id"].as_str().unwrap().parse().unwrap(),
            created_at: Utc::now() - Duration::days(8),
            expires_at: Utc::now() - Duration::days(1),
        };
        state.auth.sessions.create_session(&session).await.unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .header("Authorization", format!("Bearer {}", session.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_recipe_requires_session_and_name() {
        let (app, _) = test_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/recipes")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"name": "The Grinch"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let (cookie, _) = signup(&app, "john@foo.com").await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/recipes")
                    .header("Content-Type", "application/json")
                    .header("Cookie", &cookie)
                    .body(Body::from(r#"{"ingredients": "Green Eggs, Ham"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_owner_mutations_are_forbidden() {
        let (app, _) = test_app().await;
        let (owner_cookie, _) = signup(&app, "owner@foo.com").await;
        let (other_cookie, _) = signup(&app, "other@foo.com").await;

        let id = create_recipe(&app, &owner_cookie, r#"{"name": "The Grinch"}"#).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/recipes/{id}"))
                    .header("Content-Type", "application/json")
                    .header("Cookie", &other_cookie)
                    .body(Body::from(r#"{"name": "Stolen"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/recipes/{id}"))
                    .header("Cookie", &other_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_can_delete_any_recipe() {
        let (app, state) = test_app().await;
        let (owner_cookie, _) = signup(&app, "owner@foo.com").await;
        let (admin_cookie, admin) = signup(&app, "admin@foo.com").await;
        promote(&state, &admin, Role::Admin).await;

        let id = create_recipe(&app, &owner_cookie, r#"{"name": "The Grinch"}"#).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/recipes/{id}"))
                    .header("Cookie", &admin_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn favorite_toggle_twice_restores_original_state() {
        let (app, _) = test_app().await;
        let (cookie, _) = signup(&app, "fan@foo.com").await;
        let id = create_recipe(&app, &cookie, r#"{"name": "Overnight Oats"}"#).await;

        let toggle = |cookie: String, id: String| {
            let app = app.clone();
            async move {
                let response = app
                    .oneshot(
                        Request::builder()
                            .method("PUT")
                            .uri(format!("/api/recipes/{id}/favorite"))
                            .header("Cookie", &cookie)
                            .body(Body::empty())
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                body_json(response).await["favorited"].as_bool().unwrap()
            }
        };

        assert!(toggle(cookie.clone(), id.clone()).await);
        assert!(!toggle(cookie.clone(), id.clone()).await);

        // Back to favorited, and the list reflects it.
        assert!(toggle(cookie.clone(), id.clone()).await);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/recipes")
                    .header("Cookie", &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let recipes = body_json(response).await;
        assert_eq!(recipes[0]["is_favorited"], true);
    }

    #[tokio::test]
    async fn search_matches_name_ingredients_and_tags() {
        let (app, _) = test_app().await;
        let (cookie, _) = signup(&app, "john@foo.com").await;
        create_recipe(
            &app,
            &cookie,
            r#"{"name": "The Grinch", "ingredients": "Green Eggs, Ham", "tags": "Holiday"}"#,
        )
        .await;
        create_recipe(
            &app,
            &cookie,
            r#"{"name": "Classic Margherita Pizza", "ingredients": "Dough, Mozzarella", "tags": "Italian"}"#,
        )
        .await;

        let search = |term: &'static str| {
            let app = app.clone();
            async move {
                let response = app
                    .oneshot(
                        Request::builder()
                            .uri(format!("/api/recipes?search={term}"))
                            .body(Body::empty())
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                body_json(response).await.as_array().unwrap().len()
            }
        };

        assert_eq!(search("grinch").await, 1);
        assert_eq!(search("GRINCH").await, 1);
        assert_eq!(search("mozzarella").await, 1);
        assert_eq!(search("holiday").await, 1);
        assert_eq!(search("sushi").await, 0);
        assert_eq!(search("").await, 2);
    }

    #[tokio::test]
    async fn ratings_average_from_reviews() {
        let (app, _) = test_app().await;
        let (cookie, _) = signup(&app, "john@foo.com").await;
        let id = create_recipe(&app, &cookie, r#"{"name": "Mug Cake"}"#).await;

        // No reviews yet: average reports 0.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/recipes/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["rating"]["average"], 0.0);

        // Reviews can be posted signed out.
        for rating in [5, 4, 3] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(format!("/api/recipes/{id}/reviews"))
                        .header("Content-Type", "application/json")
                        .body(Body::from(format!(r#"{{"rating": {rating}}}"#)))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            assert_eq!(body_json(response).await["reviewer"], "Anonymous");
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/recipes/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let detail = body_json(response).await;
        assert_eq!(detail["rating"]["average"], 4.0);
        assert_eq!(detail["rating"]["count"], 3);
    }

    #[tokio::test]
    async fn out_of_range_rating_is_rejected() {
        let (app, _) = test_app().await;
        let (cookie, _) = signup(&app, "john@foo.com").await;
        let id = create_recipe(&app, &cookie, r#"{"name": "Mug Cake"}"#).await;

        for rating in [0, 6] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(format!("/api/recipes/{id}/reviews"))
                        .header("Content-Type", "application/json")
                        .body(Body::from(format!(r#"{{"rating": {rating}}}"#)))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn anonymous_review_is_admin_delete_only() {
        let (app, state) = test_app().await;
        let (cookie, _) = signup(&app, "john@foo.com").await;
        let id = create_recipe(&app, &cookie, r#"{"name": "Mug Cake"}"#).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/recipes/{id}/reviews"))
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"rating": 1, "comment": "spam"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        let review_id = body_json(response).await["id"].as_str().unwrap().to_string();

        // A signed-in non-author cannot remove it.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/reviews/{review_id}"))
                    .header("Cookie", &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let (admin_cookie, admin) = signup(&app, "admin@foo.com").await;
        promote(&state, &admin, Role::Admin).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/reviews/{review_id}"))
                    .header("Cookie", &admin_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn admin_role_update_round_trip() {
        let (app, state) = test_app().await;
        let (user_cookie, user) = signup(&app, "john@foo.com").await;
        let (admin_cookie, admin) = signup(&app, "admin@foo.com").await;
        promote(&state, &admin, Role::Admin).await;

        let user_id = user["id"].as_str().unwrap();

        // Non-admins cannot touch roles.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/admin/users/{user_id}/role"))
                    .header("Content-Type", "application/json")
                    .header("Cookie", &user_cookie)
                    .body(Body::from(r#"{"role": "ADMIN"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Unknown role strings are rejected.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/admin/users/{user_id}/role"))
                    .header("Content-Type", "application/json")
                    .header("Cookie", &admin_cookie)
                    .body(Body::from(r#"{"role": "SUPERUSER"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/admin/users/{user_id}/role"))
                    .header("Content-Type", "application/json")
                    .header("Cookie", &admin_cookie)
                    .body(Body::from(r#"{"role": "VENDOR"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .header("Cookie", &user_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["role"], "VENDOR");
    }

    #[tokio::test]
    async fn vendor_rename_collision_conflicts() {
        use ovenlovin_core::pantry::Vendor;

        let (app, state) = test_app().await;
        let (cookie, user) = signup(&app, "foodmart@foo.com").await;
        promote(&state, &user, Role::Vendor).await;
        let (_, other) = signup(&app, "kta@foo.com").await;
        promote(&state, &other, Role::Vendor).await;

        let mine = Vendor::new("foodmart@foo.com", "Foodmart", "123 Main St", "9-5");
        let theirs = Vendor::new("kta@foo.com", "KTA Super Stores", "456 Side St", "8-8");
        state.vendors.create_vendor(&mine).await.unwrap();
        state.vendors.create_vendor(&theirs).await.unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/vendors/{}", mine.id))
                    .header("Content-Type", "application/json")
                    .header("Cookie", &cookie)
                    .body(Body::from(r#"{"name": "KTA Super Stores"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Keeping your own name is not a collision.
        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/vendors/{}", mine.id))
                    .header("Content-Type", "application/json")
                    .header("Cookie", &cookie)
                    .body(Body::from(r#"{"name": "Foodmart", "hours": "24/7"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["hours"], "24/7");
    }

    #[tokio::test]
    async fn vendor_home_lists_own_ingredients() {
        use ovenlovin_core::pantry::Vendor;

        let (app, state) = test_app().await;
        let (cookie, user) = signup(&app, "foodmart@foo.com").await;
        promote(&state, &user, Role::Vendor).await;
        let vendor = Vendor::new("foodmart@foo.com", "Foodmart", "123 Main St", "9-5");
        state.vendors.create_vendor(&vendor).await.unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ingredients")
                    .header("Content-Type", "application/json")
                    .header("Cookie", &cookie)
                    .body(Body::from(
                        r#"{"name": "Mozzarella", "price": 4.5, "size": "8 oz"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/vendors/me")
                    .header("Cookie", &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let home = body_json(response).await;
        assert_eq!(home["name"], "Foodmart");
        assert_eq!(home["ingredients"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ingredient_matches_cross_reference_vendor_listings() {
        use ovenlovin_core::pantry::Vendor;

        let (app, state) = test_app().await;
        let (cookie, user) = signup(&app, "foodmart@foo.com").await;
        promote(&state, &user, Role::Vendor).await;
        let vendor = Vendor::new("foodmart@foo.com", "Foodmart", "123 Main St", "9-5");
        state.vendors.create_vendor(&vendor).await.unwrap();

        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ingredients")
                    .header("Content-Type", "application/json")
                    .header("Cookie", &cookie)
                    .body(Body::from(
                        r#"{"name": "Ramen Noodles", "price": 1.0, "size": "1 pack"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        let id = create_recipe(
            &app,
            &cookie,
            r#"{"name": "Dorm Ramen", "ingredients": "2 cups water\n1 package any flavor ramen noodles"}"#,
        )
        .await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/recipes/{id}/ingredient-matches"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let matches = body_json(response).await;
        assert_eq!(matches.as_array().unwrap().len(), 2);
        assert!(matches[0]["matches"].as_array().unwrap().is_empty());
        assert_eq!(matches[1]["matches"][0]["vendor_name"], "Foodmart");
    }

    fn multipart_body(boundary: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"upload.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        body
    }

    async fn post_upload(app: &Router, cookie: &str, bytes: &[u8]) -> Response<Body> {
        let boundary = "ovenlovin-test-boundary";
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/upload")
                    .header(
                        "Content-Type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .header("Cookie", cookie)
                    .body(Body::from(multipart_body(boundary, bytes)))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn upload_rejects_non_image_bytes() {
        let (app, _) = test_app().await;
        let (cookie, _) = signup(&app, "john@foo.com").await;

        let response = post_upload(&app, &cookie, b"definitely not an image").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_rejects_oversized_file() {
        let (app, _) = test_app().await;
        let (cookie, _) = signup(&app, "john@foo.com").await;

        let oversized = vec![0u8; MAX_FILE_SIZE + 1];
        let response = post_upload(&app, &cookie, &oversized).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_round_trip_stores_webp_and_owner_can_delete() {
        use image::{DynamicImage, ImageFormat};

        let (app, _) = test_app().await;
        let (cookie, _) = signup(&app, "john@foo.com").await;
        let (other_cookie, _) = signup(&app, "other@foo.com").await;

        let img = image::RgbaImage::from_pixel(16, 16, image::Rgba([200, 60, 20, 255]));
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let response = post_upload(&app, &cookie, &png).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let uploaded = body_json(response).await;
        let url = uploaded["url"].as_str().unwrap();
        let image_id = uploaded["id"].as_str().unwrap().to_string();
        assert!(url.starts_with("/uploads/recipes/"));
        assert!(url.ends_with(".webp"));

        // The stored blob is served by the static file layer.
        let response = app
            .clone()
            .oneshot(Request::builder().uri(url).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Only the uploader may delete it.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/upload/{image_id}"))
                    .header("Cookie", &other_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/upload/{image_id}"))
                    .header("Cookie", &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn profile_reports_contributed_and_favorited_recipes() {
        let (app, _) = test_app().await;
        let (cookie, _) = signup(&app, "john@foo.com").await;
        let (other_cookie, _) = signup(&app, "emma@foo.com").await;

        create_recipe(&app, &cookie, r#"{"name": "Mug Cake"}"#).await;
        let favorite_id = create_recipe(&app, &other_cookie, r#"{"name": "Overnight Oats"}"#).await;

        app.clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/recipes/{favorite_id}/favorite"))
                    .header("Cookie", &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/profile")
                    .header("Cookie", &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let profile = body_json(response).await;
        assert_eq!(profile["user"]["email"], "john@foo.com");
        assert_eq!(profile["recipes"].as_array().unwrap().len(), 1);
        assert_eq!(profile["favorites"].as_array().unwrap().len(), 1);
        assert_eq!(profile["favorites"][0]["name"], "Overnight Oats");
    }

    #[tokio::test]
    async fn profile_email_collision_conflicts() {
        let (app, _) = test_app().await;
        let (cookie, _) = signup(&app, "john@foo.com").await;
        signup(&app, "emma@foo.com").await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/profile")
                    .header("Content-Type", "application/json")
                    .header("Cookie", &cookie)
                    .body(Body::from(r#"{"email": "emma@foo.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
