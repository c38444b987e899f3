//! Route definitions for the admin API.

pub mod auth;
pub mod board;
pub mod customers;
pub mod driver;
pub mod ingredients;
pub mod orders;
pub mod pizzas;
pub mod stats;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::rate_limit::auth_rate_limiter;
use crate::state::AppState;

/// Build the admin router.
///
/// Everything except login/logout requires a staff session (enforced by the
/// `RequireStaff` extractor in each handler). The login endpoint is rate
/// limited against password guessing.
pub fn routes() -> Router<AppState> {
    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/api/board", get(board::show))
        .route("/api/orders", post(orders::create))
        .route("/api/orders/{id}", get(orders::get).put(orders::update))
        .route("/api/orders/{id}/status", put(orders::update_status))
        .route("/api/customers", get(customers::list).post(customers::create))
        .route("/api/customers/search", get(customers::search))
        .route(
            "/api/customers/{id}",
            get(customers::details)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/api/pizzas", get(pizzas::list).post(pizzas::create))
        .route("/api/pizzas/{id}", put(pizzas::update).delete(pizzas::delete))
        .route(
            "/api/ingredients",
            get(ingredients::list).post(ingredients::create),
        )
        .route(
            "/api/ingredients/{id}",
            put(ingredients::update).delete(ingredients::delete),
        )
        .route("/api/stats", get(stats::show))
        .route("/api/driver/orders", get(driver::list))
        .route("/api/driver/orders/{id}/location", post(driver::post_location))
        .merge(auth_routes)
}
