//! In-memory stand-in for the postup quest service.
//!
//! Serves the API under `/api/beta` behind the same bearer-token check as
//! the real service, and the refresh-token grant at `/token`. `MockState`
//! exposes hooks for tests to expire or revoke tokens and to count how many
//! refreshes and API requests the server saw.

mod auth;
mod habits;
pub mod models;
mod quests;
mod reply;
mod state;

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

pub use models::{Checkbox, Daily, Player, Quest, Regular};
pub use state::{IssuedTokens, MockState};

pub const API_PREFIX: &str = "/api/beta";

/// Router over a fresh state.
pub fn app() -> Router {
    router(MockState::new())
}

pub fn router(state: MockState) -> Router {
    let api = Router::new()
        .route("/quests", get(quests::list).post(quests::create))
        .route("/quests/active", get(quests::list_active))
        .route("/quests/daily", get(quests::list_daily))
        .route(
            "/quests/{id}",
            get(quests::get_one)
                .patch(quests::update)
                .delete(quests::remove),
        )
        .route("/quests/{id}/complete", post(quests::complete))
        .route(
            "/quests/{id}/checkboxes",
            get(quests::checkboxes).put(quests::replace_checkboxes),
        )
        .route(
            "/quests/{id}/checkboxes/{index}",
            get(quests::checkbox).patch(quests::update_checkbox),
        )
        .route(
            "/dailies",
            get(habits::list_dailies).post(habits::create_daily),
        )
        .route(
            "/dailies/{id}",
            get(habits::get_daily)
                .patch(habits::update_daily)
                .delete(habits::remove_daily),
        )
        .route(
            "/regulars",
            get(habits::list_regulars).post(habits::create_regular),
        )
        .route(
            "/regulars/{id}",
            get(habits::get_regular)
                .patch(habits::update_regular)
                .delete(habits::remove_regular),
        )
        .route("/player", get(player))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .nest(API_PREFIX, api)
        .route("/token", post(auth::token))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, MockState::new()).await
}

pub async fn serve(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}

async fn player(State(state): State<MockState>) -> reply::Reply {
    let db = state.db().read().await;
    reply::ok(&db.player)
}
