//! Activation Router

use crate::domain::repository::KeyValueStore;
use crate::presentation::handlers::{self, ActivationAppState};
use axum::{
    Router,
    routing::{get, post},
};
use kernel::clock::Clock;

/// Create the activation router for any store and clock
pub fn activation_router<S, C>(state: ActivationAppState<S, C>) -> Router
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
{
    Router::new()
        .route("/activate", post(handlers::activate::<S, C>))
        .route("/status", get(handlers::status::<S, C>))
        .route("/use", post(handlers::use_once::<S, C>))
        .route("/clear", post(handlers::clear::<S, C>))
        .with_state(state)
}
