//! Comic Router
//!
//! Script and image routes are built separately so the server can put
//! different activation middleware in front of each.

use crate::domain::gateway::{ImageGenerator, ScriptGenerator};
use crate::presentation::handlers::{self, ComicAppState};
use axum::{Router, routing::post};

pub fn script_router<G>(state: ComicAppState<G>) -> Router
where
    G: ScriptGenerator + ImageGenerator + Sync + 'static,
{
    Router::new()
        .route("/generate-script", post(handlers::generate_script::<G>))
        .with_state(state)
}

pub fn image_router<G>(state: ComicAppState<G>) -> Router
where
    G: ScriptGenerator + ImageGenerator + Sync + 'static,
{
    Router::new()
        .route("/generate-images", post(handlers::generate_images::<G>))
        .with_state(state)
}

/// Both routes, without any gating
pub fn comic_router<G>(state: ComicAppState<G>) -> Router
where
    G: ScriptGenerator + ImageGenerator + Sync + 'static,
{
    script_router(state.clone()).merge(image_router(state))
}
