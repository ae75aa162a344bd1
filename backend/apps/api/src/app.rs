//! Router composition
//!
//! Activation routes under `/api/activation`; generation routes under
//! `/api`. Script generation spends one activation use, image generation
//! only requires an activation with uses left.

use activation::{
    ActivationAppState, KeyValueStore, activation_router, consume_activation, require_activation,
};
use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware::from_fn_with_state;
use comic::{ComicAppState, ImageGenerator, ScriptGenerator, image_router, script_router};
use kernel::clock::Clock;
use platform::client::{COLOR_DEPTH_HEADER, SCREEN_HEADER, TIMEZONE_OFFSET_HEADER};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer, ExposeHeaders};
use tower_http::trace::TraceLayer;

pub fn build_router<S, C, G>(
    activation: ActivationAppState<S, C>,
    comic: ComicAppState<G>,
) -> Router
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
    G: ScriptGenerator + ImageGenerator + Sync + 'static,
{
    let scripts = script_router(comic.clone()).route_layer(from_fn_with_state(
        activation.clone(),
        consume_activation::<S, C>,
    ));
    let images = image_router(comic).route_layer(from_fn_with_state(
        activation.clone(),
        require_activation::<S, C>,
    ));

    Router::new()
        .nest("/api/activation", activation_router(activation))
        .nest("/api", scripts.merge(images))
        .layer(TraceLayer::new_for_http())
}

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(SCREEN_HEADER),
            HeaderName::from_static(COLOR_DEPTH_HEADER),
            HeaderName::from_static(TIMEZONE_OFFSET_HEADER),
        ]))
        .expose_headers(ExposeHeaders::list([HeaderName::from_static(
            activation::error::ACTIVATION_REQUIRED_HEADER,
        )]))
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use activation::{ActivationConfig, MemoryStore};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use comic::{ComicConfig, ComicResult, ImageJob, ScriptPrompt};
    use http_body_util::BodyExt;
    use kernel::clock::SystemClock;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct CannedGenerator;

    impl ScriptGenerator for CannedGenerator {
        async fn complete(&self, _model: &str, _prompt: &ScriptPrompt) -> ComicResult<String> {
            Ok("Scene 1: one\nScene 2: two\nScene 3: three\nScene 4: four".to_string())
        }
    }

    impl ImageGenerator for CannedGenerator {
        async fn render(&self, job: &ImageJob) -> ComicResult<Vec<String>> {
            Ok((0..job.count).map(|i| format!("https://img/{i}.png")).collect())
        }
    }

    fn app() -> Router {
        let activation = ActivationAppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(SystemClock),
            ActivationConfig::development(),
        );
        let comic = ComicAppState::new(CannedGenerator, ComicConfig::default());
        build_router(activation, comic)
    }

    fn request(method: &str, uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::USER_AGENT, "Mozilla/5.0")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn remaining(app: &Router, cookie: &str) -> u64 {
        let response = app
            .clone()
            .oneshot(request("GET", "/api/activation/status", Some(cookie), ""))
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["remainingUses"].as_u64().unwrap()
    }

    #[tokio::test]
    async fn test_generation_requires_activation() {
        let app = app();
        for (uri, body) in [
            ("/api/generate-script", r#"{"content":"x","model":"m"}"#),
            ("/api/generate-images", r#"{"script":"x","style":"manga"}"#),
        ] {
            let response = app
                .clone()
                .oneshot(request("POST", uri, None, body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            assert_eq!(response.headers()["x-activation-required"], "true");
        }
    }

    #[tokio::test]
    async fn test_script_spends_a_use_and_images_do_not() {
        let app = app();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/activation/activate",
                None,
                r#"{"code":"DEMO-2024-FREE"}"#,
            ))
            .await
            .unwrap();
        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        assert_eq!(remaining(&app, &cookie).await, 5);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/generate-script",
                Some(&cookie),
                r#"{"content":"An article","model":"m"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(remaining(&app, &cookie).await, 4);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/generate-images",
                Some(&cookie),
                r#"{"script":"one","style":"manga","imageCount":2}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(remaining(&app, &cookie).await, 4);

        // Rejected requests are free
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/generate-script",
                Some(&cookie),
                r#"{"content":"","model":"m"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(remaining(&app, &cookie).await, 4);
    }
}
