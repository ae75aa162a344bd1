//! Unit tests for the comic crate

#[cfg(test)]
mod fakes {
    use crate::domain::gateway::{ImageGenerator, ImageJob, ScriptGenerator};
    use crate::domain::services::ScriptPrompt;
    use crate::error::{ComicError, ComicResult};
    use std::sync::Mutex;

    /// Canned upstream that records what it was asked
    #[derive(Default)]
    pub struct FakeGenerator {
        pub answer: String,
        pub urls: Vec<String>,
        pub fail: bool,
        pub prompts: Mutex<Vec<(String, ScriptPrompt)>>,
        pub jobs: Mutex<Vec<ImageJob>>,
    }

    impl FakeGenerator {
        pub fn answering(answer: &str) -> Self {
            Self {
                answer: answer.to_string(),
                ..Self::default()
            }
        }

        pub fn rendering(urls: &[&str]) -> Self {
            Self {
                urls: urls.iter().map(|u| u.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    impl ScriptGenerator for FakeGenerator {
        async fn complete(&self, model: &str, prompt: &ScriptPrompt) -> ComicResult<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.clone()));
            if self.fail {
                return Err(ComicError::Upstream("503 from fake".into()));
            }
            Ok(self.answer.clone())
        }
    }

    impl ImageGenerator for FakeGenerator {
        async fn render(&self, job: &ImageJob) -> ComicResult<Vec<String>> {
            self.jobs.lock().unwrap().push(job.clone());
            if self.fail {
                return Err(ComicError::UpstreamTimeout);
            }
            Ok(self.urls.clone())
        }
    }
}

#[cfg(test)]
mod script_tests {
    use super::fakes::FakeGenerator;
    use crate::application::config::ComicConfig;
    use crate::application::generate_script::{GenerateScriptInput, GenerateScriptUseCase};
    use crate::error::ComicError;
    use std::sync::Arc;

    const ANSWER: &str = "Scene 1: A\nScene 2: B\nScene 3: C\nScene 4: D\nScene 5: E";

    fn input(count: Option<u32>, scene_number: Option<u32>) -> GenerateScriptInput {
        GenerateScriptInput {
            content: "A long article about rivers.".into(),
            count,
            scene_number,
            model: "gpt-4o-mini".into(),
        }
    }

    fn use_case(generator: FakeGenerator) -> (Arc<FakeGenerator>, GenerateScriptUseCase<FakeGenerator>) {
        let generator = Arc::new(generator);
        let use_case =
            GenerateScriptUseCase::new(generator.clone(), Arc::new(ComicConfig::default()));
        (generator, use_case)
    }

    #[tokio::test]
    async fn test_default_count_is_four() {
        let (generator, use_case) = use_case(FakeGenerator::answering(ANSWER));
        let panels = use_case.execute(input(None, None)).await.unwrap();

        assert_eq!(panels.len(), 4);
        let numbers: Vec<u32> = panels.iter().map(|p| p.scene_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(panels[3].content, "D");
        assert!(panels.iter().all(|p| p.image_url.is_empty()));
        assert_ne!(panels[0].id, panels[1].id);

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts[0].0, "gpt-4o-mini");
        assert!(prompts[0].1.system.contains("exactly 4 scenes"));
    }

    #[tokio::test]
    async fn test_single_scene_regeneration() {
        let (_, use_case) = use_case(FakeGenerator::answering("Scene 3: A new take"));
        let panels = use_case.execute(input(Some(6), Some(3))).await.unwrap();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].scene_number, 3);
        assert_eq!(panels[0].content, "A new take");
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let cases = vec![
            GenerateScriptInput {
                content: "   ".into(),
                ..input(None, None)
            },
            GenerateScriptInput {
                model: "".into(),
                ..input(None, None)
            },
            input(Some(0), None),
            input(Some(13), None),
            input(Some(4), Some(5)),
            input(None, Some(0)),
        ];

        for case in cases {
            let (generator, use_case) = use_case(FakeGenerator::answering(ANSWER));
            let err = use_case.execute(case).await.unwrap_err();
            assert!(matches!(err, ComicError::Validation(_)), "{err:?}");
            // Nothing reaches the upstream
            assert!(generator.prompts.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_content_too_long() {
        let (_, use_case) = use_case(FakeGenerator::answering(ANSWER));
        let err = use_case
            .execute(GenerateScriptInput {
                content: "x".repeat(20_001),
                ..input(None, None)
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ComicError::Validation(_)));
    }

    #[tokio::test]
    async fn test_empty_answer_is_upstream_error() {
        let (_, use_case) = use_case(FakeGenerator::answering("  \n "));
        let err = use_case.execute(input(None, None)).await.unwrap_err();
        assert!(matches!(err, ComicError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let (_, use_case) = use_case(FakeGenerator::failing());
        let err = use_case.execute(input(None, None)).await.unwrap_err();
        assert!(matches!(err, ComicError::Upstream(_)));
    }
}

#[cfg(test)]
mod image_tests {
    use super::fakes::FakeGenerator;
    use crate::application::config::ComicConfig;
    use crate::application::generate_images::{GenerateImagesInput, GenerateImagesUseCase};
    use crate::domain::value_objects::ArtStyle;
    use crate::error::ComicError;
    use std::sync::Arc;

    fn input(style: &str) -> GenerateImagesInput {
        GenerateImagesInput {
            script: "A lighthouse in a storm".into(),
            style: style.into(),
            aspect_ratio: None,
            image_count: None,
            negative_prompt: None,
        }
    }

    fn use_case(generator: FakeGenerator) -> (Arc<FakeGenerator>, GenerateImagesUseCase<FakeGenerator>) {
        let generator = Arc::new(generator);
        let use_case =
            GenerateImagesUseCase::new(generator.clone(), Arc::new(ComicConfig::default()));
        (generator, use_case)
    }

    #[tokio::test]
    async fn test_defaults() {
        let (generator, use_case) = use_case(FakeGenerator::rendering(&["https://img/0.png"]));
        let images = use_case.execute(input("manga")).await.unwrap();

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url, "https://img/0.png");
        assert_eq!(images[0].index, 0);

        let jobs = generator.jobs.lock().unwrap();
        assert_eq!(jobs[0].size, "1024x1024");
        assert_eq!(jobs[0].count, 1);
        assert!(jobs[0].prompt.starts_with(ArtStyle::Manga.preset()));
        assert!(jobs[0].prompt.contains("A lighthouse in a storm"));
    }

    #[tokio::test]
    async fn test_render_params() {
        let (generator, use_case) =
            use_case(FakeGenerator::rendering(&["a", "b", "c"]));
        let images = use_case
            .execute(GenerateImagesInput {
                aspect_ratio: Some("9:16".into()),
                image_count: Some(2),
                negative_prompt: Some("text".into()),
                ..input("Watercolor")
            })
            .await
            .unwrap();

        // Extra images from the upstream are dropped
        assert_eq!(images.len(), 2);
        assert_eq!(images[1].index, 1);

        let jobs = generator.jobs.lock().unwrap();
        assert_eq!(jobs[0].size, "768x1344");
        assert_eq!(jobs[0].count, 2);
        assert!(jobs[0].prompt.ends_with("Avoid: text."));
    }

    #[tokio::test]
    async fn test_unknown_style() {
        let (_, use_case) = use_case(FakeGenerator::rendering(&["a"]));
        let err = use_case.execute(input("cubism")).await.unwrap_err();
        assert!(matches!(err, ComicError::UnknownStyle(ref s) if s == "cubism"));
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let cases = vec![
            GenerateImagesInput {
                script: " ".into(),
                ..input("manga")
            },
            GenerateImagesInput {
                aspect_ratio: Some("2:1".into()),
                ..input("manga")
            },
            GenerateImagesInput {
                image_count: Some(0),
                ..input("manga")
            },
            GenerateImagesInput {
                image_count: Some(5),
                ..input("manga")
            },
        ];
        for case in cases {
            let (generator, use_case) = use_case(FakeGenerator::rendering(&["a"]));
            let err = use_case.execute(case).await.unwrap_err();
            assert!(matches!(err, ComicError::Validation(_)), "{err:?}");
            assert!(generator.jobs.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_no_images_is_upstream_error() {
        let (_, use_case) = use_case(FakeGenerator::rendering(&[]));
        let err = use_case.execute(input("pixel")).await.unwrap_err();
        assert!(matches!(err, ComicError::Upstream(_)));
    }
}

#[cfg(test)]
mod http_tests {
    use super::fakes::FakeGenerator;
    use crate::application::config::ComicConfig;
    use crate::presentation::handlers::ComicAppState;
    use crate::presentation::router::comic_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn app(generator: FakeGenerator) -> axum::Router {
        comic_router(ComicAppState::new(generator, ComicConfig::default()))
    }

    #[tokio::test]
    async fn test_script_route() {
        let app = app(FakeGenerator::answering("Scene 1: Dawn\nScene 2: Dusk"));
        let response = app
            .oneshot(post(
                "/generate-script",
                r#"{"content":"Article","count":2,"model":"m"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        let panels = body["comicPanels"].as_array().unwrap();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0]["content"], "Dawn");
        assert_eq!(panels[0]["imageUrl"], "");
        assert_eq!(panels[1]["sceneNumber"], 2);
        assert_eq!(panels[0]["id"].as_str().unwrap().len(), 36);
    }

    #[tokio::test]
    async fn test_image_route() {
        let app = app(FakeGenerator::rendering(&["https://img/a.png"]));
        let response = app
            .oneshot(post(
                "/generate-images",
                r#"{"script":"A cat","style":"american","aspectRatio":"4:3"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["images"][0]["url"], "https://img/a.png");
        assert_eq!(body["images"][0]["index"], 0);
    }

    #[tokio::test]
    async fn test_errors_use_error_body() {
        let cases = [
            ("/generate-script", r#"{"content":"","model":"m"}"#, StatusCode::BAD_REQUEST),
            ("/generate-script", r#"{"content":"x"}"#, StatusCode::BAD_REQUEST),
            ("/generate-script", "not json", StatusCode::BAD_REQUEST),
            ("/generate-images", r#"{"script":"x","style":"oil"}"#, StatusCode::BAD_REQUEST),
        ];
        for (uri, body, status) in cases {
            let response = app(FakeGenerator::answering("Scene 1: x"))
                .oneshot(post(uri, body))
                .await
                .unwrap();
            assert_eq!(response.status(), status, "{uri} {body}");
            assert!(json(response).await["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_is_generic() {
        let response = app(FakeGenerator::failing())
            .oneshot(post("/generate-script", r#"{"content":"x","model":"m"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json(response).await;
        assert!(!body["error"].as_str().unwrap().contains("fake"));

        let response = app(FakeGenerator::failing())
            .oneshot(post("/generate-images", r#"{"script":"x","style":"pixel"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::{app_error::AppError, kind::ErrorKind};

    #[test]
    fn test_error_status_codes() {
        let test_cases: Vec<(ComicError, StatusCode)> = vec![
            (ComicError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ComicError::UnknownStyle("x".into()), StatusCode::BAD_REQUEST),
            (ComicError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (ComicError::UpstreamTimeout, StatusCode::GATEWAY_TIMEOUT),
            (
                ComicError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in test_cases {
            assert_eq!(error.status_code(), expected);
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_conversion_to_app_error_hides_detail() {
        let app: AppError = ComicError::Upstream("secret-host:8080 refused".into()).into();
        assert_eq!(app.kind(), ErrorKind::BadGateway);
        assert!(!app.message().contains("secret-host"));

        let app: AppError = ComicError::Validation("Model must not be empty".into()).into();
        assert_eq!(app.message(), "Model must not be empty");
    }
}
