pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::files::handlers as files;
use crate::profile::handlers as profile;
use crate::render::handlers as render;
use crate::state::AppState;
use crate::tailor::handlers as tailor;
use crate::wizard::handlers as wizard;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile
        .route(
            "/resume/profile",
            get(profile::handle_get_profile).post(profile::handle_upsert_profile),
        )
        .route("/resume/wizard/advance", post(wizard::handle_advance))
        .route("/resume/wizard/submit", post(wizard::handle_submit))
        // Rendering
        .route("/resume/templates", get(render::handle_list_templates))
        .route("/resume/render", post(render::handle_render))
        .route("/resume/tailor", post(tailor::handle_tailor))
        // Generated files
        .route("/resume/files", get(files::handle_list_files))
        .route(
            "/resume/files/:file_name",
            delete(files::handle_delete_file),
        )
        .route(
            "/static/:user_dir/:file_name",
            get(files::handle_static_file),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::files::FileRegistry;
    use crate::render::{PdfRenderer, RenderError, TemplateRenderer};
    use crate::tailor::{Tailor, TailorError};

    struct NoopPdf;

    #[async_trait]
    impl PdfRenderer for NoopPdf {
        async fn render_pdf(&self, _html: String, out_path: &Path) -> Result<(), RenderError> {
            tokio::fs::write(out_path, b"%PDF-1.4").await?;
            Ok(())
        }
    }

    struct UppercaseTailor;

    #[async_trait]
    impl Tailor for UppercaseTailor {
        async fn tailor(
            &self,
            resume_text: &str,
            job_description: &str,
        ) -> Result<String, TailorError> {
            Ok(format!("{} / {}", resume_text.to_uppercase(), job_description))
        }
    }

    fn test_config(generated_dir: PathBuf) -> Config {
        Config {
            database_url: "postgres://localhost/unused".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            public_app_url: "http://localhost:3000".to_string(),
            generated_dir,
            templates_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates"),
            chrome_path: None,
            tailor_command: None,
            tailor_url: None,
        }
    }

    /// Router over a lazily-connected pool; only routes that never touch the database are exercised.
    fn app(dir: &TempDir, tailor: Option<Arc<dyn Tailor>>) -> Router {
        let config = test_config(dir.path().to_path_buf());
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let state = AppState {
            templates: Arc::new(TemplateRenderer::new(config.templates_dir.clone())),
            pdf: Arc::new(NoopPdf),
            registry: Arc::new(FileRegistry::new(
                config.generated_dir.clone(),
                &config.public_app_url,
            )),
            tailor,
            db,
        };
        build_router(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_as(uri: &str, email: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(email) = email {
            builder = builder.header("x-user-email", email);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn delete_as(uri: &str, email: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("DELETE").uri(uri);
        if let Some(email) = email {
            builder = builder.header("x-user-email", email);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir, None)
            .oneshot(get_as("/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["service"], "resume-api");
    }

    #[tokio::test]
    async fn test_templates_catalog() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir, None)
            .oneshot(get_as("/resume/templates", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!([{"id": "simple-ats", "name": "Simple ATS (A4)"}])
        );
    }

    #[tokio::test]
    async fn test_files_empty_without_user_directory() {
        let dir = TempDir::new().unwrap();
        let expected = json!({"resumes": [], "coverLetters": []});

        let response = app(&dir, None)
            .oneshot(get_as("/resume/files", Some("nobody@example.com")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, expected);

        let response = app(&dir, None)
            .oneshot(get_as("/resume/files", None))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, expected);
    }

    #[tokio::test]
    async fn test_list_then_delete_twice() {
        let dir = TempDir::new().unwrap();
        let user_dir = dir.path().join("ada@example.com");
        std::fs::create_dir_all(&user_dir).unwrap();
        std::fs::write(user_dir.join("resume-simple-ats-v7.pdf"), b"%PDF").unwrap();
        std::fs::write(user_dir.join("notes.txt"), b"ignored").unwrap();

        let response = app(&dir, None)
            .oneshot(get_as("/resume/files", Some("ada@example.com")))
            .await
            .unwrap();
        let listing = body_json(response).await;
        assert_eq!(listing["resumes"].as_array().unwrap().len(), 1);
        assert_eq!(listing["resumes"][0]["fileName"], "resume-simple-ats-v7.pdf");
        assert_eq!(
            listing["resumes"][0]["url"],
            "http://localhost:3000/static/ada@example.com/resume-simple-ats-v7.pdf"
        );

        for _ in 0..2 {
            let response = app(&dir, None)
                .oneshot(delete_as(
                    "/resume/files/resume-simple-ats-v7.pdf",
                    Some("ada@example.com"),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await, json!({"ok": true}));
        }
        assert!(!user_dir.join("resume-simple-ats-v7.pdf").exists());
    }

    #[tokio::test]
    async fn test_delete_without_identity_or_with_bad_name() {
        let dir = TempDir::new().unwrap();

        let response = app(&dir, None)
            .oneshot(delete_as("/resume/files/resume-simple-ats-v1.pdf", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"ok": false}));

        let response = app(&dir, None)
            .oneshot(delete_as("/resume/files/notes.txt", Some("ada@example.com")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_static_file_headers() {
        let dir = TempDir::new().unwrap();
        let user_dir = dir.path().join("ada@example.com");
        std::fs::create_dir_all(&user_dir).unwrap();
        std::fs::write(user_dir.join("resume-simple-ats-v1.docx"), b"PK").unwrap();

        let response = app(&dir, None)
            .oneshot(get_as(
                "/static/ada@example.com/resume-simple-ats-v1.docx",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=3600");

        let response = app(&dir, None)
            .oneshot(get_as("/static/ada@example.com/cover-simple-ats-v2.pdf", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tailor_unconfigured_is_not_implemented() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir, None)
            .oneshot(post_json(
                "/resume/tailor",
                json!({"resumeText": "r", "jobDescription": "j"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_tailor_delegates_to_backend() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir, Some(Arc::new(UppercaseTailor)))
            .oneshot(post_json(
                "/resume/tailor",
                json!({"resumeText": "rust dev", "jobDescription": "Backend"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"tailoredResume": "RUST DEV / Backend"})
        );

        let response = app(&dir, Some(Arc::new(UppercaseTailor)))
            .oneshot(post_json(
                "/resume/tailor",
                json!({"resumeText": "rust dev", "jobDescription": "  "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wizard_advance_round_trip() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir, None)
            .oneshot(post_json(
                "/resume/wizard/advance",
                json!({"input": {"type": "skills", "data": {"items": ["Rust"]}}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let state = body_json(response).await;
        assert_eq!(state["step"], "review");
        assert_eq!(state["form"]["skills"]["items"], json!(["Rust"]));

        let response = app(&dir, None)
            .oneshot(post_json(
                "/resume/wizard/advance",
                json!({"input": {"type": "basics", "data": {"fullName": "", "email": "nope"}}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
