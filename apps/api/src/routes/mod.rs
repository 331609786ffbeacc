pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method, Uri},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::crs::{feedback, handlers as crs};
use crate::errors::AppError;
use crate::recruiting::handlers as recruiting;
use crate::resumes::{self, MAX_UPLOAD_BYTES};
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    let not_allowed = crs::handle_method_not_allowed;

    Router::new()
        .route("/health", get(health::health_handler).fallback(not_allowed))
        // CRS Tool
        .route(
            "/api/score",
            post(crs::handle_score)
                .options(crs::handle_preflight)
                .fallback(not_allowed),
        )
        .route(
            "/api/score/feedback",
            post(feedback::handle_feedback)
                .options(crs::handle_preflight)
                .fallback(not_allowed),
        )
        // Recruiting
        .route(
            "/api/v1/dashboard",
            get(recruiting::handle_dashboard).fallback(not_allowed),
        )
        .route(
            "/api/v1/requisitions",
            get(recruiting::handle_list_requisitions)
                .post(recruiting::handle_create_requisition)
                .fallback(not_allowed),
        )
        .route(
            "/api/v1/requisitions/:id",
            get(recruiting::handle_get_requisition).fallback(not_allowed),
        )
        .route(
            "/api/v1/candidates",
            get(recruiting::handle_list_candidates)
                .post(recruiting::handle_create_candidate)
                .fallback(not_allowed),
        )
        .route(
            "/api/v1/candidates/:id",
            get(recruiting::handle_get_candidate).fallback(not_allowed),
        )
        // Resume upload
        .route(
            "/api/v1/resumes/extract",
            post(resumes::handle_extract)
                .layer(DefaultBodyLimit::max(
                    MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES,
                ))
                .fallback(not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(cors_layer())
}

/// Wildcard origin; credentials are not allowed alongside `*`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
            HeaderName::from_static("accept-version"),
            header::CONTENT_LENGTH,
            HeaderName::from_static("content-md5"),
            header::CONTENT_TYPE,
            header::DATE,
            HeaderName::from_static("x-api-version"),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{body_json, body_text, state_with, state_without_scorer, StubModel};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SCORE_80: &str = r#"{"score":80,"explanation":"Strong Python background","strengths":["Python","Django"],"weaknesses":["No Kubernetes"],"detailedAnalysis":{"keywordMatch":"Python, Django present","experienceRelevance":"Backend services","skillAdjacency":"Docker implies container basics","potentialAlignment":"Fast learner","quantifiableAchievements":["Reduced costs 20%"]}}"#;

    const SCORE_150: &str = r#"{"score":150,"explanation":"x","strengths":[],"weaknesses":[]}"#;

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn score_body() -> Value {
        json!({
            "resumeText": "Senior engineer, 6 years of Python and Django.",
            "jobDescriptionText": "Backend engineer for a Python platform.",
            "mustHaveKeywords": "Python"
        })
    }

    #[tokio::test]
    async fn test_health_reports_scoring_state() {
        let app = build_router(state_without_scorer());
        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["scoringConfigured"], false);
    }

    #[tokio::test]
    async fn test_score_returns_model_json_verbatim() {
        let model = StubModel::replying(SCORE_80);
        let app = build_router(state_with(model.clone()));

        let response = app.oneshot(post_json("/api/score", score_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_text(response).await, SCORE_80);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_fenced_model_output_is_unwrapped() {
        let fenced = format!("```json\n{SCORE_80}\n```");
        let app = build_router(state_with(StubModel::replying(&fenced)));

        let response = app.oneshot(post_json("/api/score", score_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, SCORE_80);
    }

    #[tokio::test]
    async fn test_prompt_carries_keywords_and_placeholder() {
        let model = StubModel::replying(SCORE_80);
        let app = build_router(state_with(model.clone()));

        app.oneshot(post_json("/api/score", score_body())).await.unwrap();

        let prompt = model.last_prompt().unwrap();
        assert!(prompt.contains("Python"));
        assert!(prompt.contains("None specified."));
    }

    #[tokio::test]
    async fn test_empty_nice_to_have_is_scored_with_placeholder() {
        const MINIMAL: &str =
            r#"{"score":80,"explanation":"ok","strengths":["x"],"weaknesses":[]}"#;
        let model = StubModel::replying(MINIMAL);
        let app = build_router(state_with(model.clone()));

        let response = app
            .oneshot(post_json(
                "/api/score",
                json!({
                    "resumeText": "Python developer with 5 years experience",
                    "jobDescriptionText": "Seeking a Python developer",
                    "mustHaveKeywords": "Python",
                    "niceToHaveKeywords": ""
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, MINIMAL);
        let prompt = model.last_prompt().unwrap();
        assert!(prompt.contains("Nice-to-Have Keywords/Skills:\n---\nNone specified.\n---"));
        assert!(prompt.contains("Python"));
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_rejected() {
        let app = build_router(state_with(StubModel::replying(SCORE_150)));

        let response = app.oneshot(post_json("/api/score", score_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("invalid structure"));
        assert_eq!(body["details"]["kind"], "invalid_structure");
    }

    #[tokio::test]
    async fn test_non_json_model_output_is_rejected() {
        let app = build_router(state_with(StubModel::replying("I cannot score this.")));

        let response = app.oneshot(post_json("/api/score", score_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["details"]["kind"], "malformed_json");
        assert!(body["error"].as_str().unwrap().contains("I cannot score this."));
    }

    #[tokio::test]
    async fn test_missing_resume_is_bad_request_without_upstream_call() {
        let model = StubModel::replying(SCORE_80);
        let app = build_router(state_with(model.clone()));

        let response = app
            .oneshot(post_json(
                "/api/score",
                json!({ "jobDescriptionText": "Backend engineer" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "resumeText is required");
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_job_description_is_bad_request() {
        let model = StubModel::replying(SCORE_80);
        let app = build_router(state_with(model.clone()));

        let response = app
            .oneshot(post_json(
                "/api/score",
                json!({ "resumeText": "Engineer", "jobDescriptionText": "   " }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_object_body_is_bad_request() {
        let model = StubModel::replying(SCORE_80);
        let app = build_router(state_with(model.clone()));

        let response = app
            .oneshot(post_json("/api/score", json!("plain text body")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_is_configuration_error() {
        let app = build_router(state_without_scorer());

        let response = app.oneshot(post_json("/api/score", score_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Internal server configuration error: API key missing."
        );
    }

    #[tokio::test]
    async fn test_upstream_error_is_relayed_with_details() {
        let model = StubModel::failing(429, "Quota exceeded");
        let app = build_router(state_with(model.clone()));

        let response = app.oneshot(post_json("/api/score", score_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("AI API Error:"));
        assert_eq!(body["details"]["status"], 429);
        assert_eq!(body["details"]["providerStatus"], "RESOURCE_EXHAUSTED");
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_get_on_score_is_method_not_allowed() {
        let app = build_router(state_with(StubModel::replying(SCORE_80)));

        let response = app.oneshot(get_request("/api/score")).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Method Not Allowed");
    }

    #[tokio::test]
    async fn test_bare_options_is_ok() {
        let app = build_router(state_without_scorer());
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/score")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let app = build_router(state_without_scorer());
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/score")
            .header(header::ORIGIN, "https://recruiter.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .is_none());
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("x-csrf-token"));
        assert!(allowed.contains("content-type"));
    }

    #[tokio::test]
    async fn test_error_responses_carry_cors_origin() {
        let app = build_router(state_without_scorer());
        let mut request = post_json("/api/score", json!({}));
        request
            .headers_mut()
            .insert(header::ORIGIN, "https://recruiter.example".parse().unwrap());

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_not_found() {
        let app = build_router(state_without_scorer());
        let response = app.oneshot(get_request("/api/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No route for /api/nope");
    }

    #[tokio::test]
    async fn test_feedback_is_accepted() {
        let state = state_without_scorer();
        let feedback = state.feedback.clone();
        let app = build_router(state);

        let response = app
            .oneshot(post_json(
                "/api/score/feedback",
                json!({ "rating": "Potential Match", "reason": " close ", "score": 72 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = body_json(response).await;
        assert_eq!(body["rating"], "Potential Match");
        assert_eq!(body["reason"], "close");
        assert_eq!(feedback.count(), 1);
    }

    #[tokio::test]
    async fn test_feedback_without_rating_is_rejected() {
        let app = build_router(state_without_scorer());
        let response = app
            .oneshot(post_json("/api/score/feedback", json!({ "score": 40 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard_summarizes_seed_data() {
        let app = build_router(state_without_scorer());
        let response = app.oneshot(get_request("/api/v1/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["metrics"]["openRequisitions"], 2);
        assert_eq!(body["metrics"]["totalCandidates"], 2);
        assert_eq!(body["highPriorityCandidates"][0]["name"], "Alice Smith");
    }

    #[tokio::test]
    async fn test_requisitions_filter_by_status() {
        let app = build_router(state_without_scorer());
        let response = app
            .oneshot(get_request("/api/v1/requisitions?status=Open"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["req1", "req2"]);
    }

    #[tokio::test]
    async fn test_unknown_status_filter_is_bad_request() {
        let app = build_router(state_without_scorer());
        let response = app
            .oneshot(get_request("/api/v1/requisitions?status=Archived"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid query string"));
    }

    #[tokio::test]
    async fn test_create_then_fetch_requisition() {
        let app = build_router(state_without_scorer());

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/requisitions",
                json!({
                    "jobTitle": "Data Engineer",
                    "jobDescription": "Build pipelines",
                    "mustHaveSkills": "SQL"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["status"], "Draft");
        let id = created["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("req-"));

        let response = app
            .oneshot(get_request(&format!("/api/v1/requisitions/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["jobTitle"], "Data Engineer");
    }

    #[tokio::test]
    async fn test_requisition_without_title_is_rejected() {
        let app = build_router(state_without_scorer());
        let response = app
            .oneshot(post_json(
                "/api/v1/requisitions",
                json!({ "jobDescription": "Build pipelines" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "jobTitle is required");
    }

    #[tokio::test]
    async fn test_missing_candidate_is_not_found() {
        let app = build_router(state_without_scorer());
        let response = app
            .oneshot(get_request("/api/v1/candidates/cand-missing"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["error"],
            "Candidate cand-missing not found"
        );
    }

    #[tokio::test]
    async fn test_candidates_filter_by_tag() {
        let app = build_router(state_without_scorer());
        let response = app
            .oneshot(get_request("/api/v1/candidates?tag=React"))
            .await
            .unwrap();
        let body = body_json(response).await;
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], "cand1");
    }

    #[tokio::test]
    async fn test_create_candidate_logs_activity() {
        let app = build_router(state_without_scorer());
        let response = app
            .oneshot(post_json(
                "/api/v1/candidates",
                json!({
                    "firstName": "Carol",
                    "lastName": "Diaz",
                    "email": "carol@example.com",
                    "tags": ["backend", " "]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["tags"], json!(["backend"]));
        assert_eq!(body["activityLog"][0]["activity"], "Candidate added manually");
    }

    fn multipart_request(file_name: &str, content_type: &str, contents: &str) -> Request<Body> {
        let boundary = "X-TALENTFLOW-BOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             {contents}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/resumes/extract")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_text_resume_upload_is_extracted() {
        let app = build_router(state_without_scorer());
        let response = app
            .oneshot(multipart_request(
                "resume.txt",
                "text/plain",
                "  Jane Doe\nRust engineer  ",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["fileName"], "resume.txt");
        assert_eq!(body["text"], "Jane Doe\nRust engineer");
        assert_eq!(body["characters"], 22);
    }

    #[tokio::test]
    async fn test_unsupported_upload_type_is_rejected() {
        let app = build_router(state_without_scorer());
        let response = app
            .oneshot(multipart_request("resume.docx", "application/msword", "binary"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Invalid file type. Please upload a .txt or .pdf file."
        );
    }
}
