//! LMS API Client
//!
//! A reqwest client for the learning-management backend's REST API.

use crate::api::LmsApi;
use crate::api::auth::AuthInterceptor;
use crate::api::error::ApiError;
use crate::api::models::{
    Certificate, CertificateDownload, CertificatesResponse, CompleteLessonRequest, Course,
    CoursesPage, EnrollResponse, NotificationsPage, ProgressRecord,
};
use crate::consts::cli_consts::network;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

// User-Agent string with client version
const USER_AGENT: &str = concat!("lms-dashboard/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Arc<dyn AuthInterceptor>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        auth: Arc<dyn AuthInterceptor>,
    ) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(network::connect_timeout())
            .timeout(network::request_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            auth,
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = self.build_url(endpoint);
        debug!("{} {}", method, url);
        self.auth.decorate(self.client.request(method, url))
    }

    async fn handle_response_status(
        &self,
        endpoint: &str,
        response: Response,
    ) -> Result<Response, ApiError> {
        if response.status() == StatusCode::UNAUTHORIZED {
            self.auth.on_unauthorized(endpoint);
            return Err(ApiError::Unauthorized {
                path: endpoint.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn execute(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let response = request.send().await?;
        self.handle_response_status(endpoint, response).await
    }

    fn decode_response<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
        serde_json::from_slice(bytes).map_err(ApiError::Decode)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.request(Method::GET, endpoint).query(query);
        let response = self.execute(endpoint, request).await?;
        let bytes = response.bytes().await?;
        Self::decode_response(&bytes)
    }

    async fn post_for_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let request = self.request(Method::POST, endpoint);
        let response = self.execute(endpoint, request).await?;
        let bytes = response.bytes().await?;
        Self::decode_response(&bytes)
    }

    async fn send_no_response(&self, method: Method, endpoint: &str) -> Result<(), ApiError> {
        let request = self.request(method, endpoint);
        self.execute(endpoint, request).await?;
        Ok(())
    }

    fn segment(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }
}

#[async_trait::async_trait]
impl LmsApi for ApiClient {
    async fn list_courses(&self, page: u32, limit: u32) -> Result<Vec<Course>, ApiError> {
        let page: CoursesPage = self
            .get_json(
                "courses",
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(page.courses)
    }

    async fn list_progress(&self) -> Result<Vec<ProgressRecord>, ApiError> {
        self.get_json("progress/user/all", &[]).await
    }

    async fn start_progress(&self, course_id: &str) -> Result<(), ApiError> {
        let endpoint = format!("progress/start/{}", Self::segment(course_id));
        self.send_no_response(Method::POST, &endpoint).await
    }

    async fn complete_lesson(&self, request: &CompleteLessonRequest) -> Result<(), ApiError> {
        let endpoint = "progress/complete-lesson";
        let request = self.request(Method::POST, endpoint).json(request);
        self.execute(endpoint, request).await?;
        Ok(())
    }

    async fn list_notifications(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<NotificationsPage, ApiError> {
        self.get_json(
            "notifications",
            &[("page", page.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn mark_notification_read(&self, notification_id: &str) -> Result<(), ApiError> {
        let endpoint = format!("notifications/{}/read", Self::segment(notification_id));
        self.send_no_response(Method::PUT, &endpoint).await
    }

    async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        self.send_no_response(Method::PUT, "notifications/mark-all-read")
            .await
    }

    async fn delete_notification(&self, notification_id: &str) -> Result<(), ApiError> {
        let endpoint = format!("notifications/{}", Self::segment(notification_id));
        self.send_no_response(Method::DELETE, &endpoint).await
    }

    async fn list_certificates(&self) -> Result<Vec<Certificate>, ApiError> {
        let response: CertificatesResponse =
            self.get_json("certificates/my-certificates", &[]).await?;
        Ok(response.into_certificates())
    }

    async fn download_certificate(
        &self,
        certificate_id: &str,
    ) -> Result<CertificateDownload, ApiError> {
        let endpoint = format!("certificates/download/{}", Self::segment(certificate_id));
        let request = self.request(Method::GET, &endpoint);
        let response = self.execute(&endpoint, request).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        Ok(CertificateDownload {
            bytes,
            content_type,
        })
    }

    async fn enroll(&self, course_id: &str) -> Result<EnrollResponse, ApiError> {
        let endpoint = format!("courses/{}/enroll", Self::segment(course_id));
        let response: EnrollResponse = self.post_for_json(&endpoint).await?;
        if !response.success {
            return Err(ApiError::Rejected(response.message.unwrap_or_default()));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::{Credentials, SessionPolicy};
    use crate::config::Config;
    use crate::environment::Environment;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn client_for(server: &MockServer, credentials: Credentials) -> ApiClient {
        let policy = SessionPolicy::new(credentials);
        ApiClient::new(server.base_url(), Arc::new(policy)).expect("client builds")
    }

    #[tokio::test]
    async fn list_courses_sends_bearer_token_and_paging() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/courses")
                .query_param("page", "1")
                .query_param("limit", "50")
                .header("authorization", "Bearer token-1");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "courses": [{ "_id": "c1", "title": "Rust 101", "level": "Beginner" }]
                }));
        });

        let client = client_for(&server, Credentials::new(Some("token-1".into())));
        let courses = client.list_courses(1, 50).await.expect("courses load");

        mock.assert();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Rust 101");
        assert_eq!(courses[0].level.as_deref(), Some("Beginner"));
    }

    #[tokio::test]
    async fn unauthorized_runs_session_policy() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/progress/user/all");
            then.status(401)
                .json_body(json!({ "message": "Not authorized, token failed" }));
        });

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        Config::new("stale".into(), Environment::Local)
            .save(&path)
            .unwrap();

        let credentials = Credentials::new(Some("stale".into()));
        let policy = SessionPolicy::new(credentials.clone()).with_config_path(path.clone());
        let client = ApiClient::new(server.base_url(), Arc::new(policy)).unwrap();

        let err = client.list_progress().await.expect_err("401 expected");
        assert!(matches!(err, ApiError::Unauthorized { ref path } if path == "progress/user/all"));
        assert_eq!(credentials.token(), None);
        assert_eq!(Config::load_from_file(&path).unwrap().api_token, None);
    }

    #[derive(Default)]
    struct RecordingInterceptor {
        unauthorized: std::sync::Mutex<Vec<String>>,
    }

    impl AuthInterceptor for RecordingInterceptor {
        fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
            request.header("x-test-session", "recorded")
        }

        fn on_unauthorized(&self, path: &str) {
            self.unauthorized.lock().unwrap().push(path.to_string());
        }
    }

    #[tokio::test]
    async fn custom_interceptor_decorates_and_observes_401() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE)
                .path("/notifications/n9")
                .header("x-test-session", "recorded");
            then.status(401);
        });

        let interceptor = Arc::new(RecordingInterceptor::default());
        let client = ApiClient::new(server.base_url(), interceptor.clone()).unwrap();
        let err = client.delete_notification("n9").await.expect_err("401 expected");

        mock.assert();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(
            *interceptor.unauthorized.lock().unwrap(),
            vec!["notifications/n9".to_string()]
        );
    }

    #[tokio::test]
    async fn server_message_is_surfaced() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/courses/c1/enroll");
            then.status(400)
                .json_body(json!({ "message": "Already enrolled in this course" }));
        });

        let client = client_for(&server, Credentials::default());
        let err = client.enroll("c1").await.expect_err("400 expected");
        assert_eq!(
            err.user_message("Failed to enroll in course"),
            "Already enrolled in this course"
        );
    }

    #[tokio::test]
    async fn enroll_rejection_with_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/courses/c1/enroll");
            then.status(200)
                .json_body(json!({ "success": false, "message": "Course is closed" }));
        });

        let client = client_for(&server, Credentials::default());
        let err = client.enroll("c1").await.expect_err("rejection expected");
        assert!(matches!(err, ApiError::Rejected(ref m) if m == "Course is closed"));
    }

    #[tokio::test]
    async fn complete_lesson_posts_camel_case_payload() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/progress/complete-lesson")
                .json_body(json!({
                    "courseId": "c1",
                    "lessonId": "l2",
                    "timeSpent": 12,
                    "quizScore": 85.0
                }));
            then.status(200).json_body(json!({ "progressPercentage": 50 }));
        });

        let client = client_for(&server, Credentials::default());
        client
            .complete_lesson(&CompleteLessonRequest {
                course_id: "c1".into(),
                lesson_id: "l2".into(),
                time_spent: 12,
                quiz_score: Some(85.0),
            })
            .await
            .expect("lesson completes");
        mock.assert();
    }

    #[tokio::test]
    async fn notification_mutations_hit_expected_routes() {
        let server = MockServer::start_async().await;
        let read = server.mock(|when, then| {
            when.method(PUT).path("/notifications/n1/read");
            then.status(200).json_body(json!({ "success": true }));
        });
        let read_all = server.mock(|when, then| {
            when.method(PUT).path("/notifications/mark-all-read");
            then.status(200);
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/notifications/n2");
            then.status(200);
        });

        let client = client_for(&server, Credentials::default());
        client.mark_notification_read("n1").await.unwrap();
        client.mark_all_notifications_read().await.unwrap();
        client.delete_notification("n2").await.unwrap();

        read.assert();
        read_all.assert();
        delete.assert();
    }

    #[tokio::test]
    async fn download_returns_bytes_and_content_type() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/certificates/download/CERT-2024-AB");
            then.status(200)
                .header("content-type", "application/pdf")
                .body("%PDF-1.4 fake");
        });

        let client = client_for(&server, Credentials::default());
        let download = client
            .download_certificate("CERT-2024-AB")
            .await
            .expect("download succeeds");
        assert_eq!(download.content_type.as_deref(), Some("application/pdf"));
        assert!(download.bytes.starts_with(b"%PDF"));
    }
}
