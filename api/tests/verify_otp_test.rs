//! Integration tests for the verification endpoint and the service routes

#[cfg(test)]
mod verify_otp_tests {
    use actix_web::{http::StatusCode, test, web};
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use std::sync::Arc;

    use ov_api::app::{create_app, ROOT_MESSAGE};
    use ov_api::routes::otp::AppState;
    use ov_core::domain::entities::otp_record::OtpRecord;
    use ov_core::repositories::{MockIdentityStore, MockSecretStore};
    use ov_core::services::verification::{VerificationService, VerificationServiceConfig};
    use ov_shared::config::CorsConfig;

    const MAX_PAYLOAD: usize = 16 * 1024;

    struct Stores {
        secrets: Arc<MockSecretStore>,
        identities: Arc<MockIdentityStore>,
    }

    impl Stores {
        fn new() -> Self {
            Self {
                secrets: Arc::new(MockSecretStore::new()),
                identities: Arc::new(MockIdentityStore::new()),
            }
        }

        fn state(&self) -> web::Data<AppState<MockSecretStore, MockIdentityStore>> {
            let config = VerificationServiceConfig {
                hash_cost: 4,
                ..Default::default()
            };
            let service =
                VerificationService::new(self.secrets.clone(), self.identities.clone(), config);
            web::Data::new(AppState::new(service))
        }

        /// Seed a record for `code` that expires `expires_in` from now
        async fn issue(&self, id: &str, email: &str, code: &str, expires_in: Duration) {
            let now = Utc::now();
            self.secrets
                .seed(OtpRecord {
                    id: id.to_string(),
                    owner_email: email.to_string(),
                    secret_hash: bcrypt::hash(code, 4).unwrap(),
                    issued_at: now - Duration::minutes(1),
                    expires_at: now + expires_in,
                    consumed: Some(false),
                })
                .await;
        }
    }

    fn verify_request(body: Value) -> test::TestRequest {
        test::TestRequest::post().uri("/verify-otp").set_json(body)
    }

    #[actix_web::test]
    async fn test_root_liveness_text() {
        let stores = Stores::new();
        let app = test::init_service(create_app(stores.state(), &CorsConfig::development(), MAX_PAYLOAD)).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        assert_eq!(body, ROOT_MESSAGE.as_bytes());
    }

    #[actix_web::test]
    async fn test_health_check() {
        let stores = Stores::new();
        let app = test::init_service(create_app(stores.state(), &CorsConfig::development(), MAX_PAYLOAD)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_unknown_route_is_404_error_response() {
        let stores = Stores::new();
        let app = test::init_service(create_app(stores.state(), &CorsConfig::development(), MAX_PAYLOAD)).await;

        let req = test::TestRequest::get().uri("/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "not_found");
    }

    #[actix_web::test]
    async fn test_verify_then_replay() {
        let stores = Stores::new();
        stores.issue("otp-1", "alice@example.com", "482193", Duration::minutes(10)).await;
        let account = stores.identities.add_account("alice@example.com").await;
        let app = test::init_service(create_app(stores.state(), &CorsConfig::development(), MAX_PAYLOAD)).await;

        let req = verify_request(json!({ "email": "alice@example.com", "otp": "482193" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": true, "message": "Email verified successfully" }));
        assert!(stores.identities.get(&account.id).await.unwrap().email_confirmed);

        let req = verify_request(json!({ "email": "alice@example.com", "otp": "482193" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "otp_not_found");
    }

    #[actix_web::test]
    async fn test_expired_code() {
        let stores = Stores::new();
        stores.issue("otp-1", "bob@example.com", "000111", -Duration::seconds(1)).await;
        stores.identities.add_account("bob@example.com").await;
        let app = test::init_service(create_app(stores.state(), &CorsConfig::development(), MAX_PAYLOAD)).await;

        let req = verify_request(json!({ "email": "bob@example.com", "otp": "000111" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "otp_expired");

        let record = stores.secrets.get("otp-1").await.unwrap();
        assert_eq!(record.consumed, Some(false));
    }

    #[actix_web::test]
    async fn test_wrong_code_then_right_code() {
        let stores = Stores::new();
        stores.issue("otp-1", "carol@example.com", "555555", Duration::minutes(10)).await;
        stores.identities.add_account("carol@example.com").await;
        let app = test::init_service(create_app(stores.state(), &CorsConfig::development(), MAX_PAYLOAD)).await;

        let req = verify_request(json!({ "email": "carol@example.com", "otp": "999999" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_code");

        let req = verify_request(json!({ "email": "carol@example.com", "otp": "555555" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_empty_email_is_bad_request() {
        let stores = Stores::new();
        let app = test::init_service(create_app(stores.state(), &CorsConfig::development(), MAX_PAYLOAD)).await;

        let req = verify_request(json!({ "email": "", "otp": "123456" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "bad_request");
        assert!(body["details"]["validation_errors"]["email"].is_array());
    }

    #[actix_web::test]
    async fn test_missing_otp_field_is_bad_request() {
        let stores = Stores::new();
        let app = test::init_service(create_app(stores.state(), &CorsConfig::development(), MAX_PAYLOAD)).await;

        let req = verify_request(json!({ "email": "alice@example.com" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let stores = Stores::new();
        let app = test::init_service(create_app(stores.state(), &CorsConfig::development(), MAX_PAYLOAD)).await;

        let req = test::TestRequest::post()
            .uri("/verify-otp")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"email\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "bad_request");
    }

    #[actix_web::test]
    async fn test_no_record_is_not_found() {
        let stores = Stores::new();
        let app = test::init_service(create_app(stores.state(), &CorsConfig::development(), MAX_PAYLOAD)).await;

        let req = verify_request(json!({ "email": "nouser@example.com", "otp": "123456" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "otp_not_found");
    }

    #[actix_web::test]
    async fn test_missing_account_is_not_found() {
        let stores = Stores::new();
        stores.issue("otp-1", "ghost@example.com", "123456", Duration::minutes(10)).await;
        let app = test::init_service(create_app(stores.state(), &CorsConfig::development(), MAX_PAYLOAD)).await;

        let req = verify_request(json!({ "email": "ghost@example.com", "otp": "123456" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "account_not_found");
    }

    #[actix_web::test]
    async fn test_store_failure_is_500_with_error_field() {
        let stores = Stores::new();
        stores.secrets.set_unavailable(true);
        let app = test::init_service(create_app(stores.state(), &CorsConfig::development(), MAX_PAYLOAD)).await;

        let req = verify_request(json!({ "email": "alice@example.com", "otp": "123456" })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "store_unavailable");
        assert!(!body["message"].as_str().unwrap().contains("unreachable"));
    }
}
