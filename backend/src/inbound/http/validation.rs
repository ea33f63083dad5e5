//! Reader-facing endpoints and the validation log read model.
//!
//! ```text
//! GET  /          static greeting
//! POST /validate  {"UID": "...", "status": "..."}
//! GET  /logs      validation log (management credentials required)
//! ```

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::{Error, ValidationEvent, ValidationLogEntry};

use super::ApiResult;
use super::auth::AdminAuth;
use super::state::HttpState;

/// Body of `GET /`.
pub const GREETING: &str = "Get off my property!";

const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Wire shape of one validation log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationLogEntryDto {
    /// UTC time formatted as `YYYY-MM-DD HH:MM:SS.ffffff`.
    pub timestamp: String,
    /// Reported card identifier.
    pub card_id: String,
    /// Reported or management outcome.
    pub status: String,
}

impl From<&ValidationLogEntry> for ValidationLogEntryDto {
    fn from(entry: &ValidationLogEntry) -> Self {
        Self {
            timestamp: entry.timestamp().format(LOG_TIMESTAMP_FORMAT).to_string(),
            card_id: entry.card_id().to_owned(),
            status: entry.status().to_owned(),
        }
    }
}

/// Static greeting.
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(GREETING)
}

/// Record a validation reported by a reader.
///
/// Always answers `OK`: malformed or unreadable payloads become the invalid
/// input sentinel and store failures are logged.
#[post("/validate")]
pub async fn validate(
    state: web::Data<HttpState>,
    body: Result<web::Bytes, actix_web::Error>,
) -> HttpResponse {
    let event = match &body {
        Ok(body) => {
            info!(body = %String::from_utf8_lossy(body), "validation payload received");
            ValidationEvent::from_json(body)
        }
        Err(err) => {
            warn!(error = %err, "validation payload unreadable");
            ValidationEvent::invalid_input()
        }
    };

    if let Some(log) = &state.audit_log {
        if let Err(err) = log.record_validation(&event).await {
            error!(
                card_id = event.card_id(),
                status = event.status(),
                error = %err,
                "failed to record validation"
            );
        }
    }

    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("OK")
}

/// Every validation log entry in insertion order.
#[get("/logs")]
pub async fn list_logs(
    _admin: AdminAuth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ValidationLogEntryDto>>> {
    let log = state
        .audit_log
        .as_ref()
        .ok_or_else(|| Error::not_found("validation log is disabled"))?;
    let entries = log.list().await?;
    Ok(web::Json(
        entries.iter().map(ValidationLogEntryDto::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{
        ADMIN_PASSWORD, ADMIN_USER, TestBackend, basic_auth, test_backend,
    };
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn app_for(
        backend: &TestBackend,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(backend.state.clone()))
            .service(index)
            .service(validate)
            .service(list_logs)
    }

    #[::core::prelude::v1::test]
    fn dto_formats_microsecond_timestamps() {
        let timestamp = Utc
            .with_ymd_and_hms(2024, 5, 1, 8, 30, 0)
            .single()
            .expect("valid timestamp")
            + chrono::TimeDelta::microseconds(42);
        let dto = ValidationLogEntryDto::from(&ValidationLogEntry::new(timestamp, "X", "valid"));
        assert_eq!(dto.timestamp, "2024-05-01 08:30:00.000042");
    }

    #[actix_web::test]
    async fn greeting_is_static() {
        let backend = test_backend(true, &[]);
        let app = test::init_service(app_for(&backend)).await;
        let body =
            test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(body, GREETING.as_bytes());
    }

    #[rstest]
    #[case(r#"{"UID":"ABCD1234","status":"valid"}"#, "ABCD1234", "valid")]
    #[case("", "HAXORS", "invalid input")]
    #[case(r#"{"status":"valid"}"#, "HAXORS", "invalid input")]
    #[case("[1,2,3]", "HAXORS", "invalid input")]
    #[actix_web::test]
    async fn validate_records_exactly_one_entry(
        #[case] payload: &'static str,
        #[case] card_id: &str,
        #[case] status: &str,
    ) {
        let backend = test_backend(true, &[]);
        let app = test::init_service(app_for(&backend)).await;
        let req = test::TestRequest::post()
            .uri("/validate")
            .insert_header(ContentType::json())
            .set_payload(payload)
            .to_request();

        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "OK".as_bytes());

        let entries = backend.log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].card_id(), card_id);
        assert_eq!(entries[0].status(), status);
    }

    #[actix_web::test]
    async fn validate_without_audit_log_still_answers_ok() {
        let backend = test_backend(false, &[]);
        let app = test::init_service(app_for(&backend)).await;
        let req = test::TestRequest::post()
            .uri("/validate")
            .set_payload(r#"{"UID":"ABCD1234","status":"valid"}"#)
            .to_request();

        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(backend.log.entries().is_empty());
    }

    #[actix_web::test]
    async fn logs_lists_entries_for_admins() {
        let backend = test_backend(true, &[]);
        let app = test::init_service(app_for(&backend)).await;
        let post = test::TestRequest::post()
            .uri("/validate")
            .set_payload(r#"{"UID":"ABCD1234","status":"valid"}"#)
            .to_request();
        test::call_service(&app, post).await;

        let req = test::TestRequest::get()
            .uri("/logs")
            .insert_header((header::AUTHORIZATION, basic_auth(ADMIN_USER, ADMIN_PASSWORD)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let entries = body.as_array().expect("array body");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["card_id"], json!("ABCD1234"));
        assert_eq!(entries[0]["status"], json!("valid"));
        assert!(entries[0]["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn logs_requires_credentials() {
        let backend = test_backend(true, &[]);
        let app = test::init_service(app_for(&backend)).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/logs").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn logs_is_not_found_when_audit_log_disabled() {
        let backend = test_backend(false, &[]);
        let app = test::init_service(app_for(&backend)).await;
        let req = test::TestRequest::get()
            .uri("/logs")
            .insert_header((header::AUTHORIZATION, basic_auth(ADMIN_USER, ADMIN_PASSWORD)))
            .to_request();

        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn oversized_payload_records_the_sentinel() {
        let backend = test_backend(true, &[]);
        let app = test::init_service(app_for(&backend)).await;
        let payload = format!(
            r#"{{"UID":"ABCD1234","status":"{}"}}"#,
            "v".repeat(300 * 1024)
        );
        let req = test::TestRequest::post()
            .uri("/validate")
            .insert_header(ContentType::json())
            .set_payload(payload)
            .to_request();

        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "OK".as_bytes());

        let entries = backend.log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].card_id(), "HAXORS");
        assert_eq!(entries[0].status(), "invalid input");
    }
}
