//! Tests for the REST secret store against the fake backend

use actix_web::web;
use chrono::{Duration, TimeZone, Utc};
use ov_shared::config::BackendConfig;

use ov_core::domain::entities::otp_record::NewOtpRecord;
use ov_core::errors::DomainError;
use ov_core::repositories::SecretStore;

use crate::backend::{BackendClient, RestSecretStore};

use super::fake_backend::{client_for, otp_row, spawn, FakeBackend, TABLE};

fn store_with(backend: &web::Data<FakeBackend>) -> RestSecretStore {
    let url = spawn(backend.clone());
    RestSecretStore::new(client_for(&url), TABLE)
}

#[actix_web::test]
async fn test_find_unconsumed_newest_first() {
    let backend = web::Data::new(FakeBackend::default());
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    backend.seed_row(otp_row("1", "alice@example.com", "h1", base, 10, None));
    backend.seed_row(otp_row("2", "Alice@Example.com", "h2", base + Duration::minutes(2), 10, Some(false)));
    backend.seed_row(otp_row("3", "alice@example.com", "h3", base + Duration::minutes(4), 10, Some(true)));
    backend.seed_row(otp_row("4", "bob@example.com", "h4", base + Duration::minutes(5), 10, None));
    let store = store_with(&backend);

    let records = store.find_unconsumed("ALICE@example.com", 5).await.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
    assert_eq!(records[0].secret_hash, "h2");
    assert_eq!(records[1].consumed, None);

    let newest = store.find_unconsumed("alice@example.com", 1).await.unwrap();
    assert_eq!(newest.len(), 1);
    assert_eq!(newest[0].id, "2");
}

#[actix_web::test]
async fn test_find_unconsumed_matches_literally() {
    let backend = web::Data::new(FakeBackend::default());
    let now = Utc::now();
    backend.seed_row(otp_row("1", "a_b@example.com", "h1", now, 10, None));
    backend.seed_row(otp_row("2", "axb@example.com", "h2", now, 10, None));
    let store = store_with(&backend);

    let records = store.find_unconsumed("a_b@example.com", 5).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "1");
}

#[actix_web::test]
async fn test_find_unconsumed_email_with_asterisk() {
    let backend = web::Data::new(FakeBackend::default());
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    backend.seed_row(otp_row("1", "A*B@example.com", "h1", base, 10, None));
    // Newer row that the wildcard also matches
    backend.seed_row(otp_row("2", "axb@example.com", "h2", base + Duration::minutes(1), 10, None));
    let store = store_with(&backend);

    let newest = store.find_unconsumed("a*b@example.com", 1).await.unwrap();
    assert_eq!(newest.len(), 1);
    assert_eq!(newest[0].id, "1");

    let records = store.find_unconsumed("axb@example.com", 5).await.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["2"]);
}

#[actix_web::test]
async fn test_find_unconsumed_empty() {
    let backend = web::Data::new(FakeBackend::default());
    let store = store_with(&backend);

    let records = store.find_unconsumed("nobody@example.com", 1).await.unwrap();
    assert!(records.is_empty());
}

#[actix_web::test]
async fn test_mark_consumed_only_once() {
    let backend = web::Data::new(FakeBackend::default());
    backend.seed_row(otp_row("7", "alice@example.com", "h", Utc::now(), 10, None));
    let store = store_with(&backend);

    assert!(store.mark_consumed_if_unconsumed("7").await.unwrap());
    assert_eq!(backend.row("7").unwrap()["consumed"], true);
    assert!(!store.mark_consumed_if_unconsumed("7").await.unwrap());
    assert!(!store.mark_consumed_if_unconsumed("missing").await.unwrap());
}

#[actix_web::test]
async fn test_concurrent_consume_single_winner() {
    let backend = web::Data::new(FakeBackend::default());
    backend.seed_row(otp_row("7", "alice@example.com", "h", Utc::now(), 10, Some(false)));
    let store = store_with(&backend);

    let (first, second) = tokio::join!(
        store.mark_consumed_if_unconsumed("7"),
        store.mark_consumed_if_unconsumed("7")
    );
    let winners = [first.unwrap(), second.unwrap()]
        .iter()
        .filter(|won| **won)
        .count();
    assert_eq!(winners, 1);
}

#[actix_web::test]
async fn test_insert_returns_stored_record() {
    let backend = web::Data::new(FakeBackend::default());
    let store = store_with(&backend);
    let issued_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let record = store
        .insert(NewOtpRecord {
            owner_email: "carol@example.com".to_string(),
            secret_hash: "$2b$04$hash".to_string(),
            issued_at,
            expires_at: issued_at + Duration::minutes(10),
        })
        .await
        .unwrap();

    assert_eq!(record.id, "1");
    assert_eq!(record.owner_email, "carol@example.com");
    assert_eq!(record.issued_at, issued_at);
    assert_eq!(record.consumed, Some(false));

    let stored = backend.row("1").unwrap();
    assert_eq!(stored["otp_hash"], "$2b$04$hash");
}

#[actix_web::test]
async fn test_wrong_service_key_is_transient() {
    let backend = web::Data::new(FakeBackend::default());
    let url = spawn(backend.clone());
    let client = BackendClient::new(&BackendConfig::new(url, "wrong-key")).unwrap();
    let store = RestSecretStore::new(client, TABLE);

    let err = store.find_unconsumed("alice@example.com", 1).await.unwrap_err();
    assert!(matches!(err, DomainError::Transient { .. }));
    assert!(err.to_string().contains("401"));
}

#[actix_web::test]
async fn test_unknown_table_is_transient() {
    let backend = web::Data::new(FakeBackend::default());
    let url = spawn(backend.clone());
    let store = RestSecretStore::new(client_for(&url), "no_such_table");

    let err = store.mark_consumed_if_unconsumed("1").await.unwrap_err();
    assert!(err.is_retryable());
}

#[actix_web::test]
async fn test_unreachable_backend_is_transient() {
    // Reserve a port, then free it so nothing listens there
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let store = RestSecretStore::new(client_for(&format!("http://{}", addr)), TABLE);

    let err = store.find_unconsumed("alice@example.com", 1).await.unwrap_err();
    assert!(matches!(err, DomainError::Transient { .. }));
}
