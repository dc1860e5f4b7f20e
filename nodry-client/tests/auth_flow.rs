mod common;

use std::sync::atomic::Ordering;

use common::{Backend, PASSWORD, TestServer, USERNAME};
use nodry_client::{Attachment, ClientError, DocumentUpload, RfqDraft, Session};
use nodry_model::DocumentCategory;

#[tokio::test]
async fn login_token_is_sent_as_bearer_on_next_call() {
    let server = TestServer::start(Backend::new()).await;
    let (client, store) = server.client().await;

    assert!(!client.is_authenticated().await);
    let pair = client.login(USERNAME, PASSWORD).await.unwrap();
    assert!(client.is_authenticated().await);
    assert_eq!(store.snapshot().access_token(), Some(pair.access.as_str()));
    assert_eq!(store.snapshot().refresh_token(), Some(pair.refresh.as_str()));

    let leads = client.leads().await.unwrap();
    assert!(leads.is_empty());

    let seen = server.backend.requests_to("/api/leads/");
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].authorization.as_deref(),
        Some(format!("Bearer {}", pair.access).as_str())
    );
}

#[tokio::test]
async fn rejected_credentials_surface_backend_detail() {
    let server = TestServer::start(Backend::new()).await;
    let (client, store) = server.client().await;

    let err = client.login(USERNAME, "wrong").await.unwrap_err();
    match err {
        ClientError::Authentication(message) => assert_eq!(
            message,
            "No active account found with the given credentials"
        ),
        other => panic!("expected authentication error, got {other:?}"),
    }
    assert!(store.snapshot().is_empty());
    assert_eq!(server.backend.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_unauthorized_requests_share_one_refresh() {
    let backend = Backend::new();
    backend.refresh_delay_ms.store(100, Ordering::SeqCst);
    let server = TestServer::start(backend).await;
    let (client, store) = server.logged_in_client().await;

    server.backend.expire_access();

    let mut handles = Vec::new();
    for _ in 0..6 {
        let client = client.clone();
        handles.push(tokio::spawn(async move { client.leads().await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(server.backend.refresh_calls.load(Ordering::SeqCst), 1);
    let current = server.backend.valid_access.lock().clone();
    assert_eq!(client.access_token().await.as_deref(), Some(current.as_str()));
    assert_eq!(store.snapshot().access_token(), Some(current.as_str()));

    let retried = server
        .backend
        .requests_to("/api/leads/")
        .into_iter()
        .filter(|r| r.authorization.as_deref() == Some(&format!("Bearer {current}")))
        .count();
    assert_eq!(retried, 6);
}

#[tokio::test]
async fn failed_refresh_clears_both_tokens() {
    let server = TestServer::start(Backend::new()).await;
    let (client, store) = server.logged_in_client().await;

    server.backend.expire_access();
    server.backend.reject_refresh.store(true, Ordering::SeqCst);

    let err = client.leads().await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired));
    assert!(err.requires_login());
    assert!(!client.is_authenticated().await);
    assert!(store.snapshot().is_empty());
    assert_eq!(server.backend.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn restored_session_refreshes_with_stored_refresh_token() {
    let server = TestServer::start(Backend::new()).await;
    let (client, _store) = server
        .client_with(Session::new("stale-access", common::REFRESH_TOKEN))
        .await;

    client.leads().await.unwrap();
    assert_eq!(server.backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(server.backend.requests_to("/api/leads/").len(), 2);
}

#[tokio::test]
async fn token_endpoints_are_never_refreshed() {
    let server = TestServer::start(Backend::new()).await;
    let (client, _store) = server
        .client_with(Session::new("stale-access", common::REFRESH_TOKEN))
        .await;

    let _ = client.login(USERNAME, "nope").await.unwrap_err();
    assert_eq!(server.backend.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rfq_submission_is_anonymous_even_when_logged_in() {
    let server = TestServer::start(Backend::new()).await;
    let (client, _store) = server.logged_in_client().await;

    let draft =
        RfqDraft::new("Ada Lovelace", "ada@example.com", "555-0100", "Need 40 units");
    let submission = client.submit_rfq(&draft).await.unwrap();
    assert_eq!(submission.full_name, "Ada Lovelace");

    let seen = server.backend.requests_to("/api/rfq/");
    assert_eq!(seen.len(), 1);
    assert!(seen[0].authorization.is_none());
    assert!(
        seen[0]
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    );
}

#[tokio::test]
async fn logout_forgets_session() {
    let server = TestServer::start(Backend::new()).await;
    let (client, store) = server.logged_in_client().await;

    client.logout().await.unwrap();
    assert!(store.snapshot().is_empty());

    let err = client.leads().await.unwrap_err();
    assert!(err.requires_login());
}

#[tokio::test]
async fn multipart_upload_is_resent_after_refresh() {
    let server = TestServer::start(Backend::new()).await;
    let (client, _store) = server
        .client_with(Session::new("stale-access", common::REFRESH_TOKEN))
        .await;

    let upload = DocumentUpload::new(
        Attachment::new("seal-patent.pdf", vec![9, 8, 7]),
        DocumentCategory::Patent,
    );
    let document = client.upload_document(upload).await.unwrap();
    assert_eq!(document.file_name, "seal-patent.pdf");
    assert_eq!(server.backend.refresh_calls.load(Ordering::SeqCst), 1);

    let current = server.backend.valid_access.lock().clone();
    let posts: Vec<_> = server
        .backend
        .requests_to("/api/documents/")
        .into_iter()
        .filter(|r| r.method == "POST")
        .collect();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].authorization.as_deref(), Some("Bearer stale-access"));
    assert_eq!(
        posts[1].authorization.as_deref(),
        Some(format!("Bearer {current}").as_str())
    );
    assert!(posts.iter().all(|r| {
        r.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    }));

    let uploads = server.backend.uploads.lock().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file, vec![9, 8, 7]);
    assert_eq!(uploads[0].file_name.as_deref(), Some("seal-patent.pdf"));
    assert_eq!(uploads[0].field("category"), Some("patent"));
}

#[tokio::test]
async fn csv_download_is_retried_after_refresh() {
    let server = TestServer::start(Backend::new()).await;
    let (client, _store) = server
        .client_with(Session::new("stale-access", common::REFRESH_TOKEN))
        .await;

    let csv = client.export_rfqs_csv().await.unwrap();
    assert!(csv.starts_with(b"ID,Full Name,Email,Phone,Company"));
    assert_eq!(server.backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(server.backend.requests_to("/api/rfq/export_csv/").len(), 2);
}
