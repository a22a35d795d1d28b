//! Integration tests for the REST client against a fake API.

mod helpers;

use axum::Json;
use axum::extract::{Multipart, Path};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{Value, json};

use memberhub_core::error::ErrorKind;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::{ClaimId, Filter, FilterValue, MemberId, SearchRequest};
use memberhub_entity::claim::{DocumentType, DocumentUpload};
use memberhub_entity::member::{MemberStatus, SuspendMember};

use helpers::{TEST_TOKEN, TestApp, flat_page, member_json, nested_page};

#[tokio::test]
async fn test_search_reads_flat_envelope() {
    let app = TestApp::spawn(|recorder| {
        Router::new().route(
            "/api/members/search",
            post(move |headers: HeaderMap, Json(body): Json<Value>| async move {
                recorder.record("/api/members/search", &headers, body);
                Json(flat_page(
                    vec![
                        member_json("M-001", "Asha", "active"),
                        member_json("M-002", "Ashwin", "suspended"),
                    ],
                    23,
                    1,
                    10,
                ))
            }),
        )
    })
    .await;

    let request = SearchRequest::new(1, 10)
        .with_search_term("ash")
        .with_search_fields(["firstName", "memberCode"])
        .with_filters(vec![Filter::equals("status", FilterValue::coerce("active"))]);
    let response = app.api.members.search(&request).await.unwrap();

    assert_eq!(response.total, 23);
    assert_eq!(response.total_pages, 3);
    assert_eq!(response.items.len(), 2);
    assert_eq!(response.items[0].member_code, "M-001");
    assert_eq!(response.items[1].status, MemberStatus::Suspended);

    let sent = app.recorder.last().unwrap().body;
    assert_eq!(sent["searchTerm"], "ash");
    assert_eq!(sent["searchFields"], json!(["firstName", "memberCode"]));
    assert_eq!(sent["filters"][0]["field"], "status");
    assert_eq!(sent["filters"][0]["operator"], "equals");
    assert_eq!(sent["page"], 1);
    assert_eq!(sent["pageSize"], 10);
    assert!(sent.get("sortBy").is_none());
    assert!(sent.get("eagerLoad").is_none());
}

#[tokio::test]
async fn test_search_reads_nested_envelope() {
    let app = TestApp::spawn(|_| {
        Router::new().route(
            "/api/members/search",
            post(|| async {
                Json(nested_page(
                    vec![member_json("M-011", "Meera", "active")],
                    11,
                    2,
                    10,
                ))
            }),
        )
    })
    .await;

    let response = app
        .api
        .members
        .search(&SearchRequest::new(2, 10))
        .await
        .unwrap();

    assert_eq!(response.page, 2);
    assert_eq!(response.total, 11);
    assert_eq!(response.total_pages, 2);
    assert_eq!(response.item_range(), Some((11, 11)));
    assert!(!response.has_next());
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let app = TestApp::spawn(|recorder| {
        Router::new().route(
            "/api/members/{id}/nominees",
            get(move |headers: HeaderMap, Path(id): Path<String>| async move {
                recorder.record(&format!("/api/members/{id}/nominees"), &headers, Value::Null);
                Json(json!([]))
            }),
        )
    })
    .await;

    let nominees = app.api.members.nominees(MemberId::new()).await.unwrap();
    assert!(nominees.is_empty());

    let seen = app.recorder.last().unwrap();
    assert_eq!(seen.authorization, Some(format!("Bearer {TEST_TOKEN}")));
}

#[tokio::test]
async fn test_business_error_keeps_code() {
    let app = TestApp::spawn(|_| {
        Router::new().route(
            "/api/members/{id}/suspend",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "code": "MEMBER_HAS_OPEN_CLAIM",
                        "message": "Member has a death claim in progress",
                    })),
                )
            }),
        )
    })
    .await;

    let err = app
        .api
        .members
        .suspend(
            MemberId::new(),
            &SuspendMember {
                reason: "Missed contributions".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Business);
    assert!(err.has_code("MEMBER_HAS_OPEN_CLAIM"));
    assert_eq!(err.message, "Member has a death claim in progress");
}

#[tokio::test]
async fn test_status_codes_map_to_kinds() {
    let app = TestApp::spawn(|_| {
        Router::new()
            .route("/api/members/{id}", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/api/members/search",
                post(|| async {
                    (
                        StatusCode::FORBIDDEN,
                        Json(json!({"error": "Forbidden", "message": "members.read required"})),
                    )
                }),
            )
    })
    .await;

    let err = app.api.members.get(MemberId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message, "Not Found");

    let err = app
        .api
        .members
        .search(&SearchRequest::new(1, 10))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(err.message, "members.read required");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = memberhub_client::ApiServices::new(helpers::http_service(&format!(
        "http://{addr}/api"
    )));
    let err = api.members.get(MemberId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
}

#[tokio::test]
async fn test_upload_sends_multipart_fields() {
    let app = TestApp::spawn(|recorder| {
        Router::new().route(
            "/api/death-claims/{id}/documents",
            post(
                move |headers: HeaderMap, Path(id): Path<String>, mut form: Multipart| async move {
                    let mut fields = serde_json::Map::new();
                    while let Some(field) = form.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        if name == "file" {
                            fields.insert(
                                "fileName".to_string(),
                                json!(field.file_name().unwrap_or_default()),
                            );
                            fields.insert(
                                "contentType".to_string(),
                                json!(field.content_type().unwrap_or_default()),
                            );
                            let bytes = field.bytes().await.unwrap();
                            fields.insert("size".to_string(), json!(bytes.len()));
                        } else {
                            let text = field.text().await.unwrap();
                            fields.insert(name, json!(text));
                        }
                    }
                    recorder.record(
                        &format!("/api/death-claims/{id}/documents"),
                        &headers,
                        Value::Object(fields),
                    );
                    Json(json!({
                        "id": uuid::Uuid::new_v4(),
                        "documentType": "death_certificate",
                        "documentName": "Certificate",
                        "mimeType": "application/pdf",
                        "url": "https://files.example.org/c.pdf",
                        "uploadedAt": "2024-03-04T10:00:00Z",
                    }))
                },
            ),
        )
    })
    .await;

    let upload = DocumentUpload {
        document_type: DocumentType::DeathCertificate,
        document_name: "Certificate".to_string(),
        mime_type: "application/pdf".to_string(),
        file_name: "certificate.pdf".to_string(),
        content: b"%PDF-1.7 test".to_vec(),
    };
    let document = app
        .api
        .claims
        .upload_document(ClaimId::new(), &upload)
        .await
        .unwrap();
    assert_eq!(document.document_type, DocumentType::DeathCertificate);

    let form = app.recorder.last().unwrap().body;
    assert_eq!(form["documentType"], "death_certificate");
    assert_eq!(form["documentName"], "Certificate");
    assert_eq!(form["mimeType"], "application/pdf");
    assert_eq!(form["fileName"], "certificate.pdf");
    assert_eq!(form["contentType"], "application/pdf");
    assert_eq!(form["size"], 13);
}

#[tokio::test]
async fn test_empty_upload_rejected_before_sending() {
    let app = TestApp::spawn(|recorder| {
        Router::new().route(
            "/api/death-claims/{id}/documents",
            post(move |headers: HeaderMap| async move {
                recorder.record("/api/death-claims/documents", &headers, Value::Null);
                StatusCode::CREATED
            }),
        )
    })
    .await;

    let upload = DocumentUpload {
        document_type: DocumentType::Other,
        document_name: "Empty".to_string(),
        mime_type: "text/plain".to_string(),
        file_name: "empty.txt".to_string(),
        content: Vec::new(),
    };
    let err = app
        .api
        .claims
        .upload_document(ClaimId::new(), &upload)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.recorder.count(), 0);
}
