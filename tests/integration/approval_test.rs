//! Integration tests for approval decisions, pipelines and the inbox.

mod helpers;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};
use uuid::Uuid;

use memberhub_core::error::ErrorKind;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::{ApprovalRequestId, SearchRequest};
use memberhub_entity::approval::{ApprovalDecision, ApprovalStatus, Decision, StepStatus};

use helpers::{TestApp, flat_page};

fn execution_json(request_id: &str, first: &str, second: &str, status: &str) -> Value {
    json!({
        "requestId": request_id,
        "status": status,
        "steps": [
            {
                "stageId": Uuid::new_v4(),
                "stageName": "Finance review",
                "order": 2,
                "status": second,
            },
            {
                "stageId": Uuid::new_v4(),
                "stageName": "Unit check",
                "order": 1,
                "status": first,
                "decidedBy": "unit.manager",
                "decidedAt": "2024-05-02T08:00:00Z",
            },
        ],
    })
}

fn decision_backend(recorder: helpers::Recorder) -> Router {
    Router::new()
        .route(
            "/api/approval-requests/{id}/decision",
            post(
                move |headers: HeaderMap, Path(id): Path<String>, Json(body): Json<Value>| {
                    let recorder = recorder.clone();
                    async move {
                        recorder.record(
                            &format!("/api/approval-requests/{id}/decision"),
                            &headers,
                            body,
                        );
                        Json(execution_json(&id, "approved", "pending", "in_progress"))
                    }
                },
            ),
        )
        .route(
            "/api/approval-requests/{id}/execution",
            get(|Path(id): Path<String>| async move {
                Json(execution_json(&id, "approved", "rejected", "rejected"))
            }),
        )
}

#[tokio::test]
async fn test_approve_advances_pipeline() {
    let app = TestApp::spawn(decision_backend).await;
    let id = ApprovalRequestId::new();

    let execution = app
        .api
        .approvals
        .decide(
            id,
            &ApprovalDecision {
                decision: Decision::Approve,
                comment: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(execution.request_id, id);
    assert_eq!(execution.status, ApprovalStatus::InProgress);
    let steps = execution.ordered_steps();
    assert_eq!(steps[0].stage_name, "Unit check");
    assert_eq!(steps[0].status, StepStatus::Approved);
    assert_eq!(
        execution.current_step().map(|s| s.stage_name.as_str()),
        Some("Finance review")
    );

    let sent = app.recorder.last().unwrap();
    assert_eq!(sent.path, format!("/api/approval-requests/{id}/decision"));
    assert_eq!(sent.body, json!({"decision": "approve"}));
}

#[tokio::test]
async fn test_reject_sends_comment() {
    let app = TestApp::spawn(decision_backend).await;

    app.api
        .approvals
        .decide(
            ApprovalRequestId::new(),
            &ApprovalDecision {
                decision: Decision::Reject,
                comment: Some("Nominee proof missing".to_string()),
            },
        )
        .await
        .unwrap();

    let sent = app.recorder.last().unwrap().body;
    assert_eq!(sent["decision"], "reject");
    assert_eq!(sent["comment"], "Nominee proof missing");
}

#[tokio::test]
async fn test_reject_without_comment_never_sent() {
    let app = TestApp::spawn(decision_backend).await;

    let err = app
        .api
        .approvals
        .decide(
            ApprovalRequestId::new(),
            &ApprovalDecision {
                decision: Decision::Reject,
                comment: Some("   ".to_string()),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.recorder.count(), 0);
}

#[tokio::test]
async fn test_rejected_pipeline_has_no_current_step() {
    let app = TestApp::spawn(decision_backend).await;

    let execution = app
        .api
        .approvals
        .execution(ApprovalRequestId::new())
        .await
        .unwrap();

    assert_eq!(execution.status, ApprovalStatus::Rejected);
    assert!(execution.current_step().is_none());
}

#[tokio::test]
async fn test_decided_stage_conflict() {
    let app = TestApp::spawn(|_| {
        Router::new().route(
            "/api/approval-requests/{id}/decision",
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({
                        "error": "STAGE_ALREADY_DECIDED",
                        "message": "This stage was decided by another approver",
                    })),
                )
            }),
        )
    })
    .await;

    let err = app
        .api
        .approvals
        .decide(
            ApprovalRequestId::new(),
            &ApprovalDecision {
                decision: Decision::Approve,
                comment: None,
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Business);
    assert!(err.has_code("STAGE_ALREADY_DECIDED"));
}

#[tokio::test]
async fn test_inbox_lists_pending_tasks() {
    let app = TestApp::spawn(|recorder| {
        Router::new().route(
            "/api/approval-tasks/search",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let recorder = recorder.clone();
                async move {
                    recorder.record("/api/approval-tasks/search", &headers, body);
                    Json(flat_page(
                        vec![json!({
                            "requestId": Uuid::new_v4(),
                            "stageId": Uuid::new_v4(),
                            "stageName": "Unit check",
                            "entityType": "member",
                            "entityLabel": "M-001 Asha Nair",
                            "assignedAt": "2024-05-01T12:00:00Z",
                        })],
                        1,
                        1,
                        10,
                    ))
                }
            }),
        )
    })
    .await;

    let inbox = app.api.approvals.inbox();
    let response = inbox.search(&SearchRequest::new(1, 10)).await.unwrap();

    assert_eq!(response.total_pages, 1);
    assert_eq!(response.items[0].stage_name, "Unit check");
    assert_eq!(
        response.items[0].entity_label.as_deref(),
        Some("M-001 Asha Nair")
    );
    assert_eq!(app.recorder.last().unwrap().path, "/api/approval-tasks/search");
}
