//! Integration tests for a table session driving real HTTP loads.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use serde_json::Value;
use tokio::sync::watch;

use memberhub_core::traits::SearchSource;
use memberhub_core::types::SortOrder;
use memberhub_entity::member::Member;
use memberhub_table::{
    DataTable, DataTableColumn, DataTableConfig, DataTableFilter, FilterComposer, FilterType,
    ListState, ListStore, SessionHandle, StagedValue, TableEvent, TableSession,
};

use helpers::{Recorder, TestApp, flat_page, member_json};

fn members_table() -> DataTableConfig<Member> {
    DataTableConfig::new()
        .column(DataTableColumn::new("memberCode", "Code").sortable())
        .column(DataTableColumn::new("firstName", "Name").sortable())
        .column(DataTableColumn::new("status", "Status"))
        .filter(DataTableFilter::new("status", "Status", FilterType::Select))
        .search_fields(["firstName", "memberCode"])
        .page_size(2)
        .debounce(Duration::from_millis(50))
        .default_sort("memberCode", SortOrder::Asc)
}

/// Serves three members over two pages. A `slow` term answers late and
/// page 3 fails.
fn members_backend(recorder: Recorder) -> Router {
    Router::new().route(
        "/api/members/search",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let recorder = recorder.clone();
            async move {
                recorder.record("/api/members/search", &headers, body.clone());
                let term = body["searchTerm"].as_str().unwrap_or_default().to_string();
                let page = body["page"].as_u64().unwrap_or(1) as u32;

                if term == "slow" {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                }
                if page == 3 {
                    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                }

                let items = match (term.as_str(), page) {
                    ("", 1) => vec![
                        member_json("M-001", "Asha", "active"),
                        member_json("M-002", "Bindu", "active"),
                    ],
                    ("", _) => vec![member_json("M-003", "Chitra", "suspended")],
                    (other, _) => vec![member_json("M-100", other, "active")],
                };
                let total = if term.is_empty() { 3 } else { 1 };
                Json(flat_page(items, total, page, 2)).into_response()
            }
        }),
    )
}

async fn start(
    app: &TestApp,
) -> (
    SessionHandle,
    watch::Receiver<ListState<Member>>,
    tokio::task::JoinHandle<DataTable<Member>>,
) {
    let config = Arc::new(members_table());
    let source: Arc<dyn SearchSource<Member>> = Arc::new(app.api.members.clone());
    let store = Arc::new(ListStore::new("members", source, config.page_size));
    let updates = store.subscribe();
    let table = DataTable::new(config, FilterComposer::utc());
    let (session, handle) = TableSession::new(table, store);
    let task = tokio::spawn(session.run());
    (handle, updates, task)
}

async fn wait_for<F>(updates: &mut watch::Receiver<ListState<Member>>, predicate: F)
where
    F: FnMut(&ListState<Member>) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), updates.wait_for(predicate))
        .await
        .expect("list state never matched")
        .expect("store dropped");
}

#[tokio::test]
async fn test_initial_load_and_paging() {
    let app = TestApp::spawn(members_backend).await;
    let (handle, mut updates, task) = start(&app).await;

    wait_for(&mut updates, |s| s.request.is_some() && !s.loading).await;
    {
        let state = updates.borrow();
        assert_eq!(state.response.items.len(), 2);
        assert_eq!(state.response.total_pages, 2);
    }
    let first = app.recorder.last().unwrap().body;
    assert_eq!(first["sortBy"], "memberCode");
    assert_eq!(first["sortOrder"], "asc");
    assert_eq!(first["pageSize"], 2);

    handle.send(TableEvent::NextPage).await.unwrap();
    wait_for(&mut updates, |s| s.response.page == 2 && !s.loading).await;
    assert_eq!(updates.borrow().response.items[0].member_code, "M-003");

    // Already on the last page.
    handle.send(TableEvent::NextPage).await.unwrap();
    handle.send(TableEvent::Shutdown).await.unwrap();
    let table = task.await.unwrap();
    assert_eq!(table.state().page, 2);
    assert_eq!(app.recorder.count(), 2);
}

#[tokio::test]
async fn test_typing_sends_one_debounced_search() {
    let app = TestApp::spawn(members_backend).await;
    let (handle, mut updates, task) = start(&app).await;
    wait_for(&mut updates, |s| s.request.is_some()).await;

    handle.send(TableEvent::SetPage(2)).await.unwrap();
    wait_for(&mut updates, |s| s.response.page == 2).await;

    for partial in ["m", "me", "mee", "meera"] {
        handle
            .send(TableEvent::SearchInput(partial.to_string()))
            .await
            .unwrap();
    }
    wait_for(&mut updates, |s| {
        s.request
            .as_ref()
            .and_then(|r| r.search_term.as_deref())
            == Some("meera")
    })
    .await;

    let searches: Vec<Value> = app
        .recorder
        .all()
        .into_iter()
        .map(|r| r.body)
        .filter(|b| b.get("searchTerm").is_some())
        .collect();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0]["page"], 1);
    assert_eq!(searches[0]["searchFields"][0], "firstName");
    assert_eq!(handle.table_state().page, 1);

    handle.send(TableEvent::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_slow_response_is_discarded() {
    let app = TestApp::spawn(members_backend).await;
    let (handle, mut updates, task) = start(&app).await;
    wait_for(&mut updates, |s| s.request.is_some()).await;

    handle
        .send(TableEvent::SearchInput("slow".to_string()))
        .await
        .unwrap();
    app.recorder.wait_for_count(2).await;
    handle
        .send(TableEvent::SearchInput("fast".to_string()))
        .await
        .unwrap();
    app.recorder.wait_for_count(3).await;

    // Outlive the slow handler.
    tokio::time::sleep(Duration::from_millis(500)).await;

    let state = updates.borrow().clone();
    assert!(!state.loading);
    assert_eq!(
        state.request.as_ref().and_then(|r| r.search_term.as_deref()),
        Some("fast")
    );
    assert_eq!(state.response.items.len(), 1);
    assert_eq!(state.response.items[0].first_name, "fast");

    handle.send(TableEvent::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_failed_load_keeps_previous_rows() {
    let app = TestApp::spawn(members_backend).await;
    let (handle, mut updates, task) = start(&app).await;
    wait_for(&mut updates, |s| s.request.is_some()).await;

    handle.send(TableEvent::SetPage(3)).await.unwrap();
    wait_for(&mut updates, |s| s.error.is_some()).await;

    let state = updates.borrow().clone();
    assert!(!state.loading);
    assert_eq!(state.response.page, 1);
    assert_eq!(state.response.items.len(), 2);
    assert_eq!(state.request.as_ref().map(|r| r.page), Some(1));

    handle.send(TableEvent::Refresh).await.unwrap();
    handle.send(TableEvent::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_applied_filter_reaches_server() {
    let app = TestApp::spawn(members_backend).await;
    let (handle, mut updates, task) = start(&app).await;
    wait_for(&mut updates, |s| s.request.is_some()).await;

    handle
        .send(TableEvent::StageFilter {
            key: "status".to_string(),
            value: StagedValue::Text("suspended".to_string()),
        })
        .await
        .unwrap();
    handle.send(TableEvent::ApplyFilters).await.unwrap();
    app.recorder.wait_for_count(2).await;

    let sent = app.recorder.last().unwrap().body;
    assert_eq!(sent["filters"][0]["field"], "status");
    assert_eq!(sent["filters"][0]["operator"], "equals");
    assert_eq!(sent["filters"][0]["value"], "suspended");
    assert_eq!(sent["page"], 1);

    handle.send(TableEvent::ClearFilters).await.unwrap();
    app.recorder.wait_for_count(3).await;
    assert!(app.recorder.last().unwrap().body.get("filters").is_none());

    handle.send(TableEvent::Shutdown).await.unwrap();
    task.await.unwrap();
}
