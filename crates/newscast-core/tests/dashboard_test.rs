#![allow(clippy::unwrap_used)]
// End-to-end tests for `Dashboard`, `Coordinator` and `BroadcastFlow`
// against a wiremock news service.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use newscast_core::{
    BroadcastPhase, BroadcastRequest, CacheKey, CacheStatus, Command, CommandResult,
    CoreError, Dashboard, DashboardConfig, ErrorKind, Platform, RemoveOutcome, ToggleOutcome,
    ToggleTarget,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn news_item(id: i64) -> Value {
    json!({
        "id": id,
        "title": format!("Story {id}"),
        "summary": null,
        "url": format!("https://example.com/{id}"),
        "published_at": "2025-01-10T08:00:00",
        "source_id": 1
    })
}

async fn setup() -> (MockServer, Dashboard) {
    let server = MockServer::start().await;
    let base = format!("{}/api/v1", server.uri());
    let config = DashboardConfig::from_url(&base)
        .unwrap()
        .with_timeout(Duration::from_secs(10));
    let dashboard = Dashboard::new(config).unwrap();
    (server, dashboard)
}

// ── Stateful fake remote ────────────────────────────────────────────

#[derive(Default)]
struct Remote {
    favorites: Vec<Value>,
    logs: Vec<Value>,
    next_id: i64,
}

type Shared = Arc<Mutex<Remote>>;

struct ListFavorites(Shared);

impl Respond for ListFavorites {
    fn respond(&self, _: &Request) -> ResponseTemplate {
        let remote = self.0.lock().unwrap();
        ResponseTemplate::new(200).set_body_json(&remote.favorites)
    }
}

struct AddFavorite(Shared);

impl Respond for AddFavorite {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let news_item_id = body["news_item_id"].as_i64().unwrap();
        let mut remote = self.0.lock().unwrap();

        if remote
            .favorites
            .iter()
            .any(|f| f["news_item"]["id"] == news_item_id)
        {
            return ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Already in favorites"}));
        }
        remote.next_id += 1;
        let favorite = json!({
            "id": remote.next_id,
            "news_item": news_item(news_item_id),
            "created_at": "2025-01-11T10:00:00"
        });
        remote.favorites.push(favorite.clone());
        ResponseTemplate::new(200).set_body_json(favorite)
    }
}

struct RemoveFavorite(Shared);

impl Respond for RemoveFavorite {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id: i64 = request
            .url
            .path_segments()
            .and_then(Iterator::last)
            .unwrap()
            .parse()
            .unwrap();
        let mut remote = self.0.lock().unwrap();
        let before = remote.favorites.len();
        remote.favorites.retain(|f| f["id"] != id);
        if remote.favorites.len() == before {
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Favorite not found"}))
        } else {
            ResponseTemplate::new(200).set_body_json(json!({"message": "Removed from favorites"}))
        }
    }
}

struct SendBroadcast(Shared);

impl Respond for SendBroadcast {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let mut remote = self.0.lock().unwrap();
        let id = i64::try_from(remote.logs.len()).unwrap() + 1;
        let log = json!({
            "id": id,
            "favorite_id": body["favorite_id"],
            "platform": body["platform"],
            "status": "sent",
            "message_preview": body["message_override"],
            "timestamp": "2025-01-11T10:05:00"
        });
        remote.logs.push(log.clone());
        ResponseTemplate::new(200).set_body_json(log)
    }
}

struct ListLogs(Shared);

impl Respond for ListLogs {
    fn respond(&self, _: &Request) -> ResponseTemplate {
        let remote = self.0.lock().unwrap();
        ResponseTemplate::new(200).set_body_json(&remote.logs)
    }
}

async fn mount_remote(server: &MockServer) -> Shared {
    let shared: Shared = Arc::default();

    Mock::given(method("GET"))
        .and(path("/api/v1/favorites"))
        .respond_with(ListFavorites(Arc::clone(&shared)))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/favorites"))
        .respond_with(AddFavorite(Arc::clone(&shared)))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/v1/favorites/\d+$"))
        .respond_with(RemoveFavorite(Arc::clone(&shared)))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/broadcast"))
        .respond_with(SendBroadcast(Arc::clone(&shared)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/broadcast/logs"))
        .respond_with(ListLogs(Arc::clone(&shared)))
        .mount(server)
        .await;

    shared
}

async fn favorite_item_ids(dashboard: &Dashboard) -> Vec<i64> {
    let entry = dashboard.favorites().await;
    assert_eq!(entry.status, CacheStatus::Ready);
    let mut ids: Vec<i64> = entry
        .data
        .unwrap()
        .iter()
        .map(|f| f.news_item.id)
        .collect();
    ids.sort_unstable();
    ids
}

// ── Cache reads ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_empty_news_page_is_ready_not_error() {
    let (server, dashboard) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/news"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"items": [], "total": 0, "page": 1})),
        )
        .mount(&server)
        .await;

    let entry = dashboard.news_page_with_limit(1, 20).await;
    assert_eq!(entry.status, CacheStatus::Ready);
    assert_eq!(entry.key, CacheKey::news_page(1, 20));
    let page = entry.data.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert!(entry.error.is_none());
}

#[tokio::test]
async fn test_news_page_transport_error_is_error_entry() {
    let (server, dashboard) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/news"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let entry = dashboard.news_page_with_limit(1, 20).await;
    assert_eq!(entry.status, CacheStatus::Error);
    assert!(entry.data.is_none());
    let error = entry.error.unwrap();
    assert_eq!(error.kind, ErrorKind::Transport);
    assert_eq!(error.status, Some(502));
}

#[tokio::test]
async fn test_concurrent_reads_fetch_once() {
    let (server, dashboard) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/favorites"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (a, b) = tokio::join!(dashboard.favorites(), dashboard.favorites());
    assert!(a.is_ready());
    assert!(b.is_ready());
}

#[tokio::test]
async fn test_double_invalidate_refetches_once() {
    let (server, dashboard) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/broadcast/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    dashboard.broadcast_logs().await;
    dashboard.store().invalidate(CacheKey::BroadcastLogs);
    dashboard.store().invalidate(CacheKey::BroadcastLogs);
    dashboard.broadcast_logs().await;
    dashboard.broadcast_logs().await;
}

#[tokio::test]
async fn test_closed_scope_discards_but_cache_commits() {
    let (server, dashboard) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/favorites"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1, "news_item": news_item(10)}]))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let scope = dashboard.scope();
    let closer = scope.clone();
    let (result, ()) = tokio::join!(scope.run(dashboard.favorites()), async move {
        closer.close();
    });

    assert!(result.is_none());
    let cached = dashboard.store().favorites().peek(CacheKey::Favorites).unwrap();
    assert!(cached.is_ready());
    assert_eq!(dashboard.is_favorited(10), Some(true));
}

// ── Favorites ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_favorites_match_remote_after_mutations() {
    let (server, dashboard) = setup().await;
    let remote = mount_remote(&server).await;
    let coordinator = dashboard.coordinator();

    assert!(favorite_item_ids(&dashboard).await.is_empty());

    let a = coordinator.add_favorite(42).await.unwrap();
    coordinator.add_favorite(43).await.unwrap();
    coordinator.add_favorite(44).await.unwrap();
    coordinator.remove_favorite(a.id).await.unwrap();

    assert_eq!(favorite_item_ids(&dashboard).await, vec![43, 44]);
    assert_eq!(remote.lock().unwrap().favorites.len(), 2);
}

#[tokio::test]
async fn test_add_then_remove_round_trip() {
    let (server, dashboard) = setup().await;
    mount_remote(&server).await;
    let coordinator = dashboard.coordinator();

    coordinator.add_favorite(1).await.unwrap();
    let before = favorite_item_ids(&dashboard).await;

    let added = coordinator.add_favorite(42).await.unwrap();
    assert_eq!(added.news_item.id, 42);
    assert_eq!(favorite_item_ids(&dashboard).await, vec![1, 42]);

    let outcome = coordinator.remove_favorite(added.id).await.unwrap();
    assert_eq!(outcome, RemoveOutcome::Removed);
    assert_eq!(favorite_item_ids(&dashboard).await, before);
}

#[tokio::test]
async fn test_remove_missing_favorite_is_soft_success() {
    let (server, dashboard) = setup().await;
    mount_remote(&server).await;

    dashboard.favorites().await;
    let outcome = dashboard.coordinator().remove_favorite(99).await.unwrap();

    assert_eq!(outcome, RemoveOutcome::AlreadyRemoved);
    let entry = dashboard.store().favorites().peek(CacheKey::Favorites).unwrap();
    assert!(entry.invalidated);
    assert!(entry.error.is_none());
}

#[tokio::test]
async fn test_duplicate_add_is_conflict_without_invalidation() {
    let (server, dashboard) = setup().await;
    mount_remote(&server).await;
    let coordinator = dashboard.coordinator();

    coordinator.add_favorite(42).await.unwrap();
    dashboard.favorites().await;

    let err = coordinator.add_favorite(42).await.unwrap_err();
    assert!(matches!(err, CoreError::Conflict { .. }), "got: {err:?}");
    let entry = dashboard.store().favorites().peek(CacheKey::Favorites).unwrap();
    assert!(!entry.invalidated);
}

#[tokio::test]
async fn test_toggle_news_item_adds_then_removes() {
    let (server, dashboard) = setup().await;
    mount_remote(&server).await;

    let first = dashboard
        .execute(Command::ToggleFavorite(ToggleTarget::NewsItem(7)))
        .await
        .unwrap();
    assert!(matches!(
        first,
        CommandResult::Toggled {
            outcome: ToggleOutcome::Added { .. }
        }
    ));
    assert_eq!(favorite_item_ids(&dashboard).await, vec![7]);

    let second = dashboard
        .execute(Command::ToggleFavorite(ToggleTarget::NewsItem(7)))
        .await
        .unwrap();
    assert!(matches!(
        second,
        CommandResult::Toggled {
            outcome: ToggleOutcome::Removed {
                outcome: RemoveOutcome::Removed,
                ..
            }
        }
    ));
    assert!(favorite_item_ids(&dashboard).await.is_empty());
}

#[tokio::test]
async fn test_toggle_known_favorite_removes_it() {
    let (server, dashboard) = setup().await;
    mount_remote(&server).await;

    let favorite = dashboard.coordinator().add_favorite(5).await.unwrap();
    let outcome = dashboard
        .coordinator()
        .toggle_favorite(ToggleTarget::Favorite(favorite.clone()))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ToggleOutcome::Removed {
            favorite_id: favorite.id,
            outcome: RemoveOutcome::Removed
        }
    );
}

// ── News refresh ────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_invalidates_pages_even_on_failure() {
    let (server, dashboard) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/news"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"items": [news_item(1)], "total": 1, "page": 1})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/news/refresh"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "feed down"})))
        .mount(&server)
        .await;

    dashboard.news_page_with_limit(1, 20).await;
    dashboard.news_page_with_limit(2, 20).await;

    let err = dashboard.coordinator().trigger_refresh().await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    for page in 1..=2 {
        let entry = dashboard
            .store()
            .news_pages()
            .peek(CacheKey::news_page(page, 20))
            .unwrap();
        assert!(entry.invalidated, "page {page} not invalidated");
    }
}

#[tokio::test]
async fn test_refresh_success_returns_summary() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/news/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "inserted": 3,
            "duplicates": 1,
            "message": "Ingestion completed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = dashboard.execute(Command::RefreshNews).await.unwrap();
    match result {
        CommandResult::Refreshed { summary } => {
            assert_eq!(summary.inserted, Some(3));
            assert_eq!(summary.duplicates, Some(1));
        }
        other => panic!("expected Refreshed, got: {other:?}"),
    }
}

// ── Broadcast ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_broadcast_success_shows_in_logs() {
    let (server, dashboard) = setup().await;
    mount_remote(&server).await;

    let logs = dashboard.broadcast_logs().await;
    assert!(logs.data.unwrap().is_empty());

    let flow = dashboard.broadcast_flow(7);
    flow.select_platform(Platform::Email).unwrap();
    let outcome = flow.submit().await.unwrap();

    assert!(outcome.delivered);
    assert_eq!(flow.phase(), BroadcastPhase::Succeeded);

    let logs = dashboard.broadcast_logs().await;
    let logs = logs.data.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].favorite_id, 7);
    assert_eq!(logs[0].platform.as_deref(), Some("email"));
}

#[tokio::test]
async fn test_broadcast_sends_null_override_for_blank_message() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/broadcast"))
        .and(wiremock::matchers::body_json(json!({
            "favorite_id": 7,
            "platform": "whatsapp",
            "message_override": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"delivered": true})))
        .expect(1)
        .mount(&server)
        .await;

    let request = BroadcastRequest::new(7, Platform::Whatsapp).with_message(Some("   ".into()));
    let result = dashboard.execute(Command::Broadcast(request)).await.unwrap();
    assert!(matches!(result, CommandResult::Broadcast { outcome } if outcome.delivered));
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_rejected() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/broadcast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"delivered": true, "detail": "queued"}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let flow = Arc::new(dashboard.broadcast_flow(7));
    flow.select_platform(Platform::Linkedin).unwrap();

    let mut phases = flow.subscribe();
    let first = {
        let flow = Arc::clone(&flow);
        tokio::spawn(async move { flow.submit().await })
    };
    phases
        .wait_for(|s| s.phase == BroadcastPhase::Submitting)
        .await
        .unwrap();

    let second = flow.submit().await;
    assert!(matches!(second, Err(CoreError::SubmissionInFlight)));

    let outcome = first.await.unwrap().unwrap();
    assert_eq!(outcome.detail.as_deref(), Some("queued"));
    assert_eq!(flow.snapshot().attempts, 1);
}

#[tokio::test]
async fn test_rejected_platform_fails_flow() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/broadcast"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Invalid broadcast platform"})),
        )
        .mount(&server)
        .await;

    let flow = dashboard.broadcast_flow(7);
    flow.select_platform(Platform::Blog).unwrap();
    let err = flow.submit().await.unwrap_err();

    assert!(matches!(err, CoreError::Validation { .. }), "got: {err:?}");
    let snap = flow.snapshot();
    assert_eq!(snap.phase, BroadcastPhase::Failed);
    assert_eq!(snap.error.unwrap().kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_not_found_names_the_missing_entity() {
    let (server, dashboard) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/broadcast"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Favorite not found"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/favorites"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "News item not found"})),
        )
        .mount(&server)
        .await;

    let flow = dashboard.broadcast_flow(99);
    flow.select_platform(Platform::Email).unwrap();
    let err = flow.submit().await.unwrap_err();
    assert!(
        matches!(err, CoreError::NotFound { ref entity_type, ref identifier }
            if entity_type == "favorite" && identifier == "99"),
        "got: {err:?}"
    );
    assert_eq!(flow.snapshot().error.unwrap().kind, ErrorKind::NotFound);

    let err = dashboard.coordinator().add_favorite(5).await.unwrap_err();
    assert!(
        matches!(err, CoreError::NotFound { ref entity_type, ref identifier }
            if entity_type == "news item" && identifier == "5"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_undelivered_broadcast_fails_but_invalidates_logs() {
    let (server, dashboard) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/broadcast/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/broadcast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "status": "failed",
            "message_preview": "SMTP relay refused"
        })))
        .mount(&server)
        .await;

    dashboard.broadcast_logs().await;
    let flow = dashboard.broadcast_flow(7);
    flow.select_platform(Platform::Newsletter).unwrap();
    let err = flow.submit().await.unwrap_err();

    assert!(
        matches!(err, CoreError::NotDelivered { ref detail } if detail == "SMTP relay refused")
    );
    let snap = flow.snapshot();
    assert_eq!(snap.phase, BroadcastPhase::Failed);
    assert_eq!(snap.outcome.unwrap().log_id, Some(3));
    assert!(
        dashboard
            .store()
            .broadcast_logs()
            .peek(CacheKey::BroadcastLogs)
            .unwrap()
            .invalidated
    );
}
