//! Tests for controller module

use super::*;
use crate::error::{Error, Result, FETCH_FAILED_MESSAGE};
use crate::pagination::{BoundaryMode, Navigation, PageRequest, Position};
use crate::types::{ResultSet, Row, RowId, Strategy};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

const TOTAL_ROWS: RowId = 95;

/// Serves ids 1..=95 for every strategy and records each request
#[derive(Default)]
struct ScriptedSource {
    requests: std::sync::Mutex<Vec<PageRequest>>,
    fail: std::sync::atomic::AtomicBool,
}

impl ScriptedSource {
    fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn set_failing(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl ListingSource for ScriptedSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<ResultSet> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(Error::http_status(502, "bad gateway"));
        }

        let size = RowId::from(request.page_size);
        let start = match (request.page, request.cursor_id) {
            (Some(page), _) => (RowId::from(page) - 1) * size + 1,
            (None, cursor) => cursor.unwrap_or(0) + 1,
        };
        let end = (start + size - 1).min(TOTAL_ROWS);
        let rows = (start..=end)
            .map(|id| Row::new(id).with_field("username", format!("user{id}")))
            .collect();

        let total = (TOTAL_ROWS as u32).div_ceil(request.page_size);
        Ok(ResultSet::new(rows)
            .with_duration(1.0)
            .with_total_pages(total))
    }
}

/// Holds every fetch until the test releases it, keyed by strategy
#[derive(Default)]
struct GatedSource {
    gates: std::sync::Mutex<HashMap<Strategy, oneshot::Receiver<ResultSet>>>,
}

impl GatedSource {
    fn gate(&self, strategy: Strategy) -> oneshot::Sender<ResultSet> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(strategy, rx);
        tx
    }
}

#[async_trait]
impl ListingSource for GatedSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<ResultSet> {
        let rx = self
            .gates
            .lock()
            .unwrap()
            .remove(&request.strategy)
            .expect("no gate for strategy");
        rx.await
            .map_err(|_| Error::Other("gate dropped".to_string()))
    }
}

/// Never answers in time
struct SlowSource;

#[async_trait]
impl ListingSource for SlowSource {
    async fn fetch_page(&self, _request: &PageRequest) -> Result<ResultSet> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(ResultSet::default())
    }
}

fn state(strategy: Strategy) -> ViewState {
    ViewState::new(strategy, 10, vec![5, 10, 25, 50], BoundaryMode::Derived)
}

fn scripted(strategy: Strategy) -> (Session, Arc<ScriptedSource>) {
    let source = Arc::new(ScriptedSource::default());
    let session = Session::new(state(strategy), source.clone(), Duration::from_secs(5));
    (session, source)
}

fn ids(state: &ViewState) -> Vec<RowId> {
    state.rows().iter().map(|r| r.id).collect()
}

fn page_of(first: RowId, last: RowId) -> ResultSet {
    ResultSet::new((first..=last).map(Row::new).collect())
}

async fn wait_for_seq(session: &Session, seq: u64) {
    while session.with_state(ViewState::latest_seq).await < seq {
        tokio::task::yield_now().await;
    }
}

// ============================================================================
// ViewState Tests
// ============================================================================

#[test]
fn test_view_state_defaults() {
    let state = ViewState::default();
    assert_eq!(state.strategy(), Strategy::Offset);
    assert_eq!(state.position(), &Position::Offset { page: 1 });
    assert_eq!(state.page_size(), 10);
    assert!(state.rows().is_empty());
    assert!(!state.has_loaded());
    assert!(state.error().is_none());
}

#[test]
fn test_set_strategy_clears_everything() {
    let mut state = state(Strategy::Offset);
    let ticket = state.begin_fetch();
    state.complete_fetch(&ticket, Ok(page_of(1, 10).with_total_pages(10)));
    state.go_to_page(4).unwrap();

    assert_eq!(state.set_strategy(Strategy::Keyset), Navigation::Moved);
    assert_eq!(
        state.position(),
        &Position::Keyset {
            cursor: None,
            back_stack: vec![]
        }
    );
    assert!(state.rows().is_empty());
    assert!(state.trusted_total().is_none());
    assert!(!state.has_loaded());

    assert_eq!(state.set_strategy(Strategy::Keyset), Navigation::Unchanged);
}

#[test]
fn test_set_page_size_validates_and_resets() {
    let mut state = state(Strategy::Keyset);
    let ticket = state.begin_fetch();
    state.complete_fetch(&ticket, Ok(page_of(1, 10)));
    state.go_next().unwrap();

    let err = state.set_page_size(7).unwrap_err();
    assert!(matches!(err, Error::InvalidPageSize { size: 7, .. }));
    assert_eq!(state.position().cursor(), Some(10));

    assert_eq!(state.set_page_size(10).unwrap(), Navigation::Unchanged);

    assert_eq!(state.set_page_size(25).unwrap(), Navigation::Moved);
    assert_eq!(state.page_size(), 25);
    assert_eq!(state.position().cursor(), None);
    assert!(state.position().back_stack().is_empty());
}

#[test]
fn test_superseded_ticket_is_stale() {
    let mut state = state(Strategy::Offset);
    let first = state.begin_fetch();
    let second = state.begin_fetch();

    assert_eq!(
        state.complete_fetch(&first, Ok(page_of(1, 10))),
        FetchOutcome::Stale
    );
    assert!(state.rows().is_empty());

    assert_eq!(
        state.complete_fetch(&second, Ok(page_of(1, 10))),
        FetchOutcome::Applied
    );
    assert_eq!(state.rows().len(), 10);
}

#[test]
fn test_ticket_for_moved_position_is_stale() {
    let mut state = state(Strategy::Offset);
    let ticket = state.begin_fetch();
    state.go_next().unwrap();

    assert_eq!(
        state.complete_fetch(&ticket, Ok(page_of(1, 10))),
        FetchOutcome::Stale
    );
}

#[test]
fn test_total_pages_trust() {
    let mut state = state(Strategy::Keyset);
    let ticket = state.begin_fetch();
    state.complete_fetch(&ticket, Ok(page_of(1, 10).with_total_pages(9)));
    assert_eq!(state.trusted_total(), None);

    state.set_strategy(Strategy::KeysetWithTotal);
    let ticket = state.begin_fetch();
    state.complete_fetch(&ticket, Ok(page_of(1, 10).with_total_pages(9)));
    assert_eq!(state.trusted_total(), Some(9));

    // Absent count keeps the last known one
    state.go_next().unwrap();
    let ticket = state.begin_fetch();
    state.complete_fetch(&ticket, Ok(page_of(11, 20)));
    assert_eq!(state.trusted_total(), Some(9));
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_mount_fetches_first_offset_page() {
    let (session, source) = scripted(Strategy::Offset);

    assert_eq!(session.mount().await, FetchOutcome::Applied);
    assert!(!session.is_loading());

    let state = session.snapshot().await;
    assert_eq!(ids(&state), (1..=10).collect::<Vec<_>>());
    assert_eq!(state.trusted_total(), Some(10));

    let requests = source.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].page, Some(1));
    assert_eq!(requests[0].page_size, 10);
}

#[tokio::test]
async fn test_keyset_next_then_prev_end_to_end() {
    let (session, source) = scripted(Strategy::Keyset);
    session.mount().await;

    session.go_next().await.unwrap();
    let state = session.snapshot().await;
    assert_eq!(state.position().cursor(), Some(10));
    assert_eq!(state.position().back_stack(), &[0]);
    assert_eq!(ids(&state), (11..=20).collect::<Vec<_>>());

    session.go_prev().await.unwrap();
    let state = session.snapshot().await;
    assert_eq!(state.position().cursor(), Some(0));
    assert!(state.position().back_stack().is_empty());
    assert_eq!(ids(&state), (1..=10).collect::<Vec<_>>());
    assert!(!state.can_go_prev());

    let cursors: Vec<_> = source.requests().iter().map(|r| r.cursor_id).collect();
    assert_eq!(cursors, vec![None, Some(10), Some(0)]);
}

#[tokio::test]
async fn test_prev_on_first_page_never_fetches() {
    let (session, source) = scripted(Strategy::Keyset);
    session.mount().await;

    let err = session.go_prev().await.unwrap_err();
    assert!(err.is_navigation());
    assert_eq!(source.requests().len(), 1);
}

#[tokio::test]
async fn test_offset_next_clamped_on_last_page() {
    let (session, source) = scripted(Strategy::Offset);
    session.mount().await;
    session.go_to_page(10).await.unwrap();
    assert_eq!(source.requests().len(), 2);

    let outcome = session.go_next().await.unwrap();
    assert_eq!(outcome, FetchOutcome::Skipped);
    assert_eq!(session.snapshot().await.position().page(), Some(10));
    assert_eq!(source.requests().len(), 2);
}

#[tokio::test]
async fn test_go_to_page_out_of_range_is_noop() {
    let (session, source) = scripted(Strategy::Join);
    session.mount().await;

    assert!(session.go_to_page(0).await.is_err());
    assert!(session.go_to_page(11).await.is_err());
    assert_eq!(source.requests().len(), 1);

    assert_eq!(session.go_to_page(7).await.unwrap(), FetchOutcome::Applied);
    let state = session.snapshot().await;
    assert_eq!(state.position().page(), Some(7));
    assert_eq!(ids(&state).first(), Some(&61));
    assert_eq!(source.requests().len(), 2);
}

#[tokio::test]
async fn test_page_size_change_on_page_three() {
    let (session, source) = scripted(Strategy::Offset);
    session.mount().await;
    session.go_next().await.unwrap();
    session.go_next().await.unwrap();
    assert_eq!(session.snapshot().await.position().page(), Some(3));

    session.set_page_size(25).await.unwrap();

    let state = session.snapshot().await;
    assert_eq!(state.position().page(), Some(1));
    assert_eq!(ids(&state).len(), 25);
    let last = source.requests().pop().unwrap();
    assert_eq!(last.page, Some(1));
    assert_eq!(last.page_size, 25);
}

#[tokio::test]
async fn test_failure_keeps_rows_and_position() {
    let (session, source) = scripted(Strategy::Offset);
    session.mount().await;
    source.set_failing(true);

    let outcome = session.go_next().await.unwrap();
    assert_eq!(outcome, FetchOutcome::Failed);
    assert!(!session.is_loading());

    let state = session.snapshot().await;
    assert_eq!(state.error(), Some(FETCH_FAILED_MESSAGE));
    assert!(state.error_detail().unwrap().contains("502"));
    assert_eq!(ids(&state), (1..=10).collect::<Vec<_>>());
    assert_eq!(state.position().page(), Some(1));

    source.set_failing(false);
    assert_eq!(session.go_next().await.unwrap(), FetchOutcome::Applied);
    let state = session.snapshot().await;
    assert!(state.error().is_none());
    assert_eq!(state.position().page(), Some(2));
    assert_eq!(ids(&state).first(), Some(&11));
}

#[tokio::test]
async fn test_keyset_next_retries_after_failure() {
    let (session, source) = scripted(Strategy::Keyset);
    session.mount().await;
    source.set_failing(true);

    assert_eq!(session.go_next().await.unwrap(), FetchOutcome::Failed);
    let state = session.snapshot().await;
    assert_eq!(state.position().cursor(), None);
    assert!(state.position().back_stack().is_empty());
    assert_eq!(ids(&state).first(), Some(&1));

    source.set_failing(false);
    let before = source.requests().len();
    assert_eq!(session.go_next().await.unwrap(), FetchOutcome::Applied);
    assert_eq!(source.requests().len(), before + 1);

    let state = session.snapshot().await;
    assert_eq!(state.position().cursor(), Some(10));
    assert_eq!(state.position().back_stack(), &[0]);
    assert_eq!(ids(&state), (11..=20).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_keyset_next_waits_for_pending_prev() {
    let source = Arc::new(GatedSource::default());
    let session = Session::new(state(Strategy::Keyset), source.clone(), Duration::from_secs(5));

    source.gate(Strategy::Keyset).send(page_of(1, 10)).unwrap();
    session.mount().await;
    source.gate(Strategy::Keyset).send(page_of(11, 20)).unwrap();
    assert_eq!(session.go_next().await.unwrap(), FetchOutcome::Applied);

    let gate = source.gate(Strategy::Keyset);
    let prev = tokio::spawn({
        let session = session.clone();
        async move { session.go_prev().await }
    });
    wait_for_seq(&session, 3).await;

    // Rows 11..=20 are still shown but belong to the page being left
    assert_eq!(session.go_next().await.unwrap(), FetchOutcome::Skipped);
    let state = session.snapshot().await;
    assert_eq!(state.position().cursor(), Some(0));
    assert!(state.position().back_stack().is_empty());

    gate.send(page_of(1, 10)).unwrap();
    assert_eq!(prev.await.unwrap().unwrap(), FetchOutcome::Applied);
    let state = session.snapshot().await;
    assert_eq!(ids(&state), (1..=10).collect::<Vec<_>>());
    assert_eq!(state.position().ordinal(), 1);
}

#[tokio::test]
async fn test_keyset_end_of_data() {
    let (session, source) = scripted(Strategy::Keyset);
    session.mount().await;
    for _ in 0..9 {
        session.go_next().await.unwrap();
    }
    let state = session.snapshot().await;
    assert_eq!(ids(&state), (91..=95).collect::<Vec<_>>());

    // Short page still advances; the next response is empty
    assert_eq!(session.go_next().await.unwrap(), FetchOutcome::Applied);
    let state = session.snapshot().await;
    assert!(state.rows().is_empty());
    assert!(state.error().is_none());

    let before = source.requests().len();
    assert_eq!(session.go_next().await.unwrap(), FetchOutcome::Skipped);
    assert_eq!(source.requests().len(), before);

    // Prev still works from the empty page
    assert_eq!(session.go_prev().await.unwrap(), FetchOutcome::Applied);
    assert_eq!(ids(&session.snapshot().await).first(), Some(&91));
}

#[tokio::test]
async fn test_timeout_is_a_failure() {
    let session = Session::new(
        state(Strategy::Offset),
        Arc::new(SlowSource),
        Duration::from_millis(20),
    );

    assert_eq!(session.mount().await, FetchOutcome::Failed);
    assert!(!session.is_loading());

    let state = session.snapshot().await;
    assert_eq!(state.error(), Some(FETCH_FAILED_MESSAGE));
    assert!(state.error_detail().unwrap().contains("timeout"));
}

#[tokio::test]
async fn test_strategy_switch_clears_rows_before_fetch_lands() {
    let source = Arc::new(GatedSource::default());
    let session = Session::new(state(Strategy::Offset), source.clone(), Duration::from_secs(5));

    source.gate(Strategy::Offset).send(page_of(1, 10)).unwrap();
    session.mount().await;
    assert_eq!(session.snapshot().await.rows().len(), 10);

    let gate = source.gate(Strategy::Join);
    let task = tokio::spawn({
        let session = session.clone();
        async move { session.set_strategy(Strategy::Join).await }
    });
    wait_for_seq(&session, 2).await;

    assert!(session.is_loading());
    let state = session.snapshot().await;
    assert!(state.rows().is_empty());
    assert_eq!(state.position(), &Position::Offset { page: 1 });

    gate.send(page_of(1, 10)).unwrap();
    assert_eq!(task.await.unwrap(), FetchOutcome::Applied);
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_slow_old_strategy_cannot_overwrite_new_one() {
    let source = Arc::new(GatedSource::default());
    let session = Session::new(state(Strategy::Offset), source.clone(), Duration::from_secs(5));

    let gate_a = source.gate(Strategy::Offset);
    let task_a = tokio::spawn({
        let session = session.clone();
        async move { session.mount().await }
    });
    wait_for_seq(&session, 1).await;

    let gate_b = source.gate(Strategy::Keyset);
    let task_b = tokio::spawn({
        let session = session.clone();
        async move { session.set_strategy(Strategy::Keyset).await }
    });
    wait_for_seq(&session, 2).await;

    gate_b.send(page_of(500, 509)).unwrap();
    assert_eq!(task_b.await.unwrap(), FetchOutcome::Applied);

    gate_a.send(page_of(1, 10)).unwrap();
    assert_eq!(task_a.await.unwrap(), FetchOutcome::Stale);

    let state = session.snapshot().await;
    assert_eq!(state.strategy(), Strategy::Keyset);
    assert_eq!(ids(&state), (500..=509).collect::<Vec<_>>());
    assert!(!session.is_loading());
}
