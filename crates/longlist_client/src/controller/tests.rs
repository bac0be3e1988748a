//! Controller state-machine tests driven through a scripted backend.

use super::*;
use crate::debounce::SEARCH_DEBOUNCE;
use crossbeam_channel::{unbounded, Receiver, Sender};
use longlist_core::models::item::ItemView;
use longlist_core::models::state::{ItemsPage, StateSnapshot};

struct TestHarness {
    controller: ListController,
    cmd_rx: Receiver<CoreCmd>,
    evt_tx: Sender<CoreEvent>,
}

fn make_controller() -> TestHarness {
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded();
    let controller = ListController::new(BackendHandle { cmd_tx, evt_rx });
    TestHarness {
        controller,
        cmd_rx,
        evt_tx,
    }
}

fn view(id: u64) -> ItemView {
    ItemView {
        id,
        text: format!("Item {}", id),
        is_selected: false,
    }
}

fn page(ids: impl IntoIterator<Item = u64>, total: usize) -> ItemsPage {
    ItemsPage {
        items: ids.into_iter().map(view).collect(),
        total,
    }
}

fn recv_cmd(rx: &Receiver<CoreCmd>) -> CoreCmd {
    rx.try_recv().expect("expected backend command")
}

fn assert_no_cmd(rx: &Receiver<CoreCmd>) {
    assert!(
        matches!(rx.try_recv(), Err(TryRecvError::Empty)),
        "unexpected backend command"
    );
}

/// Complete the startup `GetState` fetch with `total` items loaded 20 at a time.
fn finish_startup(harness: &mut TestHarness, total: usize, selected: Vec<u64>) {
    let generation = match recv_cmd(&harness.cmd_rx) {
        CoreCmd::FetchState { generation } => generation,
        other => panic!("unexpected command: {:?}", other),
    };
    let first = page(1..=20.min(total as u64), total);
    harness
        .evt_tx
        .send(CoreEvent::StateLoaded {
            generation,
            snapshot: StateSnapshot {
                items: first.items,
                total,
                selected_ids: selected,
            },
        })
        .expect("send state");
    harness.controller.poll_events();
}

fn settle_query(harness: &mut TestHarness, query: &str) -> Generation {
    let now = Instant::now();
    harness.controller.set_query(query, now);
    assert!(harness.controller.tick(now + SEARCH_DEBOUNCE));
    harness.controller.generation()
}

#[test]
fn startup_fetches_state_and_loads_selection() {
    let mut harness = make_controller();
    assert!(harness.controller.is_loading());
    finish_startup(&mut harness, 100, vec![4, 2]);

    assert!(!harness.controller.is_loading());
    assert_eq!(harness.controller.buffer().len(), 20);
    assert_eq!(harness.controller.row_count(), 21);
    assert_eq!(harness.controller.selected_ids(), vec![2, 4]);
    assert_eq!(harness.controller.row(20), Some(Row::Placeholder));
}

#[test]
fn scrolling_near_end_requests_one_incremental_page() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 100, Vec::new());

    assert!(!harness.controller.on_visible_range(10));
    assert_no_cmd(&harness.cmd_rx);

    assert!(harness.controller.on_visible_range(16));
    let generation = match recv_cmd(&harness.cmd_rx) {
        CoreCmd::FetchWindow {
            generation,
            offset,
            limit,
            query,
        } => {
            assert_eq!(offset, 20);
            assert_eq!(limit, DEFAULT_PAGE_LIMIT);
            assert!(query.is_empty());
            generation
        }
        other => panic!("unexpected command: {:?}", other),
    };

    assert!(!harness.controller.on_visible_range(20), "fetch already pending");
    assert_no_cmd(&harness.cmd_rx);

    harness
        .evt_tx
        .send(CoreEvent::WindowLoaded {
            generation,
            offset: 20,
            page: page(21..=40, 100),
        })
        .expect("send window");
    harness.controller.poll_events();
    assert_eq!(harness.controller.buffer().ids(), (1..=40).collect::<Vec<u64>>());
    assert!(!harness.controller.is_loading());
}

#[test]
fn settled_search_resets_buffer_and_fetches_forty() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 100, Vec::new());

    let generation = settle_query(&mut harness, "5");
    assert!(harness.controller.buffer().is_empty());
    assert!(harness.controller.is_loading());
    match recv_cmd(&harness.cmd_rx) {
        CoreCmd::FetchWindow {
            generation: sent,
            offset,
            limit,
            query,
        } => {
            assert_eq!(sent, generation);
            assert_eq!(offset, 0);
            assert_eq!(limit, SEARCH_PAGE_LIMIT);
            assert_eq!(query, "5");
        }
        other => panic!("unexpected command: {:?}", other),
    }

    harness
        .evt_tx
        .send(CoreEvent::WindowLoaded {
            generation,
            offset: 0,
            page: page([5], 1),
        })
        .expect("send window");
    harness.controller.poll_events();
    assert_eq!(harness.controller.buffer().ids(), vec![5]);
    assert_eq!(harness.controller.row_count(), 1);
    assert_eq!(harness.controller.active_query(), "5");
}

#[test]
fn keystroke_burst_produces_single_fetch() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 100, Vec::new());

    let start = Instant::now();
    for (step, raw) in ["i", "it", "ite", "item"].into_iter().enumerate() {
        let at = start + Duration::from_millis(50 * step as u64);
        harness.controller.set_query(raw, at);
        assert!(!harness.controller.tick(at));
    }
    assert_no_cmd(&harness.cmd_rx);
    assert_eq!(harness.controller.raw_query(), "item");
    assert_eq!(harness.controller.active_query(), "");

    assert!(harness
        .controller
        .tick(start + Duration::from_millis(150) + SEARCH_DEBOUNCE));
    assert!(matches!(
        recv_cmd(&harness.cmd_rx),
        CoreCmd::FetchWindow { ref query, .. } if query == "item"
    ));
    assert!(!harness.controller.tick(start + SEARCH_DEBOUNCE * 10));
    assert_no_cmd(&harness.cmd_rx);
}

#[test]
fn clearing_query_refetches_initial_state() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 100, Vec::new());
    settle_query(&mut harness, "7");
    let _ = recv_cmd(&harness.cmd_rx);

    settle_query(&mut harness, "");
    assert!(matches!(
        recv_cmd(&harness.cmd_rx),
        CoreCmd::FetchState { .. }
    ));
}

#[test]
fn stale_response_for_superseded_query_is_discarded() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 100, Vec::new());

    let old_generation = settle_query(&mut harness, "1");
    let _ = recv_cmd(&harness.cmd_rx);
    let new_generation = settle_query(&mut harness, "2");
    let _ = recv_cmd(&harness.cmd_rx);
    assert!(new_generation > old_generation);

    harness
        .evt_tx
        .send(CoreEvent::WindowLoaded {
            generation: old_generation,
            offset: 0,
            page: page([1, 10, 11], 20),
        })
        .expect("send stale");
    harness.controller.poll_events();
    assert!(harness.controller.buffer().is_empty());
    assert!(harness.controller.is_loading(), "new query still in flight");
    assert_eq!(harness.controller.stats().stale_responses_discarded, 1);

    harness
        .evt_tx
        .send(CoreEvent::WindowLoaded {
            generation: new_generation,
            offset: 0,
            page: page([2, 12], 2),
        })
        .expect("send current");
    harness.controller.poll_events();
    assert_eq!(harness.controller.buffer().ids(), vec![2, 12]);
    assert!(!harness.controller.is_loading());
}

#[test]
fn fetch_failure_is_silent_and_clears_loading() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 100, Vec::new());
    assert!(harness.controller.request_more());
    let generation = harness.controller.generation();
    let _ = recv_cmd(&harness.cmd_rx);

    harness
        .evt_tx
        .send(CoreEvent::Error {
            source: CoreErrorSource::Window,
            generation: Some(generation),
            message: "Failed to fetch items: connection refused".to_string(),
        })
        .expect("send error");
    harness.controller.poll_events();

    assert!(!harness.controller.is_loading());
    assert_eq!(harness.controller.buffer().len(), 20);
    assert_eq!(harness.controller.stats().errors, 1);
    assert!(harness
        .controller
        .last_error()
        .is_some_and(|message| message.contains("connection refused")));
    assert_no_cmd(&harness.cmd_rx);
}

#[test]
fn update_failure_does_not_clear_pending_fetch() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 100, Vec::new());
    assert!(harness.controller.request_more());
    let _ = recv_cmd(&harness.cmd_rx);

    harness
        .evt_tx
        .send(CoreEvent::Error {
            source: CoreErrorSource::Update,
            generation: None,
            message: "Failed to update state: timeout".to_string(),
        })
        .expect("send error");
    harness.controller.poll_events();
    assert!(harness.controller.is_loading());
    assert!(!harness.controller.request_more());
}

#[test]
fn toggling_selection_sends_whole_set() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 100, vec![3]);

    harness.controller.toggle_selection(9, true);
    assert_eq!(
        recv_cmd(&harness.cmd_rx),
        CoreCmd::UpdateState {
            request: UpdateStateRequest::selected(vec![3, 9]),
        }
    );

    harness.controller.toggle_selection(3, false);
    assert_eq!(
        recv_cmd(&harness.cmd_rx),
        CoreCmd::UpdateState {
            request: UpdateStateRequest::selected(vec![9]),
        }
    );
    assert!(!harness.controller.is_selected(3));
    assert!(harness.controller.is_selected(9));
}

#[test]
fn drag_hover_reorders_locally_and_keeps_order_when_update_fails() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 10, Vec::new());

    assert!(harness.controller.hover_drag(3, 0));
    let expected: Vec<u64> = [3, 1, 2, 4, 5, 6, 7, 8, 9, 10].to_vec();
    assert_eq!(harness.controller.buffer().ids(), expected);
    assert_eq!(
        recv_cmd(&harness.cmd_rx),
        CoreCmd::UpdateState {
            request: UpdateStateRequest::sorted(expected.clone()),
        }
    );

    harness
        .evt_tx
        .send(CoreEvent::Error {
            source: CoreErrorSource::Update,
            generation: None,
            message: "Failed to update state: offline".to_string(),
        })
        .expect("send error");
    harness.controller.poll_events();
    assert_eq!(harness.controller.buffer().ids(), expected, "no rollback");

    assert!(!harness.controller.hover_drag(3, 0));
    assert!(!harness.controller.hover_drag(42, 1));
    assert_no_cmd(&harness.cmd_rx);
}

#[test]
fn disconnected_backend_clears_loading() {
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded::<CoreEvent>();
    let mut controller = ListController::new(BackendHandle { cmd_tx, evt_rx });
    drop(cmd_rx);
    drop(evt_tx);

    assert!(controller.is_loading());
    controller.poll_events();
    assert!(!controller.is_loading());
    assert_eq!(controller.last_error(), Some("backend disconnected"));
}

fn row_is_selected(controller: &ListController, index: usize) -> bool {
    match controller.row(index) {
        Some(Row::Item(item)) => item.is_selected,
        other => panic!("expected loaded row at {}, got {:?}", index, other),
    }
}

#[test]
fn toggling_selection_updates_the_loaded_row() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 100, Vec::new());

    harness.controller.toggle_selection(1, true);
    assert!(harness.controller.is_selected(1));
    assert!(row_is_selected(&harness.controller, 0));

    harness.controller.toggle_selection(1, false);
    assert!(!row_is_selected(&harness.controller, 0));
}

#[test]
fn appended_rows_follow_local_selection() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 100, vec![2]);
    assert!(row_is_selected(&harness.controller, 1));

    harness.controller.toggle_selection(25, true);
    let _ = recv_cmd(&harness.cmd_rx);
    assert!(harness.controller.request_more());
    let _ = recv_cmd(&harness.cmd_rx);

    // The page was read before the selection update reached the server.
    harness
        .evt_tx
        .send(CoreEvent::WindowLoaded {
            generation: harness.controller.generation(),
            offset: 20,
            page: page(21..=40, 100),
        })
        .expect("send window");
    harness.controller.poll_events();
    assert!(row_is_selected(&harness.controller, 24));
    assert!(!row_is_selected(&harness.controller, 23));
}

#[test]
fn non_contiguous_window_is_dropped() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 100, Vec::new());
    assert!(harness.controller.request_more());
    let _ = recv_cmd(&harness.cmd_rx);

    harness
        .evt_tx
        .send(CoreEvent::WindowLoaded {
            generation: harness.controller.generation(),
            offset: 40,
            page: page(41..=60, 100),
        })
        .expect("send window");
    harness.controller.poll_events();

    assert_eq!(harness.controller.buffer().len(), 20);
    assert!(!harness.controller.is_loading());
    assert_eq!(harness.controller.stats().stale_responses_discarded, 1);
    assert!(harness.controller.request_more());
    assert!(matches!(
        recv_cmd(&harness.cmd_rx),
        CoreCmd::FetchWindow { offset: 20, .. }
    ));
}

#[test]
fn errors_for_superseded_queries_are_not_reported() {
    let mut harness = make_controller();
    finish_startup(&mut harness, 100, Vec::new());
    let old_generation = settle_query(&mut harness, "1");
    let _ = recv_cmd(&harness.cmd_rx);
    let new_generation = settle_query(&mut harness, "2");
    let _ = recv_cmd(&harness.cmd_rx);

    harness
        .evt_tx
        .send(CoreEvent::Error {
            source: CoreErrorSource::Window,
            generation: Some(old_generation),
            message: "Failed to fetch items: timeout".to_string(),
        })
        .expect("send stale error");
    harness.controller.poll_events();
    assert_eq!(harness.controller.last_error(), None);
    assert_eq!(harness.controller.stats().errors, 0);
    assert!(harness.controller.is_loading());

    harness
        .evt_tx
        .send(CoreEvent::Error {
            source: CoreErrorSource::Window,
            generation: Some(new_generation),
            message: "Failed to fetch items: refused".to_string(),
        })
        .expect("send current error");
    harness.controller.poll_events();
    assert_eq!(
        harness.controller.last_error(),
        Some("Failed to fetch items: refused")
    );
    assert!(!harness.controller.is_loading());

    settle_query(&mut harness, "3");
    assert_eq!(harness.controller.last_error(), None, "reload starts clean");
    assert_eq!(harness.controller.stats().errors, 1);
}
