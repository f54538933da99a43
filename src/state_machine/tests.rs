// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{self, BoxFuture};
use rstest::rstest;
use tokio::sync::oneshot;

use super::{CommitOutcome, MapError, MapStateMachine, RESTORE_VERSION_FLOOR};
use crate::builder::{BuildError, MarkerBuilder, NoteMarkerBuilder};
use crate::config::MapSettings;
use crate::model::fixtures::{doc, tag, tags, two_note_corpus, P1, P2};
use crate::model::geo::MAX_ZOOM;
use crate::model::{Coordinate, Document, MapState, MarkerDescriptor, Version};
use crate::store::{DocumentIndex, MemoryIndex, StoreError};
use crate::surface::testing::{RecordingSurface, RecordingTagControl, SurfaceCall};

type Machine = MapStateMachine<RecordingSurface, RecordingTagControl>;

/// Delegates to [`NoteMarkerBuilder`], but holds a build back until its gate is released.
///
/// Gates are keyed by the comma joined paths of the documents being built, so a test controls
/// completion order by which tag filter a request uses.
#[derive(Default)]
struct GatedBuilder {
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    fail: AtomicBool,
}

impl GatedBuilder {
    fn gate(&self, paths: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().expect("gates").insert(paths.to_owned(), rx);
        tx
    }
}

impl MarkerBuilder for GatedBuilder {
    fn build_markers<'a>(
        &'a self,
        documents: &'a [Arc<Document>],
        settings: &'a MapSettings,
    ) -> BoxFuture<'a, Result<Vec<MarkerDescriptor>, BuildError>> {
        let key = documents
            .iter()
            .map(|doc| doc.path().as_str())
            .collect::<Vec<_>>()
            .join(",");
        let gate = self.gates.lock().expect("gates").remove(&key);
        Box::pin(async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(BuildError::Failed {
                    reason: "builder offline".to_owned(),
                });
            }
            NoteMarkerBuilder.build_markers(documents, settings).await
        })
    }
}

struct FlakyIndex {
    inner: MemoryIndex,
    fail: AtomicBool,
}

impl DocumentIndex for FlakyIndex {
    fn documents(&self) -> BoxFuture<'_, Result<Vec<Arc<Document>>, StoreError>> {
        if self.fail.load(Ordering::SeqCst) {
            return Box::pin(future::ready(Err(StoreError::Unavailable {
                reason: "index offline".to_owned(),
            })));
        }
        self.inner.documents()
    }
}

struct Harness {
    machine: Arc<Machine>,
    builder: Arc<GatedBuilder>,
    index: Arc<FlakyIndex>,
    surface: RecordingSurface,
    controls: RecordingTagControl,
}

fn harness(documents: Vec<Arc<Document>>) -> Harness {
    let builder = Arc::new(GatedBuilder::default());
    let index = Arc::new(FlakyIndex {
        inner: MemoryIndex::new(documents),
        fail: AtomicBool::new(false),
    });
    let surface = RecordingSurface::default();
    let controls = RecordingTagControl::default();
    let machine = MapStateMachine::new(
        index.clone(),
        builder.clone(),
        MapSettings::default(),
        surface.clone(),
        controls.clone(),
    );
    Harness {
        machine: Arc::new(machine),
        builder,
        index,
        surface,
        controls,
    }
}

/// Three notes, each with its own tag and location.
fn xyz_corpus() -> Vec<Arc<Document>> {
    vec![
        doc("x.md", &["#x"], "---\nlocation: [1, 1]\n---\n"),
        doc("y.md", &["#y"], "---\nlocation: [2, 2]\n---\n"),
        doc("z.md", &["#z"], "---\nlocation: [3, 3]\n---\n"),
    ]
}

fn state(tag_values: &[&str], version: u64) -> MapState {
    MapState::new(Coordinate::new(0.0, 0.0), 3.0, tags(tag_values), Version::new(version))
}

async fn drawn_paths(machine: &Machine) -> Vec<String> {
    machine
        .drawn_markers()
        .await
        .iter()
        .map(|marker| marker.descriptor.document().to_string())
        .collect()
}

#[tokio::test]
async fn initial_default_commits_over_placeholder() {
    let h = harness(two_note_corpus());
    let outcome = h.machine.show_initial().await.unwrap();

    assert!(outcome.is_committed());
    assert_eq!(h.machine.committed().await.version, Version::INITIAL);
    assert_eq!(drawn_paths(&h.machine).await, ["d1.md", "d2.md"]);
    assert_eq!(h.controls.last().as_deref(), Some(""));
}

#[rstest]
#[case::in_order([1, 2, 3])]
#[case::oldest_last([2, 3, 1])]
#[case::newest_first([3, 1, 2])]
#[case::reversed([3, 2, 1])]
#[case::middle_last([1, 3, 2])]
#[case::middle_first([2, 1, 3])]
#[tokio::test]
async fn newest_version_wins_under_any_completion_order(#[case] order: [u64; 3]) {
    let h = harness(xyz_corpus());
    let keys = ["x.md", "y.md", "z.md"];
    let mut gates = keys.iter().map(|key| Some(h.builder.gate(key))).collect::<Vec<_>>();

    let mut handles = Vec::new();
    for (i, tag_value) in ["#x", "#y", "#z"].into_iter().enumerate() {
        let machine = Arc::clone(&h.machine);
        let candidate = state(&[tag_value], i as u64 + 1);
        handles.push(Some(tokio::spawn(async move {
            machine.request_state_change(candidate, false).await
        })));
    }

    let mut committed_versions = Vec::new();
    for version in order {
        let slot = version as usize - 1;
        if let Some(gate) = gates[slot].take() {
            gate.send(()).expect("request waiting on gate");
        }
        let handle = handles[slot].take().expect("handle");
        let outcome = handle.await.expect("task").unwrap();
        if let CommitOutcome::Superseded { candidate, committed } = outcome {
            assert!(committed > candidate);
        }
        committed_versions.push(h.machine.committed().await.version);
    }

    assert!(committed_versions.windows(2).all(|pair| pair[0] <= pair[1]));
    let committed = h.machine.committed().await;
    assert_eq!(committed.version, Version::new(3));
    assert_eq!(committed.tags, tags(&["#z"]));
    assert_eq!(drawn_paths(&h.machine).await, ["z.md"]);
    assert_eq!(h.controls.last().as_deref(), Some("#z"));
    assert_eq!(h.surface.log.lock().expect("log").live.len(), 1);
}

#[rstest]
#[case::filtered_first(true)]
#[case::unfiltered_first(false)]
#[tokio::test]
async fn filter_then_clear_shows_every_note(#[case] filtered_finishes_first: bool) {
    let h = harness(two_note_corpus());
    let filtered_gate = h.builder.gate("d1.md");
    let unfiltered_gate = h.builder.gate("d1.md,d2.md");

    let filtered = tokio::spawn({
        let machine = Arc::clone(&h.machine);
        async move { machine.request_state_change(state(&["#a"], 1), false).await }
    });
    let unfiltered = tokio::spawn({
        let machine = Arc::clone(&h.machine);
        async move { machine.request_state_change(state(&[], 2), false).await }
    });

    if filtered_finishes_first {
        filtered_gate.send(()).expect("gate");
        filtered.await.expect("task").unwrap();
        unfiltered_gate.send(()).expect("gate");
        unfiltered.await.expect("task").unwrap();
    } else {
        unfiltered_gate.send(()).expect("gate");
        unfiltered.await.expect("task").unwrap();
        filtered_gate.send(()).expect("gate");
        let outcome = filtered.await.expect("task").unwrap();
        assert_eq!(
            outcome,
            CommitOutcome::Superseded {
                candidate: Version::new(1),
                committed: Version::new(2)
            }
        );
    }

    assert_eq!(h.machine.committed().await.version, Version::new(2));
    assert_eq!(drawn_paths(&h.machine).await, ["d1.md", "d2.md"]);
    let locations = h
        .machine
        .drawn_markers()
        .await
        .iter()
        .map(|marker| marker.descriptor.location())
        .collect::<Vec<_>>();
    assert_eq!(locations, [P1, P2]);
}

#[tokio::test]
async fn unchanged_markers_keep_their_handles_across_commits() {
    let h = harness(two_note_corpus());
    h.machine.show_initial().await.unwrap();
    let before = h.machine.drawn_markers().await;

    let outcome = h.machine.edit_tag_box("#a", false).await.unwrap();
    let CommitOutcome::Committed(report) = outcome else {
        panic!("expected commit, got {outcome:?}");
    };
    assert_eq!((report.added, report.kept, report.removed), (0, 1, 1));

    let after = h.machine.drawn_markers().await;
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].handle, before[0].handle);

    let log = h.surface.log.lock().expect("log");
    assert_eq!(log.removals_of(before[1].handle), 1);
    assert_eq!(log.removals_of(before[0].handle), 0);
    assert_eq!(log.creations(), 2);
}

#[rstest]
#[case::query(true)]
#[case::build(false)]
#[tokio::test]
async fn failure_leaves_committed_state_untouched(#[case] query_fails: bool) {
    let h = harness(two_note_corpus());
    h.machine.show_initial().await.unwrap();
    let committed = h.machine.committed().await;
    let drawn = h.machine.drawn_markers().await;
    let calls = h.surface.log.lock().expect("log").calls.len();

    if query_fails {
        h.index.fail.store(true, Ordering::SeqCst);
    } else {
        h.builder.fail.store(true, Ordering::SeqCst);
    }
    let err = h.machine.edit_tag_box("#b", true).await.unwrap_err();

    if query_fails {
        assert!(matches!(err, MapError::Query(StoreError::Unavailable { .. })));
    } else {
        assert!(matches!(err, MapError::Build(BuildError::Failed { .. })));
    }
    assert_eq!(h.machine.committed().await, committed);
    assert_eq!(h.machine.drawn_markers().await, drawn);
    assert_eq!(h.surface.log.lock().expect("log").calls.len(), calls);
    assert_eq!(h.controls.last().as_deref(), Some(""));
}

#[tokio::test]
async fn next_request_after_failure_gets_a_fresh_version() {
    let h = harness(two_note_corpus());
    h.machine.show_initial().await.unwrap();
    h.builder.fail.store(true, Ordering::SeqCst);
    h.machine.edit_tag_box("#b", false).await.unwrap_err();
    h.builder.fail.store(false, Ordering::SeqCst);

    h.machine.edit_tag_box("#b", false).await.unwrap();
    assert_eq!(h.machine.committed().await.version, Version::new(2));
}

#[tokio::test]
async fn restore_beats_in_flight_requests() {
    let h = harness(two_note_corpus());
    let organic_gate = h.builder.gate("d1.md");

    let organic = h.machine.edit_tag_box("#a", false);
    let restore = async {
        let restored = MapState::new(P2, 9.0, tags(&["#b"]), Version::new(5));
        let outcome = h.machine.restore_view_state(restored).await;
        organic_gate.send(()).expect("gate");
        outcome
    };
    let (organic, restore) = tokio::join!(organic, restore);

    assert!(restore.unwrap().is_committed());
    assert_eq!(
        organic.unwrap(),
        CommitOutcome::Superseded {
            candidate: Version::new(1),
            committed: RESTORE_VERSION_FLOOR
        }
    );
    let committed = h.machine.committed().await;
    assert_eq!(committed.tags, tags(&["#b"]));
    assert_eq!(committed.center, P2);
    assert_eq!(drawn_paths(&h.machine).await, ["d2.md"]);

    h.machine.reset_to_default().await.unwrap();
    assert_eq!(h.machine.committed().await.version, RESTORE_VERSION_FLOOR.next());
}

#[tokio::test]
async fn quick_requests_get_distinct_ordered_versions() {
    let h = harness(two_note_corpus());
    let first_gate = h.builder.gate("d1.md");

    let first = h.machine.edit_tag_box("#a", false);
    let second = async {
        let outcome = h.machine.edit_tag_box("#b", false).await;
        first_gate.send(()).expect("gate");
        outcome
    };
    let (first, second) = tokio::join!(first, second);

    assert!(second.unwrap().is_committed());
    assert_eq!(
        first.unwrap(),
        CommitOutcome::Superseded {
            candidate: Version::new(1),
            committed: Version::new(2)
        }
    );
    assert_eq!(h.controls.last().as_deref(), Some("#b"));
}

#[tokio::test]
async fn tag_box_is_resynced_with_normalized_tags() {
    let h = harness(two_note_corpus());
    h.machine.edit_tag_box(" a, ,#b,a ", false).await.unwrap();
    assert_eq!(h.machine.committed().await.tags, tags(&["#a", "#b"]));
    assert_eq!(h.controls.last().as_deref(), Some("#a,#b"));
}

#[tokio::test]
async fn add_tag_appends_once_and_fits() {
    let h = harness(two_note_corpus());
    h.machine.edit_tag_box("#a", false).await.unwrap();
    h.machine.add_tag(tag("#b")).await.unwrap();
    let outcome = h.machine.add_tag(tag("#b")).await.unwrap();

    let CommitOutcome::Committed(report) = outcome else {
        panic!("expected commit, got {outcome:?}");
    };
    assert!(report.fitted.is_some());
    assert_eq!(h.machine.committed().await.tags, tags(&["#a", "#b"]));
    assert_eq!(drawn_paths(&h.machine).await, ["d1.md", "d2.md"]);
}

#[tokio::test]
async fn zoom_to_location_keeps_tags_and_uses_note_zoom() {
    let h = harness(two_note_corpus());
    h.machine.edit_tag_box("#a", false).await.unwrap();
    h.machine.zoom_to_location(P2).await.unwrap();

    let committed = h.machine.committed().await;
    assert_eq!(committed.center, P2);
    assert_eq!(committed.zoom, MapSettings::default().go_from_note_zoom);
    assert_eq!(committed.tags, tags(&["#a"]));
    let log = h.surface.log.lock().expect("log");
    assert_eq!(log.calls.last(), Some(&SurfaceCall::SetView(P2, 15.0)));
}

#[tokio::test]
async fn fit_and_panning_do_not_bump_versions() {
    let h = harness(two_note_corpus());
    h.machine.show_initial().await.unwrap();

    let bounds = h.machine.fit_to_markers().await.expect("markers drawn");
    assert_eq!((bounds.south_west, bounds.north_east), (P1, P2));
    h.machine.note_viewport(Coordinate::new(10.0, 20.0), 5.0).await;

    let view = h.machine.view_state().await;
    assert_eq!(view.version, Version::INITIAL);
    assert_eq!(view.center, Coordinate::new(10.0, 20.0));
    assert_eq!(view.zoom, 5.0);
    assert_eq!(h.machine.committed().await.center, MapSettings::default().default_center);
}

#[tokio::test]
async fn fit_with_nothing_drawn_is_a_no_op() {
    let h = harness(Vec::new());
    h.machine.show_initial().await.unwrap();
    assert!(h.machine.fit_to_markers().await.is_none());
    let log = h.surface.log.lock().expect("log");
    assert!(!log.calls.iter().any(|call| matches!(call, SurfaceCall::Fit(_))));
}

#[tokio::test]
async fn empty_result_clears_the_map() {
    let h = harness(two_note_corpus());
    h.machine.show_initial().await.unwrap();
    h.machine.edit_tag_box("#nothing", false).await.unwrap();
    assert!(h.machine.drawn_markers().await.is_empty());
    assert!(h.surface.log.lock().expect("log").live.is_empty());
}

#[tokio::test]
async fn view_state_round_trips_through_restore() {
    let h = harness(two_note_corpus());
    h.machine.edit_tag_box("#b", false).await.unwrap();
    h.machine.note_viewport(P2, 12.0).await;
    let saved = serde_json::to_string(&h.machine.view_state().await).expect("serialize");

    let other = harness(two_note_corpus());
    let restored: MapState = serde_json::from_str(&saved).expect("deserialize");
    other.machine.restore_view_state(restored).await.unwrap();

    let committed = other.machine.committed().await;
    assert_eq!((committed.center, committed.zoom), (P2, 12.0));
    assert_eq!(committed.tags, tags(&["#b"]));
    assert_eq!(committed.version, RESTORE_VERSION_FLOOR);
}

#[tokio::test]
async fn view_state_reports_the_clamped_viewport() {
    let h = harness(two_note_corpus());
    let wild = MapState::new(Coordinate::new(120.0, 200.0), 40.0, tags(&["#a"]), Version::new(5));
    h.machine.restore_view_state(wild).await.unwrap();

    let view = h.machine.view_state().await;
    assert_eq!(view.center, Coordinate::new(90.0, 180.0));
    assert_eq!(view.zoom, MAX_ZOOM);

    h.machine.note_viewport(Coordinate::new(-95.0, -190.0), -3.0).await;
    let view = h.machine.view_state().await;
    assert_eq!((view.center, view.zoom), (Coordinate::new(-90.0, -180.0), 0.0));
}

#[tokio::test]
async fn set_as_default_moves_the_reset_target() {
    let h = harness(two_note_corpus());
    h.machine.edit_tag_box("#a", false).await.unwrap();
    h.machine.note_viewport(P1, 8.0).await;

    let settings = h.machine.set_as_default().await;
    assert_eq!(settings.default_center, P1);
    assert_eq!(settings.default_tags, tags(&["#a"]));
    let version = h.machine.committed().await.version;

    h.machine.note_viewport(P2, 3.0).await;
    h.machine.reset_to_default().await.unwrap();
    let committed = h.machine.committed().await;
    assert_eq!((committed.center, committed.zoom), (P1, 8.0));
    assert_eq!(committed.version, version.next());
}
