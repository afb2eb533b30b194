use chrono::{TimeZone, Utc};
use quakes_core::db::open_db_in_memory;
use quakes_core::{
    toolbar_for_platform, AppError, CommandOutcome, DetailLayout, DetailView, JsonFileFeed,
    Platform, Quake, QuakeApp, QuakeGenerator, QuakeId, QuakeLocation, QuakeRepository,
    ScenePhase, SelectionChange, SelectionSurface, SortKey, SortOrder, SqliteQuakeRepository,
    StaticFeed, ToolbarCommand, DETAIL_PLACEHOLDER,
};
use rusqlite::Connection;
use std::io::Write;

fn quake(code: &str, magnitude: f64, hour: u32) -> Quake {
    Quake::new(
        QuakeId::new(code),
        magnitude,
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap(),
        QuakeLocation::new(format!("Site {code}"), -120.0, 38.0),
    )
}

fn app(conn: &Connection, platform: Platform) -> QuakeApp<SqliteQuakeRepository<'_>> {
    QuakeApp::new(
        SqliteQuakeRepository::new(conn),
        toolbar_for_platform(platform),
        25,
    )
    .unwrap()
    .with_generator(QuakeGenerator::seeded(3))
}

fn seed_a_b(conn: &Connection) {
    let repo = SqliteQuakeRepository::new(conn);
    repo.create_quake(&quake("A", 2.0, 1)).unwrap();
    repo.create_quake(&quake("B", 7.5, 2)).unwrap();
}

#[test]
fn magnitude_sort_then_list_and_map_selection() {
    let conn = open_db_in_memory().unwrap();
    seed_a_b(&conn);
    let mut app = app(&conn, Platform::Desktop);

    app.set_sort(SortKey::Magnitude, SortOrder::Descending);
    let listed: Vec<_> = app.quakes().unwrap().into_iter().map(|q| q.code).collect();
    assert_eq!(listed, vec![QuakeId::new("B"), QuakeId::new("A")]);

    app.select_from_list(Some(QuakeId::new("B")));
    let change = app.select_from_map(Some(QuakeId::new("A")));
    assert!(matches!(
        change,
        SelectionChange::Updated {
            driver: SelectionSurface::Map,
            ..
        }
    ));
    assert_eq!(app.selection().primary, Some(QuakeId::new("A")));
    assert_eq!(app.selection().secondary, Some(QuakeId::new("A")));
}

#[test]
fn deleting_selected_quake_reverts_detail_to_placeholder() {
    let conn = open_db_in_memory().unwrap();
    seed_a_b(&conn);
    let mut app = app(&conn, Platform::Desktop);

    app.select_from_list(Some(QuakeId::new("A")));
    assert_eq!(app.detail(DetailLayout::Compact).unwrap().to_string(), "M 2.0");

    let outcome = app.run_command(ToolbarCommand::DeleteSelected).unwrap();
    assert_eq!(outcome, CommandOutcome::Deleted(Some(QuakeId::new("A"))));

    let remaining: Vec<_> = app.quakes().unwrap().into_iter().map(|q| q.code).collect();
    assert_eq!(remaining, vec![QuakeId::new("B")]);
    assert_eq!(app.selection().primary, None);
    assert_eq!(
        app.detail(DetailLayout::Wide).unwrap(),
        DetailView::Placeholder(DETAIL_PLACEHOLDER)
    );
    assert_eq!(app.summary().total, 1);
}

#[test]
fn selection_of_externally_removed_quake_renders_placeholder() {
    let conn = open_db_in_memory().unwrap();
    seed_a_b(&conn);
    let mut app = app(&conn, Platform::Desktop);
    app.select_from_map(Some(QuakeId::new("B")));

    SqliteQuakeRepository::new(&conn)
        .delete_quake(&QuakeId::new("B"))
        .unwrap();

    assert!(app.detail(DetailLayout::Wide).unwrap().is_placeholder());
}

#[test]
fn delete_selected_after_external_removal_clears_selection() {
    let conn = open_db_in_memory().unwrap();
    seed_a_b(&conn);
    let mut app = app(&conn, Platform::Desktop);
    app.select_from_list(Some(QuakeId::new("B")));

    SqliteQuakeRepository::new(&conn)
        .delete_quake(&QuakeId::new("B"))
        .unwrap();

    let outcome = app.run_command(ToolbarCommand::DeleteSelected).unwrap();
    assert_eq!(outcome, CommandOutcome::Deleted(None));
    assert_eq!(app.selection().primary, None);
    assert_eq!(app.selection().secondary, None);
    assert_eq!(app.summary().total, 1);
}

#[test]
fn becoming_active_drops_selection_of_removed_quake() {
    let conn = open_db_in_memory().unwrap();
    seed_a_b(&conn);
    let mut app = app(&conn, Platform::Desktop);
    app.select_from_map(Some(QuakeId::new("A")));

    SqliteQuakeRepository::new(&conn)
        .delete_quake(&QuakeId::new("A"))
        .unwrap();
    assert_eq!(app.selection().primary, Some(QuakeId::new("A")));

    app.scene_phase_changed(ScenePhase::Background).unwrap();
    assert!(app.scene_phase_changed(ScenePhase::Active).unwrap());
    assert_eq!(app.selection().primary, None);
    assert_eq!(app.summary().total, 1);
}

#[test]
fn reconcile_keeps_selection_of_stored_quake() {
    let conn = open_db_in_memory().unwrap();
    seed_a_b(&conn);
    let mut app = app(&conn, Platform::Desktop);
    app.select_from_list(Some(QuakeId::new("A")));

    assert_eq!(app.reconcile().unwrap(), SelectionChange::Unchanged);
    assert_eq!(app.selection().primary, Some(QuakeId::new("A")));

    SqliteQuakeRepository::new(&conn)
        .delete_quake(&QuakeId::new("A"))
        .unwrap();
    assert!(matches!(
        app.reconcile().unwrap(),
        SelectionChange::Updated { .. }
    ));
    assert_eq!(app.selection().primary, None);
}

#[test]
fn delete_selected_without_selection_is_noop() {
    let conn = open_db_in_memory().unwrap();
    seed_a_b(&conn);
    let mut app = app(&conn, Platform::Compact);

    let outcome = app.run_command(ToolbarCommand::DeleteSelected).unwrap();
    assert_eq!(outcome, CommandOutcome::Deleted(None));
    assert_eq!(app.summary().total, 2);
}

#[test]
fn add_random_inserts_configured_batch_and_recomputes() {
    let conn = open_db_in_memory().unwrap();
    let mut app = app(&conn, Platform::Desktop);
    assert_eq!(app.summary().total, 0);

    let outcome = app.run_command(ToolbarCommand::AddRandom).unwrap();
    match outcome {
        CommandOutcome::Added(report) => {
            assert_eq!(report.inserted, 25);
            assert_eq!(report.failed, 0);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(app.summary().total, 25);
    assert!(app.summary().earliest.is_some());
}

#[test]
fn compact_toolbar_refuses_bulk_generator() {
    let conn = open_db_in_memory().unwrap();
    let mut app = app(&conn, Platform::Compact);

    let err = app.run_command(ToolbarCommand::AddRandom).unwrap_err();
    assert!(matches!(
        err,
        AppError::CommandUnavailable {
            command: ToolbarCommand::AddRandom,
            platform: Platform::Compact,
        }
    ));
    assert_eq!(app.summary().total, 0);
}

#[test]
fn cycle_sort_command_reports_new_order() {
    let conn = open_db_in_memory().unwrap();
    let mut app = app(&conn, Platform::Desktop);

    let outcome = app.run_command(ToolbarCommand::CycleSort).unwrap();
    assert_eq!(
        outcome,
        CommandOutcome::Sorted {
            key: SortKey::Time,
            order: SortOrder::Ascending,
        }
    );
    assert_eq!(app.query().sort_order, SortOrder::Ascending);
}

#[test]
fn refresh_without_feed_is_an_error() {
    let conn = open_db_in_memory().unwrap();
    let mut app = app(&conn, Platform::Desktop);

    let err = app.run_command(ToolbarCommand::Refresh).unwrap_err();
    assert!(matches!(err, AppError::FeedNotConfigured));
}

#[test]
fn refresh_upserts_feed_and_recomputes() {
    let conn = open_db_in_memory().unwrap();
    seed_a_b(&conn);
    let mut updated_a = quake("A", 2.4, 1);
    updated_a.location.name = "Site A (reviewed)".to_string();
    let feed = StaticFeed::new(vec![updated_a, quake("C", 5.0, 3)]);
    let mut app = app(&conn, Platform::Desktop).with_feed(Box::new(feed));

    let report = app.refresh().unwrap();
    assert_eq!(report.fetched, 2);
    assert_eq!(report.stored.inserted, 2);
    assert_eq!(app.summary().total, 3);

    app.set_search_text("reviewed");
    let hits = app.quakes().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].magnitude, 2.4);
}

#[test]
fn refresh_from_geojson_file() {
    let conn = open_db_in_memory().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "type": "FeatureCollection",
            "features": [
                {{
                    "properties": {{"mag": 3.1, "place": "8 km SSE of Volcano, Hawaii", "time": 1717200000000, "code": "hv74"}},
                    "geometry": {{"coordinates": [-155.2, 19.4, 2.0]}}
                }},
                {{
                    "properties": {{"mag": 1.0, "place": null, "time": 1717200000000, "code": "noplace"}},
                    "geometry": {{"coordinates": [-155.2, 19.4, 2.0]}}
                }}
            ]
        }}"#
    )
    .unwrap();

    let mut app =
        app(&conn, Platform::Desktop).with_feed(Box::new(JsonFileFeed::new(file.path())));
    let outcome = app.run_command(ToolbarCommand::Refresh).unwrap();
    match outcome {
        CommandOutcome::Refreshed(report) => {
            assert_eq!(report.fetched, 1);
            assert_eq!(report.skipped, 1);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    app.select_from_list(Some(QuakeId::new("hv74")));
    assert_eq!(
        app.detail(DetailLayout::Wide).unwrap().to_string(),
        "M 3.1 | 8 km SSE of Volcano, Hawaii | 2024-06-01 00:00:00 UTC"
    );
}

#[test]
fn refresh_surfaces_feed_read_errors() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let feed = JsonFileFeed::new(dir.path().join("missing.json"));
    let mut app = app(&conn, Platform::Desktop).with_feed(Box::new(feed));

    let err = app.refresh().unwrap_err();
    assert!(matches!(err, AppError::Feed(_)));
}

#[test]
fn becoming_active_recomputes_without_refresh() {
    let conn = open_db_in_memory().unwrap();
    let mut app = app(&conn, Platform::Desktop);

    assert!(!app.scene_phase_changed(ScenePhase::Active).unwrap());
    assert!(!app.scene_phase_changed(ScenePhase::Background).unwrap());

    // Rows written behind the app's back are only counted after recompute.
    seed_a_b(&conn);
    assert_eq!(app.summary().total, 0);

    assert!(app.scene_phase_changed(ScenePhase::Active).unwrap());
    assert_eq!(app.summary().total, 2);
    assert_eq!(app.phase(), ScenePhase::Active);
}
