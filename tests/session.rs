//! End-to-end engine scenarios: loader, session, and actions together,
//! driven tick by tick the way the application loop drives them.

use anyhow::Result;
use rand::{SeedableRng, rngs::StdRng};

use backdrop::catalog::{CatalogLoader, Document, DocumentSource, EnemyCatalog};
use backdrop::input::Action;
use backdrop::session::{Outcome, Session};
use backdrop::sink::NullSink;

const GROUPS: &str = r#"{
    "0": {"Background 1": 1, "Background 2": 2,
          "Enemies": [{"Enemy": 10, "Amount": 1}]},
    "1": {"Background 1": 1, "Background 2": 2,
          "Enemies": [{"Enemy": 10, "Amount": 1}, {"Enemy": 11, "Amount": 2}]},
    "2": {"Background 1": 200, "Background 2": 300,
          "Enemies": [{"Enemy": 11, "Amount": 1}]}
}"#;

const CONFIGS: &str = r#"{
    "10": {"Name": "Slime"},
    "11": {"Name": "Bat"}
}"#;

struct MemorySource {
    fail_groups: bool,
}

impl DocumentSource for MemorySource {
    fn fetch(&mut self, doc: Document) -> Result<String> {
        match doc {
            Document::Groups if self.fail_groups => anyhow::bail!("404"),
            Document::Groups => Ok(GROUPS.to_string()),
            Document::Configs => Ok(CONFIGS.to_string()),
        }
    }
}

fn session_with_loader(fail_groups: bool) -> (Session<NullSink>, CatalogLoader<MemorySource>) {
    let session = Session::new(
        EnemyCatalog::new(),
        NullSink::default(),
        StdRng::seed_from_u64(9),
    );
    let loader = CatalogLoader::new(MemorySource { fail_groups });
    (session, loader)
}

/// One iteration of what the application loop does per second.
fn step(session: &mut Session<NullSink>, loader: &mut CatalogLoader<MemorySource>, tick: u64) {
    loader.step(tick, session.catalog_mut());
    session.on_tick(tick);
}

#[test]
fn layers_follow_a_group_pair_once_the_catalog_loads() {
    let (mut session, mut loader) = session_with_loader(false);
    step(&mut session, &mut loader, 0);

    let snap = session.snapshot(0);
    assert!(snap.catalog_ready);
    // Every group's pair is one of the two in the table.
    assert!(
        (snap.layer1, snap.layer2) == (1, 2) || (snap.layer1, snap.layer2) == (200, 300),
        "unexpected pair ({}, {})",
        snap.layer1,
        snap.layer2,
    );
}

#[test]
fn enemy_names_match_the_displayed_pair_and_are_deduplicated() {
    let (mut session, mut loader) = session_with_loader(false);
    step(&mut session, &mut loader, 0);

    // Force the shared pair (1,2): groups 0 and 1 both contain Slime.
    loop {
        let snap = session.snapshot(0);
        if (snap.layer1, snap.layer2) == (1, 2) {
            assert_eq!(snap.enemies, vec!["Bat".to_string(), "Slime".to_string()]);
            break;
        }
        let _ = session.apply(Action::RandomizeBoth, 0);
    }
}

#[test]
fn failed_document_degrades_lookups_but_keeps_the_session_interactive() {
    let (mut session, mut loader) = session_with_loader(true);
    for tick in 0..=40 {
        step(&mut session, &mut loader, tick);
    }

    let snap = session.snapshot(40);
    assert!(!snap.catalog_ready);
    assert!(snap.catalog_error.unwrap().contains("404"));
    assert!(snap.enemies.is_empty());

    // Still fully interactive.
    assert_eq!(session.apply(Action::ZeroBoth, 40), Outcome::Continue);
    let snap = session.snapshot(40);
    assert_eq!((snap.layer1, snap.layer2), (0, 0));
}

#[test]
fn interval_toggle_round_trip_through_key_actions() {
    let (mut session, mut loader) = session_with_loader(false);
    step(&mut session, &mut loader, 0);

    for _ in 0..55 {
        let _ = session.apply(Action::IntervalUp, 0);
    }
    assert_eq!(session.snapshot(0).refresh_seconds, 60);

    let _ = session.apply(Action::ToggleRefresh, 0);
    // Suspended: ticks pass, nothing fires.
    let _ = session.apply(Action::ZeroBoth, 0);
    for tick in 1..=120 {
        session.on_tick(tick);
    }
    let snap = session.snapshot(120);
    assert_eq!((snap.layer1, snap.layer2), (0, 0));
    assert_eq!(snap.countdown, None);

    let _ = session.apply(Action::ToggleRefresh, 120);
    assert_eq!(session.snapshot(120).refresh_seconds, 60);
}

#[test]
fn arrow_shifts_compose_with_the_countdown_cycle() {
    let (mut session, mut loader) = session_with_loader(false);
    step(&mut session, &mut loader, 0);
    let _ = session.apply(Action::ZeroBoth, 0);

    let _ = session.apply(Action::ShiftLayer1(1), 0);
    let _ = session.apply(Action::ShiftLayer1(1), 0);
    let _ = session.apply(Action::ShiftLayer2(-1), 0);
    let snap = session.snapshot(0);
    assert_eq!((snap.layer1, snap.layer2), (2, -1));

    // Ticks 1..4 are inside the default 5s cycle; the shift survives.
    for tick in 1..5 {
        session.on_tick(tick);
        assert_eq!(session.snapshot(tick).layer1, 2);
    }
    // The boundary reassigns both layers from the catalog.
    session.on_tick(5);
    let snap = session.snapshot(5);
    assert!((snap.layer1, snap.layer2) != (2, -1));
}
