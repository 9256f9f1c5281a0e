use chrono::NaiveDate;
use dailytap::core::roster::{RosterEditor, StructureChange};
use dailytap::core::setup::{Destination, SetupLogic};
use dailytap::core::structure::structure_hash;
use dailytap::db::meta::{get_meta, is_setup_complete, set_meta};
use dailytap::db::pool::DbPool;
use dailytap::db::queries::get_all_events;
use dailytap::errors::AppError;
use dailytap::models::meta;

const SHEET: &str = "https://docs.example.com/sheet/1";
const URL: &str = "https://script.example.com/exec";

fn names(pool: &DbPool) -> Vec<String> {
    get_all_events(&pool.conn)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect()
}

fn editor(list: &[&str]) -> RosterEditor {
    let mut r = RosterEditor::new();
    for n in list {
        r.add(n, "☀️").unwrap();
    }
    r
}

#[test]
fn editor_rejects_blank_and_duplicate_names() {
    let mut r = editor(&["Wake"]);

    assert!(matches!(r.add("   ", "x"), Err(AppError::InvalidInput(_))));
    assert!(matches!(r.add(" Wake ", "x"), Err(AppError::DuplicateEvent(_))));
    assert!(matches!(r.rename("Nope", "X"), Err(AppError::UnknownEvent(_))));

    r.add("Coffee", "☕").unwrap();
    assert!(matches!(
        r.rename("Coffee", "Wake"),
        Err(AppError::DuplicateEvent(_))
    ));
    assert_eq!(r.events().len(), 2);
}

#[test]
fn editor_moves_renames_and_removes() {
    let mut pool = DbPool::in_memory().unwrap();
    let mut r = editor(&["A", "B", "C"]);

    r.move_to("C", 0).unwrap();
    r.move_to("A", 99).unwrap();
    r.rename("B", "Bee").unwrap();
    r.set_icon("Bee", "🐝").unwrap();
    let removed = r.remove("A").unwrap();
    assert_eq!(removed.name, "A");

    r.save(&mut pool).unwrap();
    assert_eq!(names(&pool), vec!["C", "Bee"]);

    let stored = get_all_events(&pool.conn).unwrap();
    assert_eq!(stored[1].icon, "🐝");
    assert_eq!(stored[1].order, 1);
}

#[test]
fn structure_change_is_reported_only_for_a_different_name_set() {
    let mut pool = DbPool::in_memory().unwrap();

    // First save has nothing to compare with
    assert_eq!(
        editor(&["A", "B"]).save(&mut pool).unwrap(),
        StructureChange::Unchanged
    );

    // Reordering keeps the same set
    let mut r = RosterEditor::load(&pool).unwrap();
    r.move_to("B", 0).unwrap();
    assert_eq!(r.save(&mut pool).unwrap(), StructureChange::Unchanged);

    let mut r = RosterEditor::load(&pool).unwrap();
    r.add("C", "x").unwrap();
    let change = r.save(&mut pool).unwrap();
    assert!(change.is_changed());

    assert_eq!(
        get_meta(&pool.conn, meta::EVENT_STRUCTURE_HASH).unwrap(),
        Some(structure_hash(&["A", "B", "C"]))
    );
}

#[test]
fn destination_requires_both_values_and_an_http_url() {
    assert!(matches!(
        Destination::new("", URL),
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        Destination::new(SHEET, "  "),
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        Destination::new(SHEET, "ftp://example.com"),
        Err(AppError::InvalidInput(_))
    ));

    let d = Destination::new(&format!(" {} ", SHEET), URL).unwrap();
    assert_eq!(d.sheet_link, SHEET);
}

#[test]
fn setup_stores_everything_and_starts_a_fresh_day() {
    let mut pool = DbPool::in_memory().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    set_meta(&pool.conn, meta::LAST_EVENT_INDEX, "4").unwrap();

    let d = Destination::new(SHEET, URL).unwrap();
    SetupLogic::save_setup(&mut pool, &d, editor(&["Wake", "Coffee"]), today).unwrap();

    assert!(is_setup_complete(&pool.conn).unwrap());
    assert_eq!(names(&pool), vec!["Wake", "Coffee"]);
    assert_eq!(
        get_meta(&pool.conn, meta::LAST_LOGGED_DATE).unwrap().as_deref(),
        Some("2024-01-01")
    );
    assert_eq!(
        get_meta(&pool.conn, meta::LAST_EVENT_INDEX).unwrap().as_deref(),
        Some("0")
    );
    assert_eq!(
        get_meta(&pool.conn, meta::EVENT_STRUCTURE_HASH).unwrap(),
        Some(structure_hash(&["Wake", "Coffee"]))
    );
}

#[test]
fn setup_with_no_events_writes_nothing() {
    let mut pool = DbPool::in_memory().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let d = Destination::new(SHEET, URL).unwrap();

    let res = SetupLogic::save_setup(&mut pool, &d, RosterEditor::new(), today);
    assert!(matches!(res, Err(AppError::InvalidInput(_))));
    assert_eq!(get_meta(&pool.conn, meta::SHEET_LINK).unwrap(), None);
}

#[test]
fn settings_save_reports_structure_change() {
    let mut pool = DbPool::in_memory().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let d = Destination::new(SHEET, URL).unwrap();
    SetupLogic::save_setup(&mut pool, &d, editor(&["A", "B"]), today).unwrap();

    let other = Destination::new(SHEET, "https://script.example.com/v2").unwrap();
    let mut r = RosterEditor::load(&pool).unwrap();
    r.remove("B").unwrap();

    let change = SetupLogic::save_settings(&mut pool, &other, r).unwrap();
    assert!(change.is_changed());
    assert_eq!(
        get_meta(&pool.conn, meta::SCRIPT_URL).unwrap().as_deref(),
        Some("https://script.example.com/v2")
    );

    SetupLogic::save_destination(&pool, &d).unwrap();
    assert_eq!(get_meta(&pool.conn, meta::SCRIPT_URL).unwrap().as_deref(), Some(URL));
    assert_eq!(names(&pool), vec!["A"]);
}
