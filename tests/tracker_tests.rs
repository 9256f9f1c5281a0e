use chrono::{NaiveDate, NaiveTime};
use dailytap::core::clock::FixedClock;
use dailytap::core::roster::RosterEditor;
use dailytap::core::tracker::{DayTracker, EditOutcome};
use dailytap::db::meta::{get_meta, set_meta};
use dailytap::db::pool::DbPool;
use dailytap::db::queries::get_logs_for_date;
use dailytap::errors::AppError;
use dailytap::models::log_entry::{LogStatus, LogTime};
use dailytap::models::meta;

mod common;
use common::pool_with_roster;

fn clock(date: &str, time: &str) -> FixedClock {
    FixedClock::at(date, time).expect("valid clock")
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn hm(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

#[test]
fn fresh_store_rolls_over_to_today() {
    let pool = pool_with_roster(&["Wake", "Coffee"]);
    let tracker = DayTracker::initialize_for_today(&pool, clock("2024-01-01", "07:00")).unwrap();

    assert_eq!(tracker.current_index(), 0);
    assert!(tracker.today_logs().is_empty());
    assert_eq!(
        get_meta(&pool.conn, meta::LAST_LOGGED_DATE).unwrap().as_deref(),
        Some("2024-01-01")
    );
    assert_eq!(tracker.current_event().unwrap().name, "Wake");
}

#[test]
fn tap_and_skip_advance_the_cursor_by_one() {
    let pool = pool_with_roster(&["A", "B", "C"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:05")).unwrap();

    let a = tracker.log_current(&pool).unwrap().unwrap();
    assert_eq!(a.event_name, "A");
    assert_eq!(a.time, LogTime::At(hm("08:05")));
    assert_eq!(a.status, LogStatus::Normal);
    assert!(!a.synced);
    assert_eq!(tracker.current_index(), 1);

    let b = tracker.skip_current(&pool).unwrap().unwrap();
    assert_eq!(b.event_name, "B");
    assert_eq!(b.time_str(), "SKIPPED");
    assert_eq!(b.status, LogStatus::Skipped);
    assert_eq!(tracker.current_index(), 2);

    assert_eq!(
        get_meta(&pool.conn, meta::LAST_EVENT_INDEX).unwrap().as_deref(),
        Some("2")
    );
    assert_eq!(get_logs_for_date(&pool.conn, &day("2024-01-01")).unwrap().len(), 2);
}

#[test]
fn tap_when_day_is_complete_changes_nothing() {
    let pool = pool_with_roster(&["A", "B"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();

    tracker.log_current(&pool).unwrap();
    tracker.log_current(&pool).unwrap();
    assert!(tracker.is_day_complete());
    assert!(tracker.progress().is_complete());

    assert!(tracker.log_current(&pool).unwrap().is_none());
    assert!(tracker.skip_current(&pool).unwrap().is_none());

    assert_eq!(tracker.current_index(), 2);
    assert_eq!(get_logs_for_date(&pool.conn, &day("2024-01-01")).unwrap().len(), 2);
}

#[test]
fn empty_roster_never_records() {
    let pool = DbPool::in_memory().unwrap();
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();

    assert!(tracker.log_current(&pool).unwrap().is_none());
    assert!(tracker.current_event().is_none());
    assert_eq!(tracker.progress().percentage(), 0.0);
}

#[test]
fn state_survives_a_new_session_on_the_same_day() {
    let pool = pool_with_roster(&["A", "B", "C"]);
    {
        let mut tracker =
            DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();
        tracker.log_current(&pool).unwrap();
        tracker.skip_current(&pool).unwrap();
    }

    let tracker = DayTracker::initialize_for_today(&pool, clock("2024-01-01", "20:00")).unwrap();
    assert_eq!(tracker.current_index(), 2);
    assert_eq!(tracker.today_logs().len(), 2);
    assert_eq!(tracker.current_event().unwrap().name, "C");
}

#[test]
fn new_day_resets_cursor_and_keeps_old_logs() {
    let pool = pool_with_roster(&["A", "B", "C"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "22:00")).unwrap();
    tracker.log_current(&pool).unwrap();
    tracker.log_current(&pool).unwrap();
    assert_eq!(tracker.current_index(), 2);

    // Next session starts on the following day
    let tracker = DayTracker::initialize_for_today(&pool, clock("2024-01-02", "06:30")).unwrap();
    assert_eq!(tracker.current_index(), 0);
    assert!(tracker.today_logs().is_empty());
    assert_eq!(
        get_meta(&pool.conn, meta::LAST_LOGGED_DATE).unwrap().as_deref(),
        Some("2024-01-02")
    );
    assert_eq!(get_logs_for_date(&pool.conn, &day("2024-01-01")).unwrap().len(), 2);
}

#[test]
fn check_date_change_rolls_a_long_session_over() {
    let pool = pool_with_roster(&["A", "B"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "23:58")).unwrap();
    tracker.log_current(&pool).unwrap();

    assert!(!tracker.check_date_change(&pool).unwrap());

    tracker
        .clock()
        .set(day("2024-01-02").and_time(hm("00:01")));
    assert!(tracker.check_date_change(&pool).unwrap());

    assert_eq!(tracker.today(), day("2024-01-02"));
    assert_eq!(tracker.current_index(), 0);
    assert!(tracker.today_logs().is_empty());

    let entry = tracker.log_current(&pool).unwrap().unwrap();
    assert_eq!(entry.date, day("2024-01-02"));
    assert_eq!(entry.event_name, "A");
}

#[test]
fn backfill_moves_cursor_to_first_gap() {
    let pool = pool_with_roster(&["A", "B", "C"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();
    tracker.log_current(&pool).unwrap();

    let out = tracker.edit_or_backfill(&pool, "C", "09:00").unwrap();
    assert!(matches!(out, EditOutcome::Backfilled(ref e) if e.event_name == "C"));
    assert_eq!(tracker.current_index(), 1);

    tracker.edit_or_backfill(&pool, "B", "08:30").unwrap();
    assert_eq!(tracker.current_index(), 3);
    assert!(tracker.is_day_complete());
    assert_eq!(
        get_meta(&pool.conn, meta::LAST_EVENT_INDEX).unwrap().as_deref(),
        Some("3")
    );
}

#[test]
fn backfill_of_a_later_event_keeps_cursor_on_the_first() {
    let pool = pool_with_roster(&["A", "B", "C"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();

    tracker.edit_or_backfill(&pool, "C", "07:00").unwrap();
    assert_eq!(tracker.current_index(), 0);
    assert_eq!(tracker.current_event().unwrap().name, "A");
}

#[test]
fn edit_corrects_in_place_and_is_idempotent() {
    let pool = pool_with_roster(&["A", "B"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();
    let original = tracker.log_current(&pool).unwrap().unwrap();

    for _ in 0..2 {
        let out = tracker.edit_or_backfill(&pool, "A", "07:45").unwrap();
        match out {
            EditOutcome::Updated(e) => {
                assert_eq!(e.id, original.id);
                assert_eq!(e.time_str(), "07:45");
                assert!(!e.synced);
            }
            other => panic!("expected an update, got {:?}", other),
        }
    }

    let logs = get_logs_for_date(&pool.conn, &day("2024-01-01")).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].time_str(), "07:45");
    assert_eq!(tracker.current_index(), 1);
}

#[test]
fn editing_a_skipped_event_turns_it_into_a_normal_log() {
    let pool = pool_with_roster(&["A", "B"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();
    tracker.skip_current(&pool).unwrap();

    tracker.edit_or_backfill(&pool, "A", "06:15").unwrap();

    let logs = get_logs_for_date(&pool.conn, &day("2024-01-01")).unwrap();
    assert_eq!(logs[0].status, LogStatus::Normal);
    assert_eq!(logs[0].time, LogTime::At(hm("06:15")));
}

#[test]
fn edit_rejects_bad_input() {
    let pool = pool_with_roster(&["A"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();

    assert!(matches!(
        tracker.edit_or_backfill(&pool, "  ", "08:00"),
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        tracker.edit_or_backfill(&pool, "A", ""),
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        tracker.edit_or_backfill(&pool, "A", "25:00"),
        Err(AppError::InvalidTime(_))
    ));
    assert!(matches!(
        tracker.edit_or_backfill(&pool, "Nope", "08:00"),
        Err(AppError::UnknownEvent(_))
    ));
    assert!(tracker.today_logs().is_empty());
}

#[test]
fn reset_today_clears_logs_and_cursor() {
    let pool = pool_with_roster(&["A", "B"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();
    tracker.log_current(&pool).unwrap();
    tracker.log_current(&pool).unwrap();

    assert_eq!(tracker.reset_today(&pool).unwrap(), 2);
    assert_eq!(tracker.current_index(), 0);
    assert!(tracker.today_logs().is_empty());
    assert!(get_logs_for_date(&pool.conn, &day("2024-01-01")).unwrap().is_empty());
}

#[test]
fn stored_cursor_is_clamped_after_roster_shrinks() {
    let mut pool = pool_with_roster(&["A", "B", "C"]);
    set_meta(&pool.conn, meta::LAST_LOGGED_DATE, "2024-01-01").unwrap();
    set_meta(&pool.conn, meta::LAST_EVENT_INDEX, "3").unwrap();

    let mut roster = RosterEditor::load(&pool).unwrap();
    roster.remove("C").unwrap();
    roster.save(&mut pool).unwrap();

    let tracker = DayTracker::initialize_for_today(&pool, clock("2024-01-01", "12:00")).unwrap();
    assert_eq!(tracker.current_index(), 2);
    assert!(tracker.is_day_complete());
}

#[test]
fn history_follows_roster_order() {
    let pool = pool_with_roster(&["A", "B", "C"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();

    tracker.edit_or_backfill(&pool, "C", "09:00").unwrap();
    tracker.log_current(&pool).unwrap();

    let names: Vec<&str> = tracker
        .history()
        .iter()
        .map(|(l, _)| l.event_name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "C"]);

    let p = tracker.progress();
    assert_eq!((p.logged, p.total), (2, 3));
    assert!((p.percentage() - 66.666).abs() < 0.01);
}

/// Make every `op` on `table` abort, as a read-only or failing disk would.
fn reject_writes(pool: &DbPool, table: &str, op: &str) {
    pool.conn
        .execute_batch(&format!(
            "CREATE TRIGGER reject_{table}_{op} BEFORE {op} ON {table}
             BEGIN SELECT RAISE(ABORT, 'write rejected'); END;"
        ))
        .unwrap();
}

#[test]
fn failed_tap_leaves_memory_and_store_unchanged() {
    let pool = pool_with_roster(&["A", "B", "C"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();
    tracker.log_current(&pool).unwrap();

    reject_writes(&pool, "metadata", "UPDATE");

    assert!(matches!(
        tracker.log_current(&pool),
        Err(AppError::StorageUnavailable(_))
    ));
    assert!(matches!(
        tracker.skip_current(&pool),
        Err(AppError::StorageUnavailable(_))
    ));

    assert_eq!(tracker.current_index(), 1);
    assert_eq!(tracker.today_logs().len(), 1);
    assert_eq!(tracker.current_event().unwrap().name, "B");

    // The log insert was rolled back with the cursor update
    assert_eq!(get_logs_for_date(&pool.conn, &day("2024-01-01")).unwrap().len(), 1);
    assert_eq!(
        get_meta(&pool.conn, meta::LAST_EVENT_INDEX).unwrap().as_deref(),
        Some("1")
    );
}

#[test]
fn failed_correction_keeps_the_previous_time() {
    let pool = pool_with_roster(&["A", "B"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();
    tracker.log_current(&pool).unwrap();

    reject_writes(&pool, "logs", "UPDATE");

    assert!(matches!(
        tracker.edit_or_backfill(&pool, "A", "06:00"),
        Err(AppError::StorageUnavailable(_))
    ));
    assert_eq!(tracker.today_logs()[0].time, LogTime::At(hm("08:00")));

    let logs = get_logs_for_date(&pool.conn, &day("2024-01-01")).unwrap();
    assert_eq!(logs[0].time_str(), "08:00");
}

#[test]
fn failed_backfill_does_not_move_the_cursor() {
    let pool = pool_with_roster(&["A", "B", "C"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();
    tracker.log_current(&pool).unwrap();
    tracker.edit_or_backfill(&pool, "C", "09:00").unwrap();

    reject_writes(&pool, "logs", "INSERT");

    assert!(matches!(
        tracker.edit_or_backfill(&pool, "B", "08:30"),
        Err(AppError::StorageUnavailable(_))
    ));
    assert_eq!(tracker.current_index(), 1);
    assert_eq!(tracker.today_logs().len(), 2);
    assert!(!tracker.is_day_complete());
    assert_eq!(
        get_meta(&pool.conn, meta::LAST_EVENT_INDEX).unwrap().as_deref(),
        Some("1")
    );
}

#[test]
fn failed_reset_keeps_todays_logs() {
    let pool = pool_with_roster(&["A", "B"]);
    let mut tracker =
        DayTracker::initialize_for_today(&pool, clock("2024-01-01", "08:00")).unwrap();
    tracker.log_current(&pool).unwrap();

    reject_writes(&pool, "metadata", "UPDATE");

    assert!(tracker.reset_today(&pool).is_err());
    assert_eq!(tracker.current_index(), 1);
    assert_eq!(tracker.today_logs().len(), 1);
    assert_eq!(get_logs_for_date(&pool.conn, &day("2024-01-01")).unwrap().len(), 1);
}
