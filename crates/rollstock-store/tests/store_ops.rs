// SPDX-License-Identifier: Apache-2.0

use rollstock_model::{RollDraft, RollField, RollId};
use rollstock_query::FilterSpec;
use rollstock_store::{RollStore, StoreError};

fn draft(work_order: &str, width: &str) -> RollDraft {
    RollDraft {
        shift: "A".to_string(),
        width: width.to_string(),
        diameter: "90".to_string(),
        basis_weight: "80.5".to_string(),
        net_weight: "1450".to_string(),
        roll_number: "R-001".to_string(),
        sequence: Some("1".to_string()),
        work_order: work_order.to_string(),
        production_date: "2024-03-01".to_string(),
        quality_code: Some("Q1".to_string()),
        quality_description: None,
    }
}

fn seeded_store() -> (RollStore, Vec<RollId>) {
    let store = RollStore::open_in_memory().expect("open");
    let ids = vec![
        store.create(&draft("85500", "125.0")).expect("create"),
        store.create(&draft("85501", "1250")).expect("create"),
        store.create(&draft("12345", "12.5")).expect("create"),
    ];
    (store, ids)
}

#[test]
fn create_assigns_increasing_ids_and_stamps_created_at() {
    let (store, ids) = seeded_store();
    assert!(ids[0] < ids[1] && ids[1] < ids[2]);
    let rows = store.list_all().expect("list");
    assert!(rows.iter().all(|r| !r.created_at.is_empty()));
}

#[test]
fn create_rejects_invalid_draft_without_partial_insert() {
    let store = RollStore::open_in_memory().expect("open");
    let bad = draft("85500", "wide");
    let err = store.create(&bad).expect_err("invalid width");
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(store.list_all().expect("list").is_empty());
}

#[test]
fn list_all_orders_by_id_descending() {
    let (store, ids) = seeded_store();
    let rows = store.list_all().expect("list");
    let listed: Vec<RollId> = rows.iter().map(|r| r.id).collect();
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(listed, expected);
}

#[test]
fn get_by_ids_silently_omits_unknown_ids() {
    let (store, ids) = seeded_store();
    let rows = store
        .get_by_ids(&[ids[0], RollId::new(999)])
        .expect("get_by_ids");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, ids[0]);
}

#[test]
fn delete_counts_only_existing_rows() {
    let (mut store, ids) = seeded_store();
    let deleted = store
        .delete(&[ids[0], ids[1], RollId::new(999)])
        .expect("delete");
    assert_eq!(deleted, 2);
    assert_eq!(store.list_all().expect("list").len(), 1);
}

#[test]
fn delete_with_empty_selection_is_guarded() {
    let (mut store, _) = seeded_store();
    assert_eq!(store.delete(&[]), Err(StoreError::NothingSelected));
    assert_eq!(store.list_all().expect("list").len(), 3);
}

#[test]
fn duplicate_ids_in_selection_count_once() {
    let (mut store, ids) = seeded_store();
    let deleted = store.delete(&[ids[0], ids[0]]).expect("delete");
    assert_eq!(deleted, 1);
}

#[test]
fn archive_round_trip_moves_values_to_history() {
    let (mut store, ids) = seeded_store();
    let before = store.get_by_ids(&[ids[0], ids[2]]).expect("get");
    let moved = store.archive(&[ids[0], ids[2]]).expect("archive");
    assert_eq!(moved, 2);

    let live: Vec<RollId> = store.list_all().expect("list").iter().map(|r| r.id).collect();
    assert_eq!(live, vec![ids[1]]);

    let history = store.history().expect("history");
    assert_eq!(history.len(), 2);
    for archived in &history {
        assert!(!archived.archived_at.is_empty());
        let original = before
            .iter()
            .find(|r| r.work_order == archived.work_order)
            .expect("matching source row");
        assert_eq!(archived.width, original.width);
        assert_eq!(archived.roll_number, original.roll_number);
        assert_eq!(archived.created_at, original.created_at);
    }
}

#[test]
fn archive_with_empty_selection_is_guarded() {
    let (mut store, _) = seeded_store();
    assert!(matches!(
        store.archive(&[]),
        Err(StoreError::NothingSelected)
    ));
    assert_eq!(store.list_all().expect("list").len(), 3);
}

#[test]
fn archive_of_only_unknown_ids_moves_nothing() {
    let (mut store, _) = seeded_store();
    let moved = store.archive(&[RollId::new(999)]).expect("archive");
    assert_eq!(moved, 0);
    assert_eq!(store.list_all().expect("list").len(), 3);
    assert!(store.history().expect("history").is_empty());
}

#[test]
fn failed_archive_leaves_live_table_unchanged() {
    let (mut store, ids) = seeded_store();
    // Simulated storage fault: the history table is gone, so the copy step
    // inside the transaction must fail and roll back the whole move.
    store
        .connection()
        .execute_batch("DROP TABLE rolls_history")
        .expect("drop history");
    let err = store.archive(&ids).expect_err("archive must fail");
    assert!(matches!(err, StoreError::Storage(_)));
    assert_eq!(store.list_all().expect("list").len(), 3);
}

#[test]
fn filter_matches_substring_case_insensitively_in_id_desc_order() {
    let (store, ids) = seeded_store();
    let mut spec = FilterSpec::new();
    spec.set(RollField::WorkOrder, "855");
    let rows = store.filter(&spec).expect("filter");
    let matched: Vec<RollId> = rows.iter().map(|r| r.id).collect();
    assert_eq!(matched, vec![ids[1], ids[0]]);
}

#[test]
fn numeric_filter_requires_exact_equality() {
    let (store, ids) = seeded_store();
    let mut spec = FilterSpec::new();
    spec.set(RollField::Width, "125.0");
    let rows = store.filter(&spec).expect("filter");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, ids[0]);
}

#[test]
fn unparseable_numeric_filter_is_dropped_from_the_predicate() {
    let (store, _) = seeded_store();
    let mut spec = FilterSpec::new();
    spec.set(RollField::Width, "not-a-number");
    let rows = store.filter(&spec).expect("filter");
    assert_eq!(rows.len(), 3);
}

#[test]
fn empty_filter_spec_returns_all_records() {
    let (store, _) = seeded_store();
    let rows = store.filter(&FilterSpec::new()).expect("filter");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows, store.list_all().expect("list"));
}

#[test]
fn filter_combines_constraints_with_and() {
    let (store, ids) = seeded_store();
    let mut spec = FilterSpec::new();
    spec.set(RollField::WorkOrder, "855");
    spec.set(RollField::Width, "1250");
    let rows = store.filter(&spec).expect("filter");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, ids[1]);
}

#[test]
fn on_disk_store_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tmp");
    let path = dir.path().join("data").join("production.db");
    let first = RollStore::open(&path).expect("open");
    first.create(&draft("85500", "125.0")).expect("create");
    drop(first);

    let reopened = RollStore::open(&path).expect("reopen");
    assert_eq!(reopened.list_all().expect("list").len(), 1);
}
