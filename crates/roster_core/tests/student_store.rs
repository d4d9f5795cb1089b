use roster_core::db::open_db_in_memory;
use roster_core::{RepoError, SqliteStudentRepository, StudentDraft, StudentRepository};

fn draft(name: &str, phone: &str) -> StudentDraft {
    let mut draft = StudentDraft::new(name);
    draft.phone = Some(phone.to_string());
    draft
}

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let mut input = draft("Li Wei", "13800001111");
    input.owner_id = Some(11);
    input.creator_id = Some(22);
    input.age = Some(19);
    let created = repo.insert_student(&input, 1_000).unwrap();

    let loaded = repo.get_student(created.id, false).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.to_draft(), input);
    assert_eq!(loaded.created_at, 1_000);
    assert_eq!(loaded.updated_at, 1_000);
    assert!(!loaded.is_deleted);
}

#[test]
fn ids_are_unique_and_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let first = repo.insert_student(&draft("A", "1"), 1).unwrap();
    let second = repo.insert_student(&draft("B", "2"), 1).unwrap();
    assert_ne!(first.id, second.id);

    repo.soft_delete_student(second.id, 2).unwrap();
    let third = repo.insert_student(&draft("C", "3"), 3).unwrap();
    assert!(third.id > second.id);
}

#[test]
fn list_excludes_deleted_by_default_and_can_include_them() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let active = repo.insert_student(&draft("Active", "1"), 1).unwrap();
    let removed = repo.insert_student(&draft("Removed", "2"), 1).unwrap();
    repo.soft_delete_student(removed.id, 2).unwrap();

    let visible = repo.list_students(false).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, active.id);

    let all = repo.list_students(true).unwrap();
    let ids: Vec<_> = all.iter().map(|record| record.id).collect();
    assert_eq!(ids, vec![active.id, removed.id]);
}

#[test]
fn update_overwrites_mutable_fields_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let mut original = draft("Li Wei", "13800001111");
    original.owner_id = Some(5);
    original.creator_id = Some(6);
    let created = repo.insert_student(&original, 1_000).unwrap();

    let mut replacement = draft("Li Wei Jr", "13900002222");
    replacement.owner_id = Some(50);
    replacement.creator_id = Some(60);
    replacement.major = Some("Physics".to_string());
    repo.update_student(created.id, &replacement, 2_000).unwrap();

    let loaded = repo.get_student(created.id, false).unwrap().unwrap();
    assert_eq!(loaded.name, "Li Wei Jr");
    assert_eq!(loaded.phone.as_deref(), Some("13900002222"));
    assert_eq!(loaded.major.as_deref(), Some("Physics"));
    assert_eq!(loaded.owner_id, Some(5));
    assert_eq!(loaded.creator_id, Some(6));
    assert_eq!(loaded.created_at, 1_000);
    assert_eq!(loaded.updated_at, 2_000);
}

#[test]
fn update_never_moves_updated_at_backwards() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let created = repo.insert_student(&draft("Li Wei", "1"), 5_000).unwrap();
    repo.update_student(created.id, &draft("Li Wei", "2"), 4_000)
        .unwrap();

    let loaded = repo.get_student(created.id, false).unwrap().unwrap();
    assert_eq!(loaded.updated_at, 5_000);
    assert!(loaded.created_at <= loaded.updated_at);
}

#[test]
fn update_of_missing_or_deleted_row_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let err = repo.update_student(404, &draft("Ghost", "0"), 1).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(404)));

    let created = repo.insert_student(&draft("Li Wei", "1"), 1).unwrap();
    repo.soft_delete_student(created.id, 2).unwrap();
    let err = repo
        .update_student(created.id, &draft("Back", "1"), 3)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == created.id));

    let stored = repo.get_student(created.id, true).unwrap().unwrap();
    assert_eq!(stored.name, "Li Wei");
    assert!(stored.is_deleted);
}

#[test]
fn soft_delete_is_idempotent_and_keeps_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let created = repo.insert_student(&draft("Li Wei", "1"), 1_000).unwrap();
    repo.soft_delete_student(created.id, 2_000).unwrap();
    let after_first = repo.get_student(created.id, true).unwrap().unwrap();

    repo.soft_delete_student(created.id, 3_000).unwrap();
    let after_second = repo.get_student(created.id, true).unwrap().unwrap();

    assert!(repo.get_student(created.id, false).unwrap().is_none());
    assert!(after_first.is_deleted);
    assert_eq!(after_first.updated_at, 2_000);
    assert_eq!(after_second, after_first);
}

#[test]
fn soft_delete_of_unknown_id_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let err = repo.soft_delete_student(77, 1).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(77)));
}

#[test]
fn validation_failure_blocks_insert_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let err = repo.insert_student(&draft("", "1"), 1).unwrap_err();
    assert!(matches!(err, RepoError::Validation(ref failure) if failure.has_field("name")));
    assert!(repo.list_students(true).unwrap().is_empty());

    let created = repo.insert_student(&draft("Li Wei", "1"), 1).unwrap();
    let err = repo
        .update_student(created.id, &draft("Li Wei", "phone?"), 2)
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(ref failure) if failure.has_field("phone")));
    let stored = repo.get_student(created.id, false).unwrap().unwrap();
    assert_eq!(stored.phone.as_deref(), Some("1"));
}

#[test]
fn corrupted_tombstone_flag_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let created = repo.insert_student(&draft("Li Wei", "1"), 1).unwrap();
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "UPDATE students SET is_deleted = 2 WHERE id = ?1;",
        [created.id],
    )
    .unwrap();

    let err = repo.get_student(created.id, true).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
