//! Student record store: repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide durable keyed storage over the `students` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `StudentDraft::validate()` before SQL mutations.
//! - Visibility is chosen by the caller through `include_deleted`; the store
//!   itself never hides rows it was asked for.
//! - Every mutation is one SQL statement, so a concurrent reader never sees
//!   a half-applied row.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::student::{StudentDraft, StudentId, StudentRecord, StudentValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    name,
    gender,
    phone,
    age,
    native_place,
    major,
    email,
    tag,
    remark,
    created_at,
    updated_at,
    is_deleted,
    creator_id
FROM students";

const STUDENT_COLUMNS: [&str; 15] = [
    "id",
    "owner_id",
    "name",
    "gender",
    "phone",
    "age",
    "native_place",
    "major",
    "email",
    "tag",
    "remark",
    "created_at",
    "updated_at",
    "is_deleted",
    "creator_id",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence and lookups.
#[derive(Debug)]
pub enum RepoError {
    /// Draft failed field validation; nothing was written.
    Validation(StudentValidationError),
    Db(DbError),
    /// No row matched the requested id (or no active row, for updates).
    NotFound(StudentId),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "student repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "student repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "student repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store contract for student data.
pub trait StudentRepository {
    /// Persists a new active record and returns it with its assigned id.
    fn insert_student(&self, draft: &StudentDraft, now_ms: i64) -> RepoResult<StudentRecord>;
    /// Loads one record by id, optionally including soft-deleted rows.
    fn get_student(&self, id: StudentId, include_deleted: bool)
        -> RepoResult<Option<StudentRecord>>;
    /// Loads every record ordered by `id ASC`.
    fn list_students(&self, include_deleted: bool) -> RepoResult<Vec<StudentRecord>>;
    /// Overwrites the mutable fields of one active record.
    ///
    /// `id`, `created_at`, `owner_id` and `creator_id` are never touched.
    /// Returns [`RepoError::NotFound`] when no active row has this id.
    fn update_student(&self, id: StudentId, draft: &StudentDraft, now_ms: i64) -> RepoResult<()>;
    /// Sets the tombstone flag on one record, active or not.
    ///
    /// Returns [`RepoError::NotFound`] only when the id never existed.
    fn soft_delete_student(&self, id: StudentId, now_ms: i64) -> RepoResult<()>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Creates a repository from a migrated connection.
    ///
    /// # Errors
    /// - Rejects connections that skipped `open_db*` bootstrap or whose
    ///   `students` table lacks an expected column.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_student_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn insert_student(&self, draft: &StudentDraft, now_ms: i64) -> RepoResult<StudentRecord> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO students (
                owner_id,
                name,
                gender,
                phone,
                age,
                native_place,
                major,
                email,
                tag,
                remark,
                created_at,
                updated_at,
                is_deleted,
                creator_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11, 0, ?12);",
            params![
                draft.owner_id,
                draft.name.as_str(),
                draft.gender.as_deref(),
                draft.phone.as_deref(),
                draft.age,
                draft.native_place.as_deref(),
                draft.major.as_deref(),
                draft.email.as_deref(),
                draft.tag.as_deref(),
                draft.remark.as_deref(),
                now_ms,
                draft.creator_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        Ok(StudentRecord::from_draft(id, draft, now_ms))
    }

    fn get_student(
        &self,
        id: StudentId,
        include_deleted: bool,
    ) -> RepoResult<Option<StudentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id, bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }

        Ok(None)
    }

    fn list_students(&self, include_deleted: bool) -> RepoResult<Vec<StudentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL}
             WHERE (?1 = 1 OR is_deleted = 0)
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([bool_to_int(include_deleted)])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }

    fn update_student(&self, id: StudentId, draft: &StudentDraft, now_ms: i64) -> RepoResult<()> {
        draft.validate()?;

        // MAX keeps updated_at monotonic when the wall clock steps backwards.
        let changed = self.conn.execute(
            "UPDATE students
             SET
                name = ?2,
                gender = ?3,
                phone = ?4,
                age = ?5,
                native_place = ?6,
                major = ?7,
                email = ?8,
                tag = ?9,
                remark = ?10,
                updated_at = MAX(?11, updated_at)
             WHERE id = ?1
               AND is_deleted = 0;",
            params![
                id,
                draft.name.as_str(),
                draft.gender.as_deref(),
                draft.phone.as_deref(),
                draft.age,
                draft.native_place.as_deref(),
                draft.major.as_deref(),
                draft.email.as_deref(),
                draft.tag.as_deref(),
                draft.remark.as_deref(),
                now_ms,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn soft_delete_student(&self, id: StudentId, now_ms: i64) -> RepoResult<()> {
        // Tombstoned rows match too but keep their updated_at untouched.
        let changed = self.conn.execute(
            "UPDATE students
             SET
                updated_at = CASE
                    WHEN is_deleted = 0 THEN MAX(?2, updated_at)
                    ELSE updated_at
                END,
                is_deleted = 1
             WHERE id = ?1;",
            params![id, now_ms],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<StudentRecord> {
    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in students.is_deleted"
            )));
        }
    };

    let record = StudentRecord {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        name: row.get("name")?,
        gender: row.get("gender")?,
        phone: row.get("phone")?,
        age: row.get("age")?,
        native_place: row.get("native_place")?,
        major: row.get("major")?,
        email: row.get("email")?,
        tag: row.get("tag")?,
        remark: row.get("remark")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        is_deleted,
        creator_id: row.get("creator_id")?,
    };

    if record.created_at > record.updated_at {
        return Err(RepoError::InvalidData(format!(
            "student {} has created_at {} after updated_at {}",
            record.id, record.created_at, record.updated_at
        )));
    }

    Ok(record)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_student_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'students';",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some();
    if !table_exists {
        return Err(RepoError::MissingRequiredTable("students"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(students);")?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    for column in STUDENT_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "students",
                column,
            });
        }
    }

    Ok(())
}
