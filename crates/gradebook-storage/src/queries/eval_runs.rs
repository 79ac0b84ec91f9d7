//! Queries for the eval_runs table: one row per evaluation run.

use gradebook_core::errors::StorageError;
use gradebook_core::{EvalRun, EvalRunRecord};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::codec::{decode_results, encode_results, format_timestamp, parse_timestamp};

const SELECT_COLUMNS: &str = "SELECT id, wall_clock_time, input_tokens, output_tokens, eval_results,
        git_revision, git_diff, working_directory, timestamp, model
     FROM eval_runs";

/// Older rows use a space separator; sort them as if it were `T`.
const SORTABLE_TIMESTAMP: &str = "replace(timestamp, ' ', 'T')";

/// Row as stored, before the text columns are decoded.
struct RawRow {
    id: i64,
    wall_clock_time: f64,
    input_tokens: i64,
    output_tokens: i64,
    eval_results: String,
    git_revision: String,
    git_diff: String,
    working_directory: String,
    timestamp: String,
    model: String,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            wall_clock_time: row.get(1)?,
            input_tokens: row.get(2)?,
            output_tokens: row.get(3)?,
            eval_results: row.get(4)?,
            git_revision: row.get(5)?,
            git_diff: row.get(6)?,
            working_directory: row.get(7)?,
            timestamp: row.get(8)?,
            model: row.get(9)?,
        })
    }

    fn decode(self) -> Result<EvalRunRecord, StorageError> {
        Ok(EvalRunRecord {
            id: self.id,
            run: EvalRun {
                wall_clock_time: self.wall_clock_time,
                input_tokens: self.input_tokens,
                output_tokens: self.output_tokens,
                eval_results: decode_results(self.id, &self.eval_results)?,
                revision: self.git_revision,
                diff: self.git_diff,
                working_directory: self.working_directory,
                timestamp: parse_timestamp(self.id, &self.timestamp)?,
                model: self.model,
            },
        })
    }
}

fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

/// Insert a run. Returns the assigned row id.
pub fn insert_run(conn: &Connection, run: &EvalRun) -> Result<i64, StorageError> {
    let results = encode_results(&run.eval_results)?;
    conn.prepare_cached(
        "INSERT INTO eval_runs
            (wall_clock_time, input_tokens, output_tokens, eval_results, git_revision,
             git_diff, working_directory, timestamp, model)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            run.wall_clock_time,
            run.input_tokens,
            run.output_tokens,
            results,
            run.revision,
            run.diff,
            run.working_directory,
            format_timestamp(&run.timestamp),
            run.model,
        ])
    })
    .map_err(sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

/// Point lookup by id.
pub fn get_run(conn: &Connection, id: i64) -> Result<Option<EvalRunRecord>, StorageError> {
    let raw = conn
        .prepare_cached(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
        .and_then(|mut stmt| stmt.query_row(params![id], RawRow::from_row).optional())
        .map_err(sqlite_err)?;
    raw.map(RawRow::decode).transpose()
}

/// All runs, most recently inserted first.
pub fn query_all(conn: &Connection) -> Result<Vec<EvalRunRecord>, StorageError> {
    query_records(conn, &format!("{SELECT_COLUMNS} ORDER BY id DESC"), params![])
}

/// Runs for one revision, most recent timestamp first.
pub fn query_by_revision(
    conn: &Connection,
    revision: &str,
) -> Result<Vec<EvalRunRecord>, StorageError> {
    query_records(
        conn,
        &format!(
            "{SELECT_COLUMNS} WHERE git_revision = ?1
             ORDER BY {SORTABLE_TIMESTAMP} DESC, id DESC"
        ),
        params![revision],
    )
}

fn query_records(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<EvalRunRecord>, StorageError> {
    let mut stmt = conn.prepare_cached(sql).map_err(sqlite_err)?;
    let raw = stmt
        .query_map(params, RawRow::from_row)
        .map_err(sqlite_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_err)?;
    raw.into_iter().map(RawRow::decode).collect()
}

/// Delete one run. Returns true iff a row was removed.
pub fn delete_run(conn: &Connection, id: i64) -> Result<bool, StorageError> {
    let removed = conn
        .execute("DELETE FROM eval_runs WHERE id = ?1", params![id])
        .map_err(sqlite_err)?;
    Ok(removed > 0)
}

/// Delete every run. Returns the number removed.
pub fn clear_runs(conn: &Connection) -> Result<usize, StorageError> {
    conn.execute("DELETE FROM eval_runs", []).map_err(sqlite_err)
}

/// Count stored runs.
pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM eval_runs", [], |row| row.get(0))
        .map_err(sqlite_err)
}

/// Distinct revision ids, most recently evaluated first.
pub fn distinct_revisions(conn: &Connection) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT git_revision, MAX({SORTABLE_TIMESTAMP}) AS latest FROM eval_runs
             GROUP BY git_revision ORDER BY latest DESC, git_revision ASC"
        ))
        .map_err(sqlite_err)?;
    let revisions = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(sqlite_err)?;
    revisions.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}
