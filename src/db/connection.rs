use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::error::{StoreError, StoreResult};

/// Open the survey database read-only.
///
/// The facade never writes, and a read-only open reports a missing file as
/// `StorageUnavailable` instead of silently creating an empty database.
pub fn open_survey_db(path: &Path) -> StoreResult<Connection> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|source| StoreError::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

    log::debug!("Opened survey database at {}", path.display());

    Ok(conn)
}

/// Check that both survey tables are present in the store.
pub fn verify_schema(conn: &Connection) -> StoreResult<bool> {
    let table_count: i64 = conn.query_row(
        "SELECT count(*) FROM sqlite_master \
         WHERE type = 'table' AND name IN ('Answer', 'Question')",
        [],
        |row| row.get(0),
    )?;

    if table_count == 2 {
        log::info!("Survey database schema verified");
        Ok(true)
    } else {
        log::error!("Survey database is missing the Answer or Question table");
        Ok(false)
    }
}
