//! Shared helpers for CSV backend tests.

use tempfile::TempDir;

use super::connection::CsvConnection;

/// Create a connection rooted in a fresh temporary directory. The directory
/// is removed when the returned `TempDir` is dropped, so callers must keep
/// it alive for the duration of the test.
pub fn temp_connection() -> (CsvConnection, TempDir) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let connection = CsvConnection::new(temp_dir.path()).expect("failed to create connection");
    (connection, temp_dir)
}
