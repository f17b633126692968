use rusqlite::Row;

/// Records read back from `SELECT *` rows, by column name.
pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}
