//! Row mapping traits.

use crate::error::SqlResult;
use tokio_postgres::Row;

/// Trait for mapping database rows to entities.
///
/// Implementations live with the caller (hand-written or generated); the
/// execution layer only needs the conversion seam.
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> SqlResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning [`crate::SqlError::Decode`] on failure
    fn try_get_column<T>(&self, column: &str) -> SqlResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> SqlResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| crate::error::SqlError::decode(column, e.to_string()))
    }
}
