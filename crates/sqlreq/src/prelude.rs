//! Convenient imports for typical `sqlreq` usage.
//!
//! This module is intentionally small and focused on the most common APIs so
//! callers can start with:
//!
//! ```ignore
//! use sqlreq::prelude::*;
//! ```

pub use crate::{
    CompareOperator, FieldValue, Filter, FromRow, GenericClient, Param, Query, RowExt, SqlCommand,
    SqlError, SqlRequest, SqlResult, Value, delete, insert, select,
};
