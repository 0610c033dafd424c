//! # sqlreq
//!
//! Composable SQL statement and filter primitives for Rust.
//!
//! ## Features
//!
//! - **Statements as values**: filters and statements are immutable trees,
//!   assembled once and rendered on demand
//! - **Named parameters**: rendered text uses `@name` placeholders; the
//!   parameter list is ordered and deduplicated (last value wins, first
//!   position kept)
//! - **Closed variant sets**: filter and statement kinds are sum types with
//!   exhaustive-match rendering, so adding a kind is a compiler-checked change
//! - **Thin execution seam**: [`SqlCommand`] translates `@name` to positional
//!   `$n` placeholders and executes over any [`GenericClient`]
//!
//! ## Building statements
//!
//! ```ignore
//! use sqlreq::{Filter, IfQuery, Query, SqlCommand, insert, select};
//!
//! let upsert_if_missing = IfQuery::new(
//!     Filter::not_exists(select("Country").field("Id").filter(Filter::eq("Id", 1))),
//!     insert("Country").set("Id", 1).set("Name", "Austria"),
//! );
//!
//! let command = SqlCommand::build(&Query::from(upsert_if_missing))?;
//! let affected = command.execute(&client).await?;
//! ```

pub mod client;
pub mod error;
pub mod filter;
pub mod param;
pub mod prelude;
pub mod query;
pub mod request;
pub mod row;
pub mod value;

pub use client::GenericClient;
pub use error::{SqlError, SqlResult};
pub use filter::{
    CombinedFilter, CompareFilter, CompareOperator, ExistsFilter, Filter, LikeFilter,
    NotExistsFilter, RawFilter,
};
pub use param::{Param, dedupe_by_name};
pub use query::{
    CombinedQuery, DeleteQuery, FieldValue, IfQuery, InsertQuery, Query, SelectQuery, delete,
    insert, select,
};
pub use request::{SqlCommand, SqlRequest};
pub use row::{FromRow, RowExt};
pub use value::Value;
