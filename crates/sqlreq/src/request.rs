//! Uniform dispatch and the rendered command value.
//!
//! [`SqlRequest`] is the capability surface the execution layer sees: every
//! filter and statement variant renders to SQL text and an ordered parameter
//! sequence. [`SqlCommand`] captures that rendered pair as a value and is the
//! only thing that crosses the execution boundary; the `@name` → `$n`
//! placeholder translation for PostgreSQL lives here and nowhere else.

use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

use crate::client::GenericClient;
use crate::error::SqlResult;
use crate::filter::{
    CombinedFilter, CompareFilter, ExistsFilter, Filter, LikeFilter, NotExistsFilter, RawFilter,
};
use crate::param::Param;
use crate::query::{CombinedQuery, DeleteQuery, IfQuery, InsertQuery, Query, SelectQuery};
use crate::row::FromRow;

/// The uniform render contract implemented by every filter and statement.
///
/// Rendering is a pure function of the immutable tree: calling either method
/// twice yields identical results, and concurrent calls need no coordination.
pub trait SqlRequest {
    /// Render the SQL text (a complete statement for queries, a boolean
    /// fragment for filters).
    fn sql_query(&self) -> SqlResult<String>;

    /// Collect the ordered bind parameters.
    fn parameters(&self) -> Vec<Param>;
}

macro_rules! impl_sql_request {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl SqlRequest for $ty {
                fn sql_query(&self) -> SqlResult<String> {
                    <$ty>::sql_query(self)
                }

                fn parameters(&self) -> Vec<Param> {
                    <$ty>::parameters(self)
                }
            }
        )+
    };
}

impl_sql_request!(
    Filter,
    CompareFilter,
    ExistsFilter,
    NotExistsFilter,
    CombinedFilter,
    Query,
    SelectQuery,
    InsertQuery,
    DeleteQuery,
    IfQuery,
    CombinedQuery,
);

impl SqlRequest for RawFilter {
    fn sql_query(&self) -> SqlResult<String> {
        Ok(RawFilter::sql_query(self).to_string())
    }

    fn parameters(&self) -> Vec<Param> {
        RawFilter::parameters(self)
    }
}

impl SqlRequest for LikeFilter {
    fn sql_query(&self) -> SqlResult<String> {
        Ok(LikeFilter::sql_query(self))
    }

    fn parameters(&self) -> Vec<Param> {
        LikeFilter::parameters(self)
    }
}

/// A rendered statement: SQL text plus its ordered bind parameters.
///
/// This is the value handed to the execution layer. It owns no connection and
/// can be executed any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlCommand {
    text: String,
    parameters: Vec<Param>,
}

impl SqlCommand {
    /// Render a request once and capture both halves.
    pub fn build(request: &impl SqlRequest) -> SqlResult<Self> {
        Ok(Self {
            text: request.sql_query()?,
            parameters: request.parameters(),
        })
    }

    /// The rendered SQL text with `@name` placeholders.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The ordered bind parameters.
    pub fn parameters(&self) -> &[Param] {
        &self.parameters
    }

    /// Rewrite `@name` placeholders to positional `$n` placeholders.
    ///
    /// A parameter's index is its position in the ordered parameter list, so
    /// every textual occurrence of the same name maps to the same `$n`.
    /// An `@identifier` that names no parameter is left verbatim: raw
    /// fragments may carry text this command does not own.
    pub fn to_positional(&self) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut chars = self.text.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != '@' {
                out.push(ch);
                continue;
            }

            let mut name = String::new();
            while let Some(&next) = chars.peek() {
                if next == '_' || next.is_ascii_alphanumeric() {
                    name.push(next);
                    chars.next();
                } else {
                    break;
                }
            }

            match self.position_of(&name) {
                Some(idx) => {
                    out.push('$');
                    out.push_str(&(idx + 1).to_string());
                }
                None => {
                    out.push('@');
                    out.push_str(&name);
                }
            }
        }
        out
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.parameters.iter().position(|p| p.name() == name)
    }

    /// Parameter refs compatible with `tokio-postgres`, in list order.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.parameters
            .iter()
            .map(|p| p.value() as &(dyn ToSql + Sync))
            .collect()
    }

    /// Execute and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> SqlResult<Vec<Row>> {
        let sql = self.to_positional();
        self.trace(&sql);
        conn.query(&sql, &self.params_ref()).await
    }

    /// Execute and return all rows mapped to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> SqlResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute and return exactly one row.
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> SqlResult<Row> {
        let sql = self.to_positional();
        self.trace(&sql);
        conn.query_one(&sql, &self.params_ref()).await
    }

    /// Execute and return exactly one row mapped to `T`.
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> SqlResult<T> {
        let row = self.fetch_one(conn).await?;
        T::from_row(&row)
    }

    /// Execute and return at most one row.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> SqlResult<Option<Row>> {
        let sql = self.to_positional();
        self.trace(&sql);
        conn.query_opt(&sql, &self.params_ref()).await
    }

    /// Execute and return at most one row mapped to `T`.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> SqlResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute and return the affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> SqlResult<u64> {
        let sql = self.to_positional();
        self.trace(&sql);
        conn.execute(&sql, &self.params_ref()).await
    }

    #[cfg(feature = "tracing")]
    fn trace(&self, sql: &str) {
        tracing::debug!(sql = %sql, params = self.parameters.len(), "executing statement");
    }

    #[cfg(not(feature = "tracing"))]
    fn trace(&self, _sql: &str) {}
}
