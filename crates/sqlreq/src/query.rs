//! Statement variants: select, insert, delete, conditional, combined.
//!
//! A [`Query`] renders to complete SQL text (where a [`Filter`] renders only
//! a boolean fragment) and collects its bind parameters in declaration order.
//! Emptiness degrades gracefully: an insert with no field values or a
//! combination with no children renders to an empty string rather than
//! failing, so conditionally-assembled trees stay composable.

use crate::error::SqlResult;
use crate::filter::Filter;
use crate::param::{Param, dedupe_by_name};
use crate::value::Value;

/// A field assignment for insert statements.
///
/// The bind parameter name defaults to the field name; supply a distinct one
/// with [`FieldValue::with_parameter_name`] when two assignments would
/// otherwise collide.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    field: String,
    value: Value,
    parameter_name: String,
}

impl FieldValue {
    /// Create a field assignment; the parameter name defaults to the field name.
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        Self {
            parameter_name: field.clone(),
            field,
            value: value.into(),
        }
    }

    /// Use a parameter name different from the field name.
    pub fn with_parameter_name(mut self, name: impl Into<String>) -> Self {
        self.parameter_name = name.into();
        self
    }

    /// The column name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The assigned value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The bind parameter name.
    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }
}

/// A SELECT statement over one table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: String,
    selected_fields: Vec<String>,
    filter: Option<Filter>,
}

impl SelectQuery {
    /// Create a select over the given table with no projected fields (`*`).
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            selected_fields: Vec::new(),
            filter: None,
        }
    }

    /// Add one projected field expression.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.selected_fields.push(field.into());
        self
    }

    /// Add projected field expressions.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Set the WHERE filter.
    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Render `SELECT {fields or *} FROM {table}` with an optional WHERE
    /// suffix when the filter renders non-empty.
    pub fn sql_query(&self) -> SqlResult<String> {
        let fields = if self.selected_fields.is_empty() {
            "*".to_string()
        } else {
            self.selected_fields.join(", ")
        };

        let mut sql = format!("SELECT {} FROM {}", fields, self.table);

        if let Some(filter) = &self.filter {
            let fragment = filter.sql_query()?;
            if !fragment.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&fragment);
            }
        }
        Ok(sql)
    }

    /// The filter's parameters, or none.
    pub fn parameters(&self) -> Vec<Param> {
        self.filter.as_ref().map(Filter::parameters).unwrap_or_default()
    }
}

/// An INSERT statement over one table.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    table: String,
    field_values: Vec<FieldValue>,
}

impl InsertQuery {
    /// Create an insert into the given table with no field values yet.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            field_values: Vec::new(),
        }
    }

    /// Assign a value to a field; the parameter name defaults to the field name.
    pub fn set(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.field_value(FieldValue::new(field, value))
    }

    /// Append a pre-built field assignment.
    pub fn field_value(mut self, field_value: FieldValue) -> Self {
        self.field_values.push(field_value);
        self
    }

    /// Render `INSERT INTO {table} ({fields}) VALUES ({@names});`.
    ///
    /// An insert with no field values renders to an empty string: it is a
    /// no-op, not an error.
    pub fn sql_query(&self) -> SqlResult<String> {
        if self.field_values.is_empty() {
            return Ok(String::new());
        }

        let fields: Vec<&str> = self.field_values.iter().map(FieldValue::field).collect();
        let placeholders: Vec<String> = self
            .field_values
            .iter()
            .map(|fv| format!("@{}", fv.parameter_name()))
            .collect();

        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({});",
            self.table,
            fields.join(", "),
            placeholders.join(", ")
        ))
    }

    /// `(parameter_name, value)` pairs in declaration order.
    pub fn parameters(&self) -> Vec<Param> {
        self.field_values
            .iter()
            .map(|fv| Param::new(fv.parameter_name(), fv.value().clone()))
            .collect()
    }
}

/// A DELETE statement over one table.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQuery {
    table: String,
    filter: Option<Filter>,
}

impl DeleteQuery {
    /// Create a delete over the given table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: None,
        }
    }

    /// Set the WHERE filter.
    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Render `DELETE FROM {table}` with an optional WHERE suffix when the
    /// filter renders non-empty.
    pub fn sql_query(&self) -> SqlResult<String> {
        let mut sql = format!("DELETE FROM {}", self.table);

        if let Some(filter) = &self.filter {
            let fragment = filter.sql_query()?;
            if !fragment.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&fragment);
            }
        }
        Ok(sql)
    }

    /// The filter's parameters, or none.
    pub fn parameters(&self) -> Vec<Param> {
        self.filter.as_ref().map(Filter::parameters).unwrap_or_default()
    }
}

/// A conditional wrapper: run the inner statement when the condition holds.
#[derive(Debug, Clone, PartialEq)]
pub struct IfQuery {
    condition: Filter,
    then_query: Box<Query>,
}

impl IfQuery {
    /// Create a conditional statement.
    pub fn new(condition: impl Into<Filter>, then_query: impl Into<Query>) -> Self {
        Self {
            condition: condition.into(),
            then_query: Box::new(then_query.into()),
        }
    }

    /// Render `IF ({condition})` followed by a BEGIN/END block around the
    /// inner statement.
    pub fn sql_query(&self) -> SqlResult<String> {
        Ok(format!(
            "IF ({})\nBEGIN\n{}\nEND",
            self.condition.sql_query()?,
            self.then_query.sql_query()?
        ))
    }

    /// Condition parameters followed by then-branch parameters, reduced to
    /// one entry per name.
    pub fn parameters(&self) -> Vec<Param> {
        let mut params = self.condition.parameters();
        params.extend(self.then_query.parameters());
        dedupe_by_name(params)
    }
}

/// A sequential combination of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CombinedQuery {
    queries: Vec<Query>,
}

impl CombinedQuery {
    /// Combine child statements; an empty combination renders to empty text.
    pub fn new(queries: impl IntoIterator<Item = Query>) -> Self {
        Self {
            queries: queries.into_iter().collect(),
        }
    }

    /// The child statements, in declaration order.
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    /// Render each child whose text is non-empty, joined by a single newline
    /// with no trailing newline.
    pub fn sql_query(&self) -> SqlResult<String> {
        let mut parts = Vec::with_capacity(self.queries.len());
        for query in &self.queries {
            let text = query.sql_query()?;
            if !text.is_empty() {
                parts.push(text);
            }
        }
        Ok(parts.join("\n"))
    }

    /// All children's parameter sequences concatenated in order (children
    /// with empty text still contribute), then reduced to one entry per name.
    pub fn parameters(&self) -> Vec<Param> {
        dedupe_by_name(
            self.queries
                .iter()
                .flat_map(Query::parameters)
                .collect(),
        )
    }
}

/// A composable statement rendering to complete SQL text plus parameters.
///
/// Like [`Filter`], the variant set is closed and every dispatch is an
/// exhaustive match.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// SELECT statement.
    Select(SelectQuery),
    /// INSERT statement.
    Insert(InsertQuery),
    /// DELETE statement.
    Delete(DeleteQuery),
    /// Conditional IF wrapper.
    If(IfQuery),
    /// Sequential combination.
    Combined(CombinedQuery),
}

impl Query {
    /// Render the complete SQL text for this statement.
    pub fn sql_query(&self) -> SqlResult<String> {
        match self {
            Query::Select(query) => query.sql_query(),
            Query::Insert(query) => query.sql_query(),
            Query::Delete(query) => query.sql_query(),
            Query::If(query) => query.sql_query(),
            Query::Combined(query) => query.sql_query(),
        }
    }

    /// Collect this statement's bind parameters in declaration order.
    pub fn parameters(&self) -> Vec<Param> {
        match self {
            Query::Select(query) => query.parameters(),
            Query::Insert(query) => query.parameters(),
            Query::Delete(query) => query.parameters(),
            Query::If(query) => query.parameters(),
            Query::Combined(query) => query.parameters(),
        }
    }
}

impl From<SelectQuery> for Query {
    fn from(query: SelectQuery) -> Self {
        Query::Select(query)
    }
}

impl From<InsertQuery> for Query {
    fn from(query: InsertQuery) -> Self {
        Query::Insert(query)
    }
}

impl From<DeleteQuery> for Query {
    fn from(query: DeleteQuery) -> Self {
        Query::Delete(query)
    }
}

impl From<IfQuery> for Query {
    fn from(query: IfQuery) -> Self {
        Query::If(query)
    }
}

impl From<CombinedQuery> for Query {
    fn from(query: CombinedQuery) -> Self {
        Query::Combined(query)
    }
}

/// Create a SELECT query over the given table.
///
/// # Example
/// ```ignore
/// let q = sqlreq::select("Country").field("Id").filter(Filter::eq("Name", "x"));
/// ```
pub fn select(table: impl Into<String>) -> SelectQuery {
    SelectQuery::new(table)
}

/// Create an INSERT query into the given table.
pub fn insert(table: impl Into<String>) -> InsertQuery {
    InsertQuery::new(table)
}

/// Create a DELETE query over the given table.
pub fn delete(table: impl Into<String>) -> DeleteQuery {
    DeleteQuery::new(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SqlError;
    use crate::filter::{CompareFilter, Filter};

    #[test]
    fn select_without_fields_renders_star() {
        let query = select("Country");
        assert_eq!(query.sql_query().unwrap(), "SELECT * FROM Country");
        assert!(query.parameters().is_empty());
    }

    #[test]
    fn select_joins_fields_in_order() {
        let query = select("Country").fields(["Id", "Name"]);
        assert_eq!(query.sql_query().unwrap(), "SELECT Id, Name FROM Country");
    }

    #[test]
    fn select_with_filter_appends_where() {
        let query = select("Product").field("Id").filter(Filter::eq("CountryId", 42));
        assert_eq!(
            query.sql_query().unwrap(),
            "SELECT Id FROM Product WHERE CountryId = @CountryId"
        );
        assert_eq!(query.parameters(), vec![Param::new("CountryId", 42)]);
    }

    #[test]
    fn select_with_empty_filter_omits_where() {
        let query = select("Product").filter(Filter::and([]));
        assert_eq!(query.sql_query().unwrap(), "SELECT * FROM Product");
    }

    #[test]
    fn insert_with_no_fields_is_a_noop() {
        let query = insert("Country");
        assert_eq!(query.sql_query().unwrap(), "");
        assert!(query.parameters().is_empty());
    }

    #[test]
    fn insert_single_field() {
        let query = insert("SomeTable").set("Id", 15);
        assert_eq!(
            query.sql_query().unwrap(),
            "INSERT INTO SomeTable (Id) VALUES (@Id);"
        );
        assert_eq!(query.parameters(), vec![Param::new("Id", 15)]);
    }

    #[test]
    fn insert_uses_explicit_parameter_names() {
        let query = insert("Country")
            .set("Name", "Some value")
            .field_value(FieldValue::new("Id", Value::Null).with_parameter_name("Id1"));

        assert_eq!(
            query.sql_query().unwrap(),
            "INSERT INTO Country (Name, Id) VALUES (@Name, @Id1);"
        );
        assert_eq!(
            query.parameters(),
            vec![
                Param::new("Name", "Some value"),
                Param::new("Id1", Value::Null)
            ]
        );
    }

    #[test]
    fn delete_renders_with_optional_where() {
        let bare = delete("Country");
        assert_eq!(bare.sql_query().unwrap(), "DELETE FROM Country");
        assert!(bare.parameters().is_empty());

        let filtered = delete("Country").filter(Filter::eq("Id", 7));
        assert_eq!(
            filtered.sql_query().unwrap(),
            "DELETE FROM Country WHERE Id = @Id"
        );
        assert_eq!(filtered.parameters(), vec![Param::new("Id", 7)]);
    }

    #[test]
    fn if_query_wraps_then_branch() {
        let query = IfQuery::new(
            Filter::not_exists(select("Country").field("Id").filter(Filter::eq("Id", 1))),
            insert("Country").set("Id", 1).set("Name", "Austria"),
        );

        assert_eq!(
            query.sql_query().unwrap(),
            "IF (NOT EXISTS (SELECT Id FROM Country WHERE Id = @Id))\n\
             BEGIN\n\
             INSERT INTO Country (Id, Name) VALUES (@Id, @Name);\n\
             END"
        );
    }

    #[test]
    fn if_query_dedupes_condition_and_branch_parameters() {
        let query = IfQuery::new(
            Filter::eq("Id", 1),
            insert("Country").set("Id", 2).set("Name", "Austria"),
        );

        // Last value wins, first position kept.
        assert_eq!(
            query.parameters(),
            vec![Param::new("Id", 2), Param::new("Name", "Austria")]
        );
    }

    #[test]
    fn combined_empty_renders_empty() {
        let query = CombinedQuery::default();
        assert_eq!(query.sql_query().unwrap(), "");
        assert!(query.parameters().is_empty());
    }

    #[test]
    fn combined_joins_non_empty_children_with_newline() {
        let query = CombinedQuery::new([
            Query::from(select("Country").fields(["Id", "Name"])),
            Query::from(insert("Country")), // empty child, skipped
            Query::from(insert("SomeTable").set("Id", 1)),
        ]);

        assert_eq!(
            query.sql_query().unwrap(),
            "SELECT Id, Name FROM Country\nINSERT INTO SomeTable (Id) VALUES (@Id);"
        );
    }

    #[test]
    fn combined_collects_parameters_of_empty_text_children() {
        // A child whose text renders empty still contributes parameters.
        let empty_text = select("Country").filter(Filter::and([]));
        assert!(empty_text.parameters().is_empty());

        let query = CombinedQuery::new([
            Query::from(delete("Order").filter(Filter::eq("SomeName", "SomeValue"))),
            Query::from(select("Country").fields(["Id", "Name"])),
            Query::from(insert("SomeTable").set("Id", 1).set("Price", Value::Null)),
        ]);

        assert_eq!(
            query.parameters(),
            vec![
                Param::new("SomeName", "SomeValue"),
                Param::new("Id", 1),
                Param::new("Price", Value::Null),
            ]
        );
    }

    #[test]
    fn combined_dedupes_across_children() {
        let query = CombinedQuery::new([
            Query::from(insert("A").set("Id", 1)),
            Query::from(insert("B").set("Id", 2)),
        ]);

        assert_eq!(query.parameters(), vec![Param::new("Id", 2)]);
    }

    #[test]
    fn render_error_surfaces_through_statement_tree() {
        let query = select("Product")
            .filter(Filter::Compare(CompareFilter::with_raw_operator("Id", 42, 1)));
        assert!(matches!(
            query.sql_query(),
            Err(SqlError::OperatorOutOfRange(42))
        ));
    }

    #[test]
    fn rendering_is_deterministic() {
        let query = Query::from(CombinedQuery::new([
            Query::from(select("Country").field("Id").filter(Filter::and([
                Filter::eq("Name", "x"),
                Filter::like("LOWER(Name)", "y", "Search"),
            ]))),
            Query::from(insert("Country").set("Id", 1)),
        ]));

        assert_eq!(query.sql_query().unwrap(), query.sql_query().unwrap());
        assert_eq!(query.parameters(), query.parameters());
    }
}
