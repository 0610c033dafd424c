//! Composable filter expressions for WHERE clauses.
//!
//! A [`Filter`] is a tree of predicate fragments. Each node renders to a SQL
//! boolean expression with `@name` placeholders and collects its bind
//! parameters in declaration order. Filters are plain immutable values: they
//! are assembled once, rendered any number of times, and never own a
//! connection or any other live resource.

use crate::error::{SqlError, SqlResult};
use crate::param::{Param, dedupe_by_name};
use crate::query::SelectQuery;
use crate::value::Value;

/// Comparison operator for [`CompareFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOperator {
    /// field = value
    Equal,
    /// field <> value
    NotEqual,
    /// field > value
    Greater,
    /// field >= value
    GreaterOrEqual,
    /// field < value
    Less,
    /// field <= value
    LessOrEqual,
}

impl CompareOperator {
    /// The numeric wire value of this operator.
    pub const fn raw(self) -> i32 {
        match self {
            CompareOperator::Equal => 0,
            CompareOperator::NotEqual => 1,
            CompareOperator::Greater => 2,
            CompareOperator::GreaterOrEqual => 3,
            CompareOperator::Less => 4,
            CompareOperator::LessOrEqual => 5,
        }
    }

    /// Resolve a numeric wire value back to an operator.
    pub const fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(CompareOperator::Equal),
            1 => Some(CompareOperator::NotEqual),
            2 => Some(CompareOperator::Greater),
            3 => Some(CompareOperator::GreaterOrEqual),
            4 => Some(CompareOperator::Less),
            5 => Some(CompareOperator::LessOrEqual),
            _ => None,
        }
    }

    const fn sql_token(self) -> &'static str {
        match self {
            CompareOperator::Equal => "=",
            CompareOperator::NotEqual => "<>",
            CompareOperator::Greater => ">",
            CompareOperator::GreaterOrEqual => ">=",
            CompareOperator::Less => "<",
            CompareOperator::LessOrEqual => "<=",
        }
    }
}

/// A raw SQL fragment used verbatim.
///
/// # Safety
/// Be careful with SQL injection when using raw filters.
///
/// A raw filter may carry attached parameters for manual binding elsewhere,
/// but [`RawFilter::parameters`] never collects them: the fragment is
/// pass-through text only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawFilter {
    sql: String,
    attached: Vec<Param>,
}

impl RawFilter {
    /// Create a raw filter from a SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            attached: Vec::new(),
        }
    }

    /// Attach parameters to this filter without collecting them.
    ///
    /// The attached list is available through
    /// [`RawFilter::attached_parameters`] for callers that bind manually; it
    /// does not flow into the rendered command.
    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = Param>) -> Self {
        self.attached = parameters.into_iter().collect();
        self
    }

    /// The parameters attached at construction, if any.
    pub fn attached_parameters(&self) -> &[Param] {
        &self.attached
    }

    /// The fragment text, verbatim.
    pub fn sql_query(&self) -> &str {
        &self.sql
    }

    /// Always empty: raw fragments contribute no parameters.
    pub fn parameters(&self) -> Vec<Param> {
        Vec::new()
    }
}

/// A `field <op> @name` comparison.
///
/// The operator is stored as its numeric wire value, so construction is pure
/// data-capture; the range check happens when the filter is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareFilter {
    field: String,
    operator: i32,
    value: Value,
    parameter_name: String,
}

impl CompareFilter {
    /// Create a comparison filter. The parameter name defaults to the field
    /// expression; override it with [`CompareFilter::with_parameter_name`].
    pub fn new(
        field: impl Into<String>,
        operator: CompareOperator,
        value: impl Into<Value>,
    ) -> Self {
        let field = field.into();
        Self {
            parameter_name: field.clone(),
            field,
            operator: operator.raw(),
            value: value.into(),
        }
    }

    /// Create a comparison filter from a numeric operator value.
    ///
    /// The value is captured as-is; an out-of-range value surfaces as an
    /// error only when the filter is rendered.
    pub fn with_raw_operator(
        field: impl Into<String>,
        operator: i32,
        value: impl Into<Value>,
    ) -> Self {
        let field = field.into();
        Self {
            parameter_name: field.clone(),
            field,
            operator,
            value: value.into(),
        }
    }

    /// Use a parameter name different from the field expression.
    pub fn with_parameter_name(mut self, name: impl Into<String>) -> Self {
        self.parameter_name = name.into();
        self
    }

    /// Render `{field} {op} @{parameter_name}`.
    pub fn sql_query(&self) -> SqlResult<String> {
        let operator = CompareOperator::from_raw(self.operator)
            .ok_or(SqlError::OperatorOutOfRange(self.operator))?;
        Ok(format!(
            "{} {} @{}",
            self.field,
            operator.sql_token(),
            self.parameter_name
        ))
    }

    /// Exactly one parameter: `(parameter_name, value)`.
    pub fn parameters(&self) -> Vec<Param> {
        vec![Param::new(&self.parameter_name, self.value.clone())]
    }
}

/// A substring pattern match: `field LIKE '%' + @name + '%'`.
///
/// The search value is carried unchanged: no trimming, no case folding, and a
/// null or whitespace value still binds exactly one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct LikeFilter {
    field: String,
    value: Value,
    parameter_name: String,
}

impl LikeFilter {
    /// Create a pattern-match filter. The parameter name defaults to the
    /// field expression.
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        Self {
            parameter_name: field.clone(),
            field,
            value: value.into(),
        }
    }

    /// Use a parameter name different from the field expression.
    pub fn with_parameter_name(mut self, name: impl Into<String>) -> Self {
        self.parameter_name = name.into();
        self
    }

    /// Render `{field} LIKE '%' + @{parameter_name} + '%'`.
    pub fn sql_query(&self) -> String {
        format!(
            "{} LIKE '%' + @{} + '%'",
            self.field, self.parameter_name
        )
    }

    /// Exactly one parameter: `(parameter_name, value)`.
    pub fn parameters(&self) -> Vec<Param> {
        vec![Param::new(&self.parameter_name, self.value.clone())]
    }
}

/// An `EXISTS (SELECT ...)` subquery check.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistsFilter {
    query: Box<SelectQuery>,
}

impl ExistsFilter {
    /// Wrap a select query in an existence check.
    pub fn new(query: SelectQuery) -> Self {
        Self {
            query: Box::new(query),
        }
    }

    /// Render `EXISTS ({inner select})`.
    pub fn sql_query(&self) -> SqlResult<String> {
        Ok(format!("EXISTS ({})", self.query.sql_query()?))
    }

    /// The inner select's parameters, pass-through with no renaming.
    pub fn parameters(&self) -> Vec<Param> {
        self.query.parameters()
    }
}

/// A `NOT EXISTS (SELECT ...)` subquery check.
#[derive(Debug, Clone, PartialEq)]
pub struct NotExistsFilter {
    query: Box<SelectQuery>,
}

impl NotExistsFilter {
    /// Wrap a select query in a non-existence check.
    pub fn new(query: SelectQuery) -> Self {
        Self {
            query: Box::new(query),
        }
    }

    /// Render `NOT EXISTS ({inner select})`.
    pub fn sql_query(&self) -> SqlResult<String> {
        Ok(format!("NOT EXISTS ({})", self.query.sql_query()?))
    }

    /// The inner select's parameters, pass-through with no renaming.
    pub fn parameters(&self) -> Vec<Param> {
        self.query.parameters()
    }
}

/// An AND-combination of child filters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CombinedFilter {
    filters: Vec<Filter>,
}

impl CombinedFilter {
    /// Combine child filters; an empty combination renders to empty text.
    pub fn new(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self {
            filters: filters.into_iter().collect(),
        }
    }

    /// The child filters, in declaration order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Render child fragments joined by `" AND "`.
    pub fn sql_query(&self) -> SqlResult<String> {
        let fragments: Vec<String> = self
            .filters
            .iter()
            .map(Filter::sql_query)
            .collect::<SqlResult<_>>()?;
        Ok(fragments.join(" AND "))
    }

    /// Child parameter sequences concatenated in child order, then reduced to
    /// one entry per name (last value wins, first position kept).
    pub fn parameters(&self) -> Vec<Param> {
        dedupe_by_name(
            self.filters
                .iter()
                .flat_map(Filter::parameters)
                .collect(),
        )
    }
}

/// A composable predicate fragment.
///
/// The variant set is closed: rendering and parameter collection are
/// exhaustive matches, so adding a filter kind is a deliberate,
/// compiler-checked change.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Literal SQL text, no collected parameters.
    Raw(RawFilter),
    /// `field <op> @name` comparison.
    Compare(CompareFilter),
    /// `field LIKE '%' + @name + '%'` pattern match.
    Like(LikeFilter),
    /// `EXISTS (SELECT ...)` subquery check.
    Exists(ExistsFilter),
    /// `NOT EXISTS (SELECT ...)` subquery check.
    NotExists(NotExistsFilter),
    /// AND-combination of child filters.
    Combined(CombinedFilter),
}

impl Filter {
    /// Create a raw SQL filter.
    ///
    /// # Safety
    /// Be careful with SQL injection when using raw filters.
    pub fn raw(sql: impl Into<String>) -> Self {
        Filter::Raw(RawFilter::new(sql))
    }

    /// Create a comparison filter: `field <op> @field`.
    pub fn compare(
        field: impl Into<String>,
        operator: CompareOperator,
        value: impl Into<Value>,
    ) -> Self {
        Filter::Compare(CompareFilter::new(field, operator, value))
    }

    /// Create an equality filter: `field = @field`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOperator::Equal, value)
    }

    /// Create an inequality filter: `field <> @field`.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOperator::NotEqual, value)
    }

    /// Create a greater-than filter: `field > @field`.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOperator::Greater, value)
    }

    /// Create a greater-than-or-equal filter: `field >= @field`.
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOperator::GreaterOrEqual, value)
    }

    /// Create a less-than filter: `field < @field`.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOperator::Less, value)
    }

    /// Create a less-than-or-equal filter: `field <= @field`.
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOperator::LessOrEqual, value)
    }

    /// Create a pattern-match filter with an explicit parameter name.
    pub fn like(
        field: impl Into<String>,
        value: impl Into<Value>,
        parameter_name: impl Into<String>,
    ) -> Self {
        Filter::Like(LikeFilter::new(field, value).with_parameter_name(parameter_name))
    }

    /// Create an existence check over a select query.
    pub fn exists(query: SelectQuery) -> Self {
        Filter::Exists(ExistsFilter::new(query))
    }

    /// Create a non-existence check over a select query.
    pub fn not_exists(query: SelectQuery) -> Self {
        Filter::NotExists(NotExistsFilter::new(query))
    }

    /// Create an AND-combination from a list of filters.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Combined(CombinedFilter::new(filters))
    }

    /// Render the SQL boolean fragment for this filter.
    pub fn sql_query(&self) -> SqlResult<String> {
        match self {
            Filter::Raw(filter) => Ok(filter.sql_query().to_string()),
            Filter::Compare(filter) => filter.sql_query(),
            Filter::Like(filter) => Ok(filter.sql_query()),
            Filter::Exists(filter) => filter.sql_query(),
            Filter::NotExists(filter) => filter.sql_query(),
            Filter::Combined(filter) => filter.sql_query(),
        }
    }

    /// Collect this filter's bind parameters in declaration order.
    pub fn parameters(&self) -> Vec<Param> {
        match self {
            Filter::Raw(filter) => filter.parameters(),
            Filter::Compare(filter) => filter.parameters(),
            Filter::Like(filter) => filter.parameters(),
            Filter::Exists(filter) => filter.parameters(),
            Filter::NotExists(filter) => filter.parameters(),
            Filter::Combined(filter) => filter.parameters(),
        }
    }
}

impl From<RawFilter> for Filter {
    fn from(filter: RawFilter) -> Self {
        Filter::Raw(filter)
    }
}

impl From<CompareFilter> for Filter {
    fn from(filter: CompareFilter) -> Self {
        Filter::Compare(filter)
    }
}

impl From<LikeFilter> for Filter {
    fn from(filter: LikeFilter) -> Self {
        Filter::Like(filter)
    }
}

impl From<ExistsFilter> for Filter {
    fn from(filter: ExistsFilter) -> Self {
        Filter::Exists(filter)
    }
}

impl From<NotExistsFilter> for Filter {
    fn from(filter: NotExistsFilter) -> Self {
        Filter::NotExists(filter)
    }
}

impl From<CombinedFilter> for Filter {
    fn from(filter: CombinedFilter) -> Self {
        Filter::Combined(filter)
    }
}
