//! Relational draw store adapter.
//!
//! ## Table
//!
//! ```text
//! draw(draw_date DATE, lottery_id TEXT, numbers <array or text>)
//! ```
//!
//! Dual kinds keep sub-draw A and B as separate rows (`hu7a`, `hu7b`) sharing
//! a `draw_date`.
//!
//! ## Dialects
//!
//! - [`SqlDialect::Postgres`]: `numbers` is a native integer array. The
//!   intersection, filter, cap and qualifying count (`COUNT(*) OVER ()`) are
//!   all computed by the database.
//! - [`SqlDialect::Delimited`]: `numbers` is comma-joined text. The adapter
//!   fetches the kind's draws newest first and scores them client-side.
//!
//! The adapter only builds query text and decodes rows; executing the query is
//! the job of a [`SqlExecutor`] supplied by the deployment.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::store::{DrawStore, MatchQuery, StoreMatches, StoreRow};
use crate::types::{LotteryKind, MatchFilter, NumberSet};

// ============================================================================
// Dialect
// ============================================================================

/// Query dialect of the backing database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlDialect {
    /// Native integer arrays, server-side intersection
    #[default]
    Postgres,
    /// Comma-joined text arrays, client-side intersection
    Delimited,
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "postgres" => Ok(SqlDialect::Postgres),
            "delimited" => Ok(SqlDialect::Delimited),
            other => Err(format!("expected `postgres` or `delimited`, got `{other}`")),
        }
    }
}

// ============================================================================
// Query / row values
// ============================================================================

/// A bound parameter or result column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
    Date(NaiveDate),
    IntArray(Vec<i64>),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Text(s) => write!(f, "{s:?}"),
            SqlValue::Date(d) => write!(f, "{d}"),
            SqlValue::IntArray(values) => write!(f, "{values:?}"),
        }
    }
}

/// One result row, columns in select order
pub type SqlRow = Vec<SqlValue>;

/// Query text with named parameters (`:name`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery {
    pub text: String,
    pub params: Vec<(&'static str, SqlValue)>,
}

impl SqlQuery {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), params: Vec::new() }
    }

    fn bind(mut self, name: &'static str, value: SqlValue) -> Self {
        self.params.push((name, value));
        self
    }

    /// Look up a bound parameter by name
    pub fn param(&self, name: &str) -> Option<&SqlValue> {
        self.params.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

/// Runs queries against the actual database.
///
/// Implementations map their driver errors to [`StoreError::Unavailable`].
pub trait SqlExecutor {
    fn query(&self, query: &SqlQuery) -> Result<Vec<SqlRow>, StoreError>;
}

impl<X: SqlExecutor + ?Sized> SqlExecutor for &X {
    fn query(&self, query: &SqlQuery) -> Result<Vec<SqlRow>, StoreError> {
        (**self).query(query)
    }
}

// ============================================================================
// SqlDrawStore
// ============================================================================

/// Draw store backed by a relational database
#[derive(Debug)]
pub struct SqlDrawStore<X> {
    executor: X,
    dialect: SqlDialect,
}

impl<X: SqlExecutor> SqlDrawStore<X> {
    pub fn new(executor: X, dialect: SqlDialect) -> Self {
        Self { executor, dialect }
    }

    /// Select the dialect from deployment configuration
    pub fn from_config(executor: X, config: &StoreConfig) -> Self {
        Self::new(executor, config.dialect)
    }

    #[inline]
    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    #[inline]
    pub fn executor(&self) -> &X {
        &self.executor
    }

    /// Build the match query for the configured dialect
    pub fn match_query(&self, query: &MatchQuery<'_>) -> SqlQuery {
        match self.dialect {
            SqlDialect::Postgres => postgres_match_query(query),
            SqlDialect::Delimited => delimited_match_query(query.kind()),
        }
    }

    /// Build the total-count query.
    ///
    /// Dual kinds count sub-draw A rows: one per date.
    pub fn total_query(&self, kind: LotteryKind) -> SqlQuery {
        let (selector, _) = kind.store_selectors();
        SqlQuery::new("SELECT COUNT(*) FROM draw WHERE lottery_id = :id;")
            .bind("id", SqlValue::Text(selector.to_string()))
    }
}

impl<X: SqlExecutor> DrawStore for SqlDrawStore<X> {
    fn count_matches(&self, query: &MatchQuery<'_>) -> Result<StoreMatches, StoreError> {
        let sql = self.match_query(query);
        let rows = self.executor.query(&sql)?;
        debug!(dialect = ?self.dialect, kind = %query.kind(), rows = rows.len(), "match query executed");

        match self.dialect {
            SqlDialect::Postgres => decode_postgres_matches(query.kind(), rows, query.limit),
            SqlDialect::Delimited => {
                let scored = rows
                    .into_iter()
                    .map(|row| decode_delimited_row(query.kind(), row, query.numbers))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(StoreMatches::collect(scored, query.filter, query.limit))
            }
        }
    }

    fn count_total(&self, kind: LotteryKind) -> Result<u64, StoreError> {
        let rows = self.executor.query(&self.total_query(kind))?;
        let value = rows
            .first()
            .and_then(|row| row.first())
            .ok_or_else(|| StoreError::MalformedRow("total query returned no rows".to_string()))?;
        match value {
            SqlValue::Int(n) => u64::try_from(*n)
                .map_err(|_| StoreError::MalformedRow(format!("negative draw count {n}"))),
            other => Err(StoreError::MalformedRow(format!("expected a count, got {other}"))),
        }
    }
}

// ============================================================================
// Postgres dialect
// ============================================================================

const PG_SINGLE_MATCH: &str = "\
SELECT *, COUNT(*) OVER () AS total_count
FROM (
    SELECT draw_date, numbers,
           CARDINALITY(ARRAY(
               SELECT UNNEST(numbers)
               INTERSECT
               SELECT UNNEST(:numbers)
           )) AS match_count
    FROM draw
    WHERE lottery_id = :id
) AS sub
WHERE {filter}
ORDER BY draw_date DESC
LIMIT :limit;";

const PG_DUAL_MATCH: &str = "\
SELECT
    sub_a.draw_date,
    sub_a.numbers,
    sub_a.match_count AS match_count_a,
    sub_b.numbers,
    sub_b.match_count AS match_count_b,
    COUNT(*) OVER () AS total_count
FROM (
    SELECT draw_date, numbers,
           CARDINALITY(ARRAY(
               SELECT UNNEST(numbers)
               INTERSECT
               SELECT UNNEST(:numbers)
           )) AS match_count
    FROM draw
    WHERE lottery_id = :id_a
) AS sub_a
INNER JOIN (
    SELECT draw_date, numbers,
           CARDINALITY(ARRAY(
               SELECT UNNEST(numbers)
               INTERSECT
               SELECT UNNEST(:numbers)
           )) AS match_count
    FROM draw
    WHERE lottery_id = :id_b
) AS sub_b
ON sub_a.draw_date = sub_b.draw_date
WHERE {filter}
ORDER BY sub_a.draw_date DESC
LIMIT :limit;";

fn filter_clause(filter: MatchFilter, columns: &[&str]) -> String {
    let op = match filter {
        MatchFilter::AnyMatch => "> 0",
        MatchFilter::Exactly(_) => "= :match_count",
    };
    columns
        .iter()
        .map(|column| format!("{column} {op}"))
        .collect::<Vec<_>>()
        .join(" OR ")
}

fn postgres_match_query(query: &MatchQuery<'_>) -> SqlQuery {
    let kind = query.kind();
    let numbers = SqlValue::IntArray(query.numbers.values().iter().map(|&n| i64::from(n)).collect());

    let mut sql = match kind.store_selectors() {
        (id, None) => SqlQuery::new(PG_SINGLE_MATCH.replace("{filter}", &filter_clause(query.filter, &["match_count"])))
            .bind("numbers", numbers)
            .bind("id", SqlValue::Text(id.to_string())),
        (id_a, Some(id_b)) => SqlQuery::new(PG_DUAL_MATCH.replace(
            "{filter}",
            &filter_clause(query.filter, &["sub_a.match_count", "sub_b.match_count"]),
        ))
        .bind("numbers", numbers)
        .bind("id_a", SqlValue::Text(id_a.to_string()))
        .bind("id_b", SqlValue::Text(id_b.to_string())),
    };

    if let MatchFilter::Exactly(threshold) = query.filter {
        sql = sql.bind("match_count", SqlValue::Int(i64::from(threshold.get())));
    }
    sql.bind("limit", SqlValue::Int(query.limit as i64))
}

/// Decode window-count rows.
///
/// Single: `(date, numbers, match_count, total_count)`.
/// Dual: `(date, numbers_a, match_count_a, numbers_b, match_count_b, total_count)`.
fn decode_postgres_matches(kind: LotteryKind, rows: Vec<SqlRow>, limit: usize) -> Result<StoreMatches, StoreError> {
    let expected_columns = if kind.is_dual() { 6 } else { 4 };

    let qualifying_count = match rows.first() {
        Some(row) => match row.last() {
            Some(SqlValue::Int(n)) if *n >= 0 => *n as u64,
            other => {
                return Err(StoreError::MalformedRow(format!(
                    "expected a window count in the last column, got {other:?}"
                )))
            }
        },
        None => 0,
    };

    let mut decoded = Vec::with_capacity(rows.len().min(limit));
    for row in rows.into_iter().take(limit) {
        if row.len() != expected_columns {
            return Err(StoreError::MalformedRow(format!(
                "expected {expected_columns} columns for {kind}, got {}",
                row.len()
            )));
        }
        let mut cols = row.into_iter();
        let date = decode_date(cols.next())?;
        let numbers = decode_int_array(cols.next())?;
        let match_count = decode_count(cols.next())?;
        let (numbers_b, match_count_b) = if kind.is_dual() {
            (Some(decode_int_array(cols.next())?), Some(decode_count(cols.next())?))
        } else {
            (None, None)
        };
        decoded.push(StoreRow { date, numbers, match_count, numbers_b, match_count_b });
    }

    Ok(StoreMatches { rows: decoded, qualifying_count })
}

// ============================================================================
// Delimited dialect
// ============================================================================

fn delimited_match_query(kind: LotteryKind) -> SqlQuery {
    match kind.store_selectors() {
        (id, None) => SqlQuery::new(
            "SELECT draw_date, numbers FROM draw WHERE lottery_id = :id ORDER BY draw_date DESC;",
        )
        .bind("id", SqlValue::Text(id.to_string())),
        (id_a, Some(id_b)) => SqlQuery::new(
            "SELECT a.draw_date, a.numbers, b.numbers \
             FROM draw AS a INNER JOIN draw AS b ON a.draw_date = b.draw_date \
             WHERE a.lottery_id = :id_a AND b.lottery_id = :id_b \
             ORDER BY a.draw_date DESC;",
        )
        .bind("id_a", SqlValue::Text(id_a.to_string()))
        .bind("id_b", SqlValue::Text(id_b.to_string())),
    }
}

/// Decode `(date, "n1,n2,...")` or `(date, a, b)` and score it
fn decode_delimited_row(kind: LotteryKind, row: SqlRow, ticket: &NumberSet) -> Result<StoreRow, StoreError> {
    let expected_columns = if kind.is_dual() { 3 } else { 2 };
    if row.len() != expected_columns {
        return Err(StoreError::MalformedRow(format!(
            "expected {expected_columns} columns for {kind}, got {}",
            row.len()
        )));
    }

    let mut cols = row.into_iter();
    let date = decode_date(cols.next())?;
    let numbers = decode_int_array(cols.next())?;
    let numbers_b = if kind.is_dual() { Some(decode_int_array(cols.next())?) } else { None };
    Ok(StoreRow::score(date, numbers, numbers_b, ticket))
}

/// Parse comma-joined numbers, tolerating whitespace and array braces
pub fn parse_delimited(text: &str) -> Result<Vec<u8>, StoreError> {
    text.trim()
        .trim_start_matches(['{', '['])
        .trim_end_matches(['}', ']'])
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .map_err(|_| StoreError::MalformedRow(format!("`{s}` is not a drawable number")))
        })
        .collect()
}

// ============================================================================
// Column decoding
// ============================================================================

fn decode_date(value: Option<SqlValue>) -> Result<NaiveDate, StoreError> {
    match value {
        Some(SqlValue::Date(date)) => Ok(date),
        Some(SqlValue::Text(text)) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map_err(|e| StoreError::MalformedRow(format!("bad date `{text}`: {e}"))),
        other => Err(StoreError::MalformedRow(format!("expected a date, got {other:?}"))),
    }
}

fn decode_int_array(value: Option<SqlValue>) -> Result<Vec<u8>, StoreError> {
    match value {
        Some(SqlValue::IntArray(values)) => values
            .into_iter()
            .map(|n| u8::try_from(n).map_err(|_| StoreError::MalformedRow(format!("number {n} out of range"))))
            .collect(),
        Some(SqlValue::Text(text)) => parse_delimited(&text),
        other => Err(StoreError::MalformedRow(format!("expected a number array, got {other:?}"))),
    }
}

fn decode_count(value: Option<SqlValue>) -> Result<u8, StoreError> {
    match value {
        Some(SqlValue::Int(n)) => {
            u8::try_from(n).map_err(|_| StoreError::MalformedRow(format!("match count {n} out of range")))
        }
        other => Err(StoreError::MalformedRow(format!("expected a match count, got {other:?}"))),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
