use regex::Regex;
use std::sync::LazyLock;

/// Matches the `Key (field)=(value)` detail line PostgreSQL attaches to
/// unique and foreign key violations.
static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("static pattern"));

/// Matches `column "name"` in not-null violation messages.
static COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"column "([^"]+)""#).expect("static pattern"));

/// Matches `relation "name"` / `table "name"` in violation messages.
static TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:relation|table) "([^"]+)""#).expect("static pattern"));

const CONSTRAINT_SUFFIXES: [&str; 5] = ["_key", "_fkey", "_check", "_idx", "_unique"];

/// Structured view of a constraint violation reported by PostgreSQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub table: String,
    pub column: String,
    pub value: Option<String>,
}

/// Extracts table, column and offending value from PostgreSQL error text.
///
/// Constraint names are expected to follow the PostgreSQL defaults
/// (`{table}_{column}_key`, `{table}_{column}_fkey`, `{table}_{column}_check`).
pub struct ConstraintParser;

impl ConstraintParser {
    /// Parses a violation from the message, the constraint name and the table
    /// name reported by the driver. Returns `None` when no column can be found.
    pub fn parse(
        message: &str,
        constraint_name: Option<&str>,
        table_name: Option<&str>,
    ) -> Option<ConstraintViolation> {
        let table = table_name
            .map(str::to_string)
            .or_else(|| Self::table_from_message(message));
        let detail = Self::key_value_from_message(message);

        let column = detail
            .as_ref()
            .map(|(field, _)| field.clone())
            .or_else(|| {
                constraint_name.and_then(|c| Self::column_from_constraint(c, table.as_deref()))
            })
            .or_else(|| Self::column_from_message(message))?;

        let table = table
            .or_else(|| constraint_name.and_then(|c| c.split('_').next().map(str::to_string)))
            .unwrap_or_else(|| "resource".to_string());

        Some(ConstraintViolation {
            table,
            column,
            value: detail.map(|(_, value)| value),
        })
    }

    /// `products_user_id_fkey` with table `products` yields `user_id`.
    pub fn column_from_constraint(constraint_name: &str, table: Option<&str>) -> Option<String> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;

        let column = match table.and_then(|t| stem.strip_prefix(t)) {
            Some(rest) => rest.strip_prefix('_')?,
            None => stem.split_once('_').map(|(_, rest)| rest)?,
        };

        (!column.is_empty()).then(|| column.to_string())
    }

    pub fn key_value_from_message(message: &str) -> Option<(String, String)> {
        KEY_VALUE.captures(message).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }

    pub fn column_from_message(message: &str) -> Option<String> {
        COLUMN
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn table_from_message(message: &str) -> Option<String> {
        TABLE
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}
