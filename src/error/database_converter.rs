use crate::error::{AppError, ConstraintParser, ConstraintViolation};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Converts Diesel errors into structured `AppError` variants.
///
/// Constraint violations become client errors (`Duplicate`, `Validation`);
/// everything else is a `Database` failure whose details stay server side.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let parsed = ConstraintParser::parse(
            &Self::full_message(info),
            info.constraint_name(),
            info.table_name(),
        );

        match (kind, parsed) {
            (DatabaseErrorKind::UniqueViolation, Some(v)) => AppError::Duplicate {
                entity: Self::entity_name(&v),
                field: v.column,
                value: v.value.unwrap_or_default(),
            },
            (DatabaseErrorKind::NotNullViolation, Some(v)) => AppError::Validation {
                reason: format!("Field is required for {}", Self::entity_name(&v)),
                field: v.column,
            },
            (DatabaseErrorKind::ForeignKeyViolation, Some(v)) => AppError::Validation {
                reason: format!(
                    "Invalid reference with value '{}'",
                    v.value.clone().unwrap_or_default()
                ),
                field: v.column,
            },
            (DatabaseErrorKind::CheckViolation, Some(v)) => AppError::Validation {
                reason: format!("Check constraint failed for {}", Self::entity_name(&v)),
                field: v.column,
            },
            (kind, _) => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("{:?}: {}", kind, message)),
            },
        }
    }

    /// PostgreSQL reports the `Key (..)=(..)` line as detail, not message.
    fn full_message(info: &(dyn DatabaseErrorInformation + Send + Sync)) -> String {
        match info.details() {
            Some(details) => format!("{}\nDETAIL: {}", info.message(), details),
            None => info.message().to_string(),
        }
    }

    /// `products` -> `product`
    fn entity_name(violation: &ConstraintViolation) -> String {
        violation
            .table
            .strip_suffix('s')
            .unwrap_or(&violation.table)
            .to_string()
    }
}
