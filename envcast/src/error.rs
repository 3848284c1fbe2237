use std::fmt;

use thiserror::Error;

use crate::value::format_number;

/// Failure produced by a single decoder.
///
/// The `Display` output of each variant is the exact message reported for the
/// variable in an [`EnvironmentError::DecodeErrors`] report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("environment variable not set")]
    MissingValue,
    #[error("value {} cannot be cast to number", json(.value))]
    NotANumber { value: Option<String> },
    #[error("value {} cannot be cast to boolean", json(.value))]
    NotABoolean { value: Option<String> },
    #[error(transparent)]
    NotAllowed(#[from] NotAllowed),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    MissingValue,
    NotANumber,
    NotABoolean,
    NotAllowed,
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::MissingValue => DecodeErrorKind::MissingValue,
            Self::NotANumber { .. } => DecodeErrorKind::NotANumber,
            Self::NotABoolean { .. } => DecodeErrorKind::NotABoolean,
            Self::NotAllowed(_) => DecodeErrorKind::NotAllowed,
        }
    }
}

/// A union decoder received a well-formed value outside of its allow-list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotAllowed {
    #[error("allowed strings are {}, got {actual}", .allowed.join(", "))]
    Strings { allowed: Vec<String>, actual: String },
    #[error("allowed numbers are {}, got {}", join_numbers(.allowed), number(.actual))]
    Numbers { allowed: Vec<f64>, actual: f64 },
}

/// A decode failure attributed to the environment variable it came from.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{name}: {error}")]
pub struct VariableError {
    pub name: String,
    pub error: DecodeError,
}

/// Aggregate failure returned by the batch orchestrator.
///
/// Only one phase ever reports: when any required variable is missing, no
/// decoder runs and [`MissingVariables`](Self::MissingVariables) lists every
/// missing name. Otherwise every decoder runs and
/// [`DecodeErrors`](Self::DecodeErrors) carries every failure.
///
/// # Display Format
///
/// ```text
/// Decoder errors:
/// AGE: value "not a number" cannot be cast to number
/// YEAR: value "not a number" cannot be cast to number
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvironmentError {
    #[error("Missing environment variables: \n{}\n", .names.join("\n"))]
    MissingVariables { names: Vec<String> },
    #[error("Decoder errors: \n{}\n", Lines(.errors))]
    DecodeErrors { errors: Vec<VariableError> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvironmentErrorKind {
    MissingVariables,
    DecodeErrors,
}

impl EnvironmentError {
    pub fn kind(&self) -> EnvironmentErrorKind {
        match self {
            Self::MissingVariables { .. } => EnvironmentErrorKind::MissingVariables,
            Self::DecodeErrors { .. } => EnvironmentErrorKind::DecodeErrors,
        }
    }

    /// Names of the variables this report is about, in declaration order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::MissingVariables { names } => names.iter().map(String::as_str).collect(),
            Self::DecodeErrors { errors } => errors.iter().map(|e| e.name.as_str()).collect(),
        }
    }
}

/// Renders the raw input the way `JSON.stringify` would, with an absent
/// value shown as `undefined`.
fn json(value: &Option<String>) -> String {
    match value {
        Some(value) => serde_json::Value::from(value.as_str()).to_string(),
        None => "undefined".to_owned(),
    }
}

fn number(n: &f64) -> String {
    format_number(*n)
}

fn join_numbers(numbers: &[f64]) -> String {
    numbers
        .iter()
        .map(|n| format_number(*n))
        .collect::<Vec<_>>()
        .join(", ")
}

struct Lines<'a>(&'a [VariableError]);

impl fmt::Display for Lines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}
