use std::{fmt, sync::Arc};

use crate::{DecodeError, IntoValue, Value};

type DecodeFn<T> = dyn Fn(Option<&str>) -> Result<T, DecodeError> + Send + Sync;

/// How the batch orchestrator treats a variable that is not set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// The variable must be set; it is reported as missing otherwise.
    Required,
    /// The decoder falls back to a default, rendered here for documentation.
    Default(String),
    /// An unset variable decodes to `None`.
    Optional,
}

impl Requirement {
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }
}

/// A conversion from an optional raw string to a validated `T`.
///
/// Decoders never touch the environment themselves, so one value can be
/// shared and reused across any number of decoding runs. `with_default` and
/// `optional` wrap a decoder in a new one with different handling of unset
/// input; the wrappers compose, and the outermost one decides the
/// [`Requirement`].
pub struct Decoder<T> {
    decode: Arc<DecodeFn<T>>,
    requirement: Requirement,
}

impl<T> Clone for Decoder<T> {
    fn clone(&self) -> Self {
        Self {
            decode: Arc::clone(&self.decode),
            requirement: self.requirement.clone(),
        }
    }
}

impl<T> fmt::Debug for Decoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("requirement", &self.requirement)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Decoder<T> {
    /// Builds a required decoder from a conversion function.
    pub fn new<F>(decode: F) -> Self
    where
        F: Fn(Option<&str>) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        Self {
            decode: Arc::new(decode),
            requirement: Requirement::Required,
        }
    }

    pub fn decode(&self, input: Option<&str>) -> Result<T, DecodeError> {
        (self.decode)(input)
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    /// Returns `default` when the input is unset or empty, without running
    /// this decoder. Any other input is decoded as before, so an invalid
    /// value still fails.
    pub fn with_default<D>(self, default: D) -> Decoder<T>
    where
        D: Into<T>,
        T: IntoValue + Clone + Send + Sync,
    {
        let default = default.into();
        let rendered = default.clone().into_value().to_string();
        let inner = self.decode;

        Decoder {
            decode: Arc::new(move |input: Option<&str>| {
                if is_unset(input) {
                    Ok(default.clone())
                } else {
                    inner(input)
                }
            }),
            requirement: Requirement::Default(rendered),
        }
    }

    /// Decodes an absent input to `None`. A present input, including the empty
    /// string, is handed to this decoder.
    pub fn optional(self) -> Decoder<Option<T>> {
        let inner = self.decode;

        Decoder {
            decode: Arc::new(move |input: Option<&str>| match input {
                None => Ok(None),
                Some(_) => inner(input).map(Some),
            }),
            requirement: Requirement::Optional,
        }
    }

    /// Converts the output to a [`Value`] so decoders of different types can
    /// share one [`DecodeConfig`](crate::DecodeConfig).
    pub fn erase(self) -> Decoder<Value>
    where
        T: IntoValue,
    {
        let inner = self.decode;

        Decoder {
            decode: Arc::new(move |input: Option<&str>| {
                inner(input).map(IntoValue::into_value)
            }),
            requirement: self.requirement,
        }
    }
}

/// Whether an input counts as "not set": absent or the empty string.
pub(crate) fn is_unset(input: Option<&str>) -> bool {
    input.is_none_or(str::is_empty)
}
