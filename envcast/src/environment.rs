use std::ops::Index;

use indexmap::IndexMap;
use tracing::{debug, debug_span, trace};

use crate::{
    DecodeError, Decoder, EnvironmentError, FromValue, IntoValue, ProcessEnv, Source, Value,
    VariableError, decoder::is_unset,
};

/// An ordered set of named decoders, one per environment variable.
///
/// Declaration order is the order in which problems are reported.
#[derive(Debug, Clone, Default)]
pub struct DecodeConfig {
    decoders: IndexMap<String, Decoder<Value>>,
}

impl DecodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable, builder style. See [`insert`](Self::insert).
    pub fn var<T>(mut self, name: impl Into<String>, decoder: Decoder<T>) -> Self
    where
        T: IntoValue + 'static,
    {
        self.insert(name, decoder);
        self
    }

    /// Adds a variable. Re-using a name replaces its decoder but keeps the
    /// position of the first declaration.
    pub fn insert<T>(
        &mut self,
        name: impl Into<String>,
        decoder: Decoder<T>,
    ) -> Option<Decoder<Value>>
    where
        T: IntoValue + 'static,
    {
        self.decoders.insert(name.into(), decoder.erase())
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Decoder<Value>)> {
        self.decoders.iter().map(|(name, decoder)| (name.as_str(), decoder))
    }

    /// Lists every variable as a `NAME=default` line, leaving the value empty
    /// for variables without a default.
    ///
    /// ```
    /// use envcast::{DecodeConfig, as_number, as_string};
    ///
    /// let config = DecodeConfig::new()
    ///     .var("HOST", as_string())
    ///     .var("PORT", as_number().with_default(8080));
    ///
    /// assert_eq!(config.requirements(), "HOST=\nPORT=8080\n");
    /// ```
    pub fn requirements(&self) -> String {
        let mut requirements = String::new();
        for (name, decoder) in self.iter() {
            push_requirement(&mut requirements, name, decoder);
        }
        requirements
    }

    /// Decodes every variable from `source`.
    pub fn decode<S: Source + ?Sized>(&self, source: &S) -> Result<Decoded, EnvironmentError> {
        let _span = debug_span!("decode_environment", variables = self.len()).entered();

        let mut missing = MissingVariables::new();
        let snapshot: Vec<Option<String>> = self
            .iter()
            .map(|(name, decoder)| missing.lookup(source, name, decoder))
            .collect();
        missing.finish()?;

        let mut failures = DecodeFailures::new();
        let decoded = self
            .iter()
            .zip(snapshot)
            .map(|((name, decoder), raw)| {
                let value = failures
                    .decode(name, decoder, raw.as_deref())
                    .unwrap_or(Value::Absent);
                (name.to_owned(), value)
            })
            .collect();
        failures.finish()?;

        Ok(Decoded(decoded))
    }
}

impl<N, T> FromIterator<(N, Decoder<T>)> for DecodeConfig
where
    N: Into<String>,
    T: IntoValue + 'static,
{
    fn from_iter<I: IntoIterator<Item = (N, Decoder<T>)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (name, decoder) in iter {
            config.insert(name, decoder);
        }
        config
    }
}

/// Decodes `config` from the process environment.
pub fn decode_environment(config: &DecodeConfig) -> Result<Decoded, EnvironmentError> {
    config.decode(&ProcessEnv)
}

/// Decodes `config` from an arbitrary [`Source`].
pub fn decode_environment_from<S: Source + ?Sized>(
    config: &DecodeConfig,
    source: &S,
) -> Result<Decoded, EnvironmentError> {
    config.decode(source)
}

/// The values produced by a successful decoding run, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded(IndexMap<String, Value>);

impl Decoded {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns a copy of the value converted to `T`, or `None` when the name
    /// is unknown or the value has a different type.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Option<T> {
        self.get(name).cloned().and_then(T::from_value)
    }

    /// Like [`get_as`](Self::get_as) but moves the value out. The entry is
    /// removed even when it does not convert to `T`.
    pub fn take<T: FromValue>(&mut self, name: &str) -> Option<T> {
        self.0.shift_remove(name).and_then(T::from_value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.0
    }
}

impl Index<&str> for Decoded {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if `name` was not part of the decoded configuration.
    fn index(&self, name: &str) -> &Value {
        &self.0[name]
    }
}

impl IntoIterator for Decoded {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Collects required variables that are not set.
#[derive(Debug, Default)]
pub struct MissingVariables(Vec<String>);

impl MissingVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `name` once, recording it as missing when `decoder` requires a
    /// value and none was set.
    pub fn lookup<S, T>(
        &mut self,
        source: &S,
        name: &str,
        decoder: &Decoder<T>,
    ) -> Option<String>
    where
        S: Source + ?Sized,
        T: 'static,
    {
        let value = source.get(name);
        trace!(
            name,
            requirement = ?decoder.requirement(),
            set = value.is_some(),
            "looked up variable"
        );

        if decoder.requirement().is_required() && is_unset(value.as_deref()) {
            self.0.push(name.to_owned());
        }
        value
    }

    pub fn finish(self) -> Result<(), EnvironmentError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            debug!(missing = ?self.0, "required environment variables are not set");
            Err(EnvironmentError::MissingVariables { names: self.0 })
        }
    }
}

/// Collects decoder failures, attributed to their variable.
#[derive(Debug, Default)]
pub struct DecodeFailures(Vec<VariableError>);

impl DecodeFailures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `decoder`, returning `None` and recording the failure if it fails.
    pub fn decode<T: 'static>(
        &mut self,
        name: &str,
        decoder: &Decoder<T>,
        raw: Option<&str>,
    ) -> Option<T> {
        match decoder.decode(raw) {
            Ok(value) => Some(value),
            Err(error) => {
                self.add(name, error);
                None
            }
        }
    }

    pub fn add(&mut self, name: &str, error: DecodeError) {
        trace!(name, kind = ?error.kind(), "variable failed to decode");
        self.0.push(VariableError {
            name: name.to_owned(),
            error,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn into_error(self) -> EnvironmentError {
        debug!(failures = self.0.len(), "environment variables failed to decode");
        EnvironmentError::DecodeErrors { errors: self.0 }
    }

    pub fn finish(self) -> Result<(), EnvironmentError> {
        if self.has_errors() {
            Err(self.into_error())
        } else {
            Ok(())
        }
    }
}

/// Appends the `NAME=default` line for one variable.
pub fn push_requirement<T: 'static>(
    requirements: &mut String,
    name: &str,
    decoder: &Decoder<T>,
) {
    requirements.push_str(name);
    requirements.push('=');
    if let crate::Requirement::Default(default) = decoder.requirement() {
        requirements.push_str(default);
    }
    requirements.push('\n');
}
