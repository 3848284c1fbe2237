//! Internal types used by the derive macro.
//!
//! These are not meant to be used directly by users of the library.
pub use crate::environment::{DecodeFailures, MissingVariables, push_requirement};
pub use crate::{DefaultDecoder, Decoder, EnvironmentError, ProcessEnv, Source};

use tracing::{debug_span, span::EnteredSpan};

pub trait DecodeEnv {
    type Builder: DecodeEnvBuilder<Target = Self>;

    fn from_env() -> Self::Builder;

    fn requirements(requirements: &mut String);
}

pub trait DecodeEnvBuilder {
    type Target;

    fn finalize_from<S: Source + ?Sized>(
        self,
        source: &S,
    ) -> Result<Self::Target, EnvironmentError>;
}

/// A field either set on the builder or looked up in the environment.
pub enum Field<T> {
    Set(T),
    Raw(Option<String>),
}

pub fn decode_span(config: &'static str, variables: usize) -> EnteredSpan {
    debug_span!("decode_environment", config, variables).entered()
}
