//! Declarative decoders for configuration read from environment variables.
//!
//! A [`Decoder`] turns the raw, possibly unset, value of one variable into a
//! typed value. A [`DecodeConfig`] runs a batch of named decoders in two
//! phases: first every required variable is checked for presence, then every
//! decoder runs. Each phase reports all of its problems at once.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use envcast::{DecodeConfig, as_boolean, as_number, as_string_union};
//!
//! let config = DecodeConfig::new()
//!     .var("LOG_LEVEL", as_string_union(["debug", "info"]).with_default("info"))
//!     .var("PORT", as_number())
//!     .var("TLS", as_boolean().optional());
//!
//! let env = HashMap::from([("PORT".to_owned(), "3000".to_owned())]);
//! let decoded = config.decode(&env).unwrap();
//!
//! assert_eq!(decoded.get_as::<String>("LOG_LEVEL").unwrap(), "info");
//! assert_eq!(decoded.get_as::<f64>("PORT"), Some(3000.0));
//! assert_eq!(decoded.get_as::<Option<bool>>("TLS"), Some(None));
//! ```
mod decoder;
mod decoders;
mod environment;
mod error;
pub mod source;
mod value;

#[doc(hidden)]
#[path = "private.rs"]
pub mod __private;

pub use decoder::{Decoder, Requirement};
pub use decoders::{
    DefaultDecoder, as_boolean, as_number, as_number_union, as_string, as_string_union,
};
pub use environment::{DecodeConfig, Decoded, decode_environment, decode_environment_from};
pub use envcast_derive::DecodeEnv;
pub use error::{
    DecodeError, DecodeErrorKind, EnvironmentError, EnvironmentErrorKind, NotAllowed,
    VariableError,
};
pub use source::{ProcessEnv, Source};
pub use value::{FromValue, IntoValue, Value};
