//! Where raw values come from.
//!
//! The orchestrator only ever asks a [`Source`] for a variable by its exact
//! name. Tests can hand it a map instead of mutating the process environment.

use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

pub trait Source {
    fn get(&self, name: &str) -> Option<String>;
}

/// The environment of the current process.
///
/// Values that are not valid unicode are converted lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Source for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}

impl<S: BuildHasher> Source for HashMap<String, String, S> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

impl Source for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        BTreeMap::get(self, name).cloned()
    }
}

impl<T: Source + ?Sized> Source for &T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

/// A [`Source`] backed by a lookup function.
#[derive(Debug, Clone, Copy)]
pub struct FnSource<F>(F);

pub fn from_fn<F>(lookup: F) -> FnSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    FnSource(lookup)
}

impl<F> Source for FnSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name)
    }
}
