//! External value sources consulted by the resolver.
//!
//! The resolver only reads through these traits, so tests can hand it a fixed
//! environment and config without touching the process.

use std::collections::{BTreeMap, HashMap};

/// Read access to environment variables.
pub trait EnvSource {
    /// Value of `name` if it is set. An empty value still counts as set.
    fn var(&self, name: &str) -> Option<String>;
}

/// Read access to already-loaded configuration, keyed by flag name.
pub trait ConfigView {
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|v| v.to_string_lossy().into_owned())
    }
}

/// Builder for a fixed set of environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSet {
    vars: Vec<(String, String)>,
}

impl EnvSet {
    /// Create an empty environment set.
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set one variable. Later values for the same name win.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.push((name.into(), value.into()));
        self
    }

    /// Add arbitrary extra environment variables.
    pub fn with_extra(mut self, extra: Vec<(String, String)>) -> Self {
        self.vars.extend(extra);
        self
    }

    /// Build the final environment variable list.
    pub fn build(self) -> Vec<(String, String)> {
        self.vars
    }
}

impl EnvSource for EnvSet {
    fn var(&self, name: &str) -> Option<String> {
        self.vars
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}

/// An empty configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfig;

impl ConfigView for NoConfig {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

impl ConfigView for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ConfigView for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}
