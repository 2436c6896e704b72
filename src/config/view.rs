//! Key/value view of the loaded config for one command.

use std::collections::BTreeMap;

use crate::args::ConfigView;
use crate::config::types::{value_to_string, Config};

/// Looks a flag up in `[commands.<name>.defaults]`, then in `[defaults]`.
#[derive(Debug, Clone, Copy)]
pub struct CommandConfigView<'a> {
    scoped: Option<&'a BTreeMap<String, toml::Value>>,
    global: &'a BTreeMap<String, toml::Value>,
}

impl Config {
    pub fn view_for(&self, command: &str) -> CommandConfigView<'_> {
        CommandConfigView {
            scoped: self.commands.get(command).map(|c| &c.defaults),
            global: &self.defaults,
        }
    }
}

impl ConfigView for CommandConfigView<'_> {
    fn get(&self, key: &str) -> Option<String> {
        self.scoped
            .and_then(|scoped| scoped.get(key))
            .or_else(|| self.global.get(key))
            .and_then(value_to_string)
    }
}
