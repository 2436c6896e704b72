//! Configuration file: global flag values, per-command values and custom
//! command declarations.

mod loader;
mod types;
mod view;

pub use loader::{ConfigError, CONFIG_ENV};
pub use types::{value_to_string, CommandDeclaration, Config, FlagDeclaration};
pub use view::CommandConfigView;
