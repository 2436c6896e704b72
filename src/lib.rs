//! infrawrap: argument resolution engine and launcher for wrapped
//! infrastructure tools (terraform, helmfile, packer, custom commands).

pub mod args;
pub mod config;
pub mod launch;
pub mod logging;
