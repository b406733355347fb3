pub mod app_config;
pub mod clean;
pub mod cli;
pub mod config;
pub mod help;
pub mod install;
pub mod list;
pub mod pipeline;
pub mod resolve;
pub mod util;
