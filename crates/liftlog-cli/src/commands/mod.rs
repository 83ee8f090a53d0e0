pub mod add;
pub mod auth_cmd;
pub mod catalog;
pub mod common;
pub mod config;
pub mod delete;
pub mod edit;
pub mod history;
pub mod list;
pub mod show;
pub mod stats;
pub mod status;
pub mod sync;
