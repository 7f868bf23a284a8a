//! Analysis server library
//!
//! The binary only parses the command line and drives [`bootstrap::run`];
//! everything else lives here so the router can be exercised end to end in
//! integration tests.

pub mod api;
pub mod app_state;
pub mod bootstrap;
pub mod cluster;
pub mod feed_cache;
pub mod http;
pub mod init_telemetry;
pub mod persistence;
pub mod settings;
pub mod static_files;
pub mod stop_flag;

pub use app_state::AppState;
