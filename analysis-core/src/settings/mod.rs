pub mod api_server;
pub mod auth;
pub mod cluster;
pub mod storage;
