pub mod api;
pub mod body;
pub mod capture;
pub mod config;
pub mod endpoint;
pub mod prometheus;
pub mod record;
pub mod router;
pub mod server;
pub mod stores;
pub mod time;
