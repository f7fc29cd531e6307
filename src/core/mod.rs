pub mod auth;
pub mod config;
pub mod exaroton;
pub mod formatter;
pub mod models;
pub mod recorder;
pub mod spending;
pub mod store;
