pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod repos;
pub mod schema;
