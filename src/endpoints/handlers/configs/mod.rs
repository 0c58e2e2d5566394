pub mod admin_guard;
pub mod connection_pool;
pub mod context;
