pub mod file;
pub mod payment;
