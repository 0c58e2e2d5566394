pub mod admin;
pub mod dashboard_page;
pub mod payment;
