pub mod configs;
pub mod rest;
