pub mod config;
pub mod roles;
