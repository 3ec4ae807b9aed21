pub mod capture;
pub mod config;
pub mod license;
pub mod tickets;
