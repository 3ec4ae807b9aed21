pub mod credentials;
pub mod report;
pub mod ticket;
