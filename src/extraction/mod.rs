pub mod parser;
pub mod request;

pub use parser::parse_tickets;
pub use request::ExtractionRequest;
