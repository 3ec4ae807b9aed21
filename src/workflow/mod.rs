pub mod pipeline;
pub mod publish;

pub use pipeline::Pipeline;
