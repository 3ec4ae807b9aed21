pub mod github;
pub mod lemonsqueezy;
pub mod openai;
