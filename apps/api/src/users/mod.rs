pub mod handlers;
pub mod inputs;
pub mod queries;
