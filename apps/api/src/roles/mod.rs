pub mod handlers;
pub mod inputs;
pub mod queries;
pub mod service;
pub mod slug;
