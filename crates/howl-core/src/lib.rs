pub mod chat;
pub mod envelope;
pub mod errors;
pub mod ids;
pub mod role;
