//! Autonomous Werewolf player: conversation history, role discovery,
//! prompt-injection filtering, and the multi-stage decision pipeline that
//! turns inbound moderator/player messages into chat and vote responses.

pub mod config;
pub mod error;
pub mod history;
pub mod pipeline;
pub mod prompts;
pub mod resolver;
pub mod router;
pub mod safety;
pub mod state;

pub use config::AgentConfig;
pub use error::AgentError;
pub use router::WerewolfAgent;
