pub mod mock;
pub mod openai;
pub mod retry;

pub use mock::{MockChatClient, MockReply};
pub use openai::{OpenAiChatClient, OpenAiConfig};
pub use retry::RetryPolicy;
