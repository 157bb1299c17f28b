use howl_core::errors::LlmError;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("llm error: {0}")]
    Llm(#[from] LlmError),

    #[error("pipeline aborted")]
    Aborted,
}
