//! Prompt-injection screening for public-channel chatter. A single
//! classification call decides whether an inbound message is trying to
//! hijack the game; flagged text is replaced before it ever reaches
//! storage or a prompt.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use howl_core::chat::{ChatClient, ChatRequest};

use crate::prompts::{REDACTION_PLACEHOLDER, SAFETY_SYSTEM_PROMPT};

pub struct SafetyFilter {
    client: Arc<dyn ChatClient>,
    model: String,
}

impl SafetyFilter {
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Classify one message. The classifier fails open: any call failure
    /// treats the message as safe.
    #[instrument(skip_all)]
    pub async fn is_dangerous(&self, text: &str) -> bool {
        let request = ChatRequest::prompted(&self.model, SAFETY_SYSTEM_PROMPT, text);
        match self.client.complete(&request).await {
            Ok(verdict) => verdict.trim() == "1",
            Err(error) => {
                warn!(%error, "safety check failed, treating message as safe");
                false
            }
        }
    }

    /// Screen a message for storage. Dangerous text is replaced with the
    /// fixed placeholder; the original is dropped.
    pub async fn sanitize(&self, text: &str) -> String {
        if self.is_dangerous(text).await {
            debug!("redacting suspect message");
            REDACTION_PLACEHOLDER.to_string()
        } else {
            text.to_string()
        }
    }
}
