use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use howl_core::chat::{ChatClient, ChatRequest};
use howl_core::errors::LlmError;

/// Pre-programmed replies for deterministic testing without API calls.
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Resolve with the given completion text.
    Text(String),
    /// Fail with the given error.
    Error(LlmError),
    /// Wait a duration, then yield the inner reply.
    Delay(Duration, Box<MockReply>),
}

impl MockReply {
    pub fn text(s: &str) -> Self {
        Self::Text(s.to_string())
    }

    pub fn rate_limited() -> Self {
        Self::Error(LlmError::RateLimited { retry_after: None })
    }

    pub fn delayed(delay: Duration, inner: MockReply) -> Self {
        Self::Delay(delay, Box::new(inner))
    }
}

/// Mock chat client that plays back scripted replies in sequence and
/// records every request it receives.
pub struct MockChatClient {
    replies: Mutex<Vec<MockReply>>,
    requests: Mutex<Vec<ChatRequest>>,
    call_count: AtomicUsize,
}

impl MockChatClient {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// A client that answers every call with the same text.
    pub fn always(text: &str) -> Self {
        Self::new(vec![MockReply::text(text)])
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Snapshot of every request received so far, in call order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    fn next_reply(&self, idx: usize) -> Result<MockReply, LlmError> {
        let replies = self.replies.lock();
        if replies.is_empty() {
            return Err(LlmError::InvalidRequest(
                "MockChatClient: no replies configured".into(),
            ));
        }
        // A single scripted reply repeats forever; otherwise play in order.
        if replies.len() == 1 {
            return Ok(replies[0].clone());
        }
        replies.get(idx).cloned().ok_or_else(|| {
            LlmError::InvalidRequest(format!("MockChatClient: no reply configured for call {idx}"))
        })
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let idx = self.call_count.fetch_add(1, Ordering::Relaxed);
        self.requests.lock().push(request.clone());

        let mut reply = self.next_reply(idx)?;
        loop {
            match reply {
                MockReply::Text(text) => return Ok(text),
                MockReply::Error(e) => return Err(e),
                MockReply::Delay(duration, inner) => {
                    tokio::time::sleep(duration).await;
                    reply = *inner;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequential_replies() {
        let mock = MockChatClient::new(vec![MockReply::text("first"), MockReply::text("second")]);
        let req = ChatRequest::prompted("m", "s", "u");

        assert_eq!(mock.complete(&req).await.unwrap(), "first");
        assert_eq!(mock.complete(&req).await.unwrap(), "second");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn single_reply_repeats() {
        let mock = MockChatClient::always("ok");
        let req = ChatRequest::prompted("m", "s", "u");

        for _ in 0..3 {
            assert_eq!(mock.complete(&req).await.unwrap(), "ok");
        }
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn exhausted_script_errors() {
        let mock = MockChatClient::new(vec![MockReply::text("a"), MockReply::text("b")]);
        let req = ChatRequest::prompted("m", "s", "u");

        let _ = mock.complete(&req).await;
        let _ = mock.complete(&req).await;
        let result = mock.complete(&req).await;
        assert!(matches!(result, Err(LlmError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn error_reply() {
        let mock = MockChatClient::new(vec![MockReply::rate_limited(), MockReply::text("later")]);
        let req = ChatRequest::prompted("m", "s", "u");

        assert!(matches!(
            mock.complete(&req).await,
            Err(LlmError::RateLimited { .. })
        ));
        assert_eq!(mock.complete(&req).await.unwrap(), "later");
    }

    #[tokio::test]
    async fn requests_are_recorded() {
        let mock = MockChatClient::always("ok");
        let req = ChatRequest::prompted("m", "system prompt", "user prompt");
        let _ = mock.complete(&req).await;

        let recorded = mock.requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].messages[0].content, "system prompt");
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_reply() {
        let mock = MockChatClient::new(vec![MockReply::delayed(
            Duration::from_secs(2),
            MockReply::text("after delay"),
        )]);
        let req = ChatRequest::prompted("m", "s", "u");

        let start = tokio::time::Instant::now();
        assert_eq!(mock.complete(&req).await.unwrap(), "after delay");
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
