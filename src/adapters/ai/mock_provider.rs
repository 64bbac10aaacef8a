//! Mock AI provider for testing.
//!
//! Configurable queues of replies and extraction results let tests drive
//! the full turn pipeline without a real API. Calls are recorded for
//! verification (e.g. asserting the terminal short-circuit makes none).
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAiProvider::new()
//!     .with_reply("Tell me more.")
//!     .with_extraction(json!({"project_name": "Atlas"}));
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{
    AiError, AiProvider, CompletionRequest, CompletionResponse, ExtractionRequest, FinishReason,
    ProviderInfo, TokenUsage,
};

/// One recorded provider invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Complete,
    Extract { tool_name: String },
}

/// Queued outcome for a `complete` call.
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(AiError),
}

/// Queued outcome for an `extract` call.
#[derive(Debug, Clone)]
enum MockExtraction {
    Value(Value),
    Decline,
    Error(AiError),
}

/// Mock AI provider with queued responses and call tracking.
#[derive(Debug, Clone, Default)]
pub struct MockAiProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    extractions: Arc<Mutex<VecDeque<MockExtraction>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockAiProvider {
    /// Creates a mock with empty queues.
    ///
    /// An exhausted reply queue errors; an exhausted extraction queue
    /// declines, mirroring a model that simply produced no structured data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Text(content.into()));
        self
    }

    /// Queues a reply-generation failure.
    pub fn with_reply_error(self) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Error(AiError::unavailable("mock reply failure")));
        self
    }

    /// Queues a successful extraction value.
    pub fn with_extraction(self, value: Value) -> Self {
        self.extractions
            .lock()
            .unwrap()
            .push_back(MockExtraction::Value(value));
        self
    }

    /// Queues an extraction decline.
    pub fn with_extraction_decline(self) -> Self {
        self.extractions
            .lock()
            .unwrap()
            .push_back(MockExtraction::Decline);
        self
    }

    /// Queues an extraction transport failure.
    pub fn with_extraction_error(self) -> Self {
        self.extractions
            .lock()
            .unwrap()
            .push_back(MockExtraction::Error(AiError::network(
                "mock extraction failure",
            )));
        self
    }

    /// Shared handle to the recorded calls.
    pub fn call_log(&self) -> Arc<Mutex<Vec<MockCall>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        self.calls.lock().unwrap().push(MockCall::Complete);

        let queued = self.replies.lock().unwrap().pop_front();
        match queued {
            Some(MockReply::Text(content)) => Ok(CompletionResponse {
                content,
                usage: TokenUsage::new(10, 10),
                model: "mock-model".to_string(),
                finish_reason: FinishReason::Stop,
            }),
            Some(MockReply::Error(err)) => Err(err),
            None => Err(AiError::unavailable("no mock reply queued")),
        }
    }

    async fn extract(&self, request: ExtractionRequest) -> Result<Option<Value>, AiError> {
        self.calls.lock().unwrap().push(MockCall::Extract {
            tool_name: request.tool_name,
        });

        let queued = self.extractions.lock().unwrap().pop_front();
        match queued {
            Some(MockExtraction::Value(value)) => Ok(Some(value)),
            Some(MockExtraction::Decline) | None => Ok(None),
            Some(MockExtraction::Error(err)) => Err(err),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model", 128_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Message;
    use serde_json::json;

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let provider = MockAiProvider::new().with_reply("first").with_reply("second");

        let request = || CompletionRequest::new(vec![Message::user("hi")]);
        assert_eq!(provider.complete(request()).await.unwrap().content, "first");
        assert_eq!(provider.complete(request()).await.unwrap().content, "second");
        assert!(provider.complete(request()).await.is_err());
    }

    #[tokio::test]
    async fn exhausted_extraction_queue_declines() {
        let provider = MockAiProvider::new();
        let request = ExtractionRequest::new(vec![Message::user("hi")], "tool", json!({}));
        assert_eq!(provider.extract(request).await.unwrap(), None);
    }

    #[tokio::test]
    async fn calls_are_recorded() {
        let provider = MockAiProvider::new()
            .with_reply("ok")
            .with_extraction(json!({"a": 1}));
        let calls = provider.call_log();

        provider
            .complete(CompletionRequest::new(vec![Message::user("hi")]))
            .await
            .unwrap();
        provider
            .extract(ExtractionRequest::new(
                vec![Message::user("hi")],
                "record_stage_data",
                json!({}),
            ))
            .await
            .unwrap();

        let log = calls.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], MockCall::Complete);
        assert_eq!(
            log[1],
            MockCall::Extract {
                tool_name: "record_stage_data".to_string()
            }
        );
    }
}
