//! Mock provider adapter for tests
//!
//! `MockAdapter` implements [`ProviderAdapter`] without any network calls.
//! Behaviour is configurable and invocations are counted so tests can
//! assert how the pipeline drove the adapter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{PromptRequest, ProviderError, ProviderKind, ProviderResult, RawCompletion};
use crate::spi::ProviderAdapter;

/// What `invoke()` does when called.
#[derive(Debug, Clone)]
pub enum MockBehaviour {
    /// Return the request input back as the completion (default).
    Echo,
    /// Return a fixed response string.
    Fixed(String),
    /// Sleep for the duration, then return the string. Used to exercise
    /// the orchestrator's invocation timeout.
    Delay(Duration, String),
    /// Always fail with this error.
    Fail(ProviderError),
}

impl Default for MockBehaviour {
    fn default() -> Self {
        Self::Echo
    }
}

/// Mock implementation of [`ProviderAdapter`].
#[derive(Debug)]
pub struct MockAdapter {
    behaviour: MockBehaviour,
    kind: ProviderKind,
    invoke_calls: AtomicU64,
}

impl MockAdapter {
    /// Create a mock that echoes the request input.
    pub fn new() -> Self {
        Self {
            behaviour: MockBehaviour::Echo,
            kind: ProviderKind::OpenAi,
            invoke_calls: AtomicU64::new(0),
        }
    }

    /// Set the invocation behaviour.
    pub fn with_behaviour(mut self, behaviour: MockBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    /// Set the provider kind the mock reports.
    pub fn with_kind(mut self, kind: ProviderKind) -> Self {
        self.kind = kind;
        self
    }

    /// Number of times `invoke()` was called.
    pub fn invoke_calls(&self) -> u64 {
        self.invoke_calls.load(Ordering::Relaxed)
    }
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    fn name(&self) -> &str {
        "mock"
    }

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn invoke(&self, request: &PromptRequest, model: &str) -> ProviderResult<RawCompletion> {
        self.invoke_calls.fetch_add(1, Ordering::Relaxed);

        match &self.behaviour {
            MockBehaviour::Echo => Ok(RawCompletion {
                text: request.input.clone(),
                model: model.to_string(),
            }),
            MockBehaviour::Fixed(text) => Ok(RawCompletion {
                text: text.clone(),
                model: model.to_string(),
            }),
            MockBehaviour::Delay(duration, text) => {
                tokio::time::sleep(*duration).await;
                Ok(RawCompletion {
                    text: text.clone(),
                    model: model.to_string(),
                })
            }
            MockBehaviour::Fail(error) => Err(error.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperationKind;

    fn request() -> PromptRequest {
        PromptRequest::new(OperationKind::Generate, "hello")
    }

    #[tokio::test]
    async fn echo_behaviour() {
        let mock = MockAdapter::new();
        let completion = mock.invoke(&request(), "mock-model").await.expect("echo");
        assert_eq!(completion.text, "hello");
        assert_eq!(completion.model, "mock-model");
    }

    #[tokio::test]
    async fn fixed_behaviour_and_counter() {
        let mock = MockAdapter::new().with_behaviour(MockBehaviour::Fixed("canned".into()));
        assert_eq!(mock.invoke_calls(), 0);

        mock.invoke(&request(), "m").await.expect("fixed");
        mock.invoke(&request(), "m").await.expect("fixed");
        assert_eq!(mock.invoke_calls(), 2);
    }

    #[tokio::test]
    async fn fail_behaviour() {
        let mock = MockAdapter::new().with_behaviour(MockBehaviour::Fail(
            ProviderError::UpstreamUnavailable("down".into()),
        ));
        let err = mock.invoke(&request(), "m").await.unwrap_err();
        assert!(matches!(err, ProviderError::UpstreamUnavailable(_)));
        assert_eq!(mock.invoke_calls(), 1);
    }

    #[test]
    fn mock_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockAdapter>();
    }
}
