#![deny(missing_docs)]

//! # Retrying Caller
//!
//! Wraps one generation call with a fixed retry budget:
//!
//! - Authentication failures are never retried; they become
//!   `AppError::Configuration` naming the credential.
//! - Rate limits are retried after each delay in `rate_limit_delays`
//!   (2s, 4s, 8s by default), then surface unchanged.
//! - Server errors (status >= 500) are retried `server_error_retries` times
//!   (once by default) after `server_error_delay`.
//! - Anything else surfaces immediately.
//!
//! The two budgets are independent and reset for every top-level call.
//! Backoff blocks the calling thread.

use crate::error::{ApiError, AppError, AppResult};
use crate::generation::client::{Completion, GenerationClient, GenerationRequest, CREDENTIAL_ENV};
use std::time::Duration;
use tracing::warn;

/// Retry budget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait before retry *k* after a rate limit; its length is the retry count.
    pub rate_limit_delays: Vec<Duration>,
    /// How many server errors in a row are retried.
    pub server_error_retries: u32,
    /// Wait before retrying a server error.
    pub server_error_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            rate_limit_delays: vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8),
            ],
            server_error_retries: 1,
            server_error_delay: Duration::from_secs(1),
        }
    }
}

/// Interface for pausing between attempts.
///
/// Abstracted to allow recording delays in tests instead of sleeping.
pub trait Sleeper {
    /// Blocks for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Standard sleeper using `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<T: Sleeper + ?Sized> Sleeper for &T {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// A client call guarded by a [`RetryPolicy`].
pub struct RetryingCaller<'a, C: ?Sized, S: ?Sized> {
    client: &'a C,
    sleeper: &'a S,
    policy: &'a RetryPolicy,
}

impl<'a, C, S> RetryingCaller<'a, C, S>
where
    C: GenerationClient + ?Sized,
    S: Sleeper + ?Sized,
{
    /// Creates a caller borrowing its collaborators.
    pub fn new(client: &'a C, sleeper: &'a S, policy: &'a RetryPolicy) -> Self {
        Self {
            client,
            sleeper,
            policy,
        }
    }

    /// Executes `request`, retrying transient failures per the policy.
    ///
    /// # Errors
    ///
    /// * `AppError::Configuration` on authentication failure.
    /// * `AppError::Api` with the last failure once its budget is spent, or
    ///   immediately for non-retryable failures.
    pub fn call(&self, request: &GenerationRequest) -> AppResult<Completion> {
        let mut rate_limit_attempts = 0usize;
        let mut server_error_attempts = 0u32;

        loop {
            let err = match self.client.complete(request) {
                Ok(completion) => return Ok(completion),
                Err(err) => err,
            };

            match err {
                ApiError::Authentication { message } => {
                    return Err(AppError::Configuration(format!(
                        "Authentication failed ({}): check that {} is set and valid.",
                        message, CREDENTIAL_ENV
                    )));
                }
                ApiError::RateLimited { .. } => {
                    let Some(delay) = self.policy.rate_limit_delays.get(rate_limit_attempts) else {
                        return Err(err.into());
                    };
                    rate_limit_attempts += 1;
                    warn!("Rate limit hit, retrying in {}s...", delay.as_secs_f64());
                    self.sleeper.sleep(*delay);
                }
                ApiError::Server { status, .. } => {
                    if server_error_attempts >= self.policy.server_error_retries {
                        return Err(err.into());
                    }
                    server_error_attempts += 1;
                    warn!("Server error ({}), retrying...", status);
                    self.sleeper.sleep(self.policy.server_error_delay);
                }
                ApiError::Client { .. } | ApiError::Transport(_) => return Err(err.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::client::TokenUsage;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct ScriptedClient {
        script: RefCell<VecDeque<Result<Completion, ApiError>>>,
        calls: RefCell<usize>,
    }

    impl ScriptedClient {
        fn new(script: Vec<Result<Completion, ApiError>>) -> Self {
            Self {
                script: RefCell::new(script.into()),
                calls: RefCell::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.borrow()
        }
    }

    impl GenerationClient for ScriptedClient {
        fn complete(&self, _request: &GenerationRequest) -> Result<Completion, ApiError> {
            *self.calls.borrow_mut() += 1;
            self.script
                .borrow_mut()
                .pop_front()
                .expect("script exhausted")
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        delays: RefCell<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.delays.borrow_mut().push(duration);
        }
    }

    fn ok(text: &str) -> Result<Completion, ApiError> {
        Ok(Completion {
            text: text.into(),
            usage: TokenUsage::new(10, 5),
        })
    }

    fn rate_limited() -> Result<Completion, ApiError> {
        Err(ApiError::from_status(429, "slow down"))
    }

    fn server_error() -> Result<Completion, ApiError> {
        Err(ApiError::from_status(503, "unavailable"))
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: "claude-sonnet-4-6".into(),
            system: "sys".into(),
            user: "hello".into(),
            max_tokens: 16,
            stream: false,
        }
    }

    fn secs(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|s| Duration::from_secs(*s)).collect()
    }

    #[test]
    fn test_success_first_try() {
        let client = ScriptedClient::new(vec![ok("done")]);
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::default();

        let completion = RetryingCaller::new(&client, &sleeper, &policy)
            .call(&request())
            .unwrap();
        assert_eq!(completion.text, "done");
        assert!(sleeper.delays.borrow().is_empty());
    }

    #[test]
    fn test_rate_limit_backoff_then_success() {
        let client = ScriptedClient::new(vec![
            rate_limited(),
            rate_limited(),
            rate_limited(),
            ok("finally"),
        ]);
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::default();

        let completion = RetryingCaller::new(&client, &sleeper, &policy)
            .call(&request())
            .unwrap();
        assert_eq!(completion.text, "finally");
        assert_eq!(*sleeper.delays.borrow(), secs(&[2, 4, 8]));
        assert_eq!(client.calls(), 4);
    }

    #[test]
    fn test_rate_limit_exhausted_propagates_unchanged() {
        let client = ScriptedClient::new(vec![
            rate_limited(),
            rate_limited(),
            rate_limited(),
            rate_limited(),
        ]);
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::default();

        let err = RetryingCaller::new(&client, &sleeper, &policy)
            .call(&request())
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Api(ApiError::RateLimited { ref message }) if message == "slow down"
        ));
        assert_eq!(*sleeper.delays.borrow(), secs(&[2, 4, 8]));
        assert_eq!(client.calls(), 4);
    }

    #[test]
    fn test_server_error_retried_once() {
        let client = ScriptedClient::new(vec![server_error(), ok("recovered")]);
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::default();

        let completion = RetryingCaller::new(&client, &sleeper, &policy)
            .call(&request())
            .unwrap();
        assert_eq!(completion.text, "recovered");
        assert_eq!(*sleeper.delays.borrow(), secs(&[1]));
    }

    #[test]
    fn test_second_server_error_propagates() {
        let client = ScriptedClient::new(vec![server_error(), server_error()]);
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::default();

        let err = RetryingCaller::new(&client, &sleeper, &policy)
            .call(&request())
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Api(ApiError::Server { status: 503, .. })
        ));
        assert_eq!(client.calls(), 2);
    }

    #[test]
    fn test_budgets_are_independent() {
        let client = ScriptedClient::new(vec![
            server_error(),
            rate_limited(),
            rate_limited(),
            rate_limited(),
            ok("mixed"),
        ]);
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::default();

        let completion = RetryingCaller::new(&client, &sleeper, &policy)
            .call(&request())
            .unwrap();
        assert_eq!(completion.text, "mixed");
        assert_eq!(*sleeper.delays.borrow(), secs(&[1, 2, 4, 8]));
    }

    #[test]
    fn test_authentication_becomes_configuration_error() {
        let client = ScriptedClient::new(vec![Err(ApiError::from_status(401, "invalid x-api-key"))]);
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::default();

        let err = RetryingCaller::new(&client, &sleeper, &policy)
            .call(&request())
            .unwrap_err();
        match err {
            AppError::Configuration(msg) => assert!(msg.contains(CREDENTIAL_ENV)),
            other => panic!("expected Configuration, got {:?}", other),
        }
        assert_eq!(client.calls(), 1);
        assert!(sleeper.delays.borrow().is_empty());
    }

    #[test]
    fn test_client_error_not_retried() {
        let client = ScriptedClient::new(vec![Err(ApiError::from_status(400, "bad request"))]);
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::default();

        let err = RetryingCaller::new(&client, &sleeper, &policy)
            .call(&request())
            .unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::Client { status: 400, .. })));
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn test_budgets_reset_per_call() {
        let client = ScriptedClient::new(vec![server_error(), ok("a"), server_error(), ok("b")]);
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::default();
        let caller = RetryingCaller::new(&client, &sleeper, &policy);

        assert_eq!(caller.call(&request()).unwrap().text, "a");
        assert_eq!(caller.call(&request()).unwrap().text, "b");
    }
}
