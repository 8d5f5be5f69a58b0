#![deny(missing_docs)]

//! # Generation Orchestrator
//!
//! Sequences one generation call per endpoint, in document order, and folds
//! the outcomes into a [`GenerationResult`].
//!
//! A failed endpoint (after retries) is skipped and the batch continues.
//! An authentication failure aborts the whole batch.

use crate::error::{AppError, AppResult};
use crate::generation::client::{GenerationClient, GenerationRequest, TokenUsage};
use crate::generation::pricing::PricingTable;
use crate::generation::retry::{RetryPolicy, RetryingCaller, Sleeper, ThreadSleeper};
use crate::generation::{GeneratedDoc, GenerationResult};
use crate::oas::models::{Endpoint, Specification};
use crate::prompts::{build_endpoint_prompt, build_overview_prompt, SYSTEM_PROMPT};
use tracing::{info, warn};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-6";

/// Default generation cap per request.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Settings applied to every request of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Model identifier.
    pub model: String,
    /// Stream endpoint responses (the overview is never streamed).
    pub stream: bool,
    /// Upper bound on generated tokens per request.
    pub max_tokens: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            stream: false,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Progress label for step `current` of `total`, e.g. `[3/12] Generating...`.
pub fn progress_label(current: usize, total: usize) -> String {
    format!("[{}/{}] Generating...", current, total)
}

/// Drives documentation generation against a [`GenerationClient`].
pub struct Generator<C, S = ThreadSleeper> {
    client: C,
    sleeper: S,
    config: GeneratorConfig,
    retry: RetryPolicy,
    pricing: PricingTable,
}

impl<C: GenerationClient> Generator<C> {
    /// Creates a generator with the default retry policy, pricing and a
    /// blocking sleeper.
    pub fn new(client: C, config: GeneratorConfig) -> Self {
        Self {
            client,
            sleeper: ThreadSleeper,
            config,
            retry: RetryPolicy::default(),
            pricing: PricingTable::default(),
        }
    }
}

impl<C: GenerationClient, S: Sleeper> Generator<C, S> {
    /// Replaces the sleeper used for backoff.
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> Generator<C, S2> {
        Generator {
            client: self.client,
            sleeper,
            config: self.config,
            retry: self.retry,
            pricing: self.pricing,
        }
    }

    /// Replaces the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the pricing table.
    pub fn with_pricing(mut self, pricing: PricingTable) -> Self {
        self.pricing = pricing;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn request(&self, user: String, stream: bool) -> GenerationRequest {
        GenerationRequest {
            model: self.config.model.clone(),
            system: SYSTEM_PROMPT.to_string(),
            user,
            max_tokens: self.config.max_tokens,
            stream,
        }
    }

    fn document_endpoint(&self, endpoint: &Endpoint) -> AppResult<(GeneratedDoc, TokenUsage)> {
        let request = self.request(build_endpoint_prompt(endpoint), self.config.stream);
        let completion =
            RetryingCaller::new(&self.client, &self.sleeper, &self.retry).call(&request)?;

        let doc = GeneratedDoc {
            endpoint_ref: endpoint.reference(),
            markdown: completion.text,
            tokens_used: completion.usage.total(),
            model: self.config.model.clone(),
        };
        Ok((doc, completion.usage))
    }

    /// Generates documentation for a single endpoint. Failures propagate.
    pub fn generate_endpoint_doc(&self, endpoint: &Endpoint) -> AppResult<GeneratedDoc> {
        self.document_endpoint(endpoint).map(|(doc, _)| doc)
    }

    /// Generates the API overview section. Failures propagate.
    pub fn generate_overview(&self, spec: &Specification) -> AppResult<String> {
        let request = self.request(build_overview_prompt(spec), false);
        let completion =
            RetryingCaller::new(&self.client, &self.sleeper, &self.retry).call(&request)?;
        Ok(completion.text)
    }

    /// Generates documentation for every endpoint of `spec`.
    ///
    /// # Errors
    ///
    /// * `AppError::Configuration` aborts the batch immediately.
    /// * `AppError::UnknownModel` if the model has no registered pricing.
    ///
    /// Any other per-endpoint failure is logged and the endpoint omitted.
    pub fn generate_full_docs(&self, spec: &Specification) -> AppResult<GenerationResult> {
        let total = spec.endpoints.len();

        let (docs, usage) = spec.endpoints.iter().enumerate().try_fold(
            (Vec::with_capacity(total), TokenUsage::default()),
            |(mut docs, usage), (i, endpoint)| -> AppResult<_> {
                let reference = endpoint.reference();
                info!("{} {}", progress_label(i + 1, total), reference);

                match self.document_endpoint(endpoint) {
                    Ok((doc, used)) => {
                        info!("Done: {}", reference);
                        docs.push(doc);
                        Ok((docs, usage + used))
                    }
                    Err(err @ AppError::Configuration(_)) => Err(err),
                    Err(err) => {
                        warn!("Skipping {}: {}", reference, err);
                        Ok((docs, usage))
                    }
                }
            },
        )?;

        let total_cost_usd =
            self.pricing
                .estimate_cost(usage.input_tokens, usage.output_tokens, &self.config.model)?;

        Ok(GenerationResult {
            api_title: spec.title.clone(),
            api_version: spec.version.clone(),
            docs,
            total_tokens: usage.total(),
            total_cost_usd,
            model: self.config.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::generation::client::Completion;
    use crate::generation::pricing::ModelPricing;
    use crate::oas::models::HttpMethod;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Replies per request path; unknown paths succeed.
    #[derive(Default)]
    struct RoutedClient {
        failures: HashMap<String, ApiError>,
        requests: RefCell<Vec<GenerationRequest>>,
    }

    impl RoutedClient {
        fn failing(path: &str, err: ApiError) -> Self {
            let mut failures = HashMap::new();
            failures.insert(path.to_string(), err);
            Self {
                failures,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl GenerationClient for RoutedClient {
        fn complete(&self, request: &GenerationRequest) -> Result<Completion, ApiError> {
            self.requests.borrow_mut().push(request.clone());
            for (path, err) in &self.failures {
                if request.user.contains(&format!("**Path:** {}\n", path)) {
                    return Err(err.clone());
                }
            }
            Ok(Completion {
                text: format!("docs #{}", self.requests.borrow().len()),
                usage: TokenUsage::new(100, 50),
            })
        }
    }

    #[derive(Default)]
    struct NoSleep(RefCell<Vec<Duration>>);

    impl Sleeper for NoSleep {
        fn sleep(&self, duration: Duration) {
            self.0.borrow_mut().push(duration);
        }
    }

    fn endpoint(method: HttpMethod, path: &str) -> Endpoint {
        Endpoint {
            method,
            path: path.into(),
            operation_id: None,
            summary: None,
            description: None,
            tags: vec![],
            parameters: vec![],
            request_body: None,
            responses: vec![],
        }
    }

    fn spec() -> Specification {
        Specification {
            title: "Rewards API".into(),
            version: "1.0.0".into(),
            description: None,
            base_url: None,
            endpoints: vec![
                endpoint(HttpMethod::Get, "/members"),
                endpoint(HttpMethod::Post, "/members"),
                endpoint(HttpMethod::Get, "/rewards"),
            ],
        }
    }

    #[test]
    fn test_all_endpoints_succeed() {
        let client = RoutedClient::default();
        let sleeper = NoSleep::default();
        let generator =
            Generator::new(&client, GeneratorConfig::default()).with_sleeper(&sleeper);

        let result = generator.generate_full_docs(&spec()).unwrap();
        assert_eq!(result.api_title, "Rewards API");
        assert_eq!(result.api_version, "1.0.0");
        assert_eq!(result.docs.len(), 3);
        assert_eq!(result.total_tokens, 450);
        assert_eq!(result.model, DEFAULT_MODEL);
        // 300 * 3.00 + 150 * 15.00 per million
        assert!((result.total_cost_usd - 0.00315).abs() < 1e-12);

        let requests = client.requests.borrow();
        assert!(requests.iter().all(|r| r.system == SYSTEM_PROMPT));
        assert!(requests.iter().all(|r| r.max_tokens == DEFAULT_MAX_TOKENS));
    }

    #[test]
    fn test_partial_failure_skips_endpoint() {
        let client = RoutedClient::failing(
            "/members",
            ApiError::from_status(400, "prompt too long"),
        );
        let spec = Specification {
            endpoints: vec![
                endpoint(HttpMethod::Get, "/rewards"),
                endpoint(HttpMethod::Get, "/members"),
                endpoint(HttpMethod::Delete, "/rewards"),
            ],
            ..spec()
        };
        let generator = Generator::new(&client, GeneratorConfig::default())
            .with_sleeper(NoSleep::default());

        let result = generator.generate_full_docs(&spec).unwrap();
        let refs: Vec<&str> = result.docs.iter().map(|d| d.endpoint_ref.as_str()).collect();
        assert_eq!(refs, vec!["GET /rewards", "DELETE /rewards"]);
        assert_eq!(result.total_tokens, 300);
        assert_eq!(result.docs[0].tokens_used, 150);
    }

    #[test]
    fn test_exhausted_retries_skip_endpoint() {
        let client = RoutedClient::failing("/members", ApiError::from_status(500, "boom"));
        let sleeper = NoSleep::default();
        let spec = Specification {
            endpoints: vec![
                endpoint(HttpMethod::Get, "/rewards"),
                endpoint(HttpMethod::Get, "/members"),
                endpoint(HttpMethod::Put, "/rewards"),
            ],
            ..spec()
        };
        let generator =
            Generator::new(&client, GeneratorConfig::default()).with_sleeper(&sleeper);

        let result = generator.generate_full_docs(&spec).unwrap();
        assert_eq!(result.docs.len(), 2);
        assert_eq!(result.docs[1].endpoint_ref, "PUT /rewards");
        // 1 + 2 attempts + 1
        assert_eq!(client.requests.borrow().len(), 4);
        assert_eq!(*sleeper.0.borrow(), vec![Duration::from_secs(1)]);
    }

    #[test]
    fn test_authentication_aborts_batch() {
        let client =
            RoutedClient::failing("/members", ApiError::from_status(401, "invalid x-api-key"));
        let generator = Generator::new(&client, GeneratorConfig::default())
            .with_sleeper(NoSleep::default());

        let err = generator.generate_full_docs(&spec()).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(client.requests.borrow().len(), 1);
    }

    #[test]
    fn test_unknown_model_fails_after_batch() {
        let client = RoutedClient::default();
        let config = GeneratorConfig {
            model: "gpt-4-turbo".into(),
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(&client, config).with_sleeper(NoSleep::default());

        let err = generator.generate_full_docs(&spec()).unwrap_err();
        assert!(matches!(err, AppError::UnknownModel(_)));
    }

    #[test]
    fn test_custom_pricing() {
        let client = RoutedClient::default();
        let config = GeneratorConfig {
            model: "house-model".into(),
            stream: true,
            max_tokens: 256,
        };
        let generator = Generator::new(&client, config)
            .with_sleeper(NoSleep::default())
            .with_pricing(PricingTable::empty().with_model("house-model", ModelPricing::new(1.0, 1.0)));

        let result = generator.generate_full_docs(&spec()).unwrap();
        assert!((result.total_cost_usd - 0.00045).abs() < 1e-12);
        assert!(client.requests.borrow().iter().all(|r| r.stream && r.max_tokens == 256));
    }

    #[test]
    fn test_overview_is_not_streamed_and_propagates() {
        let client = RoutedClient::default();
        let config = GeneratorConfig {
            stream: true,
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(&client, config).with_sleeper(NoSleep::default());

        let overview = generator.generate_overview(&spec()).unwrap();
        assert_eq!(overview, "docs #1");
        let requests = client.requests.borrow();
        assert!(!requests[0].stream);
        assert!(requests[0].user.contains("**Title:** Rewards API"));
    }

    #[test]
    fn test_single_endpoint_failure_propagates() {
        let client = RoutedClient::failing("/members", ApiError::from_status(404, "nope"));
        let generator = Generator::new(&client, GeneratorConfig::default())
            .with_sleeper(NoSleep::default());

        let err = generator
            .generate_endpoint_doc(&endpoint(HttpMethod::Get, "/members"))
            .unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::Client { status: 404, .. })));

        let doc = generator
            .generate_endpoint_doc(&endpoint(HttpMethod::Get, "/rewards"))
            .unwrap();
        assert_eq!(doc.endpoint_ref, "GET /rewards");
        assert_eq!(doc.tokens_used, 150);
    }

    #[test]
    fn test_progress_label() {
        assert_eq!(progress_label(3, 12), "[3/12] Generating...");
        assert_eq!(progress_label(1, 1), "[1/1] Generating...");
    }
}
