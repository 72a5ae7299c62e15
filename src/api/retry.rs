//
//  sourcecraft-cli
//  api/retry.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Retry Policy and State Machine
//!
//! Every logical API call runs through [`run`], which drives an explicit
//! [`RetryState`] machine:
//!
//! ```text
//! Attempting(n) --classify/decide--> Succeeded | FailedTerminal | Waiting(n, delay)
//! Waiting(n, delay) --sleep--> Attempting(n + 1)
//! ```
//!
//! The decision of what to do with one attempt is split into two pure
//! functions so it can be tested without a network:
//!
//! - [`classify`] turns the raw result of an attempt into an [`Outcome`].
//! - [`decide`] turns an outcome plus the attempt index into a [`Step`].
//!
//! Waiting goes through the injected [`Sleeper`], so tests can record the
//! delays instead of sleeping.
//!
//! ## Policy
//!
//! | Outcome | Not final attempt | Final attempt |
//! |---------|-------------------|---------------|
//! | network failure | wait `base * 2^n` | `ApiError::Network` |
//! | HTTP 429 | wait `Retry-After` or `base * 2^n` | `ApiError::RateLimited` |
//! | other non-2xx | terminal | terminal |
//! | 2xx, non-JSON | terminal | terminal |
//! | 2xx JSON | success | success |

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use super::common::{snippet, ApiError, BoxError, BODY_SNIPPET_LEN};

/// Retry budget for one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff for the given 0-based attempt: `base * 2^attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }

    pub fn is_final(&self, attempt: u32) -> bool {
        attempt + 1 >= self.max_attempts
    }
}

/// Asynchronous wait used between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Everything the classifier needs from an HTTP response.
#[derive(Debug, Clone, Default)]
pub struct ResponseParts {
    pub status: u16,
    pub content_type: Option<String>,
    pub retry_after: Option<String>,
    pub body: Vec<u8>,
}

/// Raw result of a single attempt.
#[derive(Debug)]
pub enum Attempt {
    /// The request never produced a response.
    Failed(BoxError),
    /// A 2xx response arrived but its body could not be read.
    Unreadable(reqwest::Error),
    Responded(ResponseParts),
}

/// Classification of one attempt. Consumed immediately by [`decide`].
#[derive(Debug)]
pub enum Outcome {
    Success(Vec<u8>),
    RetryableNetwork(BoxError),
    RateLimited { retry_after: Option<Duration> },
    Terminal(ApiError),
    Malformed(ApiError),
}

/// Why the driver is about to wait.
#[derive(Debug)]
pub enum WaitReason {
    Network(BoxError),
    RateLimited { hinted: bool },
}

/// What the driver does next.
#[derive(Debug)]
pub enum Step {
    Done(Result<Vec<u8>, ApiError>),
    Wait { delay: Duration, reason: WaitReason },
}

/// States of one logical call.
#[derive(Debug)]
pub enum RetryState {
    Attempting(u32),
    Waiting { attempt: u32, delay: Duration },
    Succeeded(Vec<u8>),
    FailedTerminal(ApiError),
}

/// Parses a `Retry-After` value given in whole seconds.
///
/// HTTP-date values and anything else that is not a non-negative integer
/// return `None`, which makes the caller fall back to exponential backoff.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Maps the raw result of an attempt to an [`Outcome`].
pub fn classify(attempt: Attempt, path: &str) -> Outcome {
    let parts = match attempt {
        Attempt::Failed(source) => return Outcome::RetryableNetwork(source),
        Attempt::Unreadable(source) => {
            return Outcome::Terminal(ApiError::Body {
                path: path.to_string(),
                source,
            })
        }
        Attempt::Responded(parts) => parts,
    };

    if parts.status == 429 {
        return Outcome::RateLimited {
            retry_after: parts.retry_after.as_deref().and_then(parse_retry_after),
        };
    }

    if !(200..300).contains(&parts.status) {
        return Outcome::Terminal(ApiError::from_status(parts.status, &parts.body, path));
    }

    let content_type = parts.content_type.unwrap_or_default();
    if !content_type.starts_with("application/json") {
        return Outcome::Malformed(ApiError::UnexpectedContentType {
            content_type,
            path: path.to_string(),
            snippet: snippet(&parts.body, BODY_SNIPPET_LEN),
        });
    }

    Outcome::Success(parts.body)
}

/// Decides the next step for `outcome` observed on 0-based `attempt`.
pub fn decide(outcome: Outcome, attempt: u32, policy: &RetryPolicy) -> Step {
    let attempts = attempt + 1;
    match outcome {
        Outcome::Success(body) => Step::Done(Ok(body)),
        Outcome::Terminal(err) | Outcome::Malformed(err) => Step::Done(Err(err)),
        Outcome::RetryableNetwork(source) => {
            if policy.is_final(attempt) {
                Step::Done(Err(ApiError::Network { attempts, source }))
            } else {
                Step::Wait {
                    delay: policy.backoff(attempt),
                    reason: WaitReason::Network(source),
                }
            }
        }
        Outcome::RateLimited { retry_after } => {
            if policy.is_final(attempt) {
                Step::Done(Err(ApiError::RateLimited { attempts }))
            } else {
                Step::Wait {
                    delay: retry_after.unwrap_or_else(|| policy.backoff(attempt)),
                    reason: WaitReason::RateLimited {
                        hinted: retry_after.is_some(),
                    },
                }
            }
        }
    }
}

/// Runs one logical call under `policy`.
///
/// `perform` is invoked once per attempt with the 0-based attempt index and
/// must build a fresh request every time.
pub async fn run<F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    path: &str,
    mut perform: F,
) -> Result<Vec<u8>, ApiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Attempt>,
{
    let mut state = RetryState::Attempting(0);

    loop {
        state = match state {
            RetryState::Attempting(n) if n >= policy.max_attempts => {
                RetryState::FailedTerminal(ApiError::RetryExhausted { attempts: n })
            }
            RetryState::Attempting(n) => {
                tracing::debug!(
                    "Attempt {}/{} for {}",
                    n + 1,
                    policy.max_attempts,
                    path
                );
                let outcome = classify(perform(n).await, path);
                match decide(outcome, n, policy) {
                    Step::Done(Ok(body)) => RetryState::Succeeded(body),
                    Step::Done(Err(err)) => RetryState::FailedTerminal(err),
                    Step::Wait { delay, reason } => {
                        match &reason {
                            WaitReason::Network(source) => tracing::warn!(
                                "Request to {} failed ({}), retrying in {:?} (attempt {}/{})",
                                path,
                                source,
                                delay,
                                n + 1,
                                policy.max_attempts
                            ),
                            WaitReason::RateLimited { hinted } => tracing::warn!(
                                "Rate limited on {}, waiting {:?}{} (attempt {}/{})",
                                path,
                                delay,
                                if *hinted { " as requested by Retry-After" } else { "" },
                                n + 1,
                                policy.max_attempts
                            ),
                        }
                        RetryState::Waiting { attempt: n, delay }
                    }
                }
            }
            RetryState::Waiting { attempt, delay } => {
                sleeper.sleep(delay).await;
                RetryState::Attempting(attempt + 1)
            }
            RetryState::Succeeded(body) => return Ok(body),
            RetryState::FailedTerminal(err) => return Err(err),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSleeper {
        slept: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        fn delays(&self) -> Vec<Duration> {
            self.slept.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, delay: Duration) {
            self.slept.lock().unwrap().push(delay);
        }
    }

    fn json_ok(body: &str) -> Attempt {
        Attempt::Responded(ResponseParts {
            status: 200,
            content_type: Some("application/json; charset=utf-8".to_string()),
            retry_after: None,
            body: body.as_bytes().to_vec(),
        })
    }

    fn too_many(retry_after: Option<&str>) -> Attempt {
        Attempt::Responded(ResponseParts {
            status: 429,
            retry_after: retry_after.map(str::to_string),
            ..Default::default()
        })
    }

    fn refused() -> Attempt {
        Attempt::Failed("connection refused".into())
    }

    async fn drive(script: Vec<Attempt>, sleeper: &RecordingSleeper) -> (Result<Vec<u8>, ApiError>, u32) {
        let mut script = VecDeque::from(script);
        let mut calls = 0;
        let result = run(&RetryPolicy::default(), sleeper, "/test", |_| {
            calls += 1;
            let next = script.pop_front().unwrap();
            async move { next }
        })
        .await;
        (result, calls)
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = RetryPolicy {
            max_attempts: 100,
            base_delay: Duration::MAX,
        };
        assert_eq!(policy.backoff(40), Duration::MAX);
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("5"), Some(Duration::from_secs(5)));
        assert_eq!(parse_retry_after(" 0 "), Some(Duration::ZERO));
        assert_eq!(parse_retry_after("-1"), None);
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
        assert_eq!(parse_retry_after(""), None);
    }

    #[test]
    fn test_classify_rejects_html_success() {
        let attempt = Attempt::Responded(ResponseParts {
            status: 200,
            content_type: Some("text/html".to_string()),
            retry_after: None,
            body: b"<html>login</html>".to_vec(),
        });
        match classify(attempt, "/p") {
            Outcome::Malformed(ApiError::UnexpectedContentType {
                content_type,
                snippet,
                ..
            }) => {
                assert_eq!(content_type, "text/html");
                assert_eq!(snippet, "<html>login</html>");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_classify_missing_content_type_is_malformed() {
        let attempt = Attempt::Responded(ResponseParts {
            status: 204,
            ..Default::default()
        });
        assert!(matches!(classify(attempt, "/p"), Outcome::Malformed(_)));
    }

    #[test]
    fn test_decide_network_final_attempt_is_terminal() {
        let policy = RetryPolicy::default();
        let step = decide(Outcome::RetryableNetwork("reset".into()), 2, &policy);
        match step {
            Step::Done(Err(ApiError::Network { attempts, .. })) => assert_eq!(attempts, 3),
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_decide_rate_limit_prefers_hint() {
        let policy = RetryPolicy::default();
        let step = decide(
            Outcome::RateLimited {
                retry_after: Some(Duration::from_secs(7)),
            },
            1,
            &policy,
        );
        assert!(matches!(step, Step::Wait { delay, .. } if delay == Duration::from_secs(7)));

        let step = decide(Outcome::RateLimited { retry_after: None }, 1, &policy);
        assert!(matches!(step, Step::Wait { delay, .. } if delay == Duration::from_secs(2)));
    }

    #[test]
    fn test_decide_terminal_is_never_retried() {
        let policy = RetryPolicy::default();
        let step = decide(
            Outcome::Terminal(ApiError::from_status(500, b"", "/x")),
            0,
            &policy,
        );
        assert!(matches!(step, Step::Done(Err(ApiError::Http { status: 500, .. }))));
    }

    #[tokio::test]
    async fn test_two_network_failures_then_success() {
        let sleeper = RecordingSleeper::default();
        let (result, calls) = drive(vec![refused(), refused(), json_ok("{}")], &sleeper).await;

        assert_eq!(result.unwrap(), b"{}".to_vec());
        assert_eq!(calls, 3);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_three_network_failures_stop_without_final_sleep() {
        let sleeper = RecordingSleeper::default();
        let (result, calls) = drive(vec![refused(), refused(), refused()], &sleeper).await;

        assert!(matches!(result, Err(ApiError::Network { attempts: 3, .. })));
        assert_eq!(calls, 3);
        assert_eq!(sleeper.delays().len(), 2);
    }

    #[tokio::test]
    async fn test_rate_limit_then_success_uses_hint() {
        let sleeper = RecordingSleeper::default();
        let (result, calls) = drive(vec![too_many(Some("5")), json_ok("[]")], &sleeper).await;

        assert_eq!(result.unwrap(), b"[]".to_vec());
        assert_eq!(calls, 2);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(5)]);
    }

    #[tokio::test]
    async fn test_mixed_failures_share_one_budget() {
        let sleeper = RecordingSleeper::default();
        let (result, calls) = drive(vec![refused(), too_many(None), refused()], &sleeper).await;

        assert!(matches!(result, Err(ApiError::Network { attempts: 3, .. })));
        assert_eq!(calls, 3);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_zero_attempt_policy_exhausts() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        let result = run(&policy, &sleeper, "/x", |_| async { refused() }).await;
        assert!(matches!(result, Err(ApiError::RetryExhausted { attempts: 0 })));
    }
}
