//! Timeout and retry policy around any [`ReasoningOracle`].

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use gradebook_core::config::OracleConfig;
use gradebook_core::errors::OracleError;

use super::ReasoningOracle;

/// Timeout and retry settings for oracle calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OraclePolicy {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Attempts after the first failure.
    pub max_retries: u32,
    /// Initial backoff (doubles each retry).
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
}

impl Default for OraclePolicy {
    fn default() -> Self {
        Self::from_config(&OracleConfig::default())
    }
}

impl OraclePolicy {
    pub fn from_config(config: &OracleConfig) -> Self {
        Self {
            timeout: config.effective_timeout(),
            max_retries: config.effective_max_retries(),
            initial_backoff: config.effective_backoff(),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// Wraps an oracle with a per-attempt timeout and bounded retries.
///
/// Each attempt runs on its own worker thread and the caller waits on a
/// channel with `recv_timeout`. The worker passes the same deadline to the
/// inner oracle, so a [`CommandOracle`](super::CommandOracle) kills its child
/// process; an oracle that cannot cancel is abandoned and its late answer is
/// dropped with the channel. After the last failed attempt the
/// final error is returned, and callers treat that as a failing verdict.
pub struct GuardedOracle {
    inner: Arc<dyn ReasoningOracle>,
    policy: OraclePolicy,
}

impl GuardedOracle {
    pub fn new(inner: Arc<dyn ReasoningOracle>, policy: OraclePolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &OraclePolicy {
        &self.policy
    }

    fn attempt(&self, prompt: &str) -> Result<String, OracleError> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let inner = Arc::clone(&self.inner);
        let prompt = prompt.to_string();
        let timeout = self.policy.timeout;

        std::thread::Builder::new()
            .name("gradebook-oracle".to_string())
            .spawn(move || {
                // Receiver is gone if the caller already timed out.
                let _ = tx.send(inner.complete_within(&prompt, timeout));
            })
            .map_err(|e| OracleError::Transport {
                message: format!("failed to spawn oracle worker: {e}"),
            })?;

        match rx.recv_timeout(self.policy.timeout) {
            Ok(answer) => answer,
            Err(RecvTimeoutError::Timeout) => Err(OracleError::Timeout {
                timeout_ms: self.policy.timeout.as_millis() as u64,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(OracleError::Transport {
                message: "oracle worker exited without answering".to_string(),
            }),
        }
    }
}

impl ReasoningOracle for GuardedOracle {
    fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let mut backoff = self.policy.initial_backoff;
        let mut last_err = OracleError::EmptyResponse;

        for attempt in 0..=self.policy.max_retries {
            if attempt > 0 {
                tracing::debug!(
                    "oracle: retry attempt {}/{} after {:?}",
                    attempt,
                    self.policy.max_retries,
                    backoff
                );
                std::thread::sleep(backoff);
                backoff = (backoff * 2).min(self.policy.max_backoff);
            }

            match self.attempt(prompt) {
                Ok(answer) => return Ok(answer),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "oracle attempt failed");
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    impl ReasoningOracle for Flaky {
        fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(OracleError::Transport {
                    message: format!("failure {n}"),
                })
            } else {
                Ok("YES".to_string())
            }
        }
    }

    struct Sleepy(Duration);

    impl ReasoningOracle for Sleepy {
        fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
            std::thread::sleep(self.0);
            Ok("YES".to_string())
        }
    }

    fn fast_policy(max_retries: u32, timeout: Duration) -> OraclePolicy {
        OraclePolicy {
            timeout,
            max_retries,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
        }
    }

    #[test]
    fn default_policy_matches_config_defaults() {
        let policy = OraclePolicy::default();
        assert_eq!(policy.timeout, Duration::from_secs(120));
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.initial_backoff, Duration::from_millis(500));
    }

    #[test]
    fn retries_until_success() {
        let inner = Arc::new(Flaky {
            failures: 1,
            calls: AtomicU32::new(0),
        });
        let oracle = GuardedOracle::new(inner.clone(), fast_policy(1, Duration::from_secs(5)));
        assert_eq!(oracle.complete("q").unwrap(), "YES");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn gives_up_after_max_retries() {
        let inner = Arc::new(Flaky {
            failures: 10,
            calls: AtomicU32::new(0),
        });
        let oracle = GuardedOracle::new(inner.clone(), fast_policy(2, Duration::from_secs(5)));
        let err = oracle.complete("q").unwrap_err();
        assert!(matches!(err, OracleError::Transport { .. }));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn slow_oracle_times_out() {
        let oracle = GuardedOracle::new(
            Arc::new(Sleepy(Duration::from_millis(500))),
            fast_policy(0, Duration::from_millis(20)),
        );
        let err = oracle.complete("q").unwrap_err();
        assert!(matches!(err, OracleError::Timeout { timeout_ms: 20 }));
    }

    #[cfg(unix)]
    #[test]
    fn timed_out_command_does_not_keep_running() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let command = crate::oracle::CommandOracle::new(format!(
            "cat >/dev/null; sleep 1; touch '{}'; echo YES",
            marker.display()
        ));
        let oracle = GuardedOracle::new(Arc::new(command), fast_policy(0, Duration::from_millis(100)));

        let err = oracle.complete("q").unwrap_err();
        assert!(matches!(err, OracleError::Timeout { timeout_ms: 100 }));

        std::thread::sleep(Duration::from_millis(1800));
        assert!(!marker.exists(), "timed-out oracle command must be stopped");
    }
}
