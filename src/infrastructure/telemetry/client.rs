//! Fire-and-forget telemetry client with bounded retry.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_retry::strategy::FixedInterval;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use super::delay::{Delay, TokioDelay};
use super::event::{LogLevel, Stack, TaxonomyError, TelemetryEvent};
use super::transport::{HttpTransport, Transport, TransportError};
use crate::config::TelemetryConfig;
use crate::utils::validation::is_known_category;

/// Attempts made for one event unless configured otherwise.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Wait between attempts unless configured otherwise.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

const DELIVERIES_METRIC: &str = "quicklink_telemetry_deliveries_total";

/// How often and how far apart an event is re-sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    interval: Duration,
}

impl RetryPolicy {
    /// Creates a policy; at least one attempt is always made.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits to apply after each failed attempt but the last.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> {
        FixedInterval::new(self.interval).take(self.max_attempts as usize - 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

/// Final state of one event's attempt chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The collector accepted the event on attempt `attempts`.
    Delivered {
        attempts: u32,
        log_id: Option<String>,
    },
    /// Every attempt failed; the event was dropped.
    Exhausted { attempts: u32 },
    /// No collector is configured.
    Disabled,
}

/// Best-effort reporter of [`TelemetryEvent`]s.
///
/// Cloning is cheap and clones share the credential and the set of in-flight
/// deliveries. Nothing here ever returns an error to the caller: invalid
/// events and failed deliveries end as local `tracing` diagnostics.
#[derive(Clone)]
pub struct TelemetryClient {
    transport: Option<Arc<dyn Transport>>,
    token: Arc<watch::Sender<Option<String>>>,
    policy: RetryPolicy,
    delay: Arc<dyn Delay>,
    tracker: TaskTracker,
}

impl TelemetryClient {
    /// Creates a client delivering through `transport`.
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self::build(Some(transport), policy)
    }

    /// Creates a client that only echoes events locally.
    pub fn disabled() -> Self {
        Self::build(None, RetryPolicy::default())
    }

    /// Creates a client from configuration.
    ///
    /// Remote delivery is enabled only when a collector URL is configured.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &TelemetryConfig) -> Result<Self, TransportError> {
        let policy = RetryPolicy::new(
            config.retry_attempts,
            Duration::from_millis(config.retry_delay_ms),
        );

        let client = match &config.collector_url {
            Some(url) => {
                let transport =
                    HttpTransport::new(url, Duration::from_secs(config.request_timeout_secs))?;
                Self::new(Arc::new(transport), policy)
            }
            None => Self::build(None, policy),
        };

        if let Some(token) = &config.token {
            client.set_token(token.clone());
        }

        Ok(client)
    }

    fn build(transport: Option<Arc<dyn Transport>>, policy: RetryPolicy) -> Self {
        let (token, _) = watch::channel(None);
        Self {
            transport,
            token: Arc::new(token),
            policy,
            delay: Arc::new(TokioDelay),
            tracker: TaskTracker::new(),
        }
    }

    /// Replaces the wait primitive used between attempts.
    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Replaces the bearer credential for every later [`Self::send`].
    ///
    /// Attempt chains already started keep the token they were started with.
    pub fn set_token(&self, token: impl Into<String>) {
        self.token.send_replace(Some(token.into()));
        debug!(target: "telemetry", "Authentication token updated");
    }

    /// The credential the next event will be sent with.
    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    /// Reports an event given as raw taxonomy strings.
    ///
    /// Unknown stacks, levels or packages drop the event with a diagnostic.
    pub fn log(&self, stack: &str, level: &str, package: &str, message: impl Into<String>) {
        let parsed = stack
            .parse::<Stack>()
            .and_then(|stack| level.parse::<LogLevel>().map(|level| (stack, level)));

        match parsed {
            Ok((stack, level)) => self.send(TelemetryEvent::new(stack, level, package, message)),
            Err(e) => {
                error!(target: "telemetry", "{e}");
                metrics::counter!(DELIVERIES_METRIC, "outcome" => "invalid").increment(1);
            }
        }
    }

    pub fn debug(&self, stack: Stack, package: &str, message: impl Into<String>) {
        self.send(TelemetryEvent::new(stack, LogLevel::Debug, package, message));
    }

    pub fn info(&self, stack: Stack, package: &str, message: impl Into<String>) {
        self.send(TelemetryEvent::new(stack, LogLevel::Info, package, message));
    }

    pub fn warn(&self, stack: Stack, package: &str, message: impl Into<String>) {
        self.send(TelemetryEvent::new(stack, LogLevel::Warn, package, message));
    }

    pub fn error(&self, stack: Stack, package: &str, message: impl Into<String>) {
        self.send(TelemetryEvent::new(stack, LogLevel::Error, package, message));
    }

    pub fn fatal(&self, stack: Stack, package: &str, message: impl Into<String>) {
        self.send(TelemetryEvent::new(stack, LogLevel::Fatal, package, message));
    }

    /// Validates, echoes and schedules delivery of `event`.
    ///
    /// Returns immediately. The attempt chain runs on the current tokio
    /// runtime; without one the event is only echoed locally.
    pub fn send(&self, event: TelemetryEvent) {
        if !is_known_category(event.stack.as_str(), &event.package) {
            let err = TaxonomyError::UnknownPackage {
                stack: event.stack,
                package: event.package,
            };
            error!(target: "telemetry", "{err}");
            metrics::counter!(DELIVERIES_METRIC, "outcome" => "invalid").increment(1);
            return;
        }

        echo_locally(&event);

        let Some(transport) = self.transport.clone() else {
            return;
        };

        let Ok(runtime) = Handle::try_current() else {
            warn!(target: "telemetry", "No async runtime; event not sent to collector");
            return;
        };

        let token = self.token();
        let delay = self.delay.clone();
        let policy = self.policy;

        self.tracker.spawn_on(
            async move {
                deliver_with_retry(transport.as_ref(), delay.as_ref(), policy, token, &event).await
            },
            &runtime,
        );
    }

    /// Runs the full attempt chain for `event` and waits for its outcome.
    ///
    /// Unlike [`Self::send`] this does not validate or echo the event.
    pub async fn deliver(&self, event: &TelemetryEvent) -> DeliveryOutcome {
        match &self.transport {
            Some(transport) => {
                deliver_with_retry(
                    transport.as_ref(),
                    self.delay.as_ref(),
                    self.policy,
                    self.token(),
                    event,
                )
                .await
            }
            None => DeliveryOutcome::Disabled,
        }
    }

    /// Waits until every attempt chain started so far has finished.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

/// `Pending(n) -> Delivered | Pending(n + 1) | Exhausted`, with the same
/// payload and token on every attempt.
async fn deliver_with_retry(
    transport: &dyn Transport,
    delay: &dyn Delay,
    policy: RetryPolicy,
    token: Option<String>,
    event: &TelemetryEvent,
) -> DeliveryOutcome {
    let max_attempts = policy.max_attempts();
    let mut schedule = policy.schedule();
    let mut attempt = 1;

    loop {
        match transport.post(event, token.clone()).await {
            Ok(ack) => {
                info!(
                    target: "telemetry",
                    attempt,
                    log_id = ack.log_id.as_deref().unwrap_or("-"),
                    "Log sent successfully"
                );
                metrics::counter!(DELIVERIES_METRIC, "outcome" => "delivered").increment(1);
                return DeliveryOutcome::Delivered {
                    attempts: attempt,
                    log_id: ack.log_id,
                };
            }
            Err(e) => {
                warn!(
                    target: "telemetry",
                    attempt,
                    max_attempts,
                    error = %e,
                    "Logging failed"
                );

                match schedule.next() {
                    Some(wait) => {
                        debug!(target: "telemetry", "Retrying in {}ms", wait.as_millis());
                        delay.wait(wait).await;
                        attempt += 1;
                    }
                    None => {
                        error!(
                            target: "telemetry",
                            "Failed to send log after {attempt} attempts"
                        );
                        metrics::counter!(DELIVERIES_METRIC, "outcome" => "exhausted")
                            .increment(1);
                        return DeliveryOutcome::Exhausted { attempts: attempt };
                    }
                }
            }
        }
    }
}

fn echo_locally(event: &TelemetryEvent) {
    let stack = event.stack;
    let package = event.package.as_str();
    let message = event.message.as_str();

    match event.level {
        LogLevel::Debug => debug!(target: "telemetry", %stack, package, "{message}"),
        LogLevel::Info => info!(target: "telemetry", %stack, package, "{message}"),
        LogLevel::Warn => warn!(target: "telemetry", %stack, package, "{message}"),
        LogLevel::Error => error!(target: "telemetry", %stack, package, "{message}"),
        LogLevel::Fatal => error!(target: "telemetry", %stack, package, fatal = true, "{message}"),
    }
}
