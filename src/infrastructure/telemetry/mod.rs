//! Remote log telemetry.
//!
//! Events are validated against a fixed taxonomy, echoed through `tracing`,
//! and posted to a collector in the background with a bounded number of
//! fixed-interval retries. Delivery problems never reach the caller.
//!
//! # Modules
//!
//! - [`event`] - [`TelemetryEvent`], [`Stack`], [`LogLevel`] and the wire format
//! - [`client`] - [`TelemetryClient`] and its [`RetryPolicy`]
//! - [`transport`] - [`Transport`] trait and the `reqwest` implementation
//! - [`delay`] - [`Delay`] primitive used between attempts

pub mod client;
pub mod delay;
pub mod event;
pub mod transport;

pub use client::{
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY, DeliveryOutcome, RetryPolicy, TelemetryClient,
};
pub use delay::{Delay, TokioDelay};
pub use event::{LogLevel, Stack, TaxonomyError, TelemetryEvent};
pub use transport::{CollectorAck, HttpTransport, Transport, TransportError};
