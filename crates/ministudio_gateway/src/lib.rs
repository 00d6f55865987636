//! Provider gateway for the MiniStudio orchestrator.
//!
//! The gateway owns the registered [`VideoProvider`](ministudio_interface::VideoProvider)s
//! and turns one compiled request into one [`GenerationResult`](ministudio_core::GenerationResult):
//!
//! - providers are tried in priority order, ties broken by registration order
//! - transient failures are retried on the same provider with exponential backoff
//! - permanent failures fall through to the next provider immediately
//! - each request is fitted to the provider's declared duration and aspect ratio
//!
//! A gateway never raises a provider failure to its caller. When every provider
//! fails, the result carries one [`ProviderAttempt`](ministudio_core::ProviderAttempt)
//! per provider tried.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gateway;
mod registry;
mod retry;

pub use gateway::ProviderGateway;
pub use registry::ProviderInfo;
pub use retry::RetryConfig;
