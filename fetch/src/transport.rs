//! Shared HTTP transport settings for catalog and package fetches.
//!
//! Both network operations run on a blocking `ureq` agent. [`FetchOptions`]
//! carries the caller's deadline and cancellation signal so that neither
//! fetch can hang a caller indefinitely.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default timeout for a single request.
///
/// Bounds the whole catalog fetch, but only connection and response head
/// of a package download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A cooperative cancellation signal shared between a caller and a fetch.
///
/// Cloning the token shares the flag. Fetches check it before issuing a
/// request and between body chunks.
///
/// # Examples
///
/// ```
/// use envm_fetch::transport::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to every clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Return true once [`Self::cancel`] has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Deadline and cancellation settings for one network operation.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Request timeout; `None` waits indefinitely. See [`DEFAULT_TIMEOUT`]
    /// for what it bounds.
    pub timeout: Option<Duration>,
    /// Optional cancellation signal checked during the transfer.
    pub cancel: Option<CancellationToken>,
}

impl FetchOptions {
    /// Options with the given timeout and no cancellation token.
    #[must_use]
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            cancel: None,
        }
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn cancellable(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Return true when an attached token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::with_timeout(Some(DEFAULT_TIMEOUT))
    }
}

/// The server answered with a status other than 200 OK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("server answered with HTTP status {0}")]
pub struct UnexpectedStatus(pub u16);

/// Build the agent for the catalog fetch.
///
/// The listing is small, so the timeout bounds the whole exchange, body
/// included. Status codes are not turned into errors by the agent; callers
/// inspect the status and accept only 200.
pub(crate) fn http_agent(options: &FetchOptions) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(options.timeout)
        .http_status_as_error(false)
        .build();
    ureq::Agent::new_with_config(config)
}

/// Build the agent for package downloads.
///
/// The timeout bounds connecting and waiting for the response head only.
/// A body that keeps arriving is never cut off by the clock; callers stop
/// it through the cancellation token checked between chunks.
pub(crate) fn download_agent(options: &FetchOptions) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_connect(options.timeout)
        .timeout_recv_response(options.timeout)
        .http_status_as_error(false)
        .build();
    ureq::Agent::new_with_config(config)
}
