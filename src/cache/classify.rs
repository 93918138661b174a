//! Classification of fetch results.
//!
//! Structured status wins; the text heuristic only applies when a failure
//! carries no status at all, since some error paths drop it.

use std::fmt::Display;

/// HTTP status upstream uses to ask us to back off.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// A failure raised by a fetch operation.
pub trait UpstreamFailure: Display {
    /// HTTP status attached to the failure, when one is known.
    fn status_code(&self) -> Option<u16> {
        None
    }
}

impl UpstreamFailure for String {}

impl UpstreamFailure for &str {}

impl UpstreamFailure for reqwest::Error {
    fn status_code(&self) -> Option<u16> {
        self.status().map(|s| s.as_u16())
    }
}

/// Outcome of a single fetch attempt.
#[derive(Debug)]
pub enum FetchOutcome<V, E> {
    Success(V),
    RateLimited(E),
    OtherFailure(E),
}

impl<V, E: UpstreamFailure> FetchOutcome<V, E> {
    pub fn classify(result: Result<V, E>) -> Self {
        match result {
            Ok(value) => FetchOutcome::Success(value),
            Err(e) if is_rate_limited(&e) => FetchOutcome::RateLimited(e),
            Err(e) => FetchOutcome::OtherFailure(e),
        }
    }
}

/// True if the failure is upstream telling us to slow down.
pub fn is_rate_limited<E: UpstreamFailure + ?Sized>(failure: &E) -> bool {
    match failure.status_code() {
        Some(status) => status == TOO_MANY_REQUESTS,
        None => {
            let text = failure.to_string().to_lowercase();
            text.contains("429") || text.contains("too many requests")
        }
    }
}
