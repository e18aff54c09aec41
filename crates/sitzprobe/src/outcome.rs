//! Outcome symbols recorded for each probe cycle.
//!
//! The well-known symbols below are fixed. Any failure code the node reports
//! that is not the benign one becomes its own symbol at runtime, so an
//! [`Outcome`] wraps a string rather than being a closed enum.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Probe resolved the way a probe should (or, anomalously, really succeeded)
pub const SUCCESS: &str = "success";
/// None of the sampled channels was active
pub const NO_ACTIVE_CHANNEL_FOUND: &str = "no_active_channel_found";
/// The node could not list its channels
pub const CHANNELS_UNAVAILABLE: &str = "channels_unavailable";
/// The node found no route to the target
pub const NO_ROUTE_FOUND: &str = "no_route_found";
/// The node refused to submit the payment
pub const SENDPAY_CALL_FAILED: &str = "sendpay_call_failed";
/// Counted once at the start of every cycle
pub const RUNS_STARTED: &str = "runs_started";
/// The failure message carried no recognizable code
pub const UNKNOWN_ERROR: &str = "unknown_error";

/// A single classified result of a probe cycle
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outcome(Cow<'static, str>);

impl Outcome {
    pub const SUCCESS: Outcome = Outcome::known(SUCCESS);
    pub const NO_ACTIVE_CHANNEL_FOUND: Outcome = Outcome::known(NO_ACTIVE_CHANNEL_FOUND);
    pub const CHANNELS_UNAVAILABLE: Outcome = Outcome::known(CHANNELS_UNAVAILABLE);
    pub const NO_ROUTE_FOUND: Outcome = Outcome::known(NO_ROUTE_FOUND);
    pub const SENDPAY_CALL_FAILED: Outcome = Outcome::known(SENDPAY_CALL_FAILED);
    pub const RUNS_STARTED: Outcome = Outcome::known(RUNS_STARTED);
    pub const UNKNOWN_ERROR: Outcome = Outcome::known(UNKNOWN_ERROR);

    const fn known(symbol: &'static str) -> Self {
        Self(Cow::Borrowed(symbol))
    }

    /// Outcome named after a failure code reported by the node
    pub fn failure_code(code: impl Into<String>) -> Self {
        Self(Cow::Owned(code.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this outcome counts towards the failure total.
    ///
    /// Everything except `success` and `runs_started` is a failure, including
    /// codes first seen at runtime.
    pub fn is_failure(&self) -> bool {
        is_failure_symbol(self.as_str())
    }
}

pub(crate) fn is_failure_symbol(symbol: &str) -> bool {
    !matches!(symbol, SUCCESS | RUNS_STARTED)
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Outcome {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.0.into_owned()
    }
}
