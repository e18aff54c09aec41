//! Maps a failed probe's error message to an outcome.

use std::sync::LazyLock;

use regex::Regex;

use crate::outcome::Outcome;

/// Failure code a destination returns when it does not recognize the
/// payment hash. Every probe is built to end with this code.
pub const BENIGN_FAILURE_CODE: &str = "WIRE_INCORRECT_OR_UNKNOWN_PAYMENT_DETAILS";

static FAILURE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[A-Z_]+").expect("failure code pattern is valid"));

/// Extract the first failure code (a run of uppercase letters and
/// underscores) from an error message.
pub fn failure_code(message: &str) -> Option<&str> {
    FAILURE_CODE.find(message).map(|m| m.as_str())
}

/// Classify the error message of a failed probe.
pub fn classify(message: &str) -> Outcome {
    match failure_code(message) {
        None => Outcome::UNKNOWN_ERROR,
        Some(BENIGN_FAILURE_CODE) => Outcome::SUCCESS,
        Some(code) => Outcome::failure_code(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benign_code_is_success() {
        assert_eq!(classify("WIRE_INCORRECT_OR_UNKNOWN_PAYMENT_DETAILS"), Outcome::SUCCESS);
        assert_eq!(
            classify("failed: WIRE_INCORRECT_OR_UNKNOWN_PAYMENT_DETAILS (reply from remote)"),
            Outcome::SUCCESS
        );
    }

    #[test]
    fn test_message_without_code_is_unknown() {
        assert_eq!(classify(""), Outcome::UNKNOWN_ERROR);
        assert_eq!(classify("connection reset by peer"), Outcome::UNKNOWN_ERROR);
        assert_eq!(classify("error 204: 42"), Outcome::UNKNOWN_ERROR);
    }

    #[test]
    fn test_other_codes_become_their_own_outcome() {
        let outcome = classify("failed: WIRE_TEMPORARY_CHANNEL_FAILURE (reply from remote)");
        assert_eq!(outcome.as_str(), "WIRE_TEMPORARY_CHANNEL_FAILURE");

        assert_eq!(classify("TEMPORARY_CHANNEL_FAILURE").as_str(), "TEMPORARY_CHANNEL_FAILURE");
    }

    #[test]
    fn test_first_run_wins() {
        // A capitalized word is itself a run
        assert_eq!(classify("Failed with WIRE_EXPIRY_TOO_SOON").as_str(), "F");
        assert_eq!(failure_code("a WIRE_X then WIRE_Y"), Some("WIRE_X"));
        assert_eq!(failure_code("under_score"), Some("_"));
    }

    #[test]
    fn test_classification_is_pure() {
        let message = "failed: WIRE_UNKNOWN_NEXT_PEER";
        assert_eq!(classify(message), classify(message));
    }
}
