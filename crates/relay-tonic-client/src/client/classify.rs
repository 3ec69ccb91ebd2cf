//! Retry classification and runner error parsing.

use relay_tonic_core::{Error, SERVER_BUSY_CODE, proto};

/// True when the error means "runner is overloaded, safe to retry the
/// identical call elsewhere".
///
/// The structured application code is checked first; failing that, the
/// transport status code. Both are compared against
/// [`SERVER_BUSY_CODE`] so runner-reported and transport-reported busy
/// signals are unified. Everything else classifies as not retryable.
pub fn is_too_busy(err: &Error) -> bool {
    if err.api_code() == Some(SERVER_BUSY_CODE) {
        return true;
    }
    if let Error::Transport(status) = err {
        return status.code() as i32 == SERVER_BUSY_CODE;
    }
    false
}

/// Build the terminal error carried by a failed completion message.
///
/// Returns `None` for successful completions. Failures marked
/// user-caused are wrapped distinctly so upstream logging can separate
/// function bugs from platform faults.
pub(crate) fn parse_finish_error(finished: &proto::CallFinished) -> Option<Error> {
    if finished.success {
        return None;
    }

    let code = finished.error_code;
    let message = if finished.error_str.is_empty() {
        "unknown error from runner".to_string()
    } else {
        finished.error_str.clone()
    };

    Some(if finished.error_user {
        Error::User { code, message }
    } else {
        Error::Api { code, message }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_sentinel_and_matching_codes_classify_as_busy() {
        assert!(is_too_busy(&Error::ServerBusy));
        assert!(is_too_busy(&Error::Api {
            code: SERVER_BUSY_CODE,
            message: "too busy".into()
        }));
        assert!(is_too_busy(&Error::User {
            code: SERVER_BUSY_CODE,
            message: "too busy".into()
        }));
    }

    #[test]
    fn nearby_codes_do_not_classify_as_busy() {
        for code in [500, 502, 504] {
            assert!(!is_too_busy(&Error::Api {
                code,
                message: "nope".into()
            }));
        }
        assert!(!is_too_busy(&Error::Transport(tonic::Status::unavailable(
            "connection refused"
        ))));
        assert!(!is_too_busy(&Error::Cancelled));
        assert!(!is_too_busy(&Error::RunnerClosed));
    }

    #[test]
    fn successful_finish_carries_no_error() {
        let finished = proto::CallFinished {
            success: true,
            ..Default::default()
        };
        assert!(parse_finish_error(&finished).is_none());
    }

    #[test]
    fn user_failures_are_wrapped_distinctly() {
        let finished = proto::CallFinished {
            success: false,
            error_code: 400,
            error_str: "bad input".into(),
            error_user: true,
            ..Default::default()
        };

        match parse_finish_error(&finished) {
            Some(Error::User { code, message }) => {
                assert_eq!(code, 400);
                assert_eq!(message, "bad input");
            }
            other => panic!("expected user error, got {other:?}"),
        }
    }

    #[test]
    fn empty_error_string_gets_a_fallback() {
        let finished = proto::CallFinished {
            success: false,
            error_code: 500,
            ..Default::default()
        };

        match parse_finish_error(&finished) {
            Some(Error::Api { code, message }) => {
                assert_eq!(code, 500);
                assert_eq!(message, "unknown error from runner");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }
}
