//! User-facing notices and the classification of failed requests into
//! exactly one message.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Severity {
    Error,
    Info,
    Warning,
}

/// A single severity-tagged message for the notification surface (the app's
/// footer line).
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Notice {
    pub(crate) severity: Severity,
    pub(crate) text: String,
}

impl Notice {
    pub(crate) fn error<S: Into<String>>(text: S) -> Notice {
        Notice {
            severity: Severity::Error,
            text: text.into(),
        }
    }

    pub(crate) fn info<S: Into<String>>(text: S) -> Notice {
        Notice {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    pub(crate) fn warning<S: Into<String>>(text: S) -> Notice {
        Notice {
            severity: Severity::Warning,
            text: text.into(),
        }
    }
}

/// What the transport reported about a finished request.  No body parsing
/// happens here; the raw text is only ever echoed back to the user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ResponseMeta {
    pub(crate) status: u16,
    pub(crate) body: String,
}

/// Failure modes reported by the request layer alongside (or instead of) a
/// status code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RequestFailure {
    ParserError,
    Timeout,
    Abort,
}

pub(crate) const MSG_NOT_CONNECTED: &str = "Not connected. Verify the network connection.";
pub(crate) const MSG_NOT_FOUND: &str = "Requested resource not found (404).";
pub(crate) const MSG_PARSE_FAILED: &str = "Failed to parse the server response.";
pub(crate) const MSG_TIMEOUT: &str = "Request timed out.";
pub(crate) const MSG_ABORTED: &str = "Request was aborted.";

/// Classifies a failed request into exactly one notice.  First matching rule
/// wins; anything unrecognized surfaces the raw response body.
pub(crate) fn ajax_message(response: &ResponseMeta, failure: Option<RequestFailure>) -> Notice {
    if response.status == 0 {
        Notice::error(MSG_NOT_CONNECTED)
    } else if response.status == 404 {
        Notice::error(MSG_NOT_FOUND)
    } else if failure == Some(RequestFailure::ParserError) {
        Notice::error(MSG_PARSE_FAILED)
    } else if failure == Some(RequestFailure::Timeout) {
        Notice::error(MSG_TIMEOUT)
    } else if failure == Some(RequestFailure::Abort) {
        Notice::error(MSG_ABORTED)
    } else {
        Notice::error(response.body.clone())
    }
}
