use serde::{Deserialize, Serialize};

/// The exact acknowledgement the request-intake collaborator returns on success.
pub const REQUEST_ACKNOWLEDGEMENT: &str = "Registered and notified";

/// A collaborator's business-level answer.
///
/// Built by the client from the raw response so callers match on a tag
/// instead of comparing response text themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    /// The collaborator accepted the call.
    Accepted(T),
    /// The collaborator answered but refused, or answered in an unexpected shape.
    Rejected(Rejection),
}

impl<T> Reply<T> {
    /// Returns `true` if this is an accepted reply.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Returns the accepted value, if any.
    pub fn accepted(self) -> Option<T> {
        match self {
            Self::Accepted(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    /// Returns the rejection, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Why a collaborator refused a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// HTTP status of the reply.
    pub status: u16,
    /// Message supplied by the collaborator, if it sent one.
    pub message: Option<String>,
}

impl Rejection {
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Build a rejection from a raw error body.
    ///
    /// Structured bodies carry their text in `message` or `error`; anything
    /// else leaves the message empty.
    pub fn from_body(status: u16, body: &str) -> Self {
        Self {
            status,
            message: text_field(body, &["message", "error"]),
        }
    }

    /// Like [`Rejection::from_body`], but only a `message` field counts.
    pub fn from_message(status: u16, body: &str) -> Self {
        Self {
            status,
            message: text_field(body, &["message"]),
        }
    }

    /// The collaborator's message, or `fallback` when none was supplied.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message.clone().unwrap_or_else(|| fallback.to_owned())
    }
}

/// First non-blank string under one of `keys` in a JSON object body.
pub(crate) fn text_field(body: &str, keys: &[&str]) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    keys.iter().find_map(|key| {
        value
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}

/// Proof that the request-intake collaborator registered a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement(String);

impl Acknowledgement {
    /// Accept `body` only if it is exactly [`REQUEST_ACKNOWLEDGEMENT`].
    pub fn parse(body: &str) -> Option<Self> {
        (body == REQUEST_ACKNOWLEDGEMENT).then(|| Self(body.to_owned()))
    }

    /// The acknowledgement the collaborator sends on success.
    pub fn standard() -> Self {
        Self(REQUEST_ACKNOWLEDGEMENT.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
