//! The uniform result envelope returned by every gateway operation.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use super::document::{ManagementDocument, PropertyDocument};

/// Fixed status-code taxonomy carried by every [`Response`].
///
/// Serialized as its numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    /// The operation completed.
    Success,
    /// The operation was attempted and the engine reported an unsuccessful outcome.
    Failed,
    /// The query succeeded but matched nothing.
    NotFound,
    /// Caller input was malformed.
    BadRequest,
    /// Unexpected failure while processing.
    #[default]
    InternalError,
    /// The engine did not answer in time.
    Timeout,
    /// The engine could not be reached.
    ServiceUnavailable,
}

impl ErrorCode {
    /// Numeric wire value.
    pub fn as_u16(&self) -> u16 {
        match self {
            ErrorCode::Success => 1000,
            ErrorCode::Failed => 1001,
            ErrorCode::NotFound => 1002,
            ErrorCode::BadRequest => 1003,
            ErrorCode::InternalError => 1004,
            ErrorCode::Timeout => 1005,
            ErrorCode::ServiceUnavailable => 1006,
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::Failed => "Failed",
            ErrorCode::NotFound => "Not found",
            ErrorCode::BadRequest => "Bad request",
            ErrorCode::InternalError => "Something bad happened",
            ErrorCode::Timeout => "Timeout of service",
            ErrorCode::ServiceUnavailable => "Upstream service unavailable",
        }
    }

    /// The envelope state implied by this code.
    pub fn state(&self) -> State {
        match self {
            ErrorCode::Success => State::Success,
            _ => State::Failed,
        }
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1000 => Ok(ErrorCode::Success),
            1001 => Ok(ErrorCode::Failed),
            1002 => Ok(ErrorCode::NotFound),
            1003 => Ok(ErrorCode::BadRequest),
            1004 => Ok(ErrorCode::InternalError),
            1005 => Ok(ErrorCode::Timeout),
            1006 => Ok(ErrorCode::ServiceUnavailable),
            other => Err(other),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_u16())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u16::deserialize(deserializer)?;
        ErrorCode::try_from(value)
            .map_err(|v| de::Error::custom(format!("unknown error code {}", v)))
    }
}

/// Coarse outcome of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// Completed successfully.
    Success,
    /// Did not complete successfully.
    Failed,
    /// Accepted but not yet settled.
    Pending,
}

/// The envelope returned by every gateway operation.
///
/// `message` and `state` are always derived from `code`; build envelopes
/// through the constructors so the three never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    /// Status code.
    pub code: ErrorCode,
    /// Operation-specific payload; default-valued when the operation failed.
    pub payload: T,
    /// Description of `code`.
    pub message: String,
    /// Coarse state implied by `code`.
    pub state: State,
}

impl<T: Default> Response<T> {
    /// Builds an envelope with a default payload.
    pub fn with_code(code: ErrorCode) -> Self {
        Self::new(code, T::default())
    }

    /// Builds a successful envelope.
    pub fn success(payload: T) -> Self {
        Self::new(ErrorCode::Success, payload)
    }
}

impl<T> Response<T> {
    /// Builds an envelope with the given code and payload.
    pub fn new(code: ErrorCode, payload: T) -> Self {
        Self {
            code,
            payload,
            message: code.description().to_string(),
            state: code.state(),
        }
    }

    /// Replaces the code, keeping the payload.
    pub fn set_code(&mut self, code: ErrorCode) {
        self.code = code;
        self.message = code.description().to_string();
        self.state = code.state();
    }

    /// Returns true when `code` is [`ErrorCode::Success`].
    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success
    }
}

/// Payload of a single-document write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPayload {
    /// Identifier the engine stored the document under.
    pub id: String,
}

/// Payload of a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    /// Total property matches.
    pub property_count: u64,
    /// Total management matches.
    pub management_count: u64,
    /// Engine-reported execution time of the primary query.
    pub elapsed_time_millis: u64,
    /// Property hits on the requested page.
    pub properties: Vec<PropertyDocument>,
    /// Management hits on the requested page.
    pub managements: Vec<ManagementDocument>,
    /// Engine identifiers of `properties`, in the same order.
    #[serde(default)]
    pub property_ids: Vec<String>,
    /// Engine identifiers of `managements`, in the same order.
    #[serde(default)]
    pub management_ids: Vec<String>,
}
