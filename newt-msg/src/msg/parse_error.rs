use core::fmt;

use super::opt::parse_error::OptParseError;

/// Errors encounterable while parsing a message from bytes
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord)]
pub enum MessageParseError {
  /// Reached end of stream before parsing was finished
  UnexpectedEndOfStream,

  /// Version bits were something other than 1
  InvalidVersion(u8),

  /// Token length was > 8
  InvalidTokenLength(u8),

  /// Error parsing option
  OptParseError(OptParseError),

  /// A payload marker was present but nothing followed it
  PayloadMarkerWithoutPayload,

  /// The message type is invalid (see [`crate::Type`] for information & valid values)
  InvalidType(u8),
}

impl MessageParseError {
  /// Shorthand for [`MessageParseError::UnexpectedEndOfStream`]
  pub fn eof() -> Self {
    Self::UnexpectedEndOfStream
  }
}

impl From<OptParseError> for MessageParseError {
  fn from(e: OptParseError) -> Self {
    Self::OptParseError(e)
  }
}

impl fmt::Display for MessageParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::UnexpectedEndOfStream => write!(f, "message ended unexpectedly"),
      | Self::InvalidVersion(v) => write!(f, "unsupported CoAP version {}", v),
      | Self::InvalidTokenLength(n) => write!(f, "token length {} exceeds 8", n),
      | Self::OptParseError(e) => write!(f, "malformed option: {}", e),
      | Self::PayloadMarkerWithoutPayload => write!(f, "payload marker with empty payload"),
      | Self::InvalidType(t) => write!(f, "invalid message type {}", t),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for MessageParseError {}
