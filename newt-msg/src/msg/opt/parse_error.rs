use core::fmt;

/// Errors encounterable while parsing an option from bytes
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord)]
pub enum OptParseError {
  /// Reached end of stream while reading an extension byte or value
  UnexpectedEndOfStream,

  /// Option Delta was set to 15 in a byte that was not the payload marker.
  OptionDeltaReservedValue,

  /// Value Length was set to 15 in a byte that was not the payload marker.
  ValueLengthReservedValue,

  /// Accumulated option number exceeded 65535
  OptionNumberOverflow,
}

impl OptParseError {
  /// Shorthand for [`OptParseError::UnexpectedEndOfStream`]
  pub fn eof() -> Self {
    Self::UnexpectedEndOfStream
  }
}

impl fmt::Display for OptParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::UnexpectedEndOfStream => write!(f, "option ended unexpectedly"),
      | Self::OptionDeltaReservedValue => write!(f, "option delta uses reserved value 15"),
      | Self::ValueLengthReservedValue => write!(f, "option length uses reserved value 15"),
      | Self::OptionNumberOverflow => write!(f, "option number exceeds 65535"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for OptParseError {}
