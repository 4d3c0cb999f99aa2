use super::MessageParseError;

/// Indicates if this message is of
/// type Confirmable (0), Non-confirmable (1), Acknowledgement (2), or Reset (3).
///
/// See [RFC7252 - Message Details](https://datatracker.ietf.org/doc/html/rfc7252#section-3) for context
#[derive(Copy, Clone, Hash, Eq, Ord, PartialEq, PartialOrd, Debug)]
pub enum Type {
  /// Confirmable; the receiver must acknowledge it and the sender
  /// retransmits until it does.
  Con,
  /// Non-confirmable; fire and forget.
  Non,
  /// Acknowledges a specific Confirmable message, optionally carrying
  /// a piggybacked response.
  Ack,
  /// The receiver got the message but lacks the context to process it.
  Reset,
}

impl Type {
  /// The type a response to a request of this type is expected to have.
  ///
  /// ```
  /// use newt_msg::Type;
  ///
  /// assert_eq!(Type::Con.expected_response(), Type::Ack);
  /// assert_eq!(Type::Non.expected_response(), Type::Non);
  /// ```
  pub fn expected_response(&self) -> Type {
    match self {
      | Type::Con => Type::Ack,
      | other => *other,
    }
  }
}

impl TryFrom<u8> for Type {
  type Error = MessageParseError;

  fn try_from(b: u8) -> Result<Self, Self::Error> {
    match b {
      | 0 => Ok(Type::Con),
      | 1 => Ok(Type::Non),
      | 2 => Ok(Type::Ack),
      | 3 => Ok(Type::Reset),
      | _ => Err(MessageParseError::InvalidType(b)),
    }
  }
}

impl From<Type> for u8 {
  fn from(t: Type) -> u8 {
    match t {
      | Type::Con => 0,
      | Type::Non => 1,
      | Type::Ack => 2,
      | Type::Reset => 3,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wire_values() {
    for n in 0..4u8 {
      assert_eq!(u8::from(Type::try_from(n).unwrap()), n);
    }
    assert_eq!(Type::try_from(4), Err(MessageParseError::InvalidType(4)));
  }
}
