use core::fmt;

use newt_msg::{Id, MessageParseError, MessageToBytesError, Type};

use crate::retry::Attempts;

/// The context that an error occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
  /// We were serializing the request
  Encoding,
  /// We were handing the message with this id to the socket
  Sending(Id),
  /// We were waiting for a response to the message with this id
  Polling(Id),
}

impl When {
  /// Construct a specific error from the context the error occurred in
  pub fn what<E>(self, what: What<E>) -> Error<E> {
    Error { when: self, what }
  }
}

/// An error encounterable while exchanging a request
///
/// `E` is the error type of the [`crate::net::Socket`] in use.
#[derive(Debug, PartialEq)]
pub struct Error<E> {
  /// What happened?
  pub what: What<E>,
  /// What were we doing when it happened?
  pub when: When,
}

impl<E> Error<E> {
  /// Is this error `FromBytes`?
  pub fn message_parse_error(&self) -> Option<&MessageParseError> {
    match self.what {
      | What::FromBytes(ref e) => Some(e),
      | _ => None,
    }
  }

  /// Did the peer stay silent for the whole retry budget?
  pub fn is_no_response(&self) -> bool {
    matches!(self.what, What::NoResponse { .. })
  }
}

/// How a response failed to match the request it was read for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
  /// The response carried a different message id
  #[allow(missing_docs)]
  Id { expected: Id, actual: Id },
  /// The response had a type that cannot answer the request
  Type(Type),
}

/// A contextless error with some additional debug data attached.
#[derive(Debug, PartialEq)]
pub enum What<E> {
  /// Some socket operation (e.g. sending a datagram) failed
  SockError(E),
  /// Parsing a message from bytes failed
  FromBytes(MessageParseError),
  /// Serializing a message to bytes failed
  ToBytes(MessageToBytesError),
  /// The link is configured as down; nothing was sent
  TransportUnavailable,
  /// A confirmable message was sent every allowed time without a reply
  NoResponse {
    /// Total number of sends, including the first
    attempts: Attempts,
  },
  /// A datagram arrived that does not answer our request
  CorrelationMismatch(Mismatch),
  /// The clock failed to provide timing.
  ///
  /// See [`embedded_time::clock::Error`]
  ClockError,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.what {
      | What::SockError(e) => write!(f, "socket error: {:?}", e),
      | What::FromBytes(e) => write!(f, "malformed response: {}", e),
      | What::ToBytes(e) => write!(f, "could not encode request: {}", e),
      | What::TransportUnavailable => write!(f, "transport unavailable"),
      | What::NoResponse { attempts } => write!(f, "no response after {} attempts", attempts.0),
      | What::CorrelationMismatch(Mismatch::Id { expected, actual }) => {
        write!(f,
               "response id {:#06x} does not match request id {:#06x}",
               actual.0, expected.0)
      },
      | What::CorrelationMismatch(Mismatch::Type(ty)) => {
        write!(f, "response type {:?} does not match request", ty)
      },
      | What::ClockError => write!(f, "clock error"),
    }?;

    match self.when {
      | When::Sending(id) => write!(f, " (sending {:#06x})", id.0),
      | When::Polling(id) => write!(f, " (waiting on {:#06x})", id.0),
      | When::Encoding => Ok(()),
    }
  }
}

impl<E: fmt::Debug> std::error::Error for Error<E> {}
