use super::MessageParseError;
use crate::from_bytes::TryConsumeBytes;
use crate::Cursor;

/// # Message ID
///
/// 16-bit unsigned integer in network byte order, used to match
/// a response to the request it answers.
///
/// Ids are allocated by the sender; see [`Id::next`].
#[derive(Copy, Clone, Hash, PartialEq, PartialOrd, Debug, Eq, Ord, Default)]
pub struct Id(pub u16);

impl Id {
  /// Create an Id from a big-endian 2-byte unsigned int
  pub fn from_be_bytes(bs: [u8; 2]) -> Self {
    Self(u16::from_be_bytes(bs))
  }

  /// The id following this one, wrapping from `u16::MAX` to `0`
  ///
  /// ```
  /// use newt_msg::Id;
  ///
  /// assert_eq!(Id(1).next(), Id(2));
  /// assert_eq!(Id(u16::MAX).next(), Id(0));
  /// ```
  pub fn next(&self) -> Id {
    Id(self.0.wrapping_add(1))
  }
}

impl<Bytes: AsRef<[u8]>> TryConsumeBytes<Bytes> for Id {
  type Error = MessageParseError;

  fn try_consume_bytes(bytes: &mut Cursor<Bytes>) -> Result<Self, Self::Error> {
    match bytes.take_exact(2) {
      | Some(&[a, b]) => Ok(Id::from_be_bytes([a, b])),
      | _ => Err(MessageParseError::eof()),
    }
  }
}
