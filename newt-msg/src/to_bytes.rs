use core::fmt;

use std_alloc::vec::Vec;
use tinyvec::ArrayVec;

use crate::msg::opt::with_deltas;
use crate::msg::{Byte1, Message, PAYLOAD_MARKER};

/// Largest value representable by a delta or length field
/// (two extension bytes, offset by 269).
const MAX_EXTENDED: usize = u16::MAX as usize + 269;

/// A growable byte collection a message can be serialized into
pub trait Buffer: Default + Extend<u8> + AsRef<[u8]> {
  /// Create an empty buffer with room for at least `n` bytes
  fn reserve(n: usize) -> Self;

  /// The most bytes this buffer can ever hold, if bounded
  fn capacity_limit() -> Option<usize>;
}

impl Buffer for Vec<u8> {
  fn reserve(n: usize) -> Self {
    Vec::with_capacity(n)
  }

  fn capacity_limit() -> Option<usize> {
    None
  }
}

impl<const N: usize> Buffer for ArrayVec<[u8; N]> where [u8; N]: tinyvec::Array<Item = u8>
{
  fn reserve(_: usize) -> Self {
    ArrayVec::default()
  }

  fn capacity_limit() -> Option<usize> {
    Some(N)
  }
}

/// Trait allowing fallible conversion into bytes
pub trait TryIntoBytes {
  /// Error yielded when the conversion fails
  type Error;

  /// Try to convert into a collection of bytes
  ///
  /// ```
  /// use newt_msg::{Code, Id, Message, MessageToBytesError, Payload, Token, TryIntoBytes, Type};
  /// use tinyvec::ArrayVec;
  ///
  /// let mut msg = Message::new(Type::Con, Code::POST, Id(0), Token::default());
  /// msg.payload = Payload(vec![0; 32]);
  ///
  /// let bytes: Vec<u8> = msg.try_into_bytes().unwrap();
  /// assert_eq!(bytes.len(), 4 + 1 + 32);
  ///
  /// let too_small = msg.try_into_bytes::<ArrayVec<[u8; 16]>>();
  /// assert_eq!(too_small,
  ///            Err(MessageToBytesError::TooLong { capacity: 16,
  ///                                               size: 37 }));
  /// ```
  fn try_into_bytes<B: Buffer>(&self) -> Result<B, Self::Error>;
}

/// Errors encounterable serializing to bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageToBytesError {
  /// Reserved capacity was not enough for size of message
  #[allow(missing_docs)]
  TooLong { capacity: usize, size: usize },

  /// A token was built from more than 8 bytes
  TokenTooLong(usize),

  /// An option value was longer than the length field can express
  OptionValueTooLong(usize),

  /// The gap between two option numbers was larger than the delta field can express
  OptionDeltaTooLarge,
}

impl fmt::Display for MessageToBytesError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::TooLong { capacity, size } => {
        write!(f, "message of {} bytes does not fit in {} bytes", size, capacity)
      },
      | Self::TokenTooLong(n) => write!(f, "token of {} bytes exceeds 8", n),
      | Self::OptionValueTooLong(n) => write!(f, "option value of {} bytes is too long", n),
      | Self::OptionDeltaTooLarge => write!(f, "option delta is too large"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for MessageToBytesError {}

/// Split a delta or length into its 4-bit field and extension bytes.
///
/// `None` if the value is too large for the extended encoding.
pub(crate) fn opt_len_or_delta(val: usize) -> Option<(u8, ArrayVec<[u8; 2]>)> {
  let mut ext = ArrayVec::new();
  match val {
    | n if n > MAX_EXTENDED => None,
    | n if n >= 269 => {
      ext.extend(((n - 269) as u16).to_be_bytes());
      Some((14, ext))
    },
    | n if n >= 13 => {
      ext.push((n - 13) as u8);
      Some((13, ext))
    },
    | n => Some((n as u8, ext)),
  }
}

impl Message {
  /// Number of bytes this message occupies when serialized
  pub fn get_size(&self) -> usize {
    let header_size = 4;
    let opts_size: usize = with_deltas(&self.opts).map(|o| o.get_size()).sum();
    let payload_size = match self.payload.0.len() {
      | 0 => 0,
      | n => 1 + n,
    };

    header_size + self.token.len() + opts_size + payload_size
  }
}

impl From<crate::Id> for [u8; 2] {
  fn from(id: crate::Id) -> [u8; 2] {
    id.0.to_be_bytes()
  }
}

impl TryIntoBytes for Message {
  type Error = MessageToBytesError;

  fn try_into_bytes<B: Buffer>(&self) -> Result<B, Self::Error> {
    let size: usize = self.get_size();

    if let Some(max) = B::capacity_limit() {
      if max < size {
        return Err(Self::Error::TooLong { capacity: max,
                                          size });
      }
    }

    let mut bytes = B::reserve(size);

    let byte1: u8 = Byte1 { tkl: self.token.len() as u8,
                            ver: self.ver,
                            ty: self.ty }.into();
    let code: u8 = self.code.into();
    let id: [u8; 2] = self.id.into();

    bytes.extend(Some(byte1));
    bytes.extend(Some(code));
    bytes.extend(id);
    bytes.extend(self.token.as_bytes().iter().copied());

    for opt in with_deltas(&self.opts) {
      opt.extend_bytes(&mut bytes)?;
    }

    if !self.payload.0.is_empty() {
      bytes.extend(Some(PAYLOAD_MARKER));
      bytes.extend(self.payload.0.iter().copied());
    }

    Ok(bytes)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::*;
  use crate::{assert_eqb, assert_eqb_iter};

  #[test]
  fn msg() {
    let (msg, expected) = test_msg();
    assert_eq!(msg.get_size(), expected.len());
    let actual: Vec<u8> = msg.try_into_bytes().unwrap();
    assert_eqb_iter!(actual, expected);
  }

  #[test]
  fn byte_1() {
    let byte = Byte1 { ver: Version(1),
                       ty: Type::Ack,
                       tkl: 3 };
    let actual: u8 = byte.into();
    let expected = 0b_01_10_0011u8;
    assert_eqb!(actual, expected)
  }

  #[test]
  fn id() {
    let id = Id(16);
    let actual = u16::from_be_bytes(id.into());
    assert_eqb!(actual, 16)
  }

  #[test]
  fn no_payload_marker() {
    let msg = Message::new(Type::Ack, Code::CONTENT, Id(0), Token::default());
    let bytes = msg.try_into_bytes::<Vec<_>>().unwrap();
    assert_eq!(bytes, vec![0b_01_10_0000, 0b_010_00101, 0, 0]);
  }

  #[test]
  fn options_sorted_on_wire() {
    let mut msg = Message::new(Type::Con, Code::POST, Id(1), Token::default());
    msg.add(known::no::URI_QUERY, OptValue::from("a"));
    msg.add(known::no::URI_HOST, OptValue::from("h"));
    msg.add(known::no::CONTENT_FORMAT, OptValue::uint(50));
    msg.add(known::no::URI_PATH, OptValue::from("p"));

    let bytes = msg.try_into_bytes::<Vec<_>>().unwrap();
    assert_eqb_iter!(&bytes[4..],
                     [0b0011_0001u8, b'h', 0b1000_0001, b'p', 0b0001_0001, 50, 0b0011_0001, b'a']);
  }

  #[test]
  fn value_too_long() {
    let mut msg = Message::new(Type::Con, Code::POST, Id(1), Token::default());
    msg.add(OptNumber(1), OptValue(vec![0; MAX_EXTENDED + 1]));
    assert_eq!(msg.try_into_bytes::<Vec<_>>(),
               Err(MessageToBytesError::OptionValueTooLong(MAX_EXTENDED + 1)));
  }

  #[test]
  fn fits_exactly() {
    let mut msg = Message::new(Type::Non, Code::POST, Id(9), Token::default());
    msg.payload = Payload(vec![1; 11]);
    let bytes = msg.try_into_bytes::<ArrayVec<[u8; 16]>>().unwrap();
    assert_eq!(bytes.len(), 16);
  }
}
