use std_alloc::collections::BTreeMap;
use std_alloc::vec::Vec;

use crate::msg::PAYLOAD_MARKER;
use crate::to_bytes::{opt_len_or_delta, MessageToBytesError};
use crate::Cursor;

/// Well-known option numbers and values
pub mod known;

/// Option parsing errors
pub mod parse_error;

pub use parse_error::*;

/// Options of a message, keyed by number.
///
/// A `BTreeMap` iterates in ascending key order, which is exactly the
/// order options must appear in on the wire. Repeated options are
/// stored as multiple values under one number.
pub type OptionMap = BTreeMap<OptNumber, Vec<OptValue>>;

/// The absolute number of an option (e.g. 11 for Uri-Path)
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct OptNumber(pub u16);

/// Difference between an option's number and the one before it.
///
/// This is what actually goes on the wire; see [`OptNumber`].
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct OptDelta(pub u16);

/// The value of an option
///
/// Opaque bytes; see [`OptValue::uint`] and [`OptValue::as_uint`]
/// for the unsigned-integer option format.
#[derive(Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct OptValue(pub Vec<u8>);

impl OptValue {
  /// Encode an unsigned integer in as few bytes as possible.
  ///
  /// Widths are 0, 1, 2 or 4 bytes big-endian; zero is the empty value.
  ///
  /// ```
  /// use newt_msg::OptValue;
  ///
  /// assert_eq!(OptValue::uint(0).0, Vec::<u8>::new());
  /// assert_eq!(OptValue::uint(50).0, vec![50]);
  /// assert_eq!(OptValue::uint(300).0, vec![1, 44]);
  /// assert_eq!(OptValue::uint(70_000).0, vec![0, 1, 17, 112]);
  /// ```
  pub fn uint(n: u32) -> OptValue {
    let width = match n {
      | 0 => 0,
      | n if n <= 0xFF => 1,
      | n if n <= 0xFFFF => 2,
      | _ => 4,
    };

    let bytes = n.to_be_bytes();
    OptValue(bytes[4 - width..].to_vec())
  }

  /// Read the value as a big-endian unsigned integer.
  ///
  /// Returns `None` if the value is longer than 4 bytes.
  pub fn as_uint(&self) -> Option<u32> {
    if self.0.len() > 4 {
      return None;
    }

    Some(self.0.iter().fold(0u32, |n, b| (n << 8) | u32::from(*b)))
  }

  /// Try to interpret the value as a utf8 string
  pub fn as_str(&self) -> Option<&str> {
    core::str::from_utf8(&self.0).ok()
  }
}

impl From<&str> for OptValue {
  fn from(s: &str) -> Self {
    OptValue(s.as_bytes().to_vec())
  }
}

/// Decode a 4-bit delta or length field, reading its extension
/// bytes from `bytes` when the field is 13 or 14.
pub(crate) fn parse_opt_len_or_delta<A: AsRef<[u8]>>(head: u8,
                                                     bytes: &mut Cursor<A>,
                                                     reserved_err: OptParseError)
                                                     -> Result<u32, OptParseError> {
  match head {
    | 13 => {
      let n = bytes.next().ok_or_else(OptParseError::eof)?;
      Ok(u32::from(n) + 13)
    },
    | 14 => match bytes.take_exact(2) {
      | Some(&[a, b]) => Ok(u32::from(u16::from_be_bytes([a, b])) + 269),
      | _ => Err(OptParseError::eof()),
    },
    | 15 => Err(reserved_err),
    | _ => Ok(u32::from(head)),
  }
}

/// Consume one option header (first byte and extensions).
///
/// Yields `None` without consuming anything if the input is exhausted or
/// the next byte is the payload marker.
pub(crate) fn consume_opt_header<A: AsRef<[u8]>>(bytes: &mut Cursor<A>)
                                                 -> Result<Option<(u32, usize)>, OptParseError> {
  let byte1 = match bytes.peek_byte() {
    | None | Some(PAYLOAD_MARKER) => return Ok(None),
    | Some(b) => b,
  };
  bytes.next();

  // delta extension bytes come before length extension bytes
  let delta = parse_opt_len_or_delta(byte1 >> 4, bytes, OptParseError::OptionDeltaReservedValue)?;
  let len = parse_opt_len_or_delta(byte1 & 0b00001111,
                                   bytes,
                                   OptParseError::ValueLengthReservedValue)?;

  Ok(Some((delta, len as usize)))
}

/// Add a delta to the previous option number
pub(crate) fn next_number(prev: OptNumber, delta: u32) -> Result<OptNumber, OptParseError> {
  u16::try_from(u32::from(prev.0) + delta).map(OptNumber)
                                          .map_err(|_| OptParseError::OptionNumberOverflow)
}

/// Walk the option block, calling `f` with every option's
/// absolute number and value.
///
/// Stops at the end of input or after consuming the payload marker;
/// returns whether the marker was seen.
pub(crate) fn consume_opts<A, F>(bytes: &mut Cursor<A>, mut f: F) -> Result<bool, OptParseError>
  where A: AsRef<[u8]>,
        F: FnMut(OptNumber, &[u8])
{
  let mut number = OptNumber(0);

  while let Some((delta, len)) = consume_opt_header(bytes)? {
    number = next_number(number, delta)?;
    let value = bytes.take_exact(len).ok_or_else(OptParseError::eof)?;
    f(number, value);
  }

  match bytes.peek_byte() {
    | Some(PAYLOAD_MARKER) => {
      bytes.next();
      Ok(true)
    },
    | _ => Ok(false),
  }
}

/// A single option on its way to the wire
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct OptRef<'a> {
  pub(crate) delta: OptDelta,
  pub(crate) value: &'a [u8],
}

impl<'a> OptRef<'a> {
  /// Number of bytes this option occupies when serialized
  pub(crate) fn get_size(&self) -> usize {
    let ext_size = |n: usize| match n {
      | n if n >= 269 => 2,
      | n if n >= 13 => 1,
      | _ => 0,
    };

    1 + ext_size(self.delta.0 as usize) + ext_size(self.value.len()) + self.value.len()
  }

  pub(crate) fn extend_bytes(&self, bytes: &mut impl Extend<u8>) -> Result<(), MessageToBytesError> {
    let (del, del_bytes) =
      opt_len_or_delta(self.delta.0 as usize).ok_or(MessageToBytesError::OptionDeltaTooLarge)?;
    let (len, len_bytes) =
      opt_len_or_delta(self.value.len()).ok_or(MessageToBytesError::OptionValueTooLong(self.value.len()))?;

    bytes.extend(Some((del << 4) | len));
    bytes.extend(del_bytes);
    bytes.extend(len_bytes);
    bytes.extend(self.value.iter().copied());

    Ok(())
  }
}

/// Pair every option value with the delta from the option before it
pub(crate) fn with_deltas(opts: &OptionMap) -> impl Iterator<Item = OptRef<'_>> {
  let mut last = 0u16;
  opts.iter()
      .flat_map(|(n, vs)| vs.iter().map(move |v| (*n, v.0.as_slice())))
      .map(move |(n, value)| {
        let delta = OptDelta(n.0 - last);
        last = n.0;
        OptRef { delta, value }
      })
}
