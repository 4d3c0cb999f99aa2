use std_alloc::vec::Vec;

use crate::from_bytes::TryConsumeBytes;
use crate::{Cursor, TryFromBytes};

/// Message Code
pub mod code;

/// Message parsing errors
pub mod parse_error;

/// Message ID
pub mod id;

/// Message Options
pub mod opt;

/// Message Type
pub mod ty;

/// Message Token
pub mod token;

/// Message Version
pub mod ver;

pub use code::*;
pub use id::*;
pub use opt::*;
pub use parse_error::*;
pub use token::*;
pub use ty::*;
pub use ver::*;

/// The byte separating the option list from the payload
pub const PAYLOAD_MARKER: u8 = 0b1111_1111;

/// Message body.
///
/// An empty payload is serialized without a payload marker.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Payload(pub Vec<u8>);

impl Payload {
  /// Try to interpret the payload as a utf8 string
  pub fn as_str(&self) -> Option<&str> {
    core::str::from_utf8(&self.0).ok()
  }
}

/// Struct representing the first byte of a message.
///
/// ```text
/// CoAP version
/// |
/// |  Message type (request, response, empty)
/// |  |
/// |  |  Length of token, in bytes. (4-bit integer)
/// |  |  |
/// vv vv vvvv
/// 01 00 0000
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub(crate) struct Byte1 {
  pub(crate) ver: Version,
  pub(crate) ty: Type,
  pub(crate) tkl: u8,
}

impl TryFrom<u8> for Byte1 {
  type Error = MessageParseError;

  fn try_from(b: u8) -> Result<Self, Self::Error> {
    let ver = b >> 6; // bits 0 & 1
    let ty = b >> 4 & 0b11; // bits 2 & 3
    let tkl = b & 0b1111u8; // last 4 bits

    Ok(Byte1 { ver: Version(ver),
               ty: Type::try_from(ty)?,
               tkl })
  }
}

impl From<Byte1> for u8 {
  fn from(b: Byte1) -> u8 {
    let ver = b.ver.0 << 6;
    let ty = u8::from(b.ty) << 4;
    let tkl = b.tkl;

    ver | ty | tkl
  }
}

/// The fixed 4-byte header, plus the token that follows it.
///
/// Shared by [`Message`] and [`crate::RawMessage`] so both reject
/// the same malformed headers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Head {
  pub(crate) ver: Version,
  pub(crate) ty: Type,
  pub(crate) code: Code,
  pub(crate) id: Id,
  pub(crate) token: Token,
}

impl<Bytes: AsRef<[u8]>> TryConsumeBytes<Bytes> for Head {
  type Error = MessageParseError;

  fn try_consume_bytes(bytes: &mut Cursor<Bytes>) -> Result<Self, Self::Error> {
    if bytes.remaining() < 4 {
      return Err(MessageParseError::eof());
    }

    let Byte1 { tkl, ty, ver } = bytes.next()
                                      .ok_or_else(MessageParseError::eof)?
                                      .try_into()?;

    if ver != Version::default() {
      return Err(MessageParseError::InvalidVersion(ver.0));
    }

    if tkl > 8 {
      return Err(MessageParseError::InvalidTokenLength(tkl));
    }

    let code: Code = bytes.next().ok_or_else(MessageParseError::eof)?.into();
    let id = Id::try_consume_bytes(bytes)?;

    let token = bytes.take_exact(tkl as usize)
                     .ok_or_else(MessageParseError::eof)?;
    let token = Token::try_from_slice(token).map_err(|_| MessageParseError::InvalidTokenLength(tkl))?;

    Ok(Head { ver,
              ty,
              code,
              id,
              token })
  }
}

/// # `Message` struct
/// Low-level representation of a message that has been parsed from the raw binary format.
///
/// Options are kept in an [`OptionMap`], so they are always serialized in
/// ascending order of [`OptNumber`]; repeated options keep the order
/// they were added in.
///
/// Messages support both serializing to bytes and from bytes, by using the provided [`TryFromBytes`] and [`crate::TryIntoBytes`] traits.
///
/// ```
/// use newt_msg::TryFromBytes;
/// use newt_msg::*;
/// # //                       version  token len  code (2.05 Content)
/// # //                       |        |          /
/// # //                       |  type  |         /  message ID
/// # //                       |  |     |        |   |
/// # //                       vv vv vvvv vvvvvvvv vvvvvvvvvvvvvvvv
/// # let header: [u8; 4] = 0b_01_00_0001_01000101_0000000000000001u32.to_be_bytes();
/// # let token: [u8; 1] = [254u8];
/// # let content_format: &[u8] = b"application/json";
/// # let options: [&[u8]; 2] = [&[0b_1100_1101u8, 0b00000011u8], content_format];
/// # let payload: [&[u8]; 2] = [&[0b_11111111u8], b"hello, world!"];
/// let packet: Vec<u8> = /* bytes! */
/// # [header.as_ref(), token.as_ref(), options.concat().as_ref(), payload.concat().as_ref()].concat();
///
/// let msg = Message::try_from_bytes(&packet).unwrap();
///
/// assert_eq!(msg.id, Id(1));
/// assert_eq!(msg.code, Code::CONTENT);
/// assert_eq!(msg.get_first(OptNumber(12)).map(|v| v.0.as_slice()),
///            Some(content_format));
/// assert_eq!(msg.payload.as_str(), Some("hello, world!"));
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
  /// see [`Id`] for details
  pub id: Id,
  /// see [`Type`] for details
  pub ty: Type,
  /// see [`Version`] for details
  pub ver: Version,
  /// see [`Token`] for details
  pub token: Token,
  /// see [`Code`] for details
  pub code: Code,
  /// see [`OptionMap`] for details
  pub opts: OptionMap,
  /// see [`Payload`]
  pub payload: Payload,
}

impl Message {
  /// Create a message with no options and no payload
  pub fn new(ty: Type, code: Code, id: Id, token: Token) -> Self {
    Self { id,
           ty,
           ver: Version::default(),
           token,
           code,
           opts: OptionMap::default(),
           payload: Payload::default() }
  }

  /// Append a value for an option.
  ///
  /// If the option is already present the value is added after
  /// the existing ones (repeated option).
  pub fn add(&mut self, n: OptNumber, v: OptValue) {
    self.opts.entry(n).or_default().push(v);
  }

  /// Get all values for an option
  pub fn get(&self, n: OptNumber) -> Option<&[OptValue]> {
    self.opts.get(&n).map(|vs| vs.as_slice())
  }

  /// Get the first value for an option
  pub fn get_first(&self, n: OptNumber) -> Option<&OptValue> {
    self.get(n).and_then(|vs| vs.first())
  }

  /// Iterate over every option value in wire order
  pub fn opts_iter(&self) -> impl Iterator<Item = (OptNumber, &OptValue)> {
    self.opts
        .iter()
        .flat_map(|(n, vs)| vs.iter().map(move |v| (*n, v)))
  }
}

impl<Bytes: AsRef<[u8]>> TryFromBytes<Bytes> for Message {
  type Error = MessageParseError;

  fn try_from_bytes(bytes: Bytes) -> Result<Self, Self::Error> {
    let mut bytes = Cursor::new(bytes);

    let Head { ver,
               ty,
               code,
               id,
               token, } = Head::try_consume_bytes(&mut bytes)?;

    let mut opts = OptionMap::default();
    let marker = opt::consume_opts(&mut bytes, |n, v| {
                   opts.entry(n).or_default().push(OptValue(v.to_vec()))
                 }).map_err(MessageParseError::OptParseError)?;

    if marker && bytes.is_exhausted() {
      return Err(MessageParseError::PayloadMarkerWithoutPayload);
    }

    let payload = Payload(bytes.take_until_end().to_vec());

    Ok(Message { id,
                 ty,
                 ver,
                 code,
                 token,
                 opts,
                 payload })
  }
}
