use crate::from_bytes::TryConsumeBytes;
use crate::msg::opt::{consume_opt_header, consume_opts, next_number};
use crate::msg::Head;
use crate::{Code, Cursor, Id, MessageParseError, OptNumber, TryFromBytes, Type, Version};

/// A message that borrows the datagram it was parsed from.
///
/// Parsing validates the header and every option boundary exactly
/// like [`crate::Message`] does, but allocates nothing; options are
/// decoded again on demand by [`RawMessage::opts`].
///
/// ```
/// use newt_msg::{Code, OptNumber, RawMessage, TryFromBytes};
///
/// let bytes = [0x42, 0x02, 0x00, 0x07, 0xA1, 0xB2, // header & token
///              0xB1, b'a', //                        Uri-Path "a"
///              0xFF, b'{', b'}'];
/// let raw = RawMessage::try_from_bytes(&bytes[..]).unwrap();
///
/// assert_eq!(raw.code(), Code::POST);
/// assert_eq!(raw.token(), &[0xA1, 0xB2]);
/// assert_eq!(raw.option_bytes(), &[0xB1, b'a']);
/// assert_eq!(raw.get(OptNumber(11)), Some(&b"a"[..]));
/// assert_eq!(raw.payload(), b"{}");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawMessage<'a> {
  ver: Version,
  ty: Type,
  code: Code,
  id: Id,
  token: &'a [u8],
  opts: &'a [u8],
  payload: &'a [u8],
}

impl<'a> RawMessage<'a> {
  /// Protocol version (always 1)
  pub fn ver(&self) -> Version {
    self.ver
  }

  /// Message type
  pub fn ty(&self) -> Type {
    self.ty
  }

  /// Message code
  pub fn code(&self) -> Code {
    self.code
  }

  /// Message id
  pub fn id(&self) -> Id {
    self.id
  }

  /// Token bytes
  pub fn token(&self) -> &'a [u8] {
    self.token
  }

  /// The encoded option block, excluding the payload marker
  pub fn option_bytes(&self) -> &'a [u8] {
    self.opts
  }

  /// Payload bytes; empty if there was no payload marker
  pub fn payload(&self) -> &'a [u8] {
    self.payload
  }

  /// Iterate over the options in wire order
  pub fn opts(&self) -> RawOpts<'a> {
    RawOpts { rest: self.opts,
              number: OptNumber(0) }
  }

  /// The first value of option `n`
  pub fn get(&self, n: OptNumber) -> Option<&'a [u8]> {
    self.opts().find(|(num, _)| *num == n).map(|(_, v)| v)
  }
}

impl<'a> TryFromBytes<&'a [u8]> for RawMessage<'a> {
  type Error = MessageParseError;

  fn try_from_bytes(bytes: &'a [u8]) -> Result<Self, Self::Error> {
    let mut cur = Cursor::new(bytes);

    let Head { ver,
               ty,
               code,
               id,
               token, } = Head::try_consume_bytes(&mut cur)?;

    let opts_start = cur.position();
    let token = bytes.get(opts_start - token.len()..opts_start)
                     .unwrap_or_default();

    let marker = consume_opts(&mut cur, |_, _| ())?;
    let opts_end = match marker {
      | true => cur.position() - 1,
      | false => cur.position(),
    };

    if marker && cur.is_exhausted() {
      return Err(MessageParseError::PayloadMarkerWithoutPayload);
    }

    let opts = bytes.get(opts_start..opts_end).unwrap_or_default();
    let payload = bytes.get(cur.position()..).unwrap_or_default();

    Ok(RawMessage { ver,
                    ty,
                    code,
                    id,
                    token,
                    opts,
                    payload })
  }
}

/// Iterator over the options of a [`RawMessage`], see [`RawMessage::opts`]
#[derive(Clone, Copy, Debug)]
pub struct RawOpts<'a> {
  rest: &'a [u8],
  number: OptNumber,
}

impl<'a> Iterator for RawOpts<'a> {
  type Item = (OptNumber, &'a [u8]);

  fn next(&mut self) -> Option<Self::Item> {
    let mut cur = Cursor::new(self.rest);
    let (delta, len) = consume_opt_header(&mut cur).ok().flatten()?;
    let number = next_number(self.number, delta).ok()?;

    let start = cur.position();
    let value = self.rest.get(start..start + len)?;

    self.rest = self.rest.get(start + len..).unwrap_or_default();
    self.number = number;
    Some((number, value))
  }
}
