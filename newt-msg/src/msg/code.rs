use core::fmt;

/// # Message Code
///
/// 8-bit unsigned integer, split into a 3-bit class (most
/// significant bits) and a 5-bit detail (least significant bits),
/// documented as "c.dd".
///
/// # Examples
/// ```
/// use newt_msg::Code;
/// assert_eq!(Code { class: 2, detail: 5 }.to_string(), "2.05".to_string())
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Code {
  /// The "class" of message codes identify it as a request or response, and provides the class of response status:
  ///
  /// |class|meaning|
  /// |---|---|
  /// |`0`|Message is a request (or empty)|
  /// |`2`|Message is a success response|
  /// |`4`|Message is a client error response|
  /// |`5`|Message is a server error response|
  pub class: u8,

  /// 2-digit integer (range `[0, 32)`) that provides granular information about the response status.
  pub detail: u8,
}

/// Broad category of a [`Code`]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CodeKind {
  /// 0.00
  Empty,
  /// 0.01 through 0.31
  Request,
  /// 2.xx
  Success,
  /// 4.xx
  ClientError,
  /// 5.xx
  ServerError,
  /// Any class this crate does not assign a meaning to
  Other,
}

impl Code {
  /// 0.00 Empty
  pub const EMPTY: Code = Code::new(0, 0);
  /// 0.01 GET
  pub const GET: Code = Code::new(0, 1);
  /// 0.02 POST
  pub const POST: Code = Code::new(0, 2);
  /// 0.03 PUT
  pub const PUT: Code = Code::new(0, 3);
  /// 0.04 DELETE
  pub const DELETE: Code = Code::new(0, 4);
  /// 2.04 Changed
  pub const CHANGED: Code = Code::new(2, 4);
  /// 2.05 Content
  pub const CONTENT: Code = Code::new(2, 5);
  /// 4.00 Bad Request
  pub const BAD_REQUEST: Code = Code::new(4, 0);
  /// 4.01 Unauthorized
  pub const UNAUTHORIZED: Code = Code::new(4, 1);
  /// 4.04 Not Found
  pub const NOT_FOUND: Code = Code::new(4, 4);
  /// 5.00 Internal Server Error
  pub const INTERNAL_SERVER_ERROR: Code = Code::new(5, 0);

  /// Create a new Code
  ///
  /// ```
  /// use newt_msg::Code;
  ///
  /// let content = Code::new(2, 05);
  /// assert_eq!(content, Code::CONTENT);
  /// ```
  pub const fn new(class: u8, detail: u8) -> Self {
    Self { class, detail }
  }

  /// Classify this code
  ///
  /// ```
  /// use newt_msg::{Code, CodeKind};
  ///
  /// assert_eq!(Code::POST.kind(), CodeKind::Request);
  /// assert_eq!(Code::UNAUTHORIZED.kind(), CodeKind::ClientError);
  /// ```
  pub fn kind(&self) -> CodeKind {
    match (self.class, self.detail) {
      | (0, 0) => CodeKind::Empty,
      | (0, _) => CodeKind::Request,
      | (2, _) => CodeKind::Success,
      | (4, _) => CodeKind::ClientError,
      | (5, _) => CodeKind::ServerError,
      | _ => CodeKind::Other,
    }
  }

  /// Get the human string representation of a message code
  ///
  /// This avoids heap allocation; the [`fmt::Display`] impl
  /// is built on it.
  ///
  /// ```
  /// use newt_msg::Code;
  ///
  /// let code = Code { class: 2, detail: 5 };
  /// let string = String::from_iter(code.to_human());
  /// assert_eq!(string, "2.05".to_string());
  /// ```
  pub fn to_human(&self) -> [char; 4] {
    let to_char = |d: u8| char::from_digit(d.into(), 10).unwrap_or('?');
    [to_char(self.class),
     '.',
     to_char(self.detail / 10),
     to_char(self.detail % 10)]
  }
}

impl fmt::Display for Code {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.to_human().iter().try_for_each(|c| write!(f, "{}", c))
  }
}

impl From<u8> for Code {
  fn from(b: u8) -> Self {
    let class = b >> 5;
    let detail = b & 0b0011111;

    Code { class, detail }
  }
}

impl From<Code> for u8 {
  fn from(code: Code) -> u8 {
    let class = code.class << 5;
    let detail = code.detail & 0b0011111;

    class | detail
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_eqb;

  #[test]
  fn parse_code() {
    let byte = 0b_010_00101u8;
    let code = Code::from(byte);
    assert_eq!(code, Code { class: 2, detail: 5 })
  }

  #[test]
  fn serialize_code() {
    let code = Code { class: 4, detail: 1 };
    let actual: u8 = code.into();
    let expected = 0b_100_00001u8;
    assert_eqb!(actual, expected)
  }

  #[test]
  fn display() {
    assert_eq!(Code::POST.to_string(), "0.02");
    assert_eq!(Code::UNAUTHORIZED.to_string(), "4.01");
    assert_eq!(Code::new(5, 31).to_string(), "5.31");
  }

  #[test]
  fn kinds() {
    assert_eq!(Code::EMPTY.kind(), CodeKind::Empty);
    assert_eq!(Code::CONTENT.kind(), CodeKind::Success);
    assert_eq!(Code::INTERNAL_SERVER_ERROR.kind(), CodeKind::ServerError);
    assert_eq!(Code::new(3, 0).kind(), CodeKind::Other);
  }
}
