use super::{OptNumber, OptValue};

/// Option numbers understood by the uplink
pub mod no {
  use super::OptNumber;

  /// Uri-Host; the host the request is addressed to
  pub const URI_HOST: OptNumber = OptNumber(3);
  /// Uri-Path; one option per path segment
  pub const URI_PATH: OptNumber = OptNumber(11);
  /// Content-Format; a uint naming the payload's media type
  pub const CONTENT_FORMAT: OptNumber = OptNumber(12);
  /// Uri-Query; one option per `key=value` argument
  pub const URI_QUERY: OptNumber = OptNumber(15);
}

/// Content-Format
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentFormat {
  /// `text/plain; charset=utf-8`
  Text,
  /// `application/link-format`
  LinkFormat,
  /// `application/xml`
  Xml,
  /// `application/octet-stream`
  OctetStream,
  /// `application/exi`
  Exi,
  /// `application/json`
  Json,
  /// `application/cbor`
  Cbor,
  /// Another content format
  Other(u16),
}

impl ContentFormat {
  /// The option value carrying this format, minimally encoded
  ///
  /// ```
  /// use newt_msg::known::ContentFormat;
  ///
  /// assert_eq!(ContentFormat::Json.to_opt_value().0, vec![50]);
  /// assert!(ContentFormat::Text.to_opt_value().0.is_empty());
  /// ```
  pub fn to_opt_value(&self) -> OptValue {
    OptValue::uint(u16::from(self).into())
  }

  /// Read a format back out of an option value
  pub fn from_opt_value(v: &OptValue) -> Option<ContentFormat> {
    v.as_uint()
     .and_then(|n| u16::try_from(n).ok())
     .map(ContentFormat::from)
  }
}

impl<'a> From<&'a ContentFormat> for u16 {
  fn from(f: &'a ContentFormat) -> Self {
    use ContentFormat::*;
    match *f {
      | Text => 0,
      | LinkFormat => 40,
      | Xml => 41,
      | OctetStream => 42,
      | Exi => 47,
      | Json => 50,
      | Cbor => 60,
      | Other(n) => n,
    }
  }
}

impl From<u16> for ContentFormat {
  fn from(n: u16) -> Self {
    use ContentFormat::*;
    match n {
      | 0 => Text,
      | 40 => LinkFormat,
      | 41 => Xml,
      | 42 => OctetStream,
      | 47 => Exi,
      | 50 => Json,
      | 60 => Cbor,
      | n => Other(n),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn content_format_through_option() {
    let v = ContentFormat::Json.to_opt_value();
    assert_eq!(ContentFormat::from_opt_value(&v), Some(ContentFormat::Json));
    assert_eq!(ContentFormat::from_opt_value(&OptValue::uint(1234)),
               Some(ContentFormat::Other(1234)));
    assert_eq!(ContentFormat::from_opt_value(&OptValue::uint(70_000)), None);
  }
}
