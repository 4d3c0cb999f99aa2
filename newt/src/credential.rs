use core::fmt;

/// The identity a device reports under
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DeviceTriple {
  /// Product the device belongs to
  pub product_key: String,
  /// Name of the device within its product
  pub device_name: String,
  /// Secret shared between the device and the server
  pub device_secret: String,
}

impl DeviceTriple {
  /// Create a triple
  pub fn new(product_key: impl Into<String>,
             device_name: impl Into<String>,
             device_secret: impl Into<String>)
             -> Self {
    Self { product_key: product_key.into(),
           device_name: device_name.into(),
           device_secret: device_secret.into() }
  }

  fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
    self.product_key
        .bytes()
        .chain(self.device_name.bytes())
        .chain(self.device_secret.bytes())
  }
}

/// 8 uppercase hex characters derived from a [`DeviceTriple`].
///
/// This is an identity marker, not a cryptographic credential: it is
/// the byte sum of the triple (wrapping at 32 bits) XORed with `0x5A`.
///
/// ```
/// use newt::credential::{CredentialToken, DeviceTriple};
///
/// let triple = DeviceTriple::new("a1b2c3d4", "dev001", "secret123");
/// let token = CredentialToken::derive(&triple);
///
/// assert_eq!(token.as_str(), "0000071A");
/// assert_eq!(token.query(), "token=0000071A");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialToken([u8; 8]);

impl CredentialToken {
  /// Prefix of the Uri-Query argument carrying the token
  pub const QUERY_KEY: &'static [u8] = b"token=";

  /// Derive the token for a device
  pub fn derive(triple: &DeviceTriple) -> Self {
    let sum = triple.bytes()
                    .fold(0u32, |sum, b| sum.wrapping_add(u32::from(b)));

    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let n = sum ^ 0x5A;
    let mut hex = [0u8; 8];
    hex.iter_mut()
       .enumerate()
       .for_each(|(ix, c)| *c = HEX[((n >> (28 - 4 * ix)) & 0xF) as usize]);

    Self(hex)
  }

  /// The token's ASCII bytes
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }

  /// The token as a string slice
  pub fn as_str(&self) -> &str {
    core::str::from_utf8(&self.0).unwrap_or_default()
  }

  /// The Uri-Query value that presents this token, `token=XXXXXXXX`
  pub fn query(&self) -> String {
    format!("token={}", self.as_str())
  }

  /// Does `haystack` contain `token=` immediately followed by this token?
  pub fn is_presented_in(&self, haystack: &[u8]) -> bool {
    let needle_len = Self::QUERY_KEY.len() + self.0.len();
    haystack.windows(needle_len).any(|w| {
                                  let (key, token) = w.split_at(Self::QUERY_KEY.len());
                                  key == Self::QUERY_KEY && token == self.0
                                })
  }
}

impl fmt::Display for CredentialToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
