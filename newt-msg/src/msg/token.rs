use tinyvec::ArrayVec;

use crate::MessageToBytesError;

/// # Message Token
///
/// 0 to 8 opaque bytes used to correlate requests and responses
/// independently of the [`crate::Id`].
///
/// The length limit is enforced on construction; a [`Token`] can
/// never hold more than 8 bytes.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Token(pub ArrayVec<[u8; 8]>);

impl Token {
  /// Copy a slice of at most 8 bytes into a token
  ///
  /// ```
  /// use newt_msg::{MessageToBytesError, Token};
  ///
  /// assert_eq!(Token::try_from_slice(&[0xA1, 0xB2]).unwrap().as_bytes(), &[0xA1, 0xB2]);
  /// assert_eq!(Token::try_from_slice(&[0; 9]),
  ///            Err(MessageToBytesError::TokenTooLong(9)));
  /// ```
  pub fn try_from_slice(bytes: &[u8]) -> Result<Token, MessageToBytesError> {
    if bytes.len() > 8 {
      return Err(MessageToBytesError::TokenTooLong(bytes.len()));
    }

    let mut token = ArrayVec::new();
    token.extend_from_slice(bytes);
    Ok(Token(token))
  }

  /// Take an arbitrary-length sequence of bytes and turn it into an opaque 8-byte token
  ///
  /// Uses the BLAKE2 hashing algorithm.
  ///
  /// ```
  /// use newt_msg::Token;
  ///
  /// let a = Token::opaque(&[0, 1, 2]);
  /// assert_eq!(a, Token::opaque(&[0, 1, 2]));
  /// assert_eq!(a.len(), 8);
  /// ```
  pub fn opaque(data: &[u8]) -> Token {
    use blake2::digest::consts::U8;
    use blake2::{Blake2b, Digest};

    let mut digest = Blake2b::<U8>::new();
    digest.update(data);
    Token(Into::<[u8; 8]>::into(digest.finalize()).into())
  }

  /// Keep only the first `n` bytes
  pub fn truncated(mut self, n: usize) -> Token {
    self.0.truncate(n);
    self
  }

  /// Length in bytes (0..=8)
  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Whether the token is empty
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// The token's bytes
  pub fn as_bytes(&self) -> &[u8] {
    self.0.as_slice()
  }
}

impl TryFrom<&[u8]> for Token {
  type Error = MessageToBytesError;

  fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
    Token::try_from_slice(bytes)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncate_opaque() {
    let t = Token::opaque(b"seed").truncated(4);
    assert_eq!(t.len(), 4);
    assert_eq!(t.as_bytes(), &Token::opaque(b"seed").as_bytes()[..4]);
  }

  #[test]
  fn empty() {
    assert!(Token::default().is_empty());
    assert!(Token::try_from_slice(&[]).unwrap().is_empty());
  }

  #[test]
  fn exactly_eight() {
    assert_eq!(Token::try_from_slice(&[1; 8]).map(|t| t.len()), Ok(8));
  }
}
