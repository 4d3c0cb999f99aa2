/// A cursor over a byte buffer (std- and alloc-less port of [`std::io::Cursor`])
///
/// Every read is bounds-checked; reading past the end yields `None`
/// instead of panicking, so parsers built on it turn truncated input
/// into errors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor<T> {
  t: T,
  cursor: usize,
  len: usize,
}

impl<T: AsRef<[u8]>> Cursor<T> {
  /// Creates a new cursor
  pub fn new(t: T) -> Cursor<T> {
    let len = t.as_ref().len();
    Cursor { t, cursor: 0, len }
  }

  /// Take the next byte in the cursor, returning None
  /// if the cursor is exhausted.
  pub fn next(&mut self) -> Option<u8> {
    self.take_exact(1).and_then(|a| a.first().copied())
  }

  /// Look at the next byte without advancing.
  pub fn peek_byte(&self) -> Option<u8> {
    self.peek_exact(1).and_then(|a| a.first().copied())
  }

  /// Take `n` bytes from the cursor, returning None if
  /// fewer than `n` bytes remain. The position is not
  /// moved when this returns None.
  pub fn take_exact(&mut self, n: usize) -> Option<&[u8]> {
    if n > self.remaining() {
      return None;
    }

    let start = self.cursor;
    self.cursor += n;
    self.t.as_ref().get(start..start + n)
  }

  /// Without advancing the position, look at the next
  /// `n` bytes, returning None if there are less than `n` bytes
  /// remaining.
  pub fn peek_exact(&self, n: usize) -> Option<&[u8]> {
    if n > self.remaining() {
      None
    } else {
      self.t.as_ref().get(self.cursor..self.cursor + n)
    }
  }

  /// Consume and return everything after the current position.
  pub fn take_until_end(&mut self) -> &[u8] {
    let start = self.cursor;
    self.cursor = self.len;
    self.t.as_ref().get(start..).unwrap_or(&[])
  }

  /// Number of bytes not yet consumed
  pub fn remaining(&self) -> usize {
    self.len - self.cursor
  }

  /// Whether the cursor has reached the end
  /// of the buffer.
  pub fn is_exhausted(&self) -> bool {
    self.cursor >= self.len
  }

  /// Get the position the cursor points to within
  /// the buffer
  pub fn position(&self) -> usize {
    self.cursor
  }
}
