/// Extensions to Result
pub trait ResultExt<T, E>: Sized {
  /// Attempt to perform some fallible IO
  fn try_perform<X>(self, f: impl FnOnce(&T) -> Result<X, E>) -> Result<T, E>;

  /// Perform some IO when this Result is Err
  fn perform_err(self, f: impl FnOnce(&E)) -> Result<T, E>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
  fn try_perform<X>(self, f: impl FnOnce(&T) -> Result<X, E>) -> Result<T, E> {
    self.and_then(|t| f(&t).map(|_| t))
  }

  fn perform_err(self, f: impl FnOnce(&E)) -> Result<T, E> {
    self.map_err(|e| {
          f(&e);
          e
        })
  }
}
