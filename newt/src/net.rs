use std::net::{SocketAddr, ToSocketAddrs};

/// Data that came from (or is headed to) a network socket
#[derive(PartialEq, PartialOrd, Eq, Ord, Hash, Debug, Clone, Copy)]
pub struct Addrd<T>(pub T, pub SocketAddr);

impl<T> Addrd<T> {
  /// Discard the socket and get the data in this Addressed
  pub fn unwrap(self) -> T {
    self.0
  }

  /// Map the data contained in this Addressed
  pub fn map<R>(self, f: impl FnOnce(T) -> R) -> Addrd<R> {
    Addrd(f(self.0), self.1)
  }

  /// Borrow the contents of the addressed item
  pub fn data(&self) -> &T {
    &self.0
  }

  /// Copy the socket address for the data
  pub fn addr(&self) -> SocketAddr {
    self.1
  }
}

/// A non-blocking datagram socket
///
/// Implemented for [`std::net::UdpSocket`] in [`crate::std`].
/// Tests swap in an in-memory socket to control exactly what arrives and when.
pub trait Socket: Sized {
  /// The error yielded by socket operations
  type Error: core::fmt::Debug;

  /// Get the local address this socket is bound to
  fn local_addr(&self) -> SocketAddr;

  /// Bind the socket to an address.
  ///
  /// Implementors of `bind_raw` should:
  ///  - yield a socket in a non-blocking state
  ///  - bind to the first address if `addr` yields multiple addresses
  fn bind_raw<A: ToSocketAddrs>(addr: A) -> Result<Self, Self::Error>;

  /// Send a datagram to a remote address
  fn send(&self, msg: Addrd<&[u8]>) -> nb::Result<(), Self::Error>;

  /// Pull a buffered datagram from the socket, along with the address to the sender.
  ///
  /// It is expected that (like [`std::net::UdpSocket`]) if the datagram is larger
  /// than the buffer, the excess bytes are dropped and this is not considered an error.
  fn recv(&self, buffer: &mut [u8]) -> nb::Result<Addrd<usize>, Self::Error>;
}
