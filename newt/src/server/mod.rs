use core::time::Duration;
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use newt_msg::{Code, Message, RawMessage, Token, TryFromBytes, TryIntoBytes, Type};

pub use crate::config::ServerConfig;
use crate::credential::{CredentialToken, DeviceTriple};
use crate::logging::msg_summary;
use crate::net::{Addrd, Socket};
use crate::result_ext::ResultExt;

/// Largest datagram the server will read (an Ethernet MTU).
///
/// Anything longer is cut to this length before it is decoded.
pub const MAX_DGRAM: usize = 1500;

/// A peer that answers every request with 2.05 if it presents the
/// expected device's credential token, and 4.01 otherwise.
///
/// The check is a plain search of the request's encoded option block
/// for `token=` followed by the expected token.
///
/// ```
/// use std::sync::atomic::AtomicBool;
/// use std::sync::Arc;
///
/// use newt::credential::{CredentialToken, DeviceTriple};
/// use newt::net::Addrd;
/// use newt::req::Req;
/// use newt::server::Server;
/// use newt_msg::{Code, Id, Token, TryIntoBytes, Type};
///
/// let triple = DeviceTriple::new("a1b2c3d4", "dev001", "secret123");
/// let sock = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
/// let server = Server::new(sock, &triple, Arc::new(AtomicBool::new(true)));
///
/// let req = Req::post("things/upload").query(CredentialToken::derive(&triple).query())
///                                     .to_message(Type::Con, Id(7), Token::default());
/// let bytes: Vec<u8> = req.try_into_bytes().unwrap();
///
/// let rep = server.handle(Addrd(&bytes, "127.0.0.1:1234".parse().unwrap()))
///                 .unwrap();
/// assert_eq!(rep.data().code, Code::CONTENT);
/// assert_eq!(rep.data().id, Id(7));
/// ```
#[derive(Debug)]
pub struct Server<S: Socket> {
  sock: S,
  expected: CredentialToken,
  running: Arc<AtomicBool>,
}

impl<S: Socket> Server<S> {
  /// Create a server that accepts reports from `device`.
  ///
  /// [`Server::run`] keeps going for as long as `running` is set.
  pub fn new(sock: S, device: &DeviceTriple, running: Arc<AtomicBool>) -> Self {
    Self { sock,
           expected: CredentialToken::derive(device),
           running }
  }

  /// The token requests must present
  pub fn expected_token(&self) -> CredentialToken {
    self.expected
  }

  /// The underlying socket
  pub fn socket(&self) -> &S {
    &self.sock
  }

  /// Build the reply to a datagram.
  ///
  /// `None` if the datagram is not a well-formed message.
  pub fn handle(&self, dgram: Addrd<&[u8]>) -> Option<Addrd<Message>> {
    let req = match RawMessage::try_from_bytes(*dgram.data()) {
      | Ok(req) => req,
      | Err(e) => {
        log::debug!("dropping malformed datagram from {}: {}", dgram.addr(), e);
        return None;
      },
    };

    let code = match self.expected.is_presented_in(req.option_bytes()) {
      | true => Code::CONTENT,
      | false => Code::UNAUTHORIZED,
    };

    let rep = Message::new(Type::Ack, code, req.id(), Token::default());
    log::debug!("{} {:?} {} -> {}",
                dgram.addr(),
                req.ty(),
                req.code(),
                msg_summary(&rep));

    Some(dgram.map(|_| rep))
  }

  /// Read at most one datagram and answer it.
  ///
  /// Yields `WouldBlock` when nothing is waiting on the socket.
  /// Failing to send a reply is logged and otherwise ignored.
  pub fn tick(&self) -> nb::Result<(), S::Error> {
    let mut buf = [0u8; MAX_DGRAM];
    let Addrd(n, from) = self.sock.recv(&mut buf)?;
    log::trace!("recvd {}b <- {}", n, from);

    let rep = match self.handle(Addrd(&buf[..n], from)) {
      | Some(rep) => rep,
      | None => return Ok(()),
    };

    match rep.data().try_into_bytes::<Vec<u8>>() {
      | Ok(bytes) => {
        nb::block!(self.sock.send(Addrd(&bytes, rep.addr())))
          .perform_err(|e| log::warn!("failed to answer {}: {:?}", rep.addr(), e))
          .ok();
      },
      | Err(e) => log::warn!("failed to encode reply to {}: {}", rep.addr(), e),
    }

    Ok(())
  }

  /// Answer requests until the running flag is cleared,
  /// sleeping for `idle` whenever the socket is empty.
  pub fn run(&self, idle: Duration) {
    log::info!("serving on {}", self.sock.local_addr());

    while self.running.load(Ordering::SeqCst) {
      match self.tick() {
        | Ok(()) => (),
        | Err(nb::Error::WouldBlock) => thread::sleep(idle),
        | Err(nb::Error::Other(e)) => {
          log::warn!("receive failed: {:?}", e);
          thread::sleep(idle);
        },
      }
    }

    log::info!("stopped serving on {}", self.sock.local_addr());
  }
}

/// A server running on its own thread, see [`spawn`]
#[derive(Debug)]
pub struct ServerHandle {
  addr: SocketAddr,
  running: Arc<AtomicBool>,
  thread: JoinHandle<()>,
}

impl ServerHandle {
  /// Address the server is bound to
  pub fn addr(&self) -> SocketAddr {
    self.addr
  }

  /// Ask the server to stop; it notices the next time its socket is empty
  pub fn stop(&self) {
    self.running.store(false, Ordering::SeqCst);
  }

  /// Wait for the server thread to exit
  pub fn join(self) -> thread::Result<()> {
    self.thread.join()
  }
}

/// Bind a UDP socket and serve on a new thread.
///
/// ```
/// use std::net::Ipv4Addr;
///
/// use newt::server::{self, ServerConfig};
///
/// let handle = server::spawn(ServerConfig { ip: Ipv4Addr::LOCALHOST.into(),
///                                           port: 0,
///                                           ..ServerConfig::default() }).unwrap();
/// assert_ne!(handle.addr().port(), 0);
///
/// handle.stop();
/// handle.join().unwrap();
/// ```
pub fn spawn(config: ServerConfig) -> io::Result<ServerHandle> {
  let sock = UdpSocket::bind_raw((config.ip, config.port))?;
  let addr = UdpSocket::local_addr(&sock)?;
  let running = Arc::new(AtomicBool::new(true));
  let server = Server::new(sock, &config.device, running.clone());
  let idle = config.idle;

  thread::Builder::new().name(format!("newt-server-{}", addr.port()))
                        .spawn(move || server.run(idle))
                        .map(|thread| ServerHandle { addr,
                                                     running,
                                                     thread })
}
