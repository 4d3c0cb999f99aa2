use std::io;
use std::net::{SocketAddr, UdpSocket};

use embedded_time::duration::Milliseconds;
use newt_msg::{Code, CodeKind, Id, Message, Token, TryFromBytes, TryIntoBytes, Type};
use tinyvec::ArrayVec;

use crate::config::{Config, Fault};
use crate::error::{Error, Mismatch, What, When};
use crate::logging::msg_summary;
use crate::net::{Addrd, Socket};
use crate::req::Req;
use crate::retry::{RetryTimer, Strategy, YouShould};
use crate::time::{Clock, Millis};

/// How long a CON request waits for each reply when the link is
/// configured with [`Fault::SimulatedTimeout`]
pub const SIMULATED_TIMEOUT: Millis = Milliseconds(10);

/// Largest datagram the client will send or read
pub const MAX_DGRAM: usize = 1152;

type Dgram = ArrayVec<[u8; MAX_DGRAM]>;

/// What became of a request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// A NON request was handed to the socket; nothing is waited for
  Sent {
    #[allow(missing_docs)]
    id: Id,
  },
  /// The peer answered
  Response {
    #[allow(missing_docs)]
    id: Id,
    /// Response code; 2.05 when the peer accepted the report
    code: Code,
  },
}

impl Outcome {
  /// Message id of the request
  pub fn id(&self) -> Id {
    match *self {
      | Self::Sent { id } | Self::Response { id, .. } => id,
    }
  }

  /// Response code, if there was a response
  pub fn code(&self) -> Option<Code> {
    match *self {
      | Self::Sent { .. } => None,
      | Self::Response { code, .. } => Some(code),
    }
  }

  /// Was the request sent without complaint?
  ///
  /// True for fire-and-forget sends and 2.xx responses.
  pub fn is_accepted(&self) -> bool {
    match self.code().map(|c| c.kind()) {
      | None | Some(CodeKind::Success) => true,
      | _ => false,
    }
  }

  /// Did the peer answer with an error code (4.xx or 5.xx)?
  pub fn is_rejected(&self) -> bool {
    matches!(self.code().map(|c| c.kind()),
             Some(CodeKind::ClientError | CodeKind::ServerError))
  }
}

/// A client that sends one request at a time to a single peer,
/// blocking until it is answered or given up on.
///
/// CON requests are resent (byte-for-byte) following the configured
/// [`Strategy`] until a reply arrives or the attempts run out.
///
/// ```no_run
/// use newt::blocking::Client;
/// use newt::config::Config;
/// use newt::req::Req;
///
/// let mut client = Client::try_new_std("127.0.0.1:5683".parse().unwrap(), Config::default()).unwrap();
/// let outcome = client.send(&Req::post("things/upload").payload("{}")).unwrap();
///
/// println!("{:?} answered with {:?}", outcome.id(), outcome.code());
/// ```
#[derive(Debug)]
pub struct Client<S: Socket, C: Clock> {
  sock: S,
  clock: C,
  dest: SocketAddr,
  config: Config,
  token: Token,
  next_id: Id,
}

impl Client<UdpSocket, crate::std::Clock> {
  /// Create a client on an ephemeral local UDP port that talks to `dest`
  pub fn try_new_std(dest: SocketAddr, config: Config) -> io::Result<Self> {
    let local = match dest {
      | SocketAddr::V4(_) => "0.0.0.0:0",
      | SocketAddr::V6(_) => "[::]:0",
    };

    UdpSocket::bind_raw(local).map(|sock| Client::new(sock, crate::std::Clock::new(), dest, config))
  }
}

impl<S: Socket, C: Clock> Client<S, C> {
  /// Create a new client
  ///
  /// The message token is derived from [`crate::config::Msg::token_seed`]
  /// and kept for the lifetime of the client.
  pub fn new(sock: S, clock: C, dest: SocketAddr, config: Config) -> Self {
    let token = Token::opaque(&config.msg.token_seed.to_be_bytes()).truncated(4);

    Self { sock,
           clock,
           dest,
           config,
           token,
           next_id: Id(0) }
  }

  /// The token carried by every request
  pub fn token(&self) -> Token {
    self.token
  }

  /// Where requests are sent
  pub fn dest(&self) -> SocketAddr {
    self.dest
  }

  /// The runtime config
  pub fn config(&self) -> &Config {
    &self.config
  }

  /// The underlying socket
  pub fn socket(&self) -> &S {
    &self.sock
  }

  /// Send a request and, if it is confirmable, wait for the reply.
  ///
  /// Every call uses a fresh message id, even calls that fail
  /// before anything is sent.
  ///
  /// The first datagram received after sending is taken as the reply,
  /// whatever address it came from. A late reply to an earlier request
  /// therefore ends this exchange with
  /// [`Mismatch::Id`](crate::error::Mismatch::Id).
  pub fn send(&mut self, req: &Req) -> Result<Outcome, Error<S::Error>> {
    let id = self.next_id();
    let msg = req.to_message(self.config.msg.ty, id, self.token);

    let bytes: Dgram = msg.try_into_bytes()
                          .map_err(|e| When::Encoding.what(What::ToBytes(e)))?;

    if self.config.fault == Fault::LinkDown {
      log::warn!("link down; dropping {}", msg_summary(&msg));
      return Err(When::Sending(id).what(What::TransportUnavailable));
    }

    self.send_bytes(id, &bytes)?;
    log::debug!("sent {} -> {}", msg_summary(&msg), self.dest);

    match msg.ty {
      | Type::Con => {
        let mut timer = self.retry_timer(id)?;
        nb::block!(self.poll_response(id, msg.ty, &bytes, &mut timer))
      },
      | _ => Ok(Outcome::Sent { id }),
    }
  }

  fn next_id(&mut self) -> Id {
    let id = self.next_id;
    self.next_id = id.next();
    id
  }

  fn retry_timer(&self, id: Id) -> Result<RetryTimer<C>, Error<S::Error>> {
    let strategy = match self.config.fault {
      | Fault::SimulatedTimeout => Strategy::Delay { delay: SIMULATED_TIMEOUT },
      | _ => self.config.msg.con.retry_strategy,
    };

    self.clock
        .try_now()
        .map(|now| RetryTimer::new(now, strategy, self.config.msg.con.max_attempts()))
        .map_err(|_| When::Polling(id).what(What::ClockError))
  }

  fn send_bytes(&self, id: Id, bytes: &[u8]) -> Result<(), Error<S::Error>> {
    nb::block!(self.sock.send(Addrd(bytes, self.dest))).map_err(|e| {
                                                          When::Sending(id).what(What::SockError(e))
                                                        })
  }

  /// Check the socket once for a reply to request `id`, resending
  /// `bytes` if the retry timer says the current wait is up.
  fn poll_response(&self,
                   id: Id,
                   ty: Type,
                   bytes: &[u8],
                   timer: &mut RetryTimer<C>)
                   -> nb::Result<Outcome, Error<S::Error>> {
    let mut buf = [0u8; MAX_DGRAM];

    match self.sock.recv(&mut buf) {
      | Ok(Addrd(n, from)) => {
        log::trace!("recvd {}b <- {}", n, from);
        return Self::check_response(id, ty, &buf[..n]).map_err(nb::Error::Other);
      },
      | Err(nb::Error::Other(e)) => {
        return Err(nb::Error::Other(When::Polling(id).what(What::SockError(e))))
      },
      | Err(nb::Error::WouldBlock) => (),
    }

    let now = self.clock
                  .try_now()
                  .map_err(|_| nb::Error::Other(When::Polling(id).what(What::ClockError)))?;

    match timer.what_should_i_do(now) {
      | Ok(YouShould::Retry) => {
        log::info!("no reply to {:#06x} yet; attempt {} of {}",
                   id.0,
                   timer.attempts().0,
                   self.config.msg.con.max_attempts().0);
        self.send_bytes(id, bytes).map_err(nb::Error::Other)?;
        Err(nb::Error::WouldBlock)
      },
      | Ok(YouShould::Cry) => {
        log::warn!("giving up on {:#06x} after {} attempts",
                   id.0,
                   timer.attempts().0);
        Err(nb::Error::Other(When::Polling(id).what(What::NoResponse { attempts:
                                                                          timer.attempts() })))
      },
      | Err(nb::Error::WouldBlock) => Err(nb::Error::WouldBlock),
      | Err(nb::Error::Other(never)) => match never {},
    }
  }

  fn check_response(id: Id, ty: Type, dgram: &[u8]) -> Result<Outcome, Error<S::Error>> {
    let when = When::Polling(id);
    let rep = Message::try_from_bytes(dgram).map_err(|e| when.what(What::FromBytes(e)))?;
    log::debug!("recvd {}", msg_summary(&rep));

    if rep.id != id {
      return Err(when.what(What::CorrelationMismatch(Mismatch::Id { expected: id,
                                                                    actual: rep.id })));
    }

    if rep.ty != Type::Ack && rep.ty != ty.expected_response() {
      return Err(when.what(What::CorrelationMismatch(Mismatch::Type(rep.ty))));
    }

    Ok(Outcome::Response { id, code: rep.code })
  }
}
