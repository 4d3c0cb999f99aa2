use core::time::Duration;
use std::net::{IpAddr, Ipv4Addr};

use embedded_time::duration::Milliseconds;
use newt_msg::Type;

use crate::credential::DeviceTriple;
use crate::retry::{Attempts, Strategy};

/// Configuration options related to outbound CON requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Con {
  /// Retry strategy for CON requests that
  /// have not yet been answered.
  ///
  /// Defaults to doubling the wait after every attempt, starting at one second:
  /// ```
  /// use embedded_time::duration::Milliseconds;
  /// use newt::config::Con;
  /// use newt::retry::Strategy;
  ///
  /// assert_eq!(Con::default().retry_strategy,
  ///            Strategy::Exponential { init: Milliseconds(1_000) });
  /// ```
  pub retry_strategy: Strategy,
  /// Number of times we are allowed to resend a CON request
  /// before giving up; the total number of sends is one more than this.
  ///
  /// Defaults to 3.
  /// ```
  /// use newt::config::Con;
  /// use newt::retry::Attempts;
  ///
  /// assert_eq!(Con::default().max_retransmit, Attempts(3));
  /// ```
  pub max_retransmit: Attempts,
}

impl Con {
  /// Total number of sends allowed for one request
  pub fn max_attempts(&self) -> Attempts {
    Attempts(self.max_retransmit.0.saturating_add(1))
  }
}

/// Configuration options related to building & sending messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msg {
  /// Type of every outbound request; [`Type::Con`] or [`Type::Non`].
  ///
  /// ```
  /// use newt::config::Msg;
  /// use newt_msg::Type;
  ///
  /// assert_eq!(Msg::default().ty, Type::Con);
  /// ```
  pub ty: Type,

  /// Seed used to generate the client's message [`Token`](newt_msg::Token),
  /// customizable so that separate devices send distinct tokens.
  ///
  /// ```
  /// use newt::config::Msg;
  ///
  /// assert_eq!(Msg::default().token_seed, 0);
  /// ```
  pub token_seed: u16,

  /// See [`Con`]
  pub con: Con,
}

/// Link conditions to simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fault {
  /// Send and wait normally
  #[default]
  None,
  /// Wait only [`crate::blocking::client::SIMULATED_TIMEOUT`] for each
  /// reply, so that slow replies look like lost ones
  SimulatedTimeout,
  /// Refuse to send anything
  LinkDown,
}

impl Default for Con {
  fn default() -> Self {
    Con { retry_strategy: Strategy::Exponential { init: Milliseconds(1_000) },
          max_retransmit: Attempts(3) }
  }
}

impl Default for Msg {
  fn default() -> Self {
    Msg { ty: Type::Con,
          token_seed: 0,
          con: Con::default() }
  }
}

/// Client runtime config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
  /// See [`Msg`]
  pub msg: Msg,
  /// See [`Fault`]
  ///
  /// ```
  /// use newt::config::{Config, Fault};
  ///
  /// assert_eq!(Config::default().fault, Fault::None);
  /// ```
  pub fault: Fault,
}

/// Credential-checking server config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  /// Address to listen on; every interface by default.
  ///
  /// ```
  /// use std::net::Ipv4Addr;
  ///
  /// use newt::config::ServerConfig;
  ///
  /// assert_eq!(ServerConfig::default().ip, Ipv4Addr::UNSPECIFIED);
  /// ```
  pub ip: IpAddr,
  /// UDP port to listen on; 0 picks a free one.
  ///
  /// ```
  /// use newt::config::ServerConfig;
  ///
  /// assert_eq!(ServerConfig::default().port, 5683);
  /// ```
  pub port: u16,
  /// The device allowed to report
  pub device: DeviceTriple,
  /// How long to sleep when the socket has nothing for us
  pub idle: Duration,
}

impl Default for ServerConfig {
  fn default() -> Self {
    ServerConfig { ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                   port: 5683,
                   device: DeviceTriple::default(),
                   idle: Duration::from_millis(1) }
  }
}
