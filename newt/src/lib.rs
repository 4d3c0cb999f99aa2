//! `newt` is a minimal CoAP uplink: a client that reliably reports
//! sensor readings to a peer over UDP, and the peer that checks who
//! is reporting.
//!
//! ## The exchange
//! A device POSTs a JSON reading to `things/upload`, presenting a
//! credential token derived from its [`DeviceTriple`](credential::DeviceTriple)
//! as the Uri-Query argument `token=XXXXXXXX`.
//!
//! ```text
//! Client                      Server
//!  |                          |
//!  +------------------------->|  Header: POST (T=CON, Code=0.02, MID=0x0000)
//!  | POST things/upload       |   Token: 4 bytes
//!  |                          |   Uri-Query: "token=0000071A"
//!  |                          |   Payload: {"temp":21.5,"humidity":40.0,"abn":0}
//!  |                          |
//!  |<-------------------------+  Header: 2.05 (T=ACK, Code=2.05, MID=0x0000)
//!  | 2.05                     |
//! ```
//!
//! - Confirmable requests are resent with exponential backoff until
//!   answered, see [`retry`] and [`config::Con`].
//! - Non-confirmable requests are sent once and never waited on.
//! - The server answers 4.01 to anyone not presenting the expected token.
//!
//! ```
//! use std::net::Ipv4Addr;
//!
//! use newt::blocking::Client;
//! use newt::config::{Config, ServerConfig};
//! use newt::credential::{CredentialToken, DeviceTriple};
//! use newt::req::Req;
//! use newt_msg::Code;
//!
//! let device = DeviceTriple::new("a1b2c3d4", "dev001", "secret123");
//! let server = newt::server::spawn(ServerConfig { ip: Ipv4Addr::LOCALHOST.into(),
//!                                                 port: 0,
//!                                                 device: device.clone(),
//!                                                 ..ServerConfig::default() }).unwrap();
//!
//! let mut client = Client::try_new_std(server.addr(), Config::default()).unwrap();
//! let req = Req::post("things/upload").host("localhost")
//!                                     .query(CredentialToken::derive(&device).query())
//!                                     .payload(r#"{"temp":21.5}"#);
//!
//! let outcome = client.send(&req).unwrap();
//! assert_eq!(outcome.code(), Some(Code::CONTENT));
//!
//! server.stop();
//! server.join().unwrap();
//! ```

#![cfg_attr(any(docsrs, feature = "docs"), feature(doc_cfg))]
// -
// style
#![allow(clippy::unused_unit)]
// -
// deny
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(missing_copy_implementations)]
#![cfg_attr(not(test), deny(unsafe_code))]
// -
// warnings
#![cfg_attr(not(test), warn(unreachable_pub))]


/// Blocking CoAP client
pub mod blocking;

/// Runtime configuration
pub mod config;

/// Device identity and the credential token derived from it
pub mod credential;

/// Client errors
pub mod error;

/// Log formatting helpers
pub mod logging;

/// Network abstractions
pub mod net;

/// Requests
pub mod req;

/// Extensions to Result
pub mod result_ext;

/// customizable retrying of fallible operations
pub mod retry;

/// Sensor readings
pub mod sensor;

/// Credential-checking CoAP peer
pub mod server;

/// `std`-only newt stuff
pub mod std;

/// Time abstractions
pub mod time;
