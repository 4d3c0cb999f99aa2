use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use newt::blocking::{Client, Outcome};
use newt::config::{Config, Fault, Msg, ServerConfig};
use newt::credential::{CredentialToken, DeviceTriple};
use newt::error::What;
use newt::req::Req;
use newt::retry::Attempts;
use newt::server::{self, ServerHandle};
use newt_msg::known::ContentFormat;
use newt_msg::{Code, Id, Message, TryFromBytes, Type};

fn init_log() {
  simple_logger::init_with_level(log::Level::Debug).ok();
}

fn device() -> DeviceTriple {
  DeviceTriple::new("a1b2c3d4", "dev001", "secret123")
}

fn start(device: DeviceTriple) -> ServerHandle {
  init_log();
  server::spawn(ServerConfig { ip: Ipv4Addr::LOCALHOST.into(),
                               port: 0,
                               device,
                               ..ServerConfig::default() }).unwrap()
}

fn upload(device: &DeviceTriple) -> Req {
  Req::post("things/upload").host("localhost")
                            .query(CredentialToken::derive(device).query())
                            .content_format(ContentFormat::Json)
                            .payload(r#"{"temp":21.5,"humidity":40.0,"abn":0}"#)
}

fn stop(server: ServerHandle) {
  server.stop();
  server.join().unwrap();
}

#[test]
fn accepted_with_expected_token() {
  let server = start(device());
  let mut client = Client::try_new_std(server.addr(), Config::default()).unwrap();

  let first = client.send(&upload(&device())).unwrap();
  let second = client.send(&upload(&device())).unwrap();

  assert_eq!(first,
             Outcome::Response { id: Id(0),
                                 code: Code::CONTENT });
  assert_eq!(second,
             Outcome::Response { id: Id(1),
                                 code: Code::CONTENT });

  stop(server);
}

#[test]
fn rejected_with_other_token() {
  let server = start(device());
  let mut client = Client::try_new_std(server.addr(), Config::default()).unwrap();

  let imposter = DeviceTriple::new("a1b2c3d4", "dev001", "secret124");
  let outcome = client.send(&upload(&imposter)).unwrap();

  assert!(outcome.is_rejected());
  assert_eq!(outcome.code(), Some(Code::UNAUTHORIZED));
  assert_eq!(outcome.id(), Id(0));

  stop(server);
}

#[test]
fn non_is_fire_and_forget() {
  let server = start(device());
  let config = Config { msg: Msg { ty: Type::Non,
                                   ..Msg::default() },
                        ..Config::default() };
  let mut client = Client::try_new_std(server.addr(), config).unwrap();

  assert_eq!(client.send(&upload(&device())).unwrap(),
             Outcome::Sent { id: Id(0) });

  stop(server);
}

#[test]
fn malformed_datagrams_do_not_stop_the_server() {
  let server = start(device());

  let garbage = UdpSocket::bind("127.0.0.1:0").unwrap();
  garbage.set_read_timeout(Some(Duration::from_millis(200)))
         .unwrap();
  garbage.send_to(&[0x40, 0x02], server.addr()).unwrap();
  garbage.send_to(&[0x40, 0x02, 0x00, 0x01, 0xFF], server.addr())
         .unwrap();

  // no reply to either
  let mut buf = [0u8; 64];
  assert!(garbage.recv_from(&mut buf).is_err());

  let mut client = Client::try_new_std(server.addr(), Config::default()).unwrap();
  assert_eq!(client.send(&upload(&device())).unwrap().code(),
             Some(Code::CONTENT));

  stop(server);
}

#[test]
fn servers_coexist() {
  let other = DeviceTriple::new("ffff0000", "dev002", "hunter2");
  let a = start(device());
  let b = start(other.clone());
  assert_ne!(a.addr(), b.addr());

  let mut to_a = Client::try_new_std(a.addr(), Config::default()).unwrap();
  let mut to_b = Client::try_new_std(b.addr(), Config::default()).unwrap();

  assert!(to_a.send(&upload(&device())).unwrap().is_accepted());
  assert!(to_b.send(&upload(&device())).unwrap().is_rejected());
  assert!(to_b.send(&upload(&other)).unwrap().is_accepted());

  stop(a);
  stop(b);
}

#[test]
fn silent_peer_sees_identical_retransmissions() {
  init_log();
  let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
  silent.set_read_timeout(Some(Duration::from_millis(500)))
        .unwrap();
  let dest: SocketAddr = silent.local_addr().unwrap();

  let config = Config { fault: Fault::SimulatedTimeout,
                        ..Config::default() };
  let mut client = Client::try_new_std(dest, config).unwrap();

  let err = client.send(&upload(&device())).unwrap_err();
  assert!(matches!(err.what, What::NoResponse { attempts: Attempts(4) }));

  let mut buf = [0u8; 1152];
  let dgrams = (0..4).map(|_| {
                       let (n, _) = silent.recv_from(&mut buf).unwrap();
                       buf[..n].to_vec()
                     })
                     .collect::<Vec<_>>();

  assert!(dgrams.iter().all(|d| d == &dgrams[0]));
  let msg = Message::try_from_bytes(&dgrams[0]).unwrap();
  assert_eq!(msg.id, Id(0));
  assert_eq!(msg.ty, Type::Con);
  assert_eq!(msg.token, client.token());

  // nothing beyond the retry budget
  assert!(silent.recv_from(&mut buf).is_err());
}

#[test]
fn link_down_reaches_nobody() {
  let server = start(device());
  let config = Config { fault: Fault::LinkDown,
                        ..Config::default() };
  let mut client = Client::try_new_std(server.addr(), config).unwrap();

  let err = client.send(&upload(&device())).unwrap_err();
  assert!(matches!(err.what, What::TransportUnavailable));

  stop(server);
}
