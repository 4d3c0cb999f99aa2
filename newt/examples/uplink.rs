use std::net::{Ipv4Addr, SocketAddr};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use newt::blocking::Client;
use newt::config::{Config, Fault, Msg, ServerConfig};
use newt::credential::{CredentialToken, DeviceTriple};
use newt::req::Req;
use newt::sensor::{ReadingSource, SimulatedSensor};
use newt::server;
use newt_msg::Type;

/// Report simulated sensor readings to a local credential-checking peer
#[derive(Parser, Debug)]
struct Args {
  /// Seconds between reports
  #[arg(long, default_value_t = 2)]
  period: u64,
  /// Link conditions to simulate
  #[arg(long, value_enum, default_value_t = Net::Ok)]
  net: Net,
  /// Confirmable or non-confirmable requests
  #[arg(long = "type", value_enum, default_value_t = Kind::Con)]
  ty: Kind,
  /// Number of reports to send
  #[arg(long, default_value_t = 20)]
  count: u32,
  /// Port the peer listens on
  #[arg(long, default_value_t = 5683)]
  port: u16,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Net {
  Ok,
  Timeout,
  Down,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
  Con,
  Non,
}

fn main() {
  simple_logger::init_with_level(log::Level::Info).unwrap();
  let args = Args::parse();

  let device = DeviceTriple::new("a1b2c3d4", "dev001", "secret123");
  let server = server::spawn(ServerConfig { port: args.port,
                                            device: device.clone(),
                                            ..ServerConfig::default() }).unwrap();

  let config = Config { msg: Msg { ty: match args.ty {
                                     | Kind::Con => Type::Con,
                                     | Kind::Non => Type::Non,
                                   },
                                   ..Msg::default() },
                        fault: match args.net {
                          | Net::Ok => Fault::None,
                          | Net::Timeout => Fault::SimulatedTimeout,
                          | Net::Down => Fault::LinkDown,
                        } };

  let dest = SocketAddr::from((Ipv4Addr::LOCALHOST, server.addr().port()));
  let mut client = Client::try_new_std(dest, config).unwrap();

  let seed = SystemTime::now().duration_since(UNIX_EPOCH)
                              .map(|d| d.as_secs())
                              .unwrap_or_default();
  let mut sensor = SimulatedSensor::seeded(seed);
  let token = CredentialToken::derive(&device);

  log::info!("reporting every {}s, net={:?}, type={:?}",
             args.period,
             args.net,
             args.ty);

  for _ in 0..args.count {
    let reading = sensor.read();
    let req = Req::post("things/upload").host("localhost")
                                        .query(token.query())
                                        .json(&reading)
                                        .unwrap();

    match client.send(&req) {
      | Ok(outcome) if outcome.is_accepted() => {
        log::info!("sent temp={:.1}, humidity={:.1} -> ok ({:#06x})",
                   reading.temperature,
                   reading.humidity,
                   outcome.id().0)
      },
      | Ok(outcome) => log::warn!("sent temp={:.1}, humidity={:.1} -> rejected {:?} ({:#06x})",
                                  reading.temperature,
                                  reading.humidity,
                                  outcome.code(),
                                  outcome.id().0),
      | Err(e) => log::error!("sent temp={:.1}, humidity={:.1} -> failed: {}",
                              reading.temperature,
                              reading.humidity,
                              e),
    }

    std::thread::sleep(Duration::from_secs(args.period));
  }

  server.stop();
  server.join().unwrap();
}
