use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Anything that can produce sensor readings
pub trait ReadingSource {
  /// Take a reading
  fn read(&mut self) -> Reading;
}

/// One temperature / humidity sample.
///
/// Serializes to the JSON body the uplink reports:
/// ```
/// use newt::sensor::Reading;
///
/// let r = Reading { temperature: 21.5,
///                   humidity: 40.0,
///                   abnormal: false };
/// assert_eq!(serde_json::to_string(&r).unwrap(),
///            r#"{"temp":21.5,"humidity":40.0,"abn":0}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
  /// Degrees Celsius
  #[serde(rename = "temp")]
  pub temperature: f64,
  /// Relative humidity, percent
  pub humidity: f64,
  /// Whether the sample is out of the plausible range
  #[serde(rename = "abn", with = "flag")]
  pub abnormal: bool,
}

/// `bool` as `0` / `1`
mod flag {
  use serde::{Deserialize, Deserializer, Serializer};

  pub(super) fn serialize<S: Serializer>(b: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*b))
  }

  pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    u8::deserialize(d).map(|n| n != 0)
  }
}

/// Normal temperature range, °C
pub const TEMPERATURE: (f64, f64) = (10.0, 35.0);
/// Normal humidity range, %
pub const HUMIDITY: (f64, f64) = (30.0, 70.0);
/// Temperature range of an abnormal reading, °C
pub const ABNORMAL_TEMPERATURE: (f64, f64) = (-10.0, 80.0);
/// Humidity range of an abnormal reading, %
pub const ABNORMAL_HUMIDITY: (f64, f64) = (-5.0, 110.0);
/// One reading in this many is abnormal, on average
pub const ABNORMAL_ONE_IN: u32 = 20;

/// Pseudo-random readings; mostly plausible, occasionally not
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
  rng: ChaCha8Rng,
}

impl SimulatedSensor {
  /// Create a sensor whose sequence of readings is determined by `seed`
  pub fn seeded(seed: u64) -> Self {
    Self { rng: ChaCha8Rng::seed_from_u64(seed) }
  }

  fn sample(&mut self, (min, max): (f64, f64)) -> f64 {
    let x = self.rng.gen_range(min..=max);
    (x * 10.0).round() / 10.0
  }
}

impl ReadingSource for SimulatedSensor {
  fn read(&mut self) -> Reading {
    if self.rng.gen_range(0..ABNORMAL_ONE_IN) == 0 {
      Reading { temperature: self.sample(ABNORMAL_TEMPERATURE),
                humidity: self.sample(ABNORMAL_HUMIDITY),
                abnormal: true }
    } else {
      Reading { temperature: self.sample(TEMPERATURE),
                humidity: self.sample(HUMIDITY),
                abnormal: false }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn within((min, max): (f64, f64), x: f64) -> bool {
    x >= min && x <= max
  }

  #[test]
  fn same_seed_same_readings() {
    let mut a = SimulatedSensor::seeded(7);
    let mut b = SimulatedSensor::seeded(7);
    for _ in 0..50 {
      assert_eq!(a.read(), b.read());
    }
  }

  #[test]
  fn ranges_and_rate() {
    let mut sensor = SimulatedSensor::seeded(42);
    let readings = (0..10_000).map(|_| sensor.read()).collect::<Vec<_>>();

    for r in readings.iter() {
      let (t, h) = match r.abnormal {
        | true => (ABNORMAL_TEMPERATURE, ABNORMAL_HUMIDITY),
        | false => (TEMPERATURE, HUMIDITY),
      };
      assert!(within(t, r.temperature), "{:?}", r);
      assert!(within(h, r.humidity), "{:?}", r);
      assert_eq!((r.temperature * 10.0).round() / 10.0, r.temperature);
    }

    let abnormal = readings.iter().filter(|r| r.abnormal).count();
    assert!((300..=700).contains(&abnormal), "{} abnormal readings", abnormal);
  }

  #[test]
  fn json_shape() {
    let r = Reading { temperature: -3.2,
                      humidity: 104.9,
                      abnormal: true };
    let json = serde_json::to_string(&r).unwrap();
    assert_eq!(json, r#"{"temp":-3.2,"humidity":104.9,"abn":1}"#);
    assert_eq!(serde_json::from_str::<Reading>(&json).unwrap(), r);
  }
}
