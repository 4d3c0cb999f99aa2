use embedded_time::duration::Milliseconds;
use embedded_time::Instant;

use crate::time::{millis_between, Clock, Millis};

/// A non-blocking timer that allows a fixed-delay or exponential-backoff retry,
/// that lives alongside some operation to retry.
///
/// It does not _contain_ the work to be done; the caller performs the
/// first attempt, then asks the timer what to do each time it polls.
///
/// The wait is measured from the most recent attempt, so a caller that
/// polls late never gets a burst of back-to-back retries.
///
/// ```
/// use embedded_time::clock::Clock;
/// use embedded_time::duration::Milliseconds;
/// use newt::retry;
///
/// let mut called = false;
/// let mut fails_once = || -> Result<(), ()> {
///   // ...
///   # if !called {
///   #   called = true;
///   #   Err(())
///   # } else {
///   #   Ok(())
///   # }
/// };
///
/// let clock = newt::std::Clock::new();
/// let now = || clock.try_now().unwrap();
/// let strategy = retry::Strategy::Delay { delay: Milliseconds(1) };
/// let mut retry = retry::RetryTimer::new(now(), strategy, retry::Attempts(2));
///
/// while let Err(_) = fails_once() {
///   match nb::block!(retry.what_should_i_do(now())) {
///     | Ok(retry::YouShould::Retry) => continue,
///     | Ok(retry::YouShould::Cry) => panic!("no more attempts! it failed more than once!!"),
///     | Err(never) => match never {},
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RetryTimer<C: Clock> {
  last_attempt: Instant<C>,
  wait: Millis,
  strategy: Strategy,
  attempts: Attempts,
  max_attempts: Attempts,
}

/// A number of attempts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attempts(pub u16);

/// Result of [`RetryTimer::what_should_i_do`].
///
/// This tells you if a retry should be attempted or not.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum YouShould {
  /// Attempts have been exhausted and the work that is
  /// being retried should be considered poisoned.
  Cry,
  /// A retry should be performed
  Retry,
}

impl<C: Clock> RetryTimer<C> {
  /// Create a new retrier, counting `start` as the first attempt
  pub fn new(start: Instant<C>, strategy: Strategy, max_attempts: Attempts) -> Self {
    Self { last_attempt: start,
           wait: strategy.initial(),
           strategy,
           attempts: Attempts(1),
           max_attempts }
  }

  /// When the thing we keep trying fails, invoke this to
  /// tell the retrytimer "it failed again! what do I do??"
  ///
  /// Returns `nb::Error::WouldBlock` until the current wait has elapsed.
  /// After that, yields [`YouShould::Cry`] if every attempt has been
  /// used, otherwise counts a new attempt, grows the wait according to
  /// the [`Strategy`] and yields [`YouShould::Retry`].
  pub fn what_should_i_do(&mut self,
                          now: Instant<C>)
                          -> nb::Result<YouShould, core::convert::Infallible> {
    if !self.is_ready(millis_between(self.last_attempt, now)) {
      return Err(nb::Error::WouldBlock);
    }

    if self.attempts >= self.max_attempts {
      Ok(YouShould::Cry)
    } else {
      self.attempts.0 += 1;
      self.last_attempt = now;
      self.wait = self.strategy.next_wait(self.wait);
      Ok(YouShould::Retry)
    }
  }

  /// Has the current wait elapsed?
  pub fn is_ready(&self, Milliseconds(since_last): Millis) -> bool {
    since_last >= self.wait.0
  }

  /// Number of attempts made so far, including the first
  pub fn attempts(&self) -> Attempts {
    self.attempts
  }

  /// How long we wait after the most recent attempt
  pub fn current_wait(&self) -> Millis {
    self.wait
  }
}

/// Strategy to employ when retrying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
  /// Wait `init` after the first attempt,
  /// and double the wait after each failed attempt.
  Exponential {
    /// Wait after the first attempt
    init: Millis,
  },
  /// Wait the same `delay` after every attempt.
  Delay {
    /// Wait between attempts
    delay: Millis,
  },
}

impl Strategy {
  /// The wait following the first attempt
  pub fn initial(&self) -> Millis {
    match *self {
      | Self::Exponential { init } => init,
      | Self::Delay { delay } => delay,
    }
  }

  /// The wait following `prev`
  pub fn next_wait(&self, Milliseconds(prev): Millis) -> Millis {
    match self {
      | Self::Exponential { .. } => Milliseconds(prev.saturating_mul(2)),
      | Self::Delay { delay } => *delay,
    }
  }

  /// Get the amount of time this strategy will take if all attempts fail
  ///
  /// ```
  /// use embedded_time::duration::Milliseconds;
  /// use newt::retry::{Attempts, Strategy};
  ///
  /// let exp = Strategy::Exponential { init: Milliseconds(1000) };
  /// // 1000 + 2000 + 4000 + 8000
  /// assert_eq!(exp.max_time(Attempts(4)), Milliseconds(15_000u64));
  /// ```
  pub fn max_time(&self, max_attempts: Attempts) -> Millis {
    let mut wait = self.initial();
    let mut total = 0u64;

    for _ in 0..max_attempts.0 {
      total = total.saturating_add(wait.0);
      wait = self.next_wait(wait);
    }

    Milliseconds(total)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::test::ClockMock;

  fn at(clock: &ClockMock, ms: u64) -> Instant<ClockMock> {
    clock.set(ms);
    Instant::new(ms)
  }

  #[test]
  fn delay_retrier() {
    let clock = ClockMock::new();
    let mut retry = RetryTimer::new(at(&clock, 0),
                                    Strategy::Delay { delay: Milliseconds(1000) },
                                    Attempts(3));

    // attempt 1 happens before asking what_should_i_do

    assert_eq!(retry.what_should_i_do(at(&clock, 999)).unwrap_err(),
               nb::Error::WouldBlock);
    assert_eq!(retry.what_should_i_do(at(&clock, 1000)).unwrap(),
               YouShould::Retry);

    // waits are measured from the last attempt, not from the start
    assert_eq!(retry.what_should_i_do(at(&clock, 10_000)).unwrap(),
               YouShould::Retry);
    assert_eq!(retry.what_should_i_do(at(&clock, 10_500)).unwrap_err(),
               nb::Error::WouldBlock);

    assert_eq!(retry.what_should_i_do(at(&clock, 11_000)).unwrap(),
               YouShould::Cry);
    assert_eq!(retry.attempts(), Attempts(3));
  }

  #[test]
  fn exponential_retrier() {
    let clock = ClockMock::new();
    let mut retry = RetryTimer::new(at(&clock, 0),
                                    Strategy::Exponential { init: Milliseconds(1000) },
                                    Attempts(4));

    let mut sends = vec![0u64];
    for ms in 1..=20_000u64 {
      match retry.what_should_i_do(at(&clock, ms)) {
        | Ok(YouShould::Retry) => sends.push(ms),
        | Ok(YouShould::Cry) => {
          assert_eq!(ms, 15_000);
          break;
        },
        | Err(_) => continue,
      }
    }

    assert_eq!(sends, vec![0, 1000, 3000, 7000]);
  }

  #[test]
  fn single_attempt_cries_after_wait() {
    let clock = ClockMock::new();
    let mut retry = RetryTimer::new(at(&clock, 0),
                                    Strategy::Exponential { init: Milliseconds(50) },
                                    Attempts(1));

    assert_eq!(retry.what_should_i_do(at(&clock, 49)).unwrap_err(),
               nb::Error::WouldBlock);
    assert_eq!(retry.what_should_i_do(at(&clock, 50)).unwrap(),
               YouShould::Cry);
  }

  #[test]
  fn max_time() {
    let delay = Strategy::Delay { delay: Milliseconds(10) };
    assert_eq!(delay.max_time(Attempts(4)), Milliseconds(40u64));
    assert_eq!(delay.max_time(Attempts(0)), Milliseconds(0u64));
  }
}
