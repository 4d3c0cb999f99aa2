use embedded_time::duration::Milliseconds;
use embedded_time::Instant;

/// A duration, in milliseconds
pub type Millis = Milliseconds<u64>;

/// Supertrait of [`embedded_time::Clock`] pinning the
/// type of "ticks" to u64
pub trait Clock: embedded_time::Clock<T = u64> {}
impl<C: embedded_time::Clock<T = u64>> Clock for C {}

/// Milliseconds elapsed between two instants.
///
/// Saturates to zero if `later` is actually earlier than `earlier`.
pub fn millis_between<C: Clock>(earlier: Instant<C>, later: Instant<C>) -> Millis {
  later.checked_duration_since(&earlier)
       .and_then(|d| Millis::try_from(d).ok())
       .unwrap_or(Milliseconds(0))
}
