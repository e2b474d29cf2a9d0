//! Time Source
//!
//! Monotonic millisecond clock used by the readiness poller. Sleeping goes
//! through `embedded_hal_async::delay::DelayNs`; reading the time goes
//! through [`Clock`], so tests can drive both from a simulated timeline.

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embedded")]
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embedded")]
impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}
