//! Readiness polling
//!
//! After a state-changing command the chip raises the sequence-change flag
//! until its internal sequence settles. [`ReadinessPoller`] is the pure
//! state machine; [`Elite::wait_ready`] feeds it status reads and clock
//! samples, sleeping between probes.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use super::Elite;
use crate::error::{Error, Result};
use crate::hal::timer::Clock;
use crate::types::{CommandCode, DriverState};

/// Poller state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollState {
    /// Sequence change still in progress, probe again
    Polling,
    /// Chip ready (terminal)
    Ready,
    /// Budget exhausted (terminal)
    TimedOut,
}

/// Busy/ready state machine with a millisecond budget
#[derive(Clone, Copy, Debug)]
pub struct ReadinessPoller {
    started_ms: u64,
    budget_ms: u32,
    last_ms: u64,
    probes: u32,
    state: PollState,
}

impl ReadinessPoller {
    /// Start polling at `now_ms` with `budget_ms` to spare
    #[must_use]
    pub const fn start(now_ms: u64, budget_ms: u32) -> Self {
        Self {
            started_ms: now_ms,
            budget_ms,
            last_ms: now_ms,
            probes: 0,
            state: PollState::Polling,
        }
    }

    /// Feed one status probe taken at `now_ms`
    ///
    /// A cleared sequence-change flag wins over an exhausted budget. Once
    /// terminal, further probes are ignored.
    pub fn on_status(&mut self, status: DriverState, now_ms: u64) -> PollState {
        if self.state != PollState::Polling {
            return self.state;
        }

        self.probes += 1;
        self.last_ms = now_ms;
        self.state = if !status.sequence_changing {
            PollState::Ready
        } else if self.elapsed_ms() >= u64::from(self.budget_ms) {
            PollState::TimedOut
        } else {
            PollState::Polling
        };
        self.state
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> PollState {
        self.state
    }

    /// Probes fed so far
    #[must_use]
    pub const fn probes(&self) -> u32 {
        self.probes
    }

    /// Time between start and the latest probe
    #[must_use]
    pub const fn elapsed_ms(&self) -> u64 {
        self.last_ms.saturating_sub(self.started_ms)
    }
}

impl<I2C, RST, D, C> Elite<'_, I2C, RST, D, C>
where
    I2C: I2c,
    RST: OutputPin,
    D: DelayNs,
    C: Clock,
{
    /// Read the tuner driver status register
    ///
    /// This is the only place the driver's status flags are updated.
    pub async fn read_tds(&mut self) -> Result<DriverState> {
        let response = self.command_exchange(CommandCode::READ_TDS, &[], 2).await?;
        let state = DriverState::from_response(&response)?;
        debug!(
            "tds: busy={} coll={} seq_chg={}",
            state.busy, state.collision, state.sequence_changing
        );
        self.state = state;
        Ok(state)
    }

    /// Poll the status register until the sequence-change flag clears
    ///
    /// Fails with [`Error::ReadinessTimeout`] once `budget_ms` has elapsed
    /// with the flag still set.
    pub async fn wait_ready(&mut self, budget_ms: u32) -> Result<()> {
        let mut poller = ReadinessPoller::start(self.clock.now_ms(), budget_ms);

        loop {
            let status = self.read_tds().await?;
            match poller.on_status(status, self.clock.now_ms()) {
                PollState::Ready => return Ok(()),
                PollState::TimedOut => {
                    warn!(
                        "not ready after {} ms ({} probes)",
                        poller.elapsed_ms(),
                        poller.probes()
                    );
                    return Err(Error::ReadinessTimeout {
                        elapsed_ms: poller.elapsed_ms(),
                    });
                }
                PollState::Polling => self.delay.delay_ms(self.config.poll_interval_ms).await,
            }
        }
    }
}
