use std::time::Instant;
use log::*;

use super::NcoControl;


/// frequency of the emulated embedded clock
pub const FREQ: u64 = 100_000_000;

/// monotonic tick counter of the host
pub trait Clock {
    /// number of ticks in one second
    const TICKS_PER_SECOND: u64;
    /// current tick count
    fn ticks(&self) -> u64;
}

/// host wall clock, counting nanoseconds since its creation
#[derive(Copy, Clone, Debug)]
pub struct HostClock {
    origin: Instant,
}
impl HostClock {
    pub fn new() -> Self {
        Self {origin: Instant::now()}
    }
}
impl Default for HostClock {
    fn default() -> Self {Self::new()}
}
impl Clock for HostClock {
    const TICKS_PER_SECOND: u64 = 1_000_000_000;
    fn ticks(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}
impl<K: Clock> Clock for &K {
    const TICKS_PER_SECOND: u64 = K::TICKS_PER_SECOND;
    fn ticks(&self) -> u64 {(**self).ticks()}
}


/**
    host emulation of the nco, accumulating the host time it stays enabled

    intervals accumulate across successive enable periods until a soft reset
*/
#[derive(Debug)]
pub struct NcoEmulation<K = HostClock> {
    clock: K,
    base: u32,
    frequency: u64,
    enabled: bool,
    /// host time of the last enabling
    start: u64,
    /// host time of the last disabling
    end: u64,
    /// host ticks spent enabled
    accumulated: u64,
}
impl NcoEmulation<HostClock> {
    pub fn new() -> Self {
        Self::with_clock(HostClock::new())
    }
}
impl Default for NcoEmulation<HostClock> {
    fn default() -> Self {Self::new()}
}
impl<K: Clock> NcoEmulation<K> {
    /// emulation running on the given clock, emulating a [FREQ] embedded clock
    pub fn with_clock(clock: K) -> Self {
        Self {
            clock,
            base: 0,
            frequency: FREQ,
            enabled: false,
            start: 0,
            end: 0,
            accumulated: 0,
        }
    }
    /// change the emulated embedded clock frequency
    pub fn with_frequency(mut self, frequency: u64) -> Self {
        self.frequency = frequency;
        self
    }
    /// record the peripheral base address, it has no effect on the emulation
    pub fn init_baseaddr(&mut self, address: u32) {
        self.base = address;
    }
    pub fn base(&self) -> u32 {self.base}
    pub fn clock(&self) -> &K {&self.clock}
    pub fn enabled(&self) -> bool {self.enabled}
    /// host ticks accumulated while enabled, the running interval excluded
    pub fn elapsed_ticks(&self) -> u64 {self.accumulated}
    /// accumulated time converted to cycles of the emulated embedded clock
    pub fn elapsed_cycles(&self) -> u64 {
        let cycles = u128::from(self.accumulated) * u128::from(self.frequency) / u128::from(K::TICKS_PER_SECOND);
        u64::try_from(cycles).unwrap_or(u64::MAX)
    }
}
impl<K: Clock> NcoControl for NcoEmulation<K> {
    fn set_soft_reset(&mut self, value: u8) {
        if value & 1 != 0 {
            trace!("nco soft reset");
            self.start = 0;
            self.end = 0;
            self.accumulated = 0;
            self.enabled = false;
        }
    }
    fn set_enable(&mut self, value: u8) {
        let enable = value & 1 != 0;
        match (self.enabled, enable) {
            (false, true) => {
                self.start = self.clock.ticks();
            },
            (true, false) => {
                self.end = self.clock.ticks();
                self.accumulated = self.accumulated.saturating_add(self.end.saturating_sub(self.start));
                trace!("nco accumulated {} ticks", self.accumulated);
                self.start = 0;
                self.end = 0;
            },
            _ => {},
        }
        self.enabled = enable;
    }
}
