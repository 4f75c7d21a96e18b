/*!
    IOb-NCO numerically controlled oscillator

    [Nco] drives the actual peripheral, [NcoEmulation] stands for it on a host and accounts the time it stayed enabled.
*/

#[cfg(feature = "std")]
mod emulation;

#[cfg(feature = "std")]
pub use emulation::*;

use crate::registers::{self, Csr, Mmio};


/// soft reset and enable controls, common to the peripheral and its emulation
pub trait NcoControl {
    /// reset the oscillator if the low bit of `value` is set
    fn set_soft_reset(&mut self, value: u8);
    /// the low bit of `value` becomes the enable state
    fn set_enable(&mut self, value: u8);
}

/// nco driver owning its register window
pub struct Nco<C> {
    csr: C,
}
impl Nco<Mmio> {
    /**
        driver for the peripheral at the given base address

        # Safety

        `base_address` must be the register window of an IOb-NCO, see [Mmio::new]
    */
    pub unsafe fn at(base_address: usize) -> Self {
        // SAFETY: forwarded to the caller
        Self::new(unsafe {Mmio::new(base_address)})
    }
}
impl<C: Csr> Nco<C> {
    pub fn new(csr: C) -> Self {
        Self {csr}
    }
    /// set the output period, in input clock cycles
    pub fn set_period(&mut self, period: u32) {
        self.csr.set(registers::nco::PERIOD, period);
    }
    /// register window
    pub fn csr(&self) -> &C {&self.csr}
    /// give back the register window
    pub fn release(self) -> C {self.csr}
}
impl<C: Csr> NcoControl for Nco<C> {
    fn set_soft_reset(&mut self, value: u8) {
        self.csr.set(registers::nco::SOFT_RESET, value & 1);
    }
    fn set_enable(&mut self, value: u8) {
        self.csr.set(registers::nco::ENABLE, value & 1);
    }
}
