/*!
    IOb-UART driver

    every operation busy waits on the peripheral's ready flags, without timeout: an unresponsive peripheral hangs the caller. [Uart::try_getc], [Uart::try_putc] and [Uart::getc_timeout] are the non-blocking alternatives.
*/

use core::{
    convert::Infallible,
    hint::spin_loop,
    fmt,
    };
use log::*;

use crate::{
    command::Command,
    registers::{self, Csr, Mmio},
    transfer::{self, Error},
    };
#[cfg(feature = "alloc")]
use alloc::vec::Vec;


/// prefix of the driver's messages
pub const PROGNAME: &str = "IOb-UART";

/**
    division factor for the given clock and baudrate, ie. clock cycles per symbol

    for instance `divisor(100_000_000, 115_200) == 868`
*/
pub const fn divisor(clock_hz: u32, baudrate: u32) -> u16 {
    let div = (clock_hz as u64 + baudrate as u64 / 2) / baudrate as u64;
    if div > u16::MAX as u64  {u16::MAX}
    else  {div as u16}
}

/// uart driver owning its register window
pub struct Uart<C> {
    csr: C,
    div: u16,
}
impl Uart<Mmio> {
    /**
        driver for the peripheral at the given base address, initialized with the given division factor

        # Safety

        `base_address` must be the register window of an IOb-UART, see [Mmio::new]
    */
    pub unsafe fn at(base_address: usize, div: u16) -> Self {
        // SAFETY: forwarded to the caller
        let mut uart = Self::new(unsafe {Mmio::new(base_address)});
        uart.init(div);
        uart
    }
}
impl<C: Csr> Uart<C> {
    /// take ownership of a register window, nothing is written until [Self::init]
    pub fn new(csr: C) -> Self {
        Self {csr, div: 0}
    }
    /**
        reset the peripheral, set the division factor and enable transmission and reception

        the division factor is the number of clock cycles per symbol, see [divisor]. Calling it again simply reprograms the peripheral.
    */
    pub fn init(&mut self, div: u16) {
        self.csr.set(registers::uart::SOFT_RESET, 1);
        self.csr.set(registers::uart::SOFT_RESET, 0);
        self.csr.set(registers::uart::DIV, div);
        self.csr.set(registers::uart::TX_EN, 1);
        self.csr.set(registers::uart::RX_EN, 1);
        self.div = div;
    }
    /// last programmed division factor
    pub fn div(&self) -> u16 {self.div}
    /// register window
    pub fn csr(&self) -> &C {&self.csr}
    /// give back the register window
    pub fn release(self) -> C {self.csr}

    /// active wait until a new byte can be transmitted
    pub fn txwait(&mut self) {
        while ! self.tx_ready() {
            spin_loop();
        }
    }
    /// active wait until a received byte is available
    pub fn rxwait(&mut self) {
        while ! self.rx_ready() {
            spin_loop();
        }
    }
    fn tx_ready(&mut self) -> bool {
        self.csr.get(registers::uart::TX_READY) & 1 != 0
    }
    fn rx_ready(&mut self) -> bool {
        self.csr.get(registers::uart::RX_READY) & 1 != 0
    }

    /// transmit a byte, waiting for the transmitter to be ready
    pub fn putc(&mut self, c: u8) {
        self.txwait();
        self.csr.set(registers::uart::TX_DATA, c);
    }
    /// receive a byte, waiting for one to arrive
    pub fn getc(&mut self) -> u8 {
        self.rxwait();
        self.csr.get(registers::uart::RX_DATA)
    }
    /// transmit a byte only if the transmitter is ready
    pub fn try_putc(&mut self, c: u8) -> nb::Result<(), Infallible> {
        if ! self.tx_ready()
            {return Err(nb::Error::WouldBlock)}
        self.csr.set(registers::uart::TX_DATA, c);
        Ok(())
    }
    /// receive a byte only if one is available
    pub fn try_getc(&mut self) -> nb::Result<u8, Infallible> {
        if ! self.rx_ready()
            {return Err(nb::Error::WouldBlock)}
        Ok(self.csr.get(registers::uart::RX_DATA))
    }
    /// receive a byte, giving up after polling the peripheral `max_polls` times
    pub fn getc_timeout(&mut self, max_polls: usize) -> Result<u8, Error> {
        for _ in 0 .. max_polls {
            if let Ok(c) = self.try_getc()
                {return Ok(c)}
            spin_loop();
        }
        Err(Error::Timeout)
    }

    /// transmit a string, stopping at its first null byte if any
    pub fn puts(&mut self, s: &str) {
        for c in s.bytes().take_while(|&c| c != 0) {
            self.putc(c);
        }
    }
    /// open a console session: send `ENQ` then drop incoming bytes until `ACK`
    pub fn connect(&mut self) {
        self.putc(Command::Enq.byte());
        while self.getc() != Command::Ack.byte() {}
        debug!("{}: connected", PROGNAME);
    }
    /// close the console session: send `EOT` and wait for its transmission
    pub fn finish(&mut self) {
        self.putc(Command::Eot.byte());
        self.txwait();
    }

    /// send a file, see [transfer::send_file]
    pub fn sendfile(&mut self, file_name: &str, mem: &[u8]) -> Result<(), Error> {
        transfer::send_file(self, file_name, mem)
    }
    /// request a file into the given buffer and return its size, see [transfer::receive_file_into]
    pub fn recvfile_into(&mut self, file_name: &str, mem: &mut [u8]) -> Result<u32, Error> {
        transfer::receive_file_into(self, file_name, mem)
    }
    /// request a file into a buffer allocated for it, see [transfer::receive_file]
    #[cfg(feature = "alloc")]
    pub fn recvfile(&mut self, file_name: &str) -> Result<Vec<u8>, Error> {
        transfer::receive_file(self, file_name)
    }
}


impl<C> embedded_io::ErrorType for Uart<C> {
    type Error = Infallible;
}
impl<C: Csr> embedded_io::Write for Uart<C> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &c in buf {
            self.putc(c);
        }
        Ok(buf.len())
    }
    fn flush(&mut self) -> Result<(), Self::Error> {
        self.txwait();
        Ok(())
    }
}
impl<C: Csr> embedded_io::Read for Uart<C> {
    /// block for the first byte, then take whatever else is already available
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let Some((first, rest)) = buf.split_first_mut()
            else {return Ok(0)};
        *first = self.getc();
        let mut count = 1;
        for dst in rest {
            match self.try_getc() {
                Ok(c) => *dst = c,
                Err(_) => break,
            }
            count += 1;
        }
        Ok(count)
    }
}
impl<C: Csr> fmt::Write for Uart<C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.bytes() {
            self.putc(c);
        }
        Ok(())
    }
}
