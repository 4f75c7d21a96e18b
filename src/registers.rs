/*!
    control/status registers of the iob peripherals

    each register is described by its serializable integer type and a constant of type [Register] defining its offset in the peripheral's register window. Register windows are accessed through the [Csr] trait, [Mmio] being the one for actual hardware.
*/

use core::{
    marker::PhantomData,
    ptr::{read_volatile, write_volatile},
    };
use packbytes::{FromBytes, ToBytes, ByteArray};


/**
    a register is a typed offset in a peripheral's register window.

    it only holds the offset of the starting byte of the referenced value, hence can be created, copied or destroyed at no cost
*/
#[derive(PartialEq, Eq, Hash, Debug)]
pub struct Register<T> {
    addr: u32,
    ty: PhantomData<T>,
}
impl<T> Register<T> {
    /// create a register from its starting byte
    pub const fn new(address: u32) -> Self {
        Self{addr: address, ty: PhantomData}
    }
    /// starting byte in the register window
    pub const fn address(&self) -> u32 {self.addr}
}
impl<T: FromBytes> Register<T> {
    pub const fn size(&self) -> usize {T::Bytes::SIZE}
}
impl<T> Clone for Register<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Register<T> {}


/**
    read/write-at-offset access to a register window

    reads take `&mut self` since reading some registers has side effects (like popping a received byte)
*/
pub trait Csr {
    /// read `dst.len()` bytes starting at the given offset
    fn read(&mut self, address: u32, dst: &mut [u8]);
    /// write the given bytes starting at the given offset
    fn write(&mut self, address: u32, src: &[u8]);

    /// get the current register's value
    fn get<T: FromBytes>(&mut self, register: Register<T>) -> T {
        let mut dst = T::Bytes::zeroed();
        self.read(register.address(), dst.as_mut());
        T::from_le_bytes(dst)
    }
    /// set the given register's value
    fn set<T: ToBytes>(&mut self, register: Register<T>, value: T) {
        let src = value.to_le_bytes();
        self.write(register.address(), src.as_ref());
    }
}
impl<C: Csr + ?Sized> Csr for &mut C {
    fn read(&mut self, address: u32, dst: &mut [u8]) {(**self).read(address, dst)}
    fn write(&mut self, address: u32, src: &[u8]) {(**self).write(address, src)}
}

/**
    memory mapped register window

    every access is volatile and done with the width of the register, so the compiler never merges, reorders or elides them
*/
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}
impl Mmio {
    /**
        register window starting at the given base address

        # Safety

        `base` must be the start of a peripheral's register window, mapped for the whole lifetime of the returned value, and not accessed by anything else meanwhile
    */
    pub const unsafe fn new(base: usize) -> Self {
        Self {base}
    }
    /// base address of the window
    pub const fn base(&self) -> usize {self.base}

    fn at(&self, address: u32) -> usize {
        self.base + address as usize
    }
}
impl Csr for Mmio {
    fn read(&mut self, address: u32, dst: &mut [u8]) {
        let start = self.at(address);
        // SAFETY: the window was declared mapped at creation
        unsafe {
            match dst.len() {
                1 => dst[0] = read_volatile(start as *const u8),
                2 => dst.copy_from_slice(&read_volatile(start as *const u16).to_le_bytes()),
                4 => dst.copy_from_slice(&read_volatile(start as *const u32).to_le_bytes()),
                _ => for (i, byte) in dst.iter_mut().enumerate() {
                    *byte = read_volatile((start + i) as *const u8);
                },
            }
        }
    }
    fn write(&mut self, address: u32, src: &[u8]) {
        let start = self.at(address);
        // SAFETY: the window was declared mapped at creation
        unsafe {
            match *src {
                [b0] => write_volatile(start as *mut u8, b0),
                [b0, b1] => write_volatile(start as *mut u16, u16::from_le_bytes([b0, b1])),
                [b0, b1, b2, b3] => write_volatile(start as *mut u32, u32::from_le_bytes([b0, b1, b2, b3])),
                _ => for (i, &byte) in src.iter().enumerate() {
                    write_volatile((start + i) as *mut u8, byte);
                },
            }
        }
    }
}


/// IOb-UART register map
pub mod uart {
    use super::Register;

    /// write 1 then 0 to reset the peripheral
    pub const SOFT_RESET: Register<u8> = Register::new(0x0);
    /// clock cycles per transmitted symbol
    pub const DIV: Register<u16> = Register::new(0x2);
    /// byte to transmit
    pub const TX_DATA: Register<u8> = Register::new(0x4);
    /// transmitter enable
    pub const TX_EN: Register<u8> = Register::new(0x5);
    /// receiver enable
    pub const RX_EN: Register<u8> = Register::new(0x6);
    /// low bit set when a new byte can be transmitted
    pub const TX_READY: Register<u8> = Register::new(0x8);
    /// low bit set when a received byte is available
    pub const RX_READY: Register<u8> = Register::new(0x9);
    /// received byte, reading it pops it from the peripheral
    pub const RX_DATA: Register<u8> = Register::new(0xa);
}

/// IOb-NCO register map
pub mod nco {
    use super::Register;

    /// low bit set resets the oscillator
    pub const SOFT_RESET: Register<u8> = Register::new(0x0);
    /// low bit is the enable state
    pub const ENABLE: Register<u8> = Register::new(0x1);
    /// output period, in input clock cycles
    pub const PERIOD: Register<u32> = Register::new(0x4);
}
