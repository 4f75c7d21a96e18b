#![no_std]
#[cfg(feature = "std")]
extern crate std;
#[cfg(feature = "alloc")]
extern crate alloc;

pub mod command;
pub mod registers;
pub mod transfer;
pub mod uart;
pub mod nco;
#[cfg(feature = "console")]
pub mod console;
