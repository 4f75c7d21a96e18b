//! simulated register window recording every access

#![allow(dead_code)]

use std::collections::VecDeque;
use iobperiph::registers::{self, Csr, Register};


#[derive(Clone, Debug, PartialEq)]
pub enum Access {
    Read(u32),
    Write(u32, Vec<u8>),
}

/// uart peripheral behind a register window: bytes written to TX_DATA are collected, RX_DATA pops a queue
pub struct MockUart {
    /// base address the window pretends to live at
    pub base: usize,
    pub log: Vec<Access>,
    pub transmitted: Vec<u8>,
    pub incoming: VecDeque<u8>,
    /// number of polls of TX_READY answering busy before ready
    pub tx_busy: usize,
    /// stop answering data once incoming is empty
    pub rx_ready: bool,
}
impl MockUart {
    pub fn new(base: usize) -> Self {
        Self {
            base,
            log: Vec::new(),
            transmitted: Vec::new(),
            incoming: VecDeque::new(),
            tx_busy: 0,
            rx_ready: true,
        }
    }
    pub fn with_incoming(mut self, bytes: &[u8]) -> Self {
        self.incoming.extend(bytes);
        self
    }
    pub fn writes(&self, register: Register<u8>) -> Vec<u8> {
        self.log.iter().filter_map(|access| match access {
            Access::Write(address, data) if *address == register.address() => Some(data[0]),
            _ => None,
            }).collect()
    }
}
impl Csr for MockUart {
    fn read(&mut self, address: u32, dst: &mut [u8]) {
        self.log.push(Access::Read(address));
        dst.fill(0);
        if address == registers::uart::TX_READY.address() {
            if self.tx_busy > 0  {self.tx_busy -= 1}
            else  {dst[0] = 1}
        }
        else if address == registers::uart::RX_READY.address() {
            dst[0] = u8::from(self.rx_ready && ! self.incoming.is_empty());
        }
        else if address == registers::uart::RX_DATA.address() {
            dst[0] = self.incoming.pop_front().expect("read of empty receive register");
        }
    }
    fn write(&mut self, address: u32, src: &[u8]) {
        self.log.push(Access::Write(address, src.to_vec()));
        if address == registers::uart::TX_DATA.address() {
            self.transmitted.extend_from_slice(src);
        }
    }
}

/// plain memory window, recording writes
#[derive(Default)]
pub struct MockMemory {
    pub memory: [u8; 16],
    pub log: Vec<Access>,
}
impl Csr for MockMemory {
    fn read(&mut self, address: u32, dst: &mut [u8]) {
        self.log.push(Access::Read(address));
        let start = address as usize;
        dst.copy_from_slice(&self.memory[start .. start + dst.len()]);
    }
    fn write(&mut self, address: u32, src: &[u8]) {
        self.log.push(Access::Write(address, src.to_vec()));
        let start = address as usize;
        self.memory[start .. start + src.len()].copy_from_slice(src);
    }
}
