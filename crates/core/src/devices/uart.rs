//! 16550-compatible serial port.
//!
//! Transmit-only model: bytes written to the transmit holding register go
//! straight to stdout, and the line status register always reports the
//! transmitter idle. The 16550 register file is byte-wide, so any access
//! wider than one byte is an access fault.

use std::io::Write;

use crate::common::Trap;
use crate::config::Region;
use crate::devices::Device;

/// Receive holding / transmit holding register offset.
const RHR_THR: u64 = 0;
/// Interrupt enable register offset.
const IER: u64 = 1;
/// FIFO control / interrupt status register offset.
const FCR_ISR: u64 = 2;
/// Line control register offset.
const LCR: u64 = 3;
/// Line status register offset.
const LSR: u64 = 5;

/// Transmit holding register empty bit of LSR.
const LSR_THR_EMPTY: u64 = 1 << 5;
/// Transmitter idle bit of LSR.
const LSR_TX_IDLE: u64 = 1 << 6;

/// UART device structure.
pub struct Uart {
    base: u64,
    size: u64,
    ier: u8,
    fcr: u8,
    lcr: u8,
}

impl Uart {
    /// Creates a new UART covering `region`.
    pub fn new(region: Region) -> Self {
        Self {
            base: region.base,
            size: region.size,
            ier: 0,
            fcr: 0,
            lcr: 0,
        }
    }

    fn transmit(byte: u8) {
        let mut out = std::io::stdout();
        // Output errors are not guest-visible; drop them.
        let _ = out.write_all(&[byte]);
        let _ = out.flush();
    }
}

impl Device for Uart {
    fn name(&self) -> &'static str {
        "UART"
    }

    fn base(&self) -> u64 {
        self.base
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn load(&mut self, addr: u64, size: u64) -> Result<u64, Trap> {
        if size != 1 {
            return Err(Trap::LoadAccessFault(addr));
        }
        let val = match addr - self.base {
            RHR_THR => 0,
            IER => u64::from(self.ier),
            FCR_ISR => u64::from(self.fcr),
            LCR => u64::from(self.lcr),
            LSR => LSR_THR_EMPTY | LSR_TX_IDLE,
            _ => 0,
        };
        Ok(val)
    }

    fn store(&mut self, addr: u64, size: u64, value: u64) -> Result<(), Trap> {
        if size != 1 {
            return Err(Trap::StoreAmoAccessFault(addr));
        }
        match addr - self.base {
            RHR_THR => Self::transmit(value as u8),
            IER => self.ier = value as u8,
            FCR_ISR => self.fcr = value as u8,
            LCR => self.lcr = value as u8,
            _ => {}
        }
        Ok(())
    }
}
