//! Core Local Interruptor (CLINT).
//!
//! Holds the memory-mapped software-interrupt and timer registers. Nothing
//! in the emulator advances `mtime` or raises interrupts from it; the block
//! exists so guests can program the registers and read them back.
//!
//! # Memory Map
//!
//! * `0x0000`: MSIP (Machine Software Interrupt Pending)
//! * `0x4000`: MTIMECMP (Machine Time Compare)
//! * `0xBFF8`: MTIME (Machine Time)

use crate::common::Trap;
use crate::config::Region;
use crate::devices::Device;

/// Offset for the Machine Software Interrupt Pending register.
const MSIP_OFFSET: u64 = 0x0000;
/// Offset for the Machine Time Compare register.
const MTIMECMP_OFFSET: u64 = 0x4000;
/// Offset for the Machine Time register.
const MTIME_OFFSET: u64 = 0xBFF8;

/// CLINT device structure.
pub struct Clint {
    base: u64,
    size: u64,
    msip: u32,
    mtimecmp: u64,
    mtime: u64,
}

impl Clint {
    /// Creates a new CLINT covering `region`.
    pub fn new(region: Region) -> Self {
        Self {
            base: region.base,
            size: region.size,
            msip: 0,
            mtimecmp: u64::MAX,
            mtime: 0,
        }
    }
}

impl Device for Clint {
    fn name(&self) -> &'static str {
        "CLINT"
    }

    fn base(&self) -> u64 {
        self.base
    }

    fn size(&self) -> u64 {
        self.size
    }

    /// Reads MSIP, MTIMECMP, or MTIME; other offsets read as zero.
    ///
    /// 32-bit reads of the upper half of the 64-bit registers are supported
    /// at `offset + 4`.
    fn load(&mut self, addr: u64, size: u64) -> Result<u64, Trap> {
        if !matches!(size, 1 | 2 | 4 | 8) {
            return Err(Trap::LoadAccessFault(addr));
        }
        let val = match addr - self.base {
            MSIP_OFFSET => u64::from(self.msip),
            MTIMECMP_OFFSET => self.mtimecmp,
            o if o == MTIMECMP_OFFSET + 4 => self.mtimecmp >> 32,
            MTIME_OFFSET => self.mtime,
            o if o == MTIME_OFFSET + 4 => self.mtime >> 32,
            _ => 0,
        };
        let mask = if size == 8 { u64::MAX } else { (1 << (size * 8)) - 1 };
        Ok(val & mask)
    }

    fn store(&mut self, addr: u64, size: u64, value: u64) -> Result<(), Trap> {
        if !matches!(size, 1 | 2 | 4 | 8) {
            return Err(Trap::StoreAmoAccessFault(addr));
        }
        match addr - self.base {
            MSIP_OFFSET => self.msip = (value as u32) & 1,
            MTIMECMP_OFFSET if size == 4 => {
                self.mtimecmp = (self.mtimecmp & 0xFFFF_FFFF_0000_0000) | (value & 0xFFFF_FFFF);
            }
            MTIMECMP_OFFSET => self.mtimecmp = value,
            o if o == MTIMECMP_OFFSET + 4 => {
                self.mtimecmp = (self.mtimecmp & 0x0000_0000_FFFF_FFFF) | (value << 32);
            }
            MTIME_OFFSET if size == 4 => {
                self.mtime = (self.mtime & 0xFFFF_FFFF_0000_0000) | (value & 0xFFFF_FFFF);
            }
            MTIME_OFFSET => self.mtime = value,
            o if o == MTIME_OFFSET + 4 => {
                self.mtime = (self.mtime & 0x0000_0000_FFFF_FFFF) | (value << 32);
            }
            _ => {}
        }
        Ok(())
    }
}
