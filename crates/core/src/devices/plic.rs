//! Platform-Level Interrupt Controller (PLIC) stub.
//!
//! Occupies the PLIC address range so guest probes do not fault. Reads
//! return zero and writes are discarded; no interrupt routing is modeled.

use crate::common::Trap;
use crate::config::Region;
use crate::devices::Device;

/// PLIC device structure.
pub struct Plic {
    base: u64,
    size: u64,
}

impl Plic {
    /// Creates a new PLIC stub covering `region`.
    pub fn new(region: Region) -> Self {
        Self {
            base: region.base,
            size: region.size,
        }
    }
}

impl Device for Plic {
    fn name(&self) -> &'static str {
        "PLIC"
    }

    fn base(&self) -> u64 {
        self.base
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn load(&mut self, addr: u64, size: u64) -> Result<u64, Trap> {
        if !matches!(size, 1 | 2 | 4 | 8) {
            return Err(Trap::LoadAccessFault(addr));
        }
        Ok(0)
    }

    fn store(&mut self, addr: u64, size: u64, _value: u64) -> Result<(), Trap> {
        if !matches!(size, 1 | 2 | 4 | 8) {
            return Err(Trap::StoreAmoAccessFault(addr));
        }
        Ok(())
    }
}
