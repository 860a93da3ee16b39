//! VirtIO MMIO stub.
//!
//! Occupies the VirtIO address range so guest probes do not fault. Reads
//! return zero and writes are discarded; no virtqueue processing is modeled.

use crate::common::Trap;
use crate::config::Region;
use crate::devices::Device;

/// VirtIO device structure.
pub struct Virtio {
    base: u64,
    size: u64,
}

impl Virtio {
    /// Creates a new VirtIO stub covering `region`.
    pub fn new(region: Region) -> Self {
        Self {
            base: region.base,
            size: region.size,
        }
    }
}

impl Device for Virtio {
    fn name(&self) -> &'static str {
        "VIRTIO"
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
