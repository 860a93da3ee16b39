//! Main system memory.
//!
//! A flat little-endian byte array mapped at a configurable base address.
//! All four access widths are supported; anything else is an access fault.

use crate::common::Trap;
use crate::devices::Device;

/// Main RAM device backed by a `Vec<u8>`.
pub struct Ram {
    base: u64,
    data: Vec<u8>,
}

impl Ram {
    /// Creates a zero-filled RAM region.
    ///
    /// # Arguments
    ///
    /// * `base` - Base physical address.
    /// * `size` - Size in bytes.
    pub fn new(base: u64, size: u64) -> Self {
        Self {
            base,
            data: vec![0; size as usize],
        }
    }

    /// Creates a RAM region whose initial contents are `image`.
    ///
    /// The image is placed at offset zero and padded with zeroes up to
    /// `size`. Images longer than `size` are truncated; the loader rejects
    /// oversized images before this point.
    pub fn with_image(base: u64, size: u64, image: Vec<u8>) -> Self {
        let mut data = image;
        data.resize(size as usize, 0);
        data.truncate(size as usize);
        Self { base, data }
    }

    fn offset(&self, addr: u64, size: u64) -> Option<usize> {
        let off = addr.checked_sub(self.base)?;
        let end = off.checked_add(size)?;
        if end as usize <= self.data.len() {
            Some(off as usize)
        } else {
            None
        }
    }
}

impl Device for Ram {
    fn name(&self) -> &'static str {
        "RAM"
    }

    fn base(&self) -> u64 {
        self.base
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn load(&mut self, addr: u64, size: u64) -> Result<u64, Trap> {
        let off = self
            .offset(addr, size)
            .ok_or(Trap::LoadAccessFault(addr))?;
        let bytes = &self.data[off..off + size as usize];
        match size {
            1 => Ok(u64::from(bytes[0])),
            2 => Ok(u64::from(u16::from_le_bytes([bytes[0], bytes[1]]))),
            4 => Ok(u64::from(u32::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3],
            ]))),
            8 => Ok(u64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ])),
            _ => Err(Trap::LoadAccessFault(addr)),
        }
    }

    fn store(&mut self, addr: u64, size: u64, value: u64) -> Result<(), Trap> {
        if !matches!(size, 1 | 2 | 4 | 8) {
            return Err(Trap::StoreAmoAccessFault(addr));
        }
        let off = self
            .offset(addr, size)
            .ok_or(Trap::StoreAmoAccessFault(addr))?;
        let bytes = value.to_le_bytes();
        self.data[off..off + size as usize].copy_from_slice(&bytes[..size as usize]);
        Ok(())
    }
}
