//! Program image loading.
//!
//! This module turns guest binaries into RAM images. It performs:
//! 1. **ELF loading:** Validates a 64-bit little-endian RISC-V ELF and
//!    places every loadable segment at its physical address in the image.
//! 2. **Raw loading:** Copies a flat binary to the bottom of RAM with the
//!    entry point at the RAM base.
//! 3. **Validation:** Rejects images and segments that do not fit in RAM.
//!
//! Failures here are host-level errors reported before any CPU state
//! exists; they never surface as guest traps.

use object::{Architecture, Object, ObjectSegment};
use thiserror::Error;

use crate::config::Region;

/// Errors raised while turning a guest binary into a RAM image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The ELF container is malformed.
    #[error("malformed ELF image: {0}")]
    Elf(#[from] object::read::Error),

    /// The ELF is not 64-bit RISC-V.
    #[error("not a 64-bit RISC-V ELF image")]
    WrongArchitecture,

    /// A loadable segment falls outside the RAM region.
    #[error("segment at {addr:#x} ({size} bytes) does not fit in RAM")]
    SegmentOutOfRange {
        /// Physical load address of the segment.
        addr: u64,
        /// Segment size in bytes.
        size: u64,
    },

    /// A raw image is larger than RAM.
    #[error("raw image of {size} bytes exceeds RAM size {ram_size:#x}")]
    ImageTooLarge {
        /// Image size in bytes.
        size: u64,
        /// Configured RAM size in bytes.
        ram_size: u64,
    },
}

/// A RAM image ready to be mapped, plus its entry point.
pub struct Image {
    /// Initial RAM contents, `ram.size` bytes long.
    pub data: Vec<u8>,
    /// Physical address of the first instruction.
    pub entry: u64,
}

/// Builds a RAM image from an ELF binary.
///
/// Loadable segments are placed at their physical addresses relative to the
/// RAM base; the entry point comes from the ELF header.
///
/// # Errors
///
/// Returns `LoadError` if the ELF is malformed, is not 64-bit RISC-V, or
/// has a loadable segment outside the RAM region.
pub fn load_elf(bytes: &[u8], ram: Region) -> Result<Image, LoadError> {
    let file = object::File::parse(bytes)?;
    if file.architecture() != Architecture::Riscv64 {
        return Err(LoadError::WrongArchitecture);
    }

    let mut data = vec![0u8; ram.size as usize];
    for segment in file.segments() {
        let contents = segment.data()?;
        if contents.is_empty() {
            continue;
        }
        let addr = segment.address();
        let size = contents.len() as u64;
        // checked_add: a hostile p_vaddr near u64::MAX must not wrap.
        let in_range = addr >= ram.base
            && addr.checked_add(size).is_some_and(|end| end <= ram.end());
        if !in_range {
            return Err(LoadError::SegmentOutOfRange { addr, size });
        }
        let off = (addr - ram.base) as usize;
        data[off..off + contents.len()].copy_from_slice(contents);
    }

    Ok(Image {
        data,
        entry: file.entry(),
    })
}

/// Builds a RAM image from a flat binary placed at the RAM base.
///
/// # Errors
///
/// Returns `LoadError::ImageTooLarge` if the binary exceeds the RAM size.
pub fn load_raw(bytes: &[u8], ram: Region) -> Result<Image, LoadError> {
    if bytes.len() as u64 > ram.size {
        return Err(LoadError::ImageTooLarge {
            size: bytes.len() as u64,
            ram_size: ram.size,
        });
    }
    let mut data = vec![0u8; ram.size as usize];
    data[..bytes.len()].copy_from_slice(bytes);
    Ok(Image {
        data,
        entry: ram.base,
    })
}
