//! Machine assembly.
//!
//! Builds the device set described by a [`Config`] profile, maps a program
//! image into RAM, and produces a ready-to-run [`Cpu`]. RAM is registered
//! first so the common case resolves on the first device scan entry.

use tracing::info;

use crate::config::{Config, Profile};
use crate::cpu::Cpu;
use crate::devices::{Clint, Plic, Ram, Uart, Virtio};
use crate::loader::{self, Image, LoadError};
use crate::mmu::Mmu;

/// An assembled machine: one hart wired to a configured device set.
pub struct Machine {
    /// The hart, ready to run from the image entry point.
    pub cpu: Cpu,
}

impl Machine {
    /// Assembles a machine around a prepared RAM image.
    pub fn new(config: &Config, image: Image) -> Self {
        let mut mmu = Mmu::new();
        mmu.add_device(Box::new(Ram::with_image(
            config.ram.base,
            config.ram.size,
            image.data,
        )));

        if config.profile == Profile::Platform {
            mmu.add_device(Box::new(Uart::new(config.uart)));
            mmu.add_device(Box::new(Virtio::new(config.virtio)));
            mmu.add_device(Box::new(Clint::new(config.clint)));
            mmu.add_device(Box::new(Plic::new(config.plic)));
        }

        info!(
            profile = ?config.profile,
            entry = format_args!("{:#x}", image.entry),
            "machine assembled"
        );

        let mut cpu = Cpu::new(mmu);
        cpu.pc = image.entry;
        Self { cpu }
    }

    /// Assembles a machine from an ELF binary.
    ///
    /// # Errors
    ///
    /// Propagates [`LoadError`] from ELF validation and placement.
    pub fn from_elf(config: &Config, bytes: &[u8]) -> Result<Self, LoadError> {
        let image = loader::load_elf(bytes, config.ram)?;
        Ok(Self::new(config, image))
    }

    /// Assembles a machine from a flat binary loaded at the RAM base.
    ///
    /// # Errors
    ///
    /// Propagates [`LoadError`] if the binary does not fit in RAM.
    pub fn from_raw(config: &Config, bytes: &[u8]) -> Result<Self, LoadError> {
        let image = loader::load_raw(bytes, config.ram)?;
        Ok(Self::new(config, image))
    }
}
