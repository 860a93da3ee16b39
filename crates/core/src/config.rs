//! Configuration system for the emulator.
//!
//! This module defines the configuration structures used to parameterize the
//! machine. It provides:
//! 1. **Defaults:** Baseline physical memory map constants (RAM and MMIO regions).
//! 2. **Structures:** Hierarchical config for memory and each device region.
//! 3. **Profiles:** Device-set selection (bare-metal vs. full platform).
//!
//! Configuration is supplied via JSON or use `Config::default()` for the CLI.

use serde::Deserialize;

/// Default configuration constants for the emulator.
///
/// These values define the baseline memory map when not explicitly overridden.
/// The layout matches the QEMU `virt` machine that xv6-style guests expect.
mod defaults {
    /// Base address of main system RAM (2 GiB).
    ///
    /// All memory accesses below this address are treated as MMIO.
    pub const RAM_BASE: u64 = 0x8000_0000;

    /// Total size of main system RAM (128 MiB).
    ///
    /// Accesses beyond `RAM_BASE + RAM_SIZE` miss the device list and
    /// raise an access fault.
    pub const RAM_SIZE: u64 = 128 * 1024 * 1024;

    /// Base address of the UART 16550-compatible serial port MMIO region.
    pub const UART_BASE: u64 = 0x1000_0000;

    /// Size of the UART MMIO region.
    pub const UART_SIZE: u64 = 0x1000;

    /// Base address of the VirtIO block device MMIO region.
    pub const VIRTIO_BASE: u64 = 0x1000_1000;

    /// Size of the VirtIO MMIO region.
    pub const VIRTIO_SIZE: u64 = 0x1000;

    /// Base address of the CLINT (Core Local Interruptor) MMIO region.
    pub const CLINT_BASE: u64 = 0x0200_0000;

    /// Size of the CLINT MMIO region.
    pub const CLINT_SIZE: u64 = 0x10000;

    /// Base address of the PLIC (Platform-Level Interrupt Controller) MMIO region.
    pub const PLIC_BASE: u64 = 0x0C00_0000;

    /// Size of the PLIC MMIO region.
    pub const PLIC_SIZE: u64 = 0x400_0000;
}

/// A contiguous physical address region occupied by one device.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct Region {
    /// Base physical address of the region.
    pub base: u64,
    /// Size of the region in bytes.
    pub size: u64,
}

impl Region {
    /// Returns the first address past the end of the region.
    pub fn end(&self) -> u64 {
        self.base + self.size
    }
}

/// Which device set the machine is assembled with.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// RAM only; for self-contained test programs.
    BareMetal,
    /// RAM, UART, VirtIO, CLINT, and PLIC; for operating-system guests.
    #[default]
    Platform,
}

/// Root configuration for the emulated machine.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device-set profile.
    pub profile: Profile,
    /// Main RAM region.
    pub ram: Region,
    /// UART region.
    pub uart: Region,
    /// VirtIO region.
    pub virtio: Region,
    /// CLINT region.
    pub clint: Region,
    /// PLIC region.
    pub plic: Region,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            ram: Region {
                base: defaults::RAM_BASE,
                size: defaults::RAM_SIZE,
            },
            uart: Region {
                base: defaults::UART_BASE,
                size: defaults::UART_SIZE,
            },
            virtio: Region {
                base: defaults::VIRTIO_BASE,
                size: defaults::VIRTIO_SIZE,
            },
            clint: Region {
                base: defaults::CLINT_BASE,
                size: defaults::CLINT_SIZE,
            },
            plic: Region {
                base: defaults::PLIC_BASE,
                size: defaults::PLIC_SIZE,
            },
        }
    }
}
