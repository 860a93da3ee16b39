//! Memory-mapped device models.
//!
//! This module defines the `Device` trait implemented by every component on
//! the physical address map, plus the concrete device models:
//! RAM, UART, CLINT, PLIC, and VirtIO.

use crate::common::Trap;

/// Core Local Interruptor model.
pub mod clint;
/// Platform-Level Interrupt Controller stub.
pub mod plic;
/// Main system memory.
pub mod ram;
/// 16550-compatible serial port.
pub mod uart;
/// VirtIO MMIO stub.
pub mod virtio;

pub use clint::Clint;
pub use plic::Plic;
pub use ram::Ram;
pub use uart::Uart;
pub use virtio::Virtio;

/// A memory-mapped device occupying a contiguous physical address range.
///
/// Devices receive full physical addresses and subtract their own base; the
/// MMU selects a device by scanning its ordered list and asking each device
/// whether the address falls inside its range. Ranges are assumed disjoint.
///
/// Access widths are limited to 1, 2, 4, or 8 bytes. A device is free to
/// reject widths it does not implement by returning the matching access
/// fault, which the CPU then delivers as an architectural trap.
pub trait Device {
    /// Returns the device name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Returns the base physical address of the device.
    fn base(&self) -> u64;

    /// Returns the size of the device's address range in bytes.
    fn size(&self) -> u64;

    /// Returns true if `addr` falls inside this device's range.
    fn is_valid_addr(&self, addr: u64) -> bool {
        addr >= self.base() && addr < self.base() + self.size()
    }

    /// Loads `size` bytes (1, 2, 4, or 8) from the device.
    ///
    /// # Arguments
    ///
    /// * `addr` - Full physical address of the access.
    /// * `size` - Access width in bytes.
    ///
    /// # Errors
    ///
    /// Returns a load access fault if the device rejects the access.
    fn load(&mut self, addr: u64, size: u64) -> Result<u64, Trap>;

    /// Stores the low `size` bytes (1, 2, 4, or 8) of `value` to the device.
    ///
    /// # Arguments
    ///
    /// * `addr` - Full physical address of the access.
    /// * `size` - Access width in bytes.
    /// * `value` - Value to store; bytes above `size` are ignored.
    ///
    /// # Errors
    ///
    /// Returns a store/AMO access fault if the device rejects the access.
    fn store(&mut self, addr: u64, size: u64, value: u64) -> Result<(), Trap>;
}
