//! Common types shared across the emulator.
//!
//! This module collects the definitions that every other subsystem depends on:
//! 1. **Traps:** The `Trap` enum and trap cause codes.
//! 2. **Access Types:** Classification of memory accesses for fault selection.
//! 3. **Registers:** The general-purpose register file.
//! 4. **Constants:** Page geometry shared by the MMU and the loader.

/// Access classification, paging modes, and privilege modes.
pub mod data;
/// General-purpose register file.
pub mod reg;
/// Trap representation and cause codes.
pub mod trap;

pub use data::{AccessType, PagingMode, PrivilegeMode};
pub use reg::RegisterFile;
pub use trap::Trap;

/// Number of bits in a page offset (4 KiB pages).
pub const PAGE_SHIFT: u64 = 12;

/// Size of a page in bytes.
pub const PAGE_SIZE: u64 = 1 << PAGE_SHIFT;

/// MSB of `mcause`/`scause`, set for interrupts.
pub const CAUSE_INTERRUPT_BIT: u64 = 1 << 63;
