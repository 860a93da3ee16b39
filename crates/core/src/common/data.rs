//! Access, paging, and privilege classifications.
//!
//! This module defines the small enums threaded through the memory and trap
//! subsystems:
//! 1. **Access Types:** Classify a memory operation so faults pick the right cause.
//! 2. **Paging Modes:** The address translation schemes selectable through `satp`.
//! 3. **Privilege Modes:** The RISC-V privilege levels and their encodings.

use crate::common::Trap;

/// Classification of a memory access.
///
/// Used by the MMU to select between the instruction, load, and store/AMO
/// flavors of page faults and access faults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch.
    Fetch,
    /// Data load.
    Load,
    /// Data store or atomic memory operation.
    Store,
}

impl AccessType {
    /// Builds the page fault trap matching this access type.
    pub fn page_fault(self, addr: u64) -> Trap {
        match self {
            AccessType::Fetch => Trap::InstructionPageFault(addr),
            AccessType::Load => Trap::LoadPageFault(addr),
            AccessType::Store => Trap::StoreAmoPageFault(addr),
        }
    }

    /// Builds the access fault trap matching this access type.
    pub fn access_fault(self, addr: u64) -> Trap {
        match self {
            AccessType::Fetch => Trap::InstructionAccessFault(addr),
            AccessType::Load => Trap::LoadAccessFault(addr),
            AccessType::Store => Trap::StoreAmoAccessFault(addr),
        }
    }
}

/// Virtual address translation scheme.
///
/// Only `Bare` and `Sv39` are reachable through `satp` writes; the remaining
/// schemes are listed for completeness of the architectural encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PagingMode {
    /// No translation; virtual addresses are physical addresses.
    #[default]
    Bare,
    /// Two-level, 32-bit virtual addressing.
    Sv32,
    /// Three-level, 39-bit virtual addressing.
    Sv39,
    /// Four-level, 48-bit virtual addressing.
    Sv48,
    /// Five-level, 57-bit virtual addressing.
    Sv57,
}

/// RISC-V privilege mode levels.
///
/// Machine mode is the highest privilege level. The `Reserved` encoding (2)
/// is architecturally defined but never entered by this emulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrivilegeMode {
    /// User mode (U-mode), the lowest privilege level.
    User = 0,

    /// Supervisor mode (S-mode), for operating system kernels.
    Supervisor = 1,

    /// Reserved encoding.
    Reserved = 2,

    /// Machine mode (M-mode), the highest privilege level.
    Machine = 3,
}

impl PrivilegeMode {
    /// Converts a `u8` value to a privilege mode.
    ///
    /// # Arguments
    ///
    /// * `val` - The numeric privilege mode value.
    ///
    /// # Returns
    ///
    /// The corresponding `PrivilegeMode`, defaulting to `Machine` for values
    /// outside the two-bit encoding space.
    pub fn from_u8(val: u8) -> Self {
        match val {
            0 => PrivilegeMode::User,
            1 => PrivilegeMode::Supervisor,
            2 => PrivilegeMode::Reserved,
            _ => PrivilegeMode::Machine,
        }
    }

    /// Converts a privilege mode to its `u8` representation.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Returns the human-readable name of the privilege mode.
    pub fn name(&self) -> &'static str {
        match self {
            PrivilegeMode::User => "User",
            PrivilegeMode::Supervisor => "Supervisor",
            PrivilegeMode::Reserved => "Reserved",
            PrivilegeMode::Machine => "Machine",
        }
    }
}

impl std::fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
