//! Control and Status Register (CSR) definitions and operations.
//!
//! This module implements the CSR subsystem. It provides:
//! 1. **Address Definitions:** Constants for the machine and supervisor CSRs
//!    the emulator touches.
//! 2. **Field Masks:** Bitmasks and shifts for status and translation control.
//! 3. **Register Storage:** A flat 4096-entry file indexed by CSR address.
//! 4. **Side Effects:** The `satp` write hook that reprograms the MMU.

use crate::common::PagingMode;
use crate::cpu::Cpu;

/// Machine hardware thread ID CSR address.
pub const MHARTID: u32 = 0xF14;

/// Machine status register CSR address.
pub const MSTATUS: u32 = 0x300;

/// Machine exception delegation register CSR address.
pub const MEDELEG: u32 = 0x302;

/// Machine interrupt delegation register CSR address.
pub const MIDELEG: u32 = 0x303;

/// Machine interrupt enable register CSR address.
pub const MIE: u32 = 0x304;

/// Machine trap vector base address register CSR address.
pub const MTVEC: u32 = 0x305;

/// Machine scratch register CSR address.
pub const MSCRATCH: u32 = 0x340;

/// Machine exception program counter CSR address.
pub const MEPC: u32 = 0x341;

/// Machine cause register CSR address.
pub const MCAUSE: u32 = 0x342;

/// Machine trap value register CSR address.
pub const MTVAL: u32 = 0x343;

/// Machine interrupt pending register CSR address.
pub const MIP: u32 = 0x344;

/// Supervisor status register CSR address.
pub const SSTATUS: u32 = 0x100;

/// Supervisor interrupt enable register CSR address.
pub const SIE: u32 = 0x104;

/// Supervisor trap vector base address register CSR address.
pub const STVEC: u32 = 0x105;

/// Supervisor scratch register CSR address.
pub const SSCRATCH: u32 = 0x140;

/// Supervisor exception program counter CSR address.
pub const SEPC: u32 = 0x141;

/// Supervisor cause register CSR address.
pub const SCAUSE: u32 = 0x142;

/// Supervisor trap value register CSR address.
pub const STVAL: u32 = 0x143;

/// Supervisor interrupt pending register CSR address.
pub const SIP: u32 = 0x144;

/// Supervisor address translation and protection register CSR address.
pub const SATP: u32 = 0x180;

/// Supervisor interrupt enable bit in `mstatus`/`sstatus`.
pub const MSTATUS_SIE: u64 = 1 << 1;

/// Machine interrupt enable bit in `mstatus`.
pub const MSTATUS_MIE: u64 = 1 << 3;

/// Supervisor previous interrupt enable bit in `mstatus`/`sstatus`.
pub const MSTATUS_SPIE: u64 = 1 << 5;

/// Machine previous interrupt enable bit in `mstatus`.
pub const MSTATUS_MPIE: u64 = 1 << 7;

/// Supervisor previous privilege bit in `mstatus`/`sstatus`.
pub const MSTATUS_SPP: u64 = 1 << 8;

/// Shift of the machine previous privilege field in `mstatus`.
pub const MSTATUS_MPP_SHIFT: u64 = 11;

/// Mask of the machine previous privilege field, pre-shift.
pub const MSTATUS_MPP_MASK: u64 = 0x3;

/// Machine previous privilege field of `mstatus`, in place.
pub const MSTATUS_MPP: u64 = MSTATUS_MPP_MASK << MSTATUS_MPP_SHIFT;

/// Bit of `satp` selecting Sv39 translation; clear means Bare.
pub const SATP_MODE_BIT: u64 = 1 << 63;

/// Mask of the root page table PPN field of `satp` (bits 0-43).
pub const SATP_PPN_MASK: u64 = (1 << 44) - 1;

/// Number of CSR cells in the flat file.
const NUM_CSRS: usize = 4096;

/// Flat CSR storage indexed by the 12-bit CSR address.
///
/// Every address reads and writes a plain 64-bit cell; architectural side
/// effects (only `satp` has one) live in [`Cpu::set_csr`].
pub struct CsrFile {
    regs: Box<[u64; NUM_CSRS]>,
}

impl CsrFile {
    /// Creates a CSR file with every register zeroed.
    pub fn new() -> Self {
        Self {
            regs: Box::new([0; NUM_CSRS]),
        }
    }

    /// Reads the CSR at `addr` (masked to 12 bits).
    pub fn read(&self, addr: u32) -> u64 {
        self.regs[(addr as usize) & (NUM_CSRS - 1)]
    }

    /// Writes the CSR at `addr` (masked to 12 bits) without side effects.
    pub fn write(&mut self, addr: u32, val: u64) {
        self.regs[(addr as usize) & (NUM_CSRS - 1)] = val;
    }
}

impl Default for CsrFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Reads a CSR value.
    pub fn csr_read(&self, addr: u32) -> u64 {
        self.csrs.read(addr)
    }

    /// Writes a CSR value, applying architectural side effects.
    ///
    /// A write to `satp` immediately recomputes the MMU's paging mode (from
    /// the mode bit) and root page table PPN (bits 0-43); translation changes
    /// take effect on the next memory access.
    pub fn set_csr(&mut self, addr: u32, val: u64) {
        self.csrs.write(addr, val);
        if addr == SATP {
            self.update_paging_mode(val);
        }
    }

    fn update_paging_mode(&mut self, satp: u64) {
        let mode = if satp & SATP_MODE_BIT != 0 {
            PagingMode::Sv39
        } else {
            PagingMode::Bare
        };
        self.mmu.set_paging(mode, satp & SATP_PPN_MASK);
    }
}
