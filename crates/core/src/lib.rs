//! RISC-V system emulator library.
//!
//! This crate implements a functional RV64 system emulator with the following:
//! 1. **Core:** Fetch/decode/execute loop, GPR and CSR state, privilege modes.
//! 2. **ISA:** Decoding and execution for RV64I/M/A/Zicsr/Zifencei and privileged operations.
//! 3. **Memory:** Sv39 software MMU with a three-level page table walk.
//! 4. **Devices:** Memory-mapped RAM, UART, CLINT, PLIC, and VirtIO models.
//! 5. **Loading:** ELF64 and raw-binary image loading with validation.

/// Common types and constants (traps, access types, registers, privilege modes).
pub mod common;
/// Emulator configuration (defaults and hierarchical config structures).
pub mod config;
/// CPU core (state, CSR access, trap delivery, step/run loop).
pub mod cpu;
/// Memory-mapped device trait and device implementations.
pub mod devices;
/// Instruction set (formats, descriptor tables, decode).
pub mod isa;
/// ELF64 and raw binary image loading.
pub mod loader;
/// Machine assembly (device set construction from configuration).
pub mod machine;
/// Software MMU (Sv39 page table walk, physical dispatch).
pub mod mmu;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main CPU type; holds registers, CSRs, privilege state, and the MMU.
pub use crate::cpu::Cpu;
/// Assembled machine (CPU plus configured device set); construct with `Machine::new`.
pub use crate::machine::Machine;
