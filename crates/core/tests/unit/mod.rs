//! Unit tests for the emulator subsystems.

pub mod arithmetic;
pub mod csr;
pub mod decode;
pub mod devices;
pub mod mmu;
