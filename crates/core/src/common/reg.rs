//! General-Purpose Register File.
//!
//! This module provides the `RegisterFile` struct backing the 32 integer
//! registers of the hart. It provides:
//! 1. **Storage:** Flat array storage for all architectural registers.
//! 2. **The x0 Invariant:** Register `x0` reads as zero and discards writes.
//! 3. **Observability:** A debugging dump of register state.

/// Number of general-purpose registers.
const NUM_REGS: usize = 32;

/// The 32-entry integer register file.
///
/// Register indices outside `0..32` are masked rather than panicking; the
/// decoder only ever produces five-bit indices.
pub struct RegisterFile {
    regs: [u64; NUM_REGS],
}

impl RegisterFile {
    /// Creates a new register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self {
            regs: [0; NUM_REGS],
        }
    }

    /// Reads a value from a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Register `x0` always returns 0.
    ///
    /// # Returns
    ///
    /// The 64-bit value stored in the specified register.
    pub fn read(&self, idx: usize) -> u64 {
        self.regs[idx & (NUM_REGS - 1)]
    }

    /// Writes a value to a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Writes to `x0` are ignored.
    /// * `val` - The 64-bit value to write.
    pub fn write(&mut self, idx: usize, val: u64) {
        let idx = idx & (NUM_REGS - 1);
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Dumps the contents of all general-purpose registers to stderr.
    pub fn dump(&self) {
        for (i, chunk) in self.regs.chunks(4).enumerate() {
            let base = i * 4;
            eprintln!(
                "x{:02}={:#018x} x{:02}={:#018x} x{:02}={:#018x} x{:02}={:#018x}",
                base,
                chunk[0],
                base + 1,
                chunk[1],
                base + 2,
                chunk[2],
                base + 3,
                chunk[3]
            );
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}
