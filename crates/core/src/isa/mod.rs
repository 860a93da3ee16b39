//! Instruction set: descriptor tables and decode.
//!
//! Each supported extension contributes a static table of instruction
//! descriptors. A descriptor carries the bits that identify an encoding
//! (`mask`/`matcher`) and a function pointer implementing its semantics.
//! Decoding is a linear scan over the tables in a fixed order; the first
//! descriptor whose masked bits match wins, and a full miss is an illegal
//! instruction.

use crate::common::Trap;
use crate::cpu::Cpu;
use crate::isa::format::Format;

/// Instruction formats and field extraction.
pub mod format;
/// Privileged instructions (ECALL, EBREAK, SRET, MRET, WFI, SFENCE.VMA).
pub mod privileged;
/// Atomic memory operations (A extension).
pub mod rv64a;
/// Base integer instructions (RV64I).
pub mod rv64i;
/// Integer multiply and divide (M extension).
pub mod rv64m;
/// CSR access and instruction-fetch fence (Zicsr and Zifencei).
pub mod zicsr;

/// The semantics of one instruction.
///
/// Actions read their fields out of the raw word, mutate CPU state, and
/// report guest-visible faults as `Err`.
pub type ExecuteFn = fn(u32, &mut Cpu) -> Result<(), Trap>;

/// One entry of an extension's descriptor table.
#[derive(Debug)]
pub struct Instruction {
    /// Assembly mnemonic, for diagnostics.
    pub mnemonic: &'static str,
    /// Encoding format of the instruction.
    pub format: Format,
    /// Bits of the word that participate in matching.
    pub mask: u32,
    /// Required values of the masked bits.
    pub matcher: u32,
    /// Semantics of the instruction.
    pub execute: ExecuteFn,
}

/// Extension tables in decode order.
const EXTENSIONS: &[&[Instruction]] = &[
    rv64i::TABLE,
    zicsr::TABLE,
    rv64m::TABLE,
    rv64a::TABLE,
    privileged::TABLE,
];

/// Decodes an instruction word against the extension tables.
///
/// # Errors
///
/// Returns `Trap::IllegalInstruction` carrying the word when no descriptor
/// matches.
pub fn decode(word: u32) -> Result<&'static Instruction, Trap> {
    for table in EXTENSIONS {
        for inst in *table {
            if word & inst.mask == inst.matcher {
                return Ok(inst);
            }
        }
    }
    Err(Trap::IllegalInstruction(word))
}
