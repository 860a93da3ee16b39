//! Instruction formats and field extraction.
//!
//! This module defines the six base encoding formats and the helpers that
//! pull register indices and immediates out of a raw 32-bit instruction
//! word. Sign extension follows the base ISA rules:
//! * I- and S-format immediates sign-extend from bit 11.
//! * B-format immediates sign-extend from bit 12 (bit 0 is always zero).
//! * J-format immediates sign-extend from bit 20 (bit 0 is always zero).
//! * U-format immediates are the upper 20 bits as a 32-bit two's-complement
//!   value, sign-extended to 64 bits.

/// The six RV64 base instruction encoding formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Register-register operations.
    R,
    /// Short immediates and loads.
    I,
    /// Stores.
    S,
    /// Conditional branches.
    B,
    /// Long upper immediates.
    U,
    /// Unconditional jumps.
    J,
}

/// Extracts the destination register index (bits 7-11).
pub fn rd(word: u32) -> usize {
    ((word >> 7) & 0x1F) as usize
}

/// Extracts the first source register index (bits 15-19).
pub fn rs1(word: u32) -> usize {
    ((word >> 15) & 0x1F) as usize
}

/// Extracts the second source register index (bits 20-24).
pub fn rs2(word: u32) -> usize {
    ((word >> 20) & 0x1F) as usize
}

/// Extracts the I-format immediate, sign-extended from bit 11.
pub fn imm_i(word: u32) -> i64 {
    i64::from((word as i32) >> 20)
}

/// Extracts the S-format immediate, sign-extended from bit 11.
pub fn imm_s(word: u32) -> i64 {
    let hi = ((word as i32) >> 25) << 5;
    let lo = ((word >> 7) & 0x1F) as i32;
    i64::from(hi | lo)
}

/// Extracts the B-format immediate, sign-extended from bit 12.
///
/// Bit 0 of the immediate is always zero; branch targets are halfword
/// aligned.
pub fn imm_b(word: u32) -> i64 {
    let imm12 = ((word as i32) >> 31) << 12;
    let imm11 = (((word >> 7) & 1) << 11) as i32;
    let imm10_5 = (((word >> 25) & 0x3F) << 5) as i32;
    let imm4_1 = (((word >> 8) & 0xF) << 1) as i32;
    i64::from(imm12 | imm11 | imm10_5 | imm4_1)
}

/// Extracts the U-format immediate.
///
/// The upper 20 bits with the low 12 bits cleared, interpreted as a 32-bit
/// two's-complement value and sign-extended to 64 bits.
pub fn imm_u(word: u32) -> i64 {
    i64::from((word & 0xFFFF_F000) as i32)
}

/// Extracts the J-format immediate, sign-extended from bit 20.
///
/// Bit 0 of the immediate is always zero; jump targets are halfword
/// aligned.
pub fn imm_j(word: u32) -> i64 {
    let imm20 = ((word as i32) >> 31) << 20;
    let imm19_12 = (((word >> 12) & 0xFF) << 12) as i32;
    let imm11 = (((word >> 20) & 1) << 11) as i32;
    let imm10_1 = (((word >> 21) & 0x3FF) << 1) as i32;
    i64::from(imm20 | imm19_12 | imm11 | imm10_1)
}

/// Extracts the 12-bit CSR address field (bits 20-31), zero-extended.
pub fn csr_addr(word: u32) -> u32 {
    (word >> 20) & 0xFFF
}

/// Extracts the 6-bit shift amount used by RV64 shift-immediates.
pub fn shamt6(word: u32) -> u32 {
    (word >> 20) & 0x3F
}

/// Extracts the 5-bit shift amount used by the W-suffix shift-immediates.
pub fn shamt5(word: u32) -> u32 {
    (word >> 20) & 0x1F
}
