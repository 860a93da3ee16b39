//! Decode table tests.
//!
//! Checks that the linear scan resolves representative encodings from every
//! extension table and that a full miss reports the offending word.

use pretty_assertions::assert_eq;
use rstest::rstest;

use rv64emu_core::common::Trap;
use rv64emu_core::isa::decode;

use crate::common::{b_type, csr_type, i_type, j_type, r_type, s_type, u_type};

#[rstest]
#[case::lui(u_type(0x37, 1, 0x12345), "LUI")]
#[case::auipc(u_type(0x17, 1, 0x12345), "AUIPC")]
#[case::jal(j_type(0x6F, 1, 2048), "JAL")]
#[case::jalr(i_type(0x67, 1, 0, 2, 16), "JALR")]
#[case::beq(b_type(0x63, 0, 1, 2, 8), "BEQ")]
#[case::bgeu(b_type(0x63, 7, 1, 2, -8), "BGEU")]
#[case::lw(i_type(0x03, 1, 2, 2, 4), "LW")]
#[case::ld(i_type(0x03, 1, 3, 2, 4), "LD")]
#[case::sd(s_type(0x23, 3, 1, 2, 8), "SD")]
#[case::addi(i_type(0x13, 1, 0, 2, 5), "ADDI")]
#[case::slli(i_type(0x13, 1, 1, 2, 63), "SLLI")]
#[case::srai(0x4000_5013 | (1 << 7) | (2 << 15) | (63 << 20), "SRAI")]
#[case::add(r_type(0x33, 1, 0, 2, 3, 0x00), "ADD")]
#[case::sub(r_type(0x33, 1, 0, 2, 3, 0x20), "SUB")]
#[case::addw(r_type(0x3B, 1, 0, 2, 3, 0x00), "ADDW")]
#[case::fence(i_type(0x0F, 0, 0, 0, 0), "FENCE")]
#[case::fence_i(i_type(0x0F, 0, 1, 0, 0), "FENCE.I")]
#[case::mul(r_type(0x33, 1, 0, 2, 3, 0x01), "MUL")]
#[case::divu(r_type(0x33, 1, 5, 2, 3, 0x01), "DIVU")]
#[case::remw(r_type(0x3B, 1, 6, 2, 3, 0x01), "REMW")]
#[case::lr_w(r_type(0x2F, 1, 2, 2, 0, 0x08), "LR.W")]
#[case::sc_d(r_type(0x2F, 1, 3, 2, 3, 0x0C), "SC.D")]
#[case::amoadd_w(r_type(0x2F, 1, 2, 2, 3, 0x00), "AMOADD.W")]
#[case::amomaxu_d(r_type(0x2F, 1, 3, 2, 3, 0x70), "AMOMAXU.D")]
#[case::csrrw(csr_type(1, 1, 2, 0x300), "CSRRW")]
#[case::csrrci(csr_type(1, 7, 5, 0x105), "CSRRCI")]
#[case::ecall(0x0000_0073, "ECALL")]
#[case::ebreak(0x0010_0073, "EBREAK")]
#[case::sret(0x1020_0073, "SRET")]
#[case::mret(0x3020_0073, "MRET")]
#[case::wfi(0x1050_0073, "WFI")]
fn test_decode_resolves_mnemonic(#[case] word: u32, #[case] mnemonic: &str) {
    let inst = decode(word).unwrap();
    assert_eq!(inst.mnemonic, mnemonic);
}

#[test]
fn test_decode_miss_is_illegal_instruction() {
    let word = 0xFFFF_FFFF;
    assert_eq!(decode(word).unwrap_err(), Trap::IllegalInstruction(word));
}

#[test]
fn test_decode_zero_word_is_illegal() {
    assert_eq!(decode(0).unwrap_err(), Trap::IllegalInstruction(0));
}

#[test]
fn test_decode_carries_offending_word() {
    // A plausible-looking but undefined opcode.
    let word = 0x0000_00AB;
    match decode(word) {
        Err(Trap::IllegalInstruction(w)) => assert_eq!(w, word),
        other => panic!("expected IllegalInstruction, got {other:?}"),
    }
}

#[test]
fn test_instruction_debug_formatting_names_mnemonic() {
    let inst = decode(u_type(0x37, 1, 1)).unwrap();
    assert!(format!("{inst:?}").contains("LUI"));
}

#[test]
fn test_decode_distinguishes_shift_variants() {
    // SRLI and SRAI share funct3 and differ only in bit 30.
    let srli = i_type(0x13, 1, 5, 2, 7);
    let srai = srli | 0x4000_0000;
    assert_eq!(decode(srli).unwrap().mnemonic, "SRLI");
    assert_eq!(decode(srai).unwrap().mnemonic, "SRAI");
}

#[test]
fn test_decode_amo_ignores_ordering_bits() {
    // aq/rl set on AMOSWAP.W (funct5 = 1) should still match.
    let word = r_type(0x2F, 1, 2, 2, 3, (0x01 << 2) | 0x3);
    assert_eq!(decode(word).unwrap().mnemonic, "AMOSWAP.W");
}
