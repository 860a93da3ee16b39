//! Integer execution tests: RV64I arithmetic, control transfer, and the
//! M extension edge cases.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::{RAM_BASE, TestContext, b_type, i_type, j_type, r_type, u_type};

#[test]
fn test_addi_basic() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[i_type(0x13, 1, 0, 0, 42)]);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), 42);
}

#[test]
fn test_addi_negative_immediate() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[i_type(0x13, 1, 0, 2, -1)]);
    ctx.set_reg(2, 10);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), 9);
}

#[test]
fn test_x0_ignores_writes_across_steps() {
    let mut ctx = TestContext::new().load_program(
        RAM_BASE,
        &[
            i_type(0x13, 0, 0, 0, 123),        // ADDI x0, x0, 123
            r_type(0x33, 0, 0, 1, 1, 0),       // ADD x0, x1, x1
            i_type(0x13, 2, 0, 0, 7),          // ADDI x2, x0, 7
        ],
    );
    ctx.set_reg(1, 55);
    ctx.run(3);
    assert_eq!(ctx.get_reg(0), 0);
    assert_eq!(ctx.get_reg(2), 7);
}

#[test]
fn test_lui_sign_extends_upper_immediate() {
    // imm20 = 0x80000 has bit 31 set after shifting, so the register value
    // is sign-extended to 64 bits.
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[u_type(0x37, 1, 0x80000)]);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), 0xFFFF_FFFF_8000_0000);
}

#[test]
fn test_lui_positive() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[u_type(0x37, 1, 0x12345)]);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), 0x1234_5000);
}

#[test]
fn test_auipc_is_relative_to_instruction_address() {
    // Second instruction: its own address, not the advanced pc, is the base.
    let mut ctx = TestContext::new().load_program(
        RAM_BASE,
        &[i_type(0x13, 0, 0, 0, 0), u_type(0x17, 1, 1)],
    );
    ctx.run(2);
    assert_eq!(ctx.get_reg(1), RAM_BASE + 4 + 0x1000);
}

#[test]
fn test_jal_links_past_instruction_and_jumps() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[j_type(0x6F, 1, 16)]);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), RAM_BASE + 4);
    assert_eq!(ctx.cpu.pc, RAM_BASE + 16);
}

#[test]
fn test_jal_backward() {
    let start = RAM_BASE + 64;
    let mut ctx = TestContext::new().load_program(start, &[j_type(0x6F, 0, -32)]);
    ctx.run(1);
    assert_eq!(ctx.cpu.pc, start - 32);
}

#[test]
fn test_jalr_clears_bit_zero() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[i_type(0x67, 1, 0, 2, 3)]);
    ctx.set_reg(2, RAM_BASE + 0x100);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), RAM_BASE + 4);
    assert_eq!(ctx.cpu.pc, (RAM_BASE + 0x103) & !1);
}

#[rstest]
#[case::beq_taken(0, 5, 5, true)]
#[case::beq_not_taken(0, 5, 6, false)]
#[case::bne_taken(1, 5, 6, true)]
#[case::blt_taken(4, u64::MAX, 0, true)] // -1 < 0 signed
#[case::bltu_not_taken(6, u64::MAX, 0, false)] // unsigned MAX is not < 0
#[case::bge_taken(5, 0, u64::MAX, true)] // 0 >= -1 signed
#[case::bgeu_taken(7, u64::MAX, 0, true)]
fn test_branch_semantics(
    #[case] funct3: u32,
    #[case] lhs: u64,
    #[case] rhs: u64,
    #[case] taken: bool,
) {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[b_type(0x63, funct3, 1, 2, 64)]);
    ctx.set_reg(1, lhs);
    ctx.set_reg(2, rhs);
    ctx.run(1);
    let expected = if taken { RAM_BASE + 64 } else { RAM_BASE + 4 };
    assert_eq!(ctx.cpu.pc, expected);
}

#[test]
fn test_branch_target_is_relative_to_branch_address() {
    // The branch sits after one filler instruction; the target is branch
    // address + offset, unaffected by the pc increment.
    let mut ctx = TestContext::new().load_program(
        RAM_BASE,
        &[i_type(0x13, 0, 0, 0, 0), b_type(0x63, 0, 0, 1, -4)],
    );
    ctx.run(2);
    assert_eq!(ctx.cpu.pc, RAM_BASE);
}

#[test]
fn test_addw_truncates_then_sign_extends() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[r_type(0x3B, 1, 0, 2, 3, 0)]);
    ctx.set_reg(2, 0x7FFF_FFFF);
    ctx.set_reg(3, 1);
    ctx.run(1);
    // 32-bit overflow into the sign bit, then extended.
    assert_eq!(ctx.get_reg(1), 0xFFFF_FFFF_8000_0000);
}

#[test]
fn test_addiw_ignores_upper_bits_of_source() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[i_type(0x1B, 1, 0, 2, 1)]);
    ctx.set_reg(2, 0xFFFF_FFFF_0000_0001);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), 2);
}

#[test]
fn test_sra_is_arithmetic() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[r_type(0x33, 1, 5, 2, 3, 0x20)]);
    ctx.set_reg(2, u64::MAX - 15); // -16
    ctx.set_reg(3, 2);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1) as i64, -4);
}

#[test]
fn test_slt_vs_sltu() {
    let mut ctx = TestContext::new().load_program(
        RAM_BASE,
        &[
            r_type(0x33, 1, 2, 4, 5, 0), // SLT x1, x4, x5
            r_type(0x33, 2, 3, 4, 5, 0), // SLTU x2, x4, x5
        ],
    );
    ctx.set_reg(4, u64::MAX); // -1 signed
    ctx.set_reg(5, 1);
    ctx.run(2);
    assert_eq!(ctx.get_reg(1), 1);
    assert_eq!(ctx.get_reg(2), 0);
}

#[rstest]
#[case::div_by_zero(4, 7, 0, u64::MAX)]
#[case::div_overflow(4, i64::MIN as u64, u64::MAX, i64::MIN as u64)]
#[case::rem_by_zero(6, 7, 0, 7)]
#[case::rem_overflow(6, i64::MIN as u64, u64::MAX, 0)]
#[case::divu_by_zero(5, 7, 0, u64::MAX)]
#[case::remu_by_zero(7, 7, 0, 7)]
fn test_division_edge_cases(
    #[case] funct3: u32,
    #[case] lhs: u64,
    #[case] rhs: u64,
    #[case] expected: u64,
) {
    let mut ctx =
        TestContext::new().load_program(RAM_BASE, &[r_type(0x33, 1, funct3, 2, 3, 0x01)]);
    ctx.set_reg(2, lhs);
    ctx.set_reg(3, rhs);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), expected);
}

#[test]
fn test_divw_by_zero_yields_minus_one() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[r_type(0x3B, 1, 4, 2, 3, 0x01)]);
    ctx.set_reg(2, 100);
    ctx.set_reg(3, 0);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), u64::MAX);
}

#[test]
fn test_mulh_high_bits() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[r_type(0x33, 1, 1, 2, 3, 0x01)]);
    ctx.set_reg(2, u64::MAX); // -1
    ctx.set_reg(3, u64::MAX); // -1
    ctx.run(1);
    // (-1) * (-1) = 1; high 64 bits are zero.
    assert_eq!(ctx.get_reg(1), 0);
}

#[test]
fn test_mulhu_high_bits() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[r_type(0x33, 1, 3, 2, 3, 0x01)]);
    ctx.set_reg(2, u64::MAX);
    ctx.set_reg(3, u64::MAX);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), u64::MAX - 1);
}
