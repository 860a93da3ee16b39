//! CSR instruction semantics and the `satp` side effect.

use pretty_assertions::assert_eq;

use rv64emu_core::common::PagingMode;
use rv64emu_core::cpu::csr;

use crate::common::{RAM_BASE, TestContext, csr_type};

#[test]
fn test_csrrw_returns_old_writes_new() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[csr_type(1, 1, 2, 0x340)]);
    ctx.cpu.set_csr(csr::MSCRATCH, 0xAAAA);
    ctx.set_reg(2, 0xBBBB);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), 0xAAAA);
    assert_eq!(ctx.cpu.csr_read(csr::MSCRATCH), 0xBBBB);
}

#[test]
fn test_csrrs_sets_bits() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[csr_type(1, 2, 2, 0x340)]);
    ctx.cpu.set_csr(csr::MSCRATCH, 0b1100);
    ctx.set_reg(2, 0b0011);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), 0b1100);
    assert_eq!(ctx.cpu.csr_read(csr::MSCRATCH), 0b1111);
}

#[test]
fn test_csrrs_with_x0_does_not_write() {
    // Plain CSR read idiom: CSRRS rd, csr, x0.
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[csr_type(1, 2, 0, 0x340)]);
    ctx.cpu.set_csr(csr::MSCRATCH, 0x5555);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), 0x5555);
    assert_eq!(ctx.cpu.csr_read(csr::MSCRATCH), 0x5555);
}

#[test]
fn test_csrrc_clears_bits() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[csr_type(1, 3, 2, 0x340)]);
    ctx.cpu.set_csr(csr::MSCRATCH, 0b1111);
    ctx.set_reg(2, 0b0101);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), 0b1111);
    assert_eq!(ctx.cpu.csr_read(csr::MSCRATCH), 0b1010);
}

#[test]
fn test_csrrwi_uses_zero_extended_immediate() {
    // CSRRWI x1, mscratch, 21
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[csr_type(1, 5, 21, 0x340)]);
    ctx.cpu.set_csr(csr::MSCRATCH, 9);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), 9);
    assert_eq!(ctx.cpu.csr_read(csr::MSCRATCH), 21);
}

#[test]
fn test_csrrsi_zero_immediate_does_not_write() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[csr_type(1, 6, 0, 0x340)]);
    ctx.cpu.set_csr(csr::MSCRATCH, 0xFF);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), 0xFF);
    assert_eq!(ctx.cpu.csr_read(csr::MSCRATCH), 0xFF);
}

#[test]
fn test_satp_write_enables_sv39() {
    let mut ctx = TestContext::new();
    let root_ppn = RAM_BASE >> 12;
    ctx.cpu.set_csr(csr::SATP, csr::SATP_MODE_BIT | root_ppn);
    assert_eq!(ctx.cpu.mmu.paging_mode(), PagingMode::Sv39);
    assert_eq!(ctx.cpu.mmu.root_ppn(), root_ppn);
}

#[test]
fn test_satp_write_returns_to_bare() {
    let mut ctx = TestContext::new();
    ctx.cpu
        .set_csr(csr::SATP, csr::SATP_MODE_BIT | (RAM_BASE >> 12));
    ctx.cpu.set_csr(csr::SATP, 0);
    assert_eq!(ctx.cpu.mmu.paging_mode(), PagingMode::Bare);
    assert_eq!(ctx.cpu.mmu.root_ppn(), 0);
}

#[test]
fn test_satp_ppn_field_is_44_bits() {
    let mut ctx = TestContext::new();
    // Bits 44-62 sit between the PPN field and the mode bit and must not
    // leak into the root PPN.
    ctx.cpu.set_csr(csr::SATP, (0xFFu64 << 44) | 0x1234);
    assert_eq!(ctx.cpu.mmu.root_ppn(), 0x1234);
    assert_eq!(ctx.cpu.mmu.paging_mode(), PagingMode::Bare);
}

#[test]
fn test_csr_file_is_flat_storage() {
    let mut ctx = TestContext::new();
    // Arbitrary addresses hold values independently.
    ctx.cpu.set_csr(0x001, 11);
    ctx.cpu.set_csr(0x7FF, 22);
    ctx.cpu.set_csr(0xFFF, 33);
    assert_eq!(ctx.cpu.csr_read(0x001), 11);
    assert_eq!(ctx.cpu.csr_read(0x7FF), 22);
    assert_eq!(ctx.cpu.csr_read(0xFFF), 33);
}
