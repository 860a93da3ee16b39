//! Sv39 translation tests.
//!
//! Page tables are built by hand in test RAM through physical writes, then
//! activated with a `satp` write so the virtual paths exercise the walk.

use pretty_assertions::assert_eq;

use rv64emu_core::common::{AccessType, Trap};
use rv64emu_core::cpu::csr;
use rv64emu_core::mmu::pte::PageTableEntry;

use crate::common::{RAM_BASE, TestContext};

const PTE_V: u64 = 1;
const PTE_R: u64 = 1 << 1;
const PTE_W: u64 = 1 << 2;
const PTE_X: u64 = 1 << 3;
const PTE_U: u64 = 1 << 4;

/// Root page table at the bottom of RAM, next tables in following frames.
const L2_TABLE: u64 = RAM_BASE;
const L1_TABLE: u64 = RAM_BASE + 0x1000;
const L0_TABLE: u64 = RAM_BASE + 0x2000;

fn pte(pa: u64, flags: u64) -> u64 {
    (pa >> 12) << 10 | flags
}

fn write_pte(ctx: &mut TestContext, table: u64, index: u64, entry: u64) {
    ctx.cpu.mmu.write_phys(table + index * 8, 8, entry).unwrap();
}

fn enable_sv39(ctx: &mut TestContext, root: u64) {
    ctx.cpu.set_csr(csr::SATP, csr::SATP_MODE_BIT | (root >> 12));
}

/// Installs a 1 GiB identity superpage covering all of test RAM.
///
/// RAM sits at 0x8000_0000, so its VPN[2] index is 2.
fn identity_gigapage(ctx: &mut TestContext, flags: u64) {
    write_pte(ctx, L2_TABLE, 2, pte(RAM_BASE, PTE_V | flags));
    enable_sv39(ctx, L2_TABLE);
}

#[test]
fn test_bare_mode_is_identity() {
    let mut ctx = TestContext::new();
    let pa = ctx
        .cpu
        .mmu
        .translate(RAM_BASE + 0x1234, AccessType::Load)
        .unwrap();
    assert_eq!(pa, RAM_BASE + 0x1234);
}

#[test]
fn test_gigapage_identity_round_trip() {
    let mut ctx = TestContext::new();
    identity_gigapage(&mut ctx, PTE_R | PTE_W | PTE_X);

    let vaddr = RAM_BASE + 0x5008;
    ctx.cpu.store(vaddr, 8, 0xCAFE).unwrap();
    assert_eq!(ctx.cpu.load(vaddr, 8).unwrap(), 0xCAFE);
}

#[test]
fn test_gigapage_offset_comes_from_vaddr() {
    // A superpage leaf keeps only the PPN bits above the offset; the low
    // 30 bits of the physical address come straight from the virtual one.
    let mut ctx = TestContext::new();
    identity_gigapage(&mut ctx, PTE_R | PTE_W);

    let vaddr = RAM_BASE + 0x0012_3456;
    let pa = ctx.cpu.mmu.translate(vaddr, AccessType::Load).unwrap();
    assert_eq!(pa, vaddr);
}

#[test]
fn test_three_level_walk_maps_single_page() {
    let mut ctx = TestContext::new();
    // vaddr 0x8040_3000: VPN[2]=2, VPN[1]=2, VPN[0]=3.
    let vaddr = 0x8040_3000u64;
    let frame = RAM_BASE + 0x3000;
    write_pte(&mut ctx, L2_TABLE, 2, pte(L1_TABLE, PTE_V));
    write_pte(&mut ctx, L1_TABLE, 2, pte(L0_TABLE, PTE_V));
    write_pte(&mut ctx, L0_TABLE, 3, pte(frame, PTE_V | PTE_R | PTE_W));
    enable_sv39(&mut ctx, L2_TABLE);

    let pa = ctx.cpu.mmu.translate(vaddr + 0xABC, AccessType::Load).unwrap();
    assert_eq!(pa, frame + 0xABC);

    ctx.cpu.store(vaddr + 0x10, 8, 77).unwrap();
    assert_eq!(ctx.cpu.mmu.read_phys(frame + 0x10, 8).unwrap(), 77);
}

#[test]
fn test_unmapped_vaddr_is_page_fault() {
    let mut ctx = TestContext::new();
    identity_gigapage(&mut ctx, PTE_R | PTE_W);

    // VPN[2]=0 has no entry.
    assert_eq!(
        ctx.cpu.load(0x1000, 8).unwrap_err(),
        Trap::LoadPageFault(0x1000)
    );
    assert_eq!(
        ctx.cpu.store(0x1000, 8, 0).unwrap_err(),
        Trap::StoreAmoPageFault(0x1000)
    );
    assert_eq!(
        ctx.cpu.mmu.fetch(0x1000).unwrap_err(),
        Trap::InstructionPageFault(0x1000)
    );
}

#[test]
fn test_invalid_pte_is_page_fault() {
    let mut ctx = TestContext::new();
    // Entry present but V=0.
    write_pte(&mut ctx, L2_TABLE, 2, pte(RAM_BASE, PTE_R | PTE_W));
    enable_sv39(&mut ctx, L2_TABLE);

    assert_eq!(
        ctx.cpu.load(RAM_BASE, 8).unwrap_err(),
        Trap::LoadPageFault(RAM_BASE)
    );
}

#[test]
fn test_write_only_pte_is_page_fault() {
    // W=1 with R=0 is a reserved encoding and faults regardless of access.
    let mut ctx = TestContext::new();
    write_pte(&mut ctx, L2_TABLE, 2, pte(RAM_BASE, PTE_V | PTE_W));
    enable_sv39(&mut ctx, L2_TABLE);

    assert_eq!(
        ctx.cpu.load(RAM_BASE, 8).unwrap_err(),
        Trap::LoadPageFault(RAM_BASE)
    );
}

#[test]
fn test_pointer_at_last_level_is_page_fault() {
    let mut ctx = TestContext::new();
    let vaddr = 0x8040_3000u64;
    write_pte(&mut ctx, L2_TABLE, 2, pte(L1_TABLE, PTE_V));
    write_pte(&mut ctx, L1_TABLE, 2, pte(L0_TABLE, PTE_V));
    // Level-0 entry with no R/W/X bits points nowhere.
    write_pte(&mut ctx, L0_TABLE, 3, pte(RAM_BASE + 0x3000, PTE_V));
    enable_sv39(&mut ctx, L2_TABLE);

    assert_eq!(
        ctx.cpu.load(vaddr, 8).unwrap_err(),
        Trap::LoadPageFault(vaddr)
    );
}

#[test]
fn test_unreachable_page_table_is_access_fault() {
    // Root PPN points below RAM; the PTE read misses every device, which
    // surfaces as an access fault of the original access type.
    let mut ctx = TestContext::new();
    enable_sv39(&mut ctx, 0x40_0000);

    assert_eq!(
        ctx.cpu.load(RAM_BASE, 8).unwrap_err(),
        Trap::LoadAccessFault(RAM_BASE)
    );
    assert_eq!(
        ctx.cpu.store(RAM_BASE, 8, 0).unwrap_err(),
        Trap::StoreAmoAccessFault(RAM_BASE)
    );
}

#[test]
fn test_fetch_fault_flavor_through_step() {
    use rv64emu_core::common::trap::exception;

    // Sv39 with an empty root table: the fetch itself page-faults and the
    // step loop delivers it with the instruction flavor.
    let mut ctx = TestContext::new();
    ctx.cpu.set_csr(csr::MTVEC, RAM_BASE + 0x800);
    enable_sv39(&mut ctx, L2_TABLE);
    ctx.cpu.pc = 0x4000_0000;
    ctx.cpu.step();

    assert_eq!(
        ctx.cpu.csr_read(csr::MCAUSE),
        exception::INSTRUCTION_PAGE_FAULT
    );
    assert_eq!(ctx.cpu.csr_read(csr::MEPC), 0x4000_0000);
    assert_eq!(ctx.cpu.pc, RAM_BASE + 0x800);
}

#[test]
fn test_pte_field_accessors() {
    let raw = pte(0x8000_3000, PTE_V | PTE_R | PTE_U) | 3 << 8;
    let entry = PageTableEntry::new(raw);
    assert!(entry.is_valid());
    assert!(entry.can_read());
    assert!(!entry.can_write());
    assert!(entry.is_user());
    assert!(entry.is_leaf());
    assert!(!entry.is_malformed());
    assert_eq!(entry.rsw(), 3);
    assert_eq!(entry.ppn(), 0x8_0003);
    assert_eq!(entry.ppn0(), 3);
    assert_eq!(entry.ppn1(), 0);
    assert_eq!(entry.ppn2(), 2);
}
