//! Atomic memory operations (A extension).
//!
//! The hart is alone on the bus, so atomicity is trivial: each AMO is a
//! load, a combine, and a store with nothing in between. The address is the
//! value of `rs1` (no immediate offset) and must be naturally aligned.
//! LR records no reservation and SC always succeeds, writing 0 to `rd`;
//! with a single hart there is no agent that could break a reservation.

use crate::common::Trap;
use crate::cpu::Cpu;
use crate::isa::Instruction;
use crate::isa::format::{Format, rd, rs1, rs2};

/// Checks natural alignment for an atomic access.
fn check_align(addr: u64, size: u64, store: bool) -> Result<(), Trap> {
    if addr % size != 0 {
        if store {
            Err(Trap::StoreAmoAddressMisaligned(addr))
        } else {
            Err(Trap::LoadAddressMisaligned(addr))
        }
    } else {
        Ok(())
    }
}

/// Runs a 64-bit AMO: load old, store `op(old, rs2)`, write old to `rd`.
fn amo_d(word: u32, cpu: &mut Cpu, op: fn(u64, u64) -> u64) -> Result<(), Trap> {
    let addr = cpu.read_reg(rs1(word));
    check_align(addr, 8, true)?;
    let old = cpu.load(addr, 8)?;
    let src = cpu.read_reg(rs2(word));
    cpu.store(addr, 8, op(old, src))?;
    cpu.write_reg(rd(word), old);
    Ok(())
}

/// Runs a 32-bit AMO; the old value is sign-extended into `rd`.
fn amo_w(word: u32, cpu: &mut Cpu, op: fn(u32, u32) -> u32) -> Result<(), Trap> {
    let addr = cpu.read_reg(rs1(word));
    check_align(addr, 4, true)?;
    let old = cpu.load(addr, 4)? as u32;
    let src = cpu.read_reg(rs2(word)) as u32;
    cpu.store(addr, 4, u64::from(op(old, src)))?;
    cpu.write_reg(rd(word), old as i32 as i64 as u64);
    Ok(())
}

fn lr_w(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let addr = cpu.read_reg(rs1(word));
    check_align(addr, 4, false)?;
    let val = cpu.load(addr, 4)?;
    cpu.write_reg(rd(word), val as u32 as i32 as i64 as u64);
    Ok(())
}

fn lr_d(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let addr = cpu.read_reg(rs1(word));
    check_align(addr, 8, false)?;
    let val = cpu.load(addr, 8)?;
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn sc_w(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let addr = cpu.read_reg(rs1(word));
    check_align(addr, 4, true)?;
    cpu.store(addr, 4, cpu.read_reg(rs2(word)) & 0xFFFF_FFFF)?;
    cpu.write_reg(rd(word), 0);
    Ok(())
}

fn sc_d(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let addr = cpu.read_reg(rs1(word));
    check_align(addr, 8, true)?;
    cpu.store(addr, 8, cpu.read_reg(rs2(word)))?;
    cpu.write_reg(rd(word), 0);
    Ok(())
}

fn amoswap_w(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_w(word, cpu, |_, src| src)
}

fn amoadd_w(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_w(word, cpu, u32::wrapping_add)
}

fn amoxor_w(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_w(word, cpu, |old, src| old ^ src)
}

fn amoand_w(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_w(word, cpu, |old, src| old & src)
}

fn amoor_w(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_w(word, cpu, |old, src| old | src)
}

fn amomin_w(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_w(word, cpu, |old, src| (old as i32).min(src as i32) as u32)
}

fn amomax_w(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_w(word, cpu, |old, src| (old as i32).max(src as i32) as u32)
}

fn amominu_w(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_w(word, cpu, u32::min)
}

fn amomaxu_w(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_w(word, cpu, u32::max)
}

fn amoswap_d(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_d(word, cpu, |_, src| src)
}

fn amoadd_d(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_d(word, cpu, u64::wrapping_add)
}

fn amoxor_d(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_d(word, cpu, |old, src| old ^ src)
}

fn amoand_d(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_d(word, cpu, |old, src| old & src)
}

fn amoor_d(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_d(word, cpu, |old, src| old | src)
}

fn amomin_d(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_d(word, cpu, |old, src| (old as i64).min(src as i64) as u64)
}

fn amomax_d(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_d(word, cpu, |old, src| (old as i64).max(src as i64) as u64)
}

fn amominu_d(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_d(word, cpu, u64::min)
}

fn amomaxu_d(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    amo_d(word, cpu, u64::max)
}

/// A extension descriptor table.
///
/// The mask ignores the `aq`/`rl` ordering bits (26-25); ordering is
/// trivially sequential here.
pub const TABLE: &[Instruction] = &[
    Instruction { mnemonic: "LR.W", format: Format::R, mask: 0xF9F0_707F, matcher: 0x1000_202F, execute: lr_w },
    Instruction { mnemonic: "SC.W", format: Format::R, mask: 0xF800_707F, matcher: 0x1800_202F, execute: sc_w },
    Instruction { mnemonic: "AMOSWAP.W", format: Format::R, mask: 0xF800_707F, matcher: 0x0800_202F, execute: amoswap_w },
    Instruction { mnemonic: "AMOADD.W", format: Format::R, mask: 0xF800_707F, matcher: 0x0000_202F, execute: amoadd_w },
    Instruction { mnemonic: "AMOXOR.W", format: Format::R, mask: 0xF800_707F, matcher: 0x2000_202F, execute: amoxor_w },
    Instruction { mnemonic: "AMOAND.W", format: Format::R, mask: 0xF800_707F, matcher: 0x6000_202F, execute: amoand_w },
    Instruction { mnemonic: "AMOOR.W", format: Format::R, mask: 0xF800_707F, matcher: 0x4000_202F, execute: amoor_w },
    Instruction { mnemonic: "AMOMIN.W", format: Format::R, mask: 0xF800_707F, matcher: 0x8000_202F, execute: amomin_w },
    Instruction { mnemonic: "AMOMAX.W", format: Format::R, mask: 0xF800_707F, matcher: 0xA000_202F, execute: amomax_w },
    Instruction { mnemonic: "AMOMINU.W", format: Format::R, mask: 0xF800_707F, matcher: 0xC000_202F, execute: amominu_w },
    Instruction { mnemonic: "AMOMAXU.W", format: Format::R, mask: 0xF800_707F, matcher: 0xE000_202F, execute: amomaxu_w },
    Instruction { mnemonic: "LR.D", format: Format::R, mask: 0xF9F0_707F, matcher: 0x1000_302F, execute: lr_d },
    Instruction { mnemonic: "SC.D", format: Format::R, mask: 0xF800_707F, matcher: 0x1800_302F, execute: sc_d },
    Instruction { mnemonic: "AMOSWAP.D", format: Format::R, mask: 0xF800_707F, matcher: 0x0800_302F, execute: amoswap_d },
    Instruction { mnemonic: "AMOADD.D", format: Format::R, mask: 0xF800_707F, matcher: 0x0000_302F, execute: amoadd_d },
    Instruction { mnemonic: "AMOXOR.D", format: Format::R, mask: 0xF800_707F, matcher: 0x2000_302F, execute: amoxor_d },
    Instruction { mnemonic: "AMOAND.D", format: Format::R, mask: 0xF800_707F, matcher: 0x6000_302F, execute: amoand_d },
    Instruction { mnemonic: "AMOOR.D", format: Format::R, mask: 0xF800_707F, matcher: 0x4000_302F, execute: amoor_d },
    Instruction { mnemonic: "AMOMIN.D", format: Format::R, mask: 0xF800_707F, matcher: 0x8000_302F, execute: amomin_d },
    Instruction { mnemonic: "AMOMAX.D", format: Format::R, mask: 0xF800_707F, matcher: 0xA000_302F, execute: amomax_d },
    Instruction { mnemonic: "AMOMINU.D", format: Format::R, mask: 0xF800_707F, matcher: 0xC000_302F, execute: amominu_d },
    Instruction { mnemonic: "AMOMAXU.D", format: Format::R, mask: 0xF800_707F, matcher: 0xE000_302F, execute: amomaxu_d },
];
