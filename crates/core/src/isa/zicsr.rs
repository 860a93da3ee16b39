//! CSR access instructions (Zicsr) and the instruction-fetch fence (Zifencei).
//!
//! All six CSR instructions read the old value before any write takes
//! effect, and the old value lands in `rd` (including `x0`, where it is
//! discarded). Per the base ISA, the set/clear forms skip the CSR write
//! entirely when the source is `x0` (or the immediate is zero), so
//! read-only polling never triggers write side effects.

use crate::common::Trap;
use crate::cpu::Cpu;
use crate::isa::Instruction;
use crate::isa::format::{Format, csr_addr, rd, rs1};

/// Zero-extended immediate held in the rs1 field of the I-variants.
fn zimm(word: u32) -> u64 {
    u64::from((word >> 15) & 0x1F)
}

fn csrrw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let addr = csr_addr(word);
    let old = cpu.csr_read(addr);
    cpu.set_csr(addr, cpu.read_reg(rs1(word)));
    cpu.write_reg(rd(word), old);
    Ok(())
}

fn csrrs(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let addr = csr_addr(word);
    let old = cpu.csr_read(addr);
    if rs1(word) != 0 {
        cpu.set_csr(addr, old | cpu.read_reg(rs1(word)));
    }
    cpu.write_reg(rd(word), old);
    Ok(())
}

fn csrrc(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let addr = csr_addr(word);
    let old = cpu.csr_read(addr);
    if rs1(word) != 0 {
        cpu.set_csr(addr, old & !cpu.read_reg(rs1(word)));
    }
    cpu.write_reg(rd(word), old);
    Ok(())
}

fn csrrwi(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let addr = csr_addr(word);
    let old = cpu.csr_read(addr);
    cpu.set_csr(addr, zimm(word));
    cpu.write_reg(rd(word), old);
    Ok(())
}

fn csrrsi(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let addr = csr_addr(word);
    let old = cpu.csr_read(addr);
    if zimm(word) != 0 {
        cpu.set_csr(addr, old | zimm(word));
    }
    cpu.write_reg(rd(word), old);
    Ok(())
}

fn csrrci(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let addr = csr_addr(word);
    let old = cpu.csr_read(addr);
    if zimm(word) != 0 {
        cpu.set_csr(addr, old & !zimm(word));
    }
    cpu.write_reg(rd(word), old);
    Ok(())
}

/// Instructions are always fetched from memory; there is no fetch state to
/// synchronize.
fn fence_i(_word: u32, _cpu: &mut Cpu) -> Result<(), Trap> {
    Ok(())
}

/// Zicsr and Zifencei descriptor table.
pub const TABLE: &[Instruction] = &[
    Instruction { mnemonic: "CSRRW", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_1073, execute: csrrw },
    Instruction { mnemonic: "CSRRS", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_2073, execute: csrrs },
    Instruction { mnemonic: "CSRRC", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_3073, execute: csrrc },
    Instruction { mnemonic: "CSRRWI", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_5073, execute: csrrwi },
    Instruction { mnemonic: "CSRRSI", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_6073, execute: csrrsi },
    Instruction { mnemonic: "CSRRCI", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_7073, execute: csrrci },
    Instruction { mnemonic: "FENCE.I", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_100F, execute: fence_i },
];
