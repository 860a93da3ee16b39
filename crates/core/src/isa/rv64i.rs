//! Base integer instruction set (RV64I).
//!
//! Actions run after the program counter has already advanced past the
//! instruction, so anything pc-relative (AUIPC, JAL, branches) computes
//! against the instruction's own address, `pc - 4`. W-suffix operations
//! compute in 32 bits and sign-extend the result to the full register
//! width.

use crate::common::Trap;
use crate::cpu::Cpu;
use crate::isa::Instruction;
use crate::isa::format::{Format, imm_b, imm_i, imm_j, imm_s, imm_u, rd, rs1, rs2, shamt5, shamt6};

/// Address of the currently-executing instruction.
fn inst_addr(cpu: &Cpu) -> u64 {
    cpu.pc.wrapping_sub(4)
}

fn lui(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    cpu.write_reg(rd(word), imm_u(word) as u64);
    Ok(())
}

fn auipc(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = inst_addr(cpu).wrapping_add(imm_u(word) as u64);
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn jal(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let link = cpu.pc;
    cpu.pc = inst_addr(cpu).wrapping_add(imm_j(word) as u64);
    cpu.write_reg(rd(word), link);
    Ok(())
}

fn jalr(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let link = cpu.pc;
    let target = cpu.read_reg(rs1(word)).wrapping_add(imm_i(word) as u64) & !1;
    cpu.pc = target;
    cpu.write_reg(rd(word), link);
    Ok(())
}

fn branch(word: u32, cpu: &mut Cpu, taken: bool) -> Result<(), Trap> {
    if taken {
        cpu.pc = inst_addr(cpu).wrapping_add(imm_b(word) as u64);
    }
    Ok(())
}

fn beq(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let taken = cpu.read_reg(rs1(word)) == cpu.read_reg(rs2(word));
    branch(word, cpu, taken)
}

fn bne(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let taken = cpu.read_reg(rs1(word)) != cpu.read_reg(rs2(word));
    branch(word, cpu, taken)
}

fn blt(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let taken = (cpu.read_reg(rs1(word)) as i64) < (cpu.read_reg(rs2(word)) as i64);
    branch(word, cpu, taken)
}

fn bge(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let taken = (cpu.read_reg(rs1(word)) as i64) >= (cpu.read_reg(rs2(word)) as i64);
    branch(word, cpu, taken)
}

fn bltu(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let taken = cpu.read_reg(rs1(word)) < cpu.read_reg(rs2(word));
    branch(word, cpu, taken)
}

fn bgeu(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let taken = cpu.read_reg(rs1(word)) >= cpu.read_reg(rs2(word));
    branch(word, cpu, taken)
}

fn load_addr(word: u32, cpu: &Cpu) -> u64 {
    cpu.read_reg(rs1(word)).wrapping_add(imm_i(word) as u64)
}

fn lb(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.load(load_addr(word, cpu), 1)?;
    cpu.write_reg(rd(word), val as u8 as i8 as i64 as u64);
    Ok(())
}

fn lh(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.load(load_addr(word, cpu), 2)?;
    cpu.write_reg(rd(word), val as u16 as i16 as i64 as u64);
    Ok(())
}

fn lw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.load(load_addr(word, cpu), 4)?;
    cpu.write_reg(rd(word), val as u32 as i32 as i64 as u64);
    Ok(())
}

fn ld(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.load(load_addr(word, cpu), 8)?;
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn lbu(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.load(load_addr(word, cpu), 1)?;
    cpu.write_reg(rd(word), val & 0xFF);
    Ok(())
}

fn lhu(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.load(load_addr(word, cpu), 2)?;
    cpu.write_reg(rd(word), val & 0xFFFF);
    Ok(())
}

fn lwu(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.load(load_addr(word, cpu), 4)?;
    cpu.write_reg(rd(word), val & 0xFFFF_FFFF);
    Ok(())
}

fn store_addr(word: u32, cpu: &Cpu) -> u64 {
    cpu.read_reg(rs1(word)).wrapping_add(imm_s(word) as u64)
}

fn sb(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    cpu.store(store_addr(word, cpu), 1, cpu.read_reg(rs2(word)))
}

fn sh(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    cpu.store(store_addr(word, cpu), 2, cpu.read_reg(rs2(word)))
}

fn sw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    cpu.store(store_addr(word, cpu), 4, cpu.read_reg(rs2(word)))
}

fn sd(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    cpu.store(store_addr(word, cpu), 8, cpu.read_reg(rs2(word)))
}

fn addi(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)).wrapping_add(imm_i(word) as u64);
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn slti(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = ((cpu.read_reg(rs1(word)) as i64) < imm_i(word)) as u64;
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn sltiu(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) < imm_i(word) as u64) as u64;
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn xori(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)) ^ imm_i(word) as u64;
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn ori(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)) | imm_i(word) as u64;
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn andi(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)) & imm_i(word) as u64;
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn slli(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)) << shamt6(word);
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn srli(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)) >> shamt6(word);
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn srai(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) as i64) >> shamt6(word);
    cpu.write_reg(rd(word), val as u64);
    Ok(())
}

fn add(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)).wrapping_add(cpu.read_reg(rs2(word)));
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn sub(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)).wrapping_sub(cpu.read_reg(rs2(word)));
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn sll(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)) << (cpu.read_reg(rs2(word)) & 0x3F);
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn slt(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = ((cpu.read_reg(rs1(word)) as i64) < (cpu.read_reg(rs2(word)) as i64)) as u64;
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn sltu(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) < cpu.read_reg(rs2(word))) as u64;
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn xor(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)) ^ cpu.read_reg(rs2(word));
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn srl(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)) >> (cpu.read_reg(rs2(word)) & 0x3F);
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn sra(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) as i64) >> (cpu.read_reg(rs2(word)) & 0x3F);
    cpu.write_reg(rd(word), val as u64);
    Ok(())
}

fn or(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)) | cpu.read_reg(rs2(word));
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn and(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)) & cpu.read_reg(rs2(word));
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn addiw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) as i32).wrapping_add(imm_i(word) as i32);
    cpu.write_reg(rd(word), val as i64 as u64);
    Ok(())
}

fn slliw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) as u32) << shamt5(word);
    cpu.write_reg(rd(word), val as i32 as i64 as u64);
    Ok(())
}

fn srliw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) as u32) >> shamt5(word);
    cpu.write_reg(rd(word), val as i32 as i64 as u64);
    Ok(())
}

fn sraiw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) as i32) >> shamt5(word);
    cpu.write_reg(rd(word), val as i64 as u64);
    Ok(())
}

fn addw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) as i32).wrapping_add(cpu.read_reg(rs2(word)) as i32);
    cpu.write_reg(rd(word), val as i64 as u64);
    Ok(())
}

fn subw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) as i32).wrapping_sub(cpu.read_reg(rs2(word)) as i32);
    cpu.write_reg(rd(word), val as i64 as u64);
    Ok(())
}

fn sllw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) as u32) << (cpu.read_reg(rs2(word)) & 0x1F);
    cpu.write_reg(rd(word), val as i32 as i64 as u64);
    Ok(())
}

fn srlw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) as u32) >> (cpu.read_reg(rs2(word)) & 0x1F);
    cpu.write_reg(rd(word), val as i32 as i64 as u64);
    Ok(())
}

fn sraw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) as i32) >> (cpu.read_reg(rs2(word)) & 0x1F);
    cpu.write_reg(rd(word), val as i64 as u64);
    Ok(())
}

/// Memory ordering is trivially satisfied by in-order interpretation.
fn fence(_word: u32, _cpu: &mut Cpu) -> Result<(), Trap> {
    Ok(())
}

/// RV64I descriptor table.
pub const TABLE: &[Instruction] = &[
    Instruction { mnemonic: "LUI", format: Format::U, mask: 0x0000_007F, matcher: 0x0000_0037, execute: lui },
    Instruction { mnemonic: "AUIPC", format: Format::U, mask: 0x0000_007F, matcher: 0x0000_0017, execute: auipc },
    Instruction { mnemonic: "JAL", format: Format::J, mask: 0x0000_007F, matcher: 0x0000_006F, execute: jal },
    Instruction { mnemonic: "JALR", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_0067, execute: jalr },
    Instruction { mnemonic: "BEQ", format: Format::B, mask: 0x0000_707F, matcher: 0x0000_0063, execute: beq },
    Instruction { mnemonic: "BNE", format: Format::B, mask: 0x0000_707F, matcher: 0x0000_1063, execute: bne },
    Instruction { mnemonic: "BLT", format: Format::B, mask: 0x0000_707F, matcher: 0x0000_4063, execute: blt },
    Instruction { mnemonic: "BGE", format: Format::B, mask: 0x0000_707F, matcher: 0x0000_5063, execute: bge },
    Instruction { mnemonic: "BLTU", format: Format::B, mask: 0x0000_707F, matcher: 0x0000_6063, execute: bltu },
    Instruction { mnemonic: "BGEU", format: Format::B, mask: 0x0000_707F, matcher: 0x0000_7063, execute: bgeu },
    Instruction { mnemonic: "LB", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_0003, execute: lb },
    Instruction { mnemonic: "LH", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_1003, execute: lh },
    Instruction { mnemonic: "LW", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_2003, execute: lw },
    Instruction { mnemonic: "LD", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_3003, execute: ld },
    Instruction { mnemonic: "LBU", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_4003, execute: lbu },
    Instruction { mnemonic: "LHU", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_5003, execute: lhu },
    Instruction { mnemonic: "LWU", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_6003, execute: lwu },
    Instruction { mnemonic: "SB", format: Format::S, mask: 0x0000_707F, matcher: 0x0000_0023, execute: sb },
    Instruction { mnemonic: "SH", format: Format::S, mask: 0x0000_707F, matcher: 0x0000_1023, execute: sh },
    Instruction { mnemonic: "SW", format: Format::S, mask: 0x0000_707F, matcher: 0x0000_2023, execute: sw },
    Instruction { mnemonic: "SD", format: Format::S, mask: 0x0000_707F, matcher: 0x0000_3023, execute: sd },
    Instruction { mnemonic: "ADDI", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_0013, execute: addi },
    Instruction { mnemonic: "SLTI", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_2013, execute: slti },
    Instruction { mnemonic: "SLTIU", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_3013, execute: sltiu },
    Instruction { mnemonic: "XORI", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_4013, execute: xori },
    Instruction { mnemonic: "ORI", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_6013, execute: ori },
    Instruction { mnemonic: "ANDI", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_7013, execute: andi },
    Instruction { mnemonic: "SLLI", format: Format::I, mask: 0xFC00_707F, matcher: 0x0000_1013, execute: slli },
    Instruction { mnemonic: "SRLI", format: Format::I, mask: 0xFC00_707F, matcher: 0x0000_5013, execute: srli },
    Instruction { mnemonic: "SRAI", format: Format::I, mask: 0xFC00_707F, matcher: 0x4000_5013, execute: srai },
    Instruction { mnemonic: "ADD", format: Format::R, mask: 0xFE00_707F, matcher: 0x0000_0033, execute: add },
    Instruction { mnemonic: "SUB", format: Format::R, mask: 0xFE00_707F, matcher: 0x4000_0033, execute: sub },
    Instruction { mnemonic: "SLL", format: Format::R, mask: 0xFE00_707F, matcher: 0x0000_1033, execute: sll },
    Instruction { mnemonic: "SLT", format: Format::R, mask: 0xFE00_707F, matcher: 0x0000_2033, execute: slt },
    Instruction { mnemonic: "SLTU", format: Format::R, mask: 0xFE00_707F, matcher: 0x0000_3033, execute: sltu },
    Instruction { mnemonic: "XOR", format: Format::R, mask: 0xFE00_707F, matcher: 0x0000_4033, execute: xor },
    Instruction { mnemonic: "SRL", format: Format::R, mask: 0xFE00_707F, matcher: 0x0000_5033, execute: srl },
    Instruction { mnemonic: "SRA", format: Format::R, mask: 0xFE00_707F, matcher: 0x4000_5033, execute: sra },
    Instruction { mnemonic: "OR", format: Format::R, mask: 0xFE00_707F, matcher: 0x0000_6033, execute: or },
    Instruction { mnemonic: "AND", format: Format::R, mask: 0xFE00_707F, matcher: 0x0000_7033, execute: and },
    Instruction { mnemonic: "ADDIW", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_001B, execute: addiw },
    Instruction { mnemonic: "SLLIW", format: Format::I, mask: 0xFE00_707F, matcher: 0x0000_101B, execute: slliw },
    Instruction { mnemonic: "SRLIW", format: Format::I, mask: 0xFE00_707F, matcher: 0x0000_501B, execute: srliw },
    Instruction { mnemonic: "SRAIW", format: Format::I, mask: 0xFE00_707F, matcher: 0x4000_501B, execute: sraiw },
    Instruction { mnemonic: "ADDW", format: Format::R, mask: 0xFE00_707F, matcher: 0x0000_003B, execute: addw },
    Instruction { mnemonic: "SUBW", format: Format::R, mask: 0xFE00_707F, matcher: 0x4000_003B, execute: subw },
    Instruction { mnemonic: "SLLW", format: Format::R, mask: 0xFE00_707F, matcher: 0x0000_103B, execute: sllw },
    Instruction { mnemonic: "SRLW", format: Format::R, mask: 0xFE00_707F, matcher: 0x0000_503B, execute: srlw },
    Instruction { mnemonic: "SRAW", format: Format::R, mask: 0xFE00_707F, matcher: 0x4000_503B, execute: sraw },
    Instruction { mnemonic: "FENCE", format: Format::I, mask: 0x0000_707F, matcher: 0x0000_000F, execute: fence },
];
