//! Integer multiply and divide (M extension).
//!
//! Division never traps. Divide by zero yields all-ones (or the dividend
//! for remainders); signed overflow (`i64::MIN / -1` and the 32-bit
//! analog) yields the dividend (or zero for remainders). W-suffix
//! operations compute in 32 bits and sign-extend the result.

use crate::common::Trap;
use crate::cpu::Cpu;
use crate::isa::Instruction;
use crate::isa::format::{Format, rd, rs1, rs2};

fn mul(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = cpu.read_reg(rs1(word)).wrapping_mul(cpu.read_reg(rs2(word)));
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn mulh(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let lhs = cpu.read_reg(rs1(word)) as i64 as i128;
    let rhs = cpu.read_reg(rs2(word)) as i64 as i128;
    cpu.write_reg(rd(word), ((lhs * rhs) >> 64) as u64);
    Ok(())
}

fn mulhsu(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let lhs = cpu.read_reg(rs1(word)) as i64 as i128;
    let rhs = i128::from(cpu.read_reg(rs2(word)));
    cpu.write_reg(rd(word), ((lhs * rhs) >> 64) as u64);
    Ok(())
}

fn mulhu(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let lhs = u128::from(cpu.read_reg(rs1(word)));
    let rhs = u128::from(cpu.read_reg(rs2(word)));
    cpu.write_reg(rd(word), ((lhs * rhs) >> 64) as u64);
    Ok(())
}

fn div(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let lhs = cpu.read_reg(rs1(word)) as i64;
    let rhs = cpu.read_reg(rs2(word)) as i64;
    let val = if rhs == 0 {
        u64::MAX
    } else {
        lhs.wrapping_div(rhs) as u64
    };
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn divu(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let lhs = cpu.read_reg(rs1(word));
    let rhs = cpu.read_reg(rs2(word));
    let val = if rhs == 0 { u64::MAX } else { lhs / rhs };
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn rem(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let lhs = cpu.read_reg(rs1(word)) as i64;
    let rhs = cpu.read_reg(rs2(word)) as i64;
    let val = if rhs == 0 {
        lhs as u64
    } else {
        lhs.wrapping_rem(rhs) as u64
    };
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn remu(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let lhs = cpu.read_reg(rs1(word));
    let rhs = cpu.read_reg(rs2(word));
    let val = if rhs == 0 { lhs } else { lhs % rhs };
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn mulw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let val = (cpu.read_reg(rs1(word)) as i32).wrapping_mul(cpu.read_reg(rs2(word)) as i32);
    cpu.write_reg(rd(word), val as i64 as u64);
    Ok(())
}

fn divw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let lhs = cpu.read_reg(rs1(word)) as i32;
    let rhs = cpu.read_reg(rs2(word)) as i32;
    let val = if rhs == 0 {
        -1i64
    } else {
        i64::from(lhs.wrapping_div(rhs))
    };
    cpu.write_reg(rd(word), val as u64);
    Ok(())
}

fn divuw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let lhs = cpu.read_reg(rs1(word)) as u32;
    let rhs = cpu.read_reg(rs2(word)) as u32;
    let val = if rhs == 0 {
        u64::MAX
    } else {
        (lhs / rhs) as i32 as i64 as u64
    };
    cpu.write_reg(rd(word), val);
    Ok(())
}

fn remw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let lhs = cpu.read_reg(rs1(word)) as i32;
    let rhs = cpu.read_reg(rs2(word)) as i32;
    let val = if rhs == 0 {
        i64::from(lhs)
    } else {
        i64::from(lhs.wrapping_rem(rhs))
    };
    cpu.write_reg(rd(word), val as u64);
    Ok(())
}

fn remuw(word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    let lhs = cpu.read_reg(rs1(word)) as u32;
    let rhs = cpu.read_reg(rs2(word)) as u32;
    let val = if rhs == 0 {
        i64::from(lhs as i32) as u64
    } else {
        (lhs % rhs) as i32 as i64 as u64
    };
    cpu.write_reg(rd(word), val);
    Ok(())
}

/// M extension descriptor table.
pub const TABLE: &[Instruction] = &[
    Instruction { mnemonic: "MUL", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_0033, execute: mul },
    Instruction { mnemonic: "MULH", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_1033, execute: mulh },
    Instruction { mnemonic: "MULHSU", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_2033, execute: mulhsu },
    Instruction { mnemonic: "MULHU", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_3033, execute: mulhu },
    Instruction { mnemonic: "DIV", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_4033, execute: div },
    Instruction { mnemonic: "DIVU", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_5033, execute: divu },
    Instruction { mnemonic: "REM", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_6033, execute: rem },
    Instruction { mnemonic: "REMU", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_7033, execute: remu },
    Instruction { mnemonic: "MULW", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_003B, execute: mulw },
    Instruction { mnemonic: "DIVW", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_403B, execute: divw },
    Instruction { mnemonic: "DIVUW", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_503B, execute: divuw },
    Instruction { mnemonic: "REMW", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_603B, execute: remw },
    Instruction { mnemonic: "REMUW", format: Format::R, mask: 0xFE00_707F, matcher: 0x0200_703B, execute: remuw },
];
