//! Privileged instructions.
//!
//! ECALL and EBREAK raise their traps through the normal fault path, so
//! the step loop delivers them like any other exception. SRET and MRET
//! unwind the trap stack. WFI and SFENCE.VMA are accepted and do nothing:
//! there is no interrupt source to wait on, and translations are never
//! cached.

use crate::common::{PrivilegeMode, Trap};
use crate::cpu::Cpu;
use crate::isa::Instruction;
use crate::isa::format::Format;

fn ecall(_word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    match cpu.privilege {
        PrivilegeMode::User => Err(Trap::EnvironmentCallFromUMode),
        PrivilegeMode::Supervisor => Err(Trap::EnvironmentCallFromSMode),
        _ => Err(Trap::EnvironmentCallFromMMode),
    }
}

fn ebreak(_word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    Err(Trap::Breakpoint(cpu.pc.wrapping_sub(4)))
}

fn sret(_word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    cpu.do_sret();
    Ok(())
}

fn mret(_word: u32, cpu: &mut Cpu) -> Result<(), Trap> {
    cpu.do_mret();
    Ok(())
}

fn wfi(_word: u32, _cpu: &mut Cpu) -> Result<(), Trap> {
    Ok(())
}

fn sfence_vma(_word: u32, _cpu: &mut Cpu) -> Result<(), Trap> {
    Ok(())
}

/// Privileged descriptor table.
pub const TABLE: &[Instruction] = &[
    Instruction { mnemonic: "ECALL", format: Format::I, mask: 0xFFFF_FFFF, matcher: 0x0000_0073, execute: ecall },
    Instruction { mnemonic: "EBREAK", format: Format::I, mask: 0xFFFF_FFFF, matcher: 0x0010_0073, execute: ebreak },
    Instruction { mnemonic: "SRET", format: Format::I, mask: 0xFFFF_FFFF, matcher: 0x1020_0073, execute: sret },
    Instruction { mnemonic: "MRET", format: Format::I, mask: 0xFFFF_FFFF, matcher: 0x3020_0073, execute: mret },
    Instruction { mnemonic: "WFI", format: Format::I, mask: 0xFFFF_FFFF, matcher: 0x1050_0073, execute: wfi },
    Instruction { mnemonic: "SFENCE.VMA", format: Format::R, mask: 0xFE00_7FFF, matcher: 0x1200_0073, execute: sfence_vma },
];
