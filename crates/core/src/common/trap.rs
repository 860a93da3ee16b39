//! Trap definitions.
//!
//! This module defines the fault and interrupt taxonomy for the emulator. It provides:
//! 1. **Trap Representation:** Encompassing all synchronous exceptions and asynchronous interrupts.
//! 2. **Cause Codes:** The `mcause`/`scause` encodings for each trap.
//! 3. **Error Handling:** Integration with standard Rust error traits for system-level reporting.
//!
//! Every fallible guest-visible operation in the emulator returns `Result<_, Trap>`;
//! the step loop catches the value exactly once and funnels it into trap delivery.

use std::fmt;

use crate::common::CAUSE_INTERRUPT_BIT;

/// Interrupt cause codes (MSB = 1 in `mcause`/`scause`).
pub mod interrupt {
    /// User software interrupt.
    pub const USER_SOFTWARE: u64 = 0;
    /// Supervisor software interrupt.
    pub const SUPERVISOR_SOFTWARE: u64 = 1;
    /// Machine software interrupt.
    pub const MACHINE_SOFTWARE: u64 = 3;
    /// User timer interrupt.
    pub const USER_TIMER: u64 = 4;
    /// Supervisor timer interrupt.
    pub const SUPERVISOR_TIMER: u64 = 5;
    /// Machine timer interrupt.
    pub const MACHINE_TIMER: u64 = 7;
    /// User external interrupt.
    pub const USER_EXTERNAL: u64 = 8;
    /// Supervisor external interrupt.
    pub const SUPERVISOR_EXTERNAL: u64 = 9;
    /// Machine external interrupt.
    pub const MACHINE_EXTERNAL: u64 = 11;
}

/// Exception cause codes (MSB = 0).
pub mod exception {
    /// Instruction address misaligned (0).
    pub const INSTRUCTION_ADDRESS_MISALIGNED: u64 = 0;
    /// Instruction access fault (1).
    pub const INSTRUCTION_ACCESS_FAULT: u64 = 1;
    /// Illegal instruction (2).
    pub const ILLEGAL_INSTRUCTION: u64 = 2;
    /// Breakpoint (3).
    pub const BREAKPOINT: u64 = 3;
    /// Load address misaligned (4).
    pub const LOAD_ADDRESS_MISALIGNED: u64 = 4;
    /// Load access fault (5).
    pub const LOAD_ACCESS_FAULT: u64 = 5;
    /// Store/AMO address misaligned (6).
    pub const STORE_AMO_ADDRESS_MISALIGNED: u64 = 6;
    /// Store/AMO access fault (7).
    pub const STORE_AMO_ACCESS_FAULT: u64 = 7;
    /// Environment call from U-mode (8).
    pub const ENVIRONMENT_CALL_FROM_U_MODE: u64 = 8;
    /// Environment call from S-mode (9).
    pub const ENVIRONMENT_CALL_FROM_S_MODE: u64 = 9;
    /// Environment call from M-mode (11).
    pub const ENVIRONMENT_CALL_FROM_M_MODE: u64 = 11;
    /// Instruction page fault (12).
    pub const INSTRUCTION_PAGE_FAULT: u64 = 12;
    /// Load page fault (13).
    pub const LOAD_PAGE_FAULT: u64 = 13;
    /// Store/AMO page fault (15).
    pub const STORE_AMO_PAGE_FAULT: u64 = 15;
}

/// RISC-V trap types representing exceptions and interrupts.
///
/// Traps cause the processor to transfer control to a predefined trap handler.
/// This enum covers all standard traps defined in the RISC-V Privileged Specification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trap {
    /// Instruction address misaligned exception.
    ///
    /// The associated value is the misaligned address.
    InstructionAddressMisaligned(u64),

    /// Instruction access fault exception.
    ///
    /// Raised when an instruction fetch touches an address outside every
    /// mapped device. The associated value is the faulting address.
    InstructionAccessFault(u64),

    /// Illegal instruction exception.
    ///
    /// Raised when an instruction encoding matches no descriptor table entry.
    /// The associated value is the instruction encoding.
    IllegalInstruction(u32),

    /// Breakpoint exception.
    ///
    /// Raised when an `EBREAK` instruction is executed.
    /// The associated value is the program counter.
    Breakpoint(u64),

    /// Load address misaligned exception.
    ///
    /// The associated value is the misaligned address.
    LoadAddressMisaligned(u64),

    /// Load access fault exception.
    ///
    /// Raised when a load misses every device or uses an unsupported width.
    /// The associated value is the faulting address.
    LoadAccessFault(u64),

    /// Store/AMO address misaligned exception.
    ///
    /// The associated value is the misaligned address.
    StoreAmoAddressMisaligned(u64),

    /// Store/AMO access fault exception.
    ///
    /// Raised when a store or AMO misses every device or uses an unsupported
    /// width. The associated value is the faulting address.
    StoreAmoAccessFault(u64),

    /// Environment call from user mode.
    EnvironmentCallFromUMode,

    /// Environment call from supervisor mode.
    EnvironmentCallFromSMode,

    /// Environment call from machine mode.
    EnvironmentCallFromMMode,

    /// Instruction page fault exception.
    ///
    /// The associated value is the faulting virtual address.
    InstructionPageFault(u64),

    /// Load page fault exception.
    ///
    /// The associated value is the faulting virtual address.
    LoadPageFault(u64),

    /// Store/AMO page fault exception.
    ///
    /// The associated value is the faulting virtual address.
    StoreAmoPageFault(u64),

    /// User software interrupt.
    UserSoftwareInterrupt,

    /// Supervisor software interrupt.
    SupervisorSoftwareInterrupt,

    /// Machine software interrupt.
    MachineSoftwareInterrupt,

    /// User timer interrupt.
    UserTimerInterrupt,

    /// Supervisor timer interrupt.
    SupervisorTimerInterrupt,

    /// Machine timer interrupt.
    MachineTimerInterrupt,

    /// User external interrupt.
    UserExternalInterrupt,

    /// Supervisor external interrupt.
    SupervisorExternalInterrupt,

    /// Machine external interrupt.
    MachineExternalInterrupt,
}

impl Trap {
    /// Returns whether this trap is an interrupt and its exception code.
    ///
    /// The code is the value written into the low bits of `mcause`/`scause`;
    /// the interrupt flag selects the delegation mask (`mideleg` vs `medeleg`)
    /// and whether the MSB of the cause register is set.
    pub fn cause(&self) -> (bool, u64) {
        match self {
            Trap::InstructionAddressMisaligned(_) => {
                (false, exception::INSTRUCTION_ADDRESS_MISALIGNED)
            }
            Trap::InstructionAccessFault(_) => (false, exception::INSTRUCTION_ACCESS_FAULT),
            Trap::IllegalInstruction(_) => (false, exception::ILLEGAL_INSTRUCTION),
            Trap::Breakpoint(_) => (false, exception::BREAKPOINT),
            Trap::LoadAddressMisaligned(_) => (false, exception::LOAD_ADDRESS_MISALIGNED),
            Trap::LoadAccessFault(_) => (false, exception::LOAD_ACCESS_FAULT),
            Trap::StoreAmoAddressMisaligned(_) => {
                (false, exception::STORE_AMO_ADDRESS_MISALIGNED)
            }
            Trap::StoreAmoAccessFault(_) => (false, exception::STORE_AMO_ACCESS_FAULT),
            Trap::EnvironmentCallFromUMode => (false, exception::ENVIRONMENT_CALL_FROM_U_MODE),
            Trap::EnvironmentCallFromSMode => (false, exception::ENVIRONMENT_CALL_FROM_S_MODE),
            Trap::EnvironmentCallFromMMode => (false, exception::ENVIRONMENT_CALL_FROM_M_MODE),
            Trap::InstructionPageFault(_) => (false, exception::INSTRUCTION_PAGE_FAULT),
            Trap::LoadPageFault(_) => (false, exception::LOAD_PAGE_FAULT),
            Trap::StoreAmoPageFault(_) => (false, exception::STORE_AMO_PAGE_FAULT),
            Trap::UserSoftwareInterrupt => (true, interrupt::USER_SOFTWARE),
            Trap::SupervisorSoftwareInterrupt => (true, interrupt::SUPERVISOR_SOFTWARE),
            Trap::MachineSoftwareInterrupt => (true, interrupt::MACHINE_SOFTWARE),
            Trap::UserTimerInterrupt => (true, interrupt::USER_TIMER),
            Trap::SupervisorTimerInterrupt => (true, interrupt::SUPERVISOR_TIMER),
            Trap::MachineTimerInterrupt => (true, interrupt::MACHINE_TIMER),
            Trap::UserExternalInterrupt => (true, interrupt::USER_EXTERNAL),
            Trap::SupervisorExternalInterrupt => (true, interrupt::SUPERVISOR_EXTERNAL),
            Trap::MachineExternalInterrupt => (true, interrupt::MACHINE_EXTERNAL),
        }
    }

    /// Returns the full `mcause`/`scause` value for this trap, interrupt bit included.
    pub fn cause_value(&self) -> u64 {
        let (is_interrupt, code) = self.cause();
        if is_interrupt {
            CAUSE_INTERRUPT_BIT | code
        } else {
            code
        }
    }
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trap::InstructionAddressMisaligned(addr) => {
                write!(f, "InstructionAddressMisaligned({addr:#x})")
            }
            Trap::InstructionAccessFault(addr) => write!(f, "InstructionAccessFault({addr:#x})"),
            Trap::IllegalInstruction(inst) => write!(f, "IllegalInstruction({inst:#x})"),
            Trap::Breakpoint(pc) => write!(f, "Breakpoint({pc:#x})"),
            Trap::LoadAddressMisaligned(addr) => write!(f, "LoadAddressMisaligned({addr:#x})"),
            Trap::LoadAccessFault(addr) => write!(f, "LoadAccessFault({addr:#x})"),
            Trap::StoreAmoAddressMisaligned(addr) => {
                write!(f, "StoreAmoAddressMisaligned({addr:#x})")
            }
            Trap::StoreAmoAccessFault(addr) => write!(f, "StoreAmoAccessFault({addr:#x})"),
            Trap::EnvironmentCallFromUMode => write!(f, "EnvironmentCallFromUMode"),
            Trap::EnvironmentCallFromSMode => write!(f, "EnvironmentCallFromSMode"),
            Trap::EnvironmentCallFromMMode => write!(f, "EnvironmentCallFromMMode"),
            Trap::InstructionPageFault(addr) => write!(f, "InstructionPageFault({addr:#x})"),
            Trap::LoadPageFault(addr) => write!(f, "LoadPageFault({addr:#x})"),
            Trap::StoreAmoPageFault(addr) => write!(f, "StoreAmoPageFault({addr:#x})"),
            Trap::UserSoftwareInterrupt => write!(f, "UserSoftwareInterrupt"),
            Trap::SupervisorSoftwareInterrupt => write!(f, "SupervisorSoftwareInterrupt"),
            Trap::MachineSoftwareInterrupt => write!(f, "MachineSoftwareInterrupt"),
            Trap::UserTimerInterrupt => write!(f, "UserTimerInterrupt"),
            Trap::SupervisorTimerInterrupt => write!(f, "SupervisorTimerInterrupt"),
            Trap::MachineTimerInterrupt => write!(f, "MachineTimerInterrupt"),
            Trap::UserExternalInterrupt => write!(f, "UserExternalInterrupt"),
            Trap::SupervisorExternalInterrupt => write!(f, "SupervisorExternalInterrupt"),
            Trap::MachineExternalInterrupt => write!(f, "MachineExternalInterrupt"),
        }
    }
}

impl std::error::Error for Trap {}
