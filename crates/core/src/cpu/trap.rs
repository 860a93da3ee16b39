//! Trap Handling Logic.
//!
//! This module implements trap delivery for the CPU. It performs the
//! following:
//! 1. **Trap Dispatch:** Identifies the trap cause and determines the handler mode.
//! 2. **Delegation:** Routes traps to Supervisor mode via `medeleg`/`mideleg`.
//! 3. **Context Saving:** Updates `xepc`, `xcause`, `xtval`, and the status
//!    register interrupt stack, then jumps to the trap vector.
//! 4. **Return Handling:** Implements `MRET` and `SRET`.

use tracing::trace;

use crate::common::{CAUSE_INTERRUPT_BIT, PrivilegeMode, Trap};
use crate::cpu::Cpu;
use crate::cpu::csr;

impl Cpu {
    /// Delivers a trap, updating CSRs, privilege, and the program counter.
    ///
    /// A trap is delegated to Supervisor mode when the current privilege is
    /// Supervisor or lower and the corresponding bit of `medeleg` (for
    /// exceptions) or `mideleg` (for interrupts) is set; otherwise it is
    /// taken in Machine mode. The trap value register of the target mode is
    /// cleared; no fault detail beyond the cause is recorded.
    ///
    /// # Arguments
    ///
    /// * `cause` - The trap being delivered.
    /// * `epc` - Address of the trapping instruction.
    pub fn handle_trap(&mut self, cause: &Trap, epc: u64) {
        let (is_interrupt, code) = cause.cause();

        let deleg_mask = if is_interrupt {
            self.csr_read(csr::MIDELEG)
        } else {
            self.csr_read(csr::MEDELEG)
        };
        let delegate_to_s =
            (self.privilege <= PrivilegeMode::Supervisor) && ((deleg_mask >> code) & 1) != 0;

        trace!(
            %cause,
            epc = format_args!("{epc:#x}"),
            privilege = %self.privilege,
            delegated = delegate_to_s,
            "delivering trap"
        );

        let cause_value = if is_interrupt {
            CAUSE_INTERRUPT_BIT | code
        } else {
            code
        };

        if delegate_to_s {
            self.set_csr(csr::SCAUSE, cause_value);
            self.set_csr(csr::SEPC, epc);
            self.set_csr(csr::STVAL, 0);

            let mut sstatus = self.csr_read(csr::SSTATUS);
            if (sstatus & csr::MSTATUS_SIE) != 0 {
                sstatus |= csr::MSTATUS_SPIE;
            } else {
                sstatus &= !csr::MSTATUS_SPIE;
            }
            if self.privilege == PrivilegeMode::Supervisor {
                sstatus |= csr::MSTATUS_SPP;
            } else {
                sstatus &= !csr::MSTATUS_SPP;
            }
            sstatus &= !csr::MSTATUS_SIE;
            self.set_csr(csr::SSTATUS, sstatus);

            self.privilege = PrivilegeMode::Supervisor;
            self.pc = Self::trap_vector(self.csr_read(csr::STVEC), is_interrupt, code);
        } else {
            self.set_csr(csr::MCAUSE, cause_value);
            self.set_csr(csr::MEPC, epc);
            self.set_csr(csr::MTVAL, 0);

            let mut mstatus = self.csr_read(csr::MSTATUS);
            if (mstatus & csr::MSTATUS_MIE) != 0 {
                mstatus |= csr::MSTATUS_MPIE;
            } else {
                mstatus &= !csr::MSTATUS_MPIE;
            }
            mstatus &= !csr::MSTATUS_MPP;
            mstatus |= u64::from(self.privilege.to_u8()) << csr::MSTATUS_MPP_SHIFT;
            mstatus &= !csr::MSTATUS_MIE;
            self.set_csr(csr::MSTATUS, mstatus);

            self.privilege = PrivilegeMode::Machine;
            self.pc = Self::trap_vector(self.csr_read(csr::MTVEC), is_interrupt, code);
        }
    }

    /// Computes the handler address from an `xtvec` value.
    ///
    /// Direct mode (low bits 00) always jumps to the base; vectored mode
    /// (low bits 01) adds `4 * cause` for interrupts only.
    fn trap_vector(tvec: u64, is_interrupt: bool, code: u64) -> u64 {
        let base = tvec & !3;
        if (tvec & 1) != 0 && is_interrupt {
            base + 4 * code
        } else {
            base
        }
    }

    /// Executes the `MRET` instruction (Return from Machine Mode).
    ///
    /// Restores the interrupt-enable stack (`MIE <- MPIE`, `MPIE <- 1`),
    /// drops to the privilege saved in `MPP`, clears `MPP` to User, and
    /// jumps to `mepc`.
    pub(crate) fn do_mret(&mut self) {
        self.pc = self.csr_read(csr::MEPC) & !1;

        let mstatus = self.csr_read(csr::MSTATUS);
        let mpp = (mstatus >> csr::MSTATUS_MPP_SHIFT) & csr::MSTATUS_MPP_MASK;
        let mpie = (mstatus & csr::MSTATUS_MPIE) != 0;

        self.privilege = PrivilegeMode::from_u8(mpp as u8);
        let mut new_mstatus = mstatus;
        if mpie {
            new_mstatus |= csr::MSTATUS_MIE;
        } else {
            new_mstatus &= !csr::MSTATUS_MIE;
        }
        new_mstatus |= csr::MSTATUS_MPIE;
        new_mstatus &= !csr::MSTATUS_MPP;
        self.set_csr(csr::MSTATUS, new_mstatus);
    }

    /// Executes the `SRET` instruction (Return from Supervisor Mode).
    ///
    /// Restores the interrupt-enable stack (`SIE <- SPIE`, `SPIE <- 1`),
    /// drops to the privilege saved in `SPP`, clears `SPP`, and jumps to
    /// `sepc`.
    pub(crate) fn do_sret(&mut self) {
        self.pc = self.csr_read(csr::SEPC) & !1;

        let sstatus = self.csr_read(csr::SSTATUS);
        let spp = (sstatus & csr::MSTATUS_SPP) != 0;
        let spie = (sstatus & csr::MSTATUS_SPIE) != 0;

        self.privilege = if spp {
            PrivilegeMode::Supervisor
        } else {
            PrivilegeMode::User
        };
        let mut new_sstatus = sstatus;
        if spie {
            new_sstatus |= csr::MSTATUS_SIE;
        } else {
            new_sstatus &= !csr::MSTATUS_SIE;
        }
        new_sstatus |= csr::MSTATUS_SPIE;
        new_sstatus &= !csr::MSTATUS_SPP;
        self.set_csr(csr::SSTATUS, new_sstatus);
    }
}
