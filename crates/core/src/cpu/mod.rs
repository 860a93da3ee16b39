//! CPU core state and execution loop.
//!
//! This module holds the architectural state of the single hart and drives
//! the fetch/decode/execute cycle:
//! 1. **State:** General-purpose registers, CSR file, program counter,
//!    privilege mode, and the MMU.
//! 2. **Stepping:** One instruction per `step`; every guest-visible fault is
//!    caught at the step boundary and delivered as a trap.
//! 3. **Memory Helpers:** Virtual loads and stores used by the instruction
//!    actions, routed through the MMU.

use tracing::debug;

use crate::common::{PrivilegeMode, RegisterFile, Trap};
use crate::cpu::csr::CsrFile;
use crate::isa;
use crate::mmu::Mmu;

/// CSR storage, address constants, and `satp` handling.
pub mod csr;
/// Trap delivery, delegation, and SRET/MRET.
pub mod trap;

/// The emulated hart.
pub struct Cpu {
    /// General-purpose registers.
    pub regs: RegisterFile,
    /// Program counter.
    pub pc: u64,
    /// Current privilege mode.
    pub privilege: PrivilegeMode,
    /// Address translation and physical dispatch.
    pub mmu: Mmu,
    csrs: CsrFile,
}

impl Cpu {
    /// Creates a hart in machine mode with zeroed registers and CSRs.
    ///
    /// The caller sets `pc` to the image entry point before running.
    pub fn new(mmu: Mmu) -> Self {
        Self {
            regs: RegisterFile::new(),
            pc: 0,
            privilege: PrivilegeMode::Machine,
            mmu,
            csrs: CsrFile::new(),
        }
    }

    /// Reads a general-purpose register.
    pub fn read_reg(&self, idx: usize) -> u64 {
        self.regs.read(idx)
    }

    /// Writes a general-purpose register. Writes to `x0` are discarded.
    pub fn write_reg(&mut self, idx: usize, val: u64) {
        self.regs.write(idx, val);
    }

    /// Loads `size` bytes from a virtual address.
    ///
    /// # Errors
    ///
    /// Propagates the MMU's page or access fault.
    pub fn load(&mut self, vaddr: u64, size: u64) -> Result<u64, Trap> {
        self.mmu.load(vaddr, size)
    }

    /// Stores `size` bytes to a virtual address.
    ///
    /// # Errors
    ///
    /// Propagates the MMU's page or access fault.
    pub fn store(&mut self, vaddr: u64, size: u64, value: u64) -> Result<(), Trap> {
        self.mmu.store(vaddr, size, value)
    }

    /// Fetches the instruction word at `pc` and advances `pc` by 4.
    ///
    /// The advance happens before execution, so control-transfer actions
    /// compute targets relative to `pc - 4`.
    fn fetch(&mut self) -> Result<u32, Trap> {
        let word = self.mmu.fetch(self.pc)?;
        self.pc = self.pc.wrapping_add(4);
        Ok(word)
    }

    /// Fetches, decodes, and executes exactly one instruction.
    fn exec_one(&mut self) -> Result<(), Trap> {
        let word = self.fetch()?;
        let inst = isa::decode(word)?;
        (inst.execute)(word, self)
    }

    /// Executes one instruction, delivering any resulting trap.
    ///
    /// Faults raised anywhere in fetch, decode, or execution are caught here
    /// exactly once and funneled into trap delivery with the address of the
    /// trapping instruction as the exception program counter.
    pub fn step(&mut self) {
        let epc = self.pc;
        if let Err(trap) = self.exec_one() {
            debug!(%trap, pc = format_args!("{epc:#x}"), "trap raised");
            self.handle_trap(&trap, epc);
        }
    }

    /// Runs the hart for `steps` instructions.
    pub fn run_steps(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Runs the hart until the process is terminated externally.
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// Dumps the program counter, privilege mode, and registers to stderr.
    pub fn dump_state(&self) {
        eprintln!("pc={:#018x} privilege={}", self.pc, self.privilege);
        self.regs.dump();
    }
}
