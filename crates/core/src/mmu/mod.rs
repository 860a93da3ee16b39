//! Software MMU: address translation and physical dispatch.
//!
//! This module implements the memory path between the CPU and the devices.
//! It performs the following:
//! 1. **Translation:** Identity mapping in Bare mode, or a three-level Sv39
//!    page table walk rooted at the PPN programmed through `satp`.
//! 2. **Dispatch:** Routing of physical accesses to the first device whose
//!    range contains the address; a miss is an access fault.
//! 3. **Width Validation:** Only 1-, 2-, 4-, and 8-byte accesses are legal.
//!
//! Page table entries are fetched with physical reads that never re-enter
//! translation, so the walk cannot recurse.

use crate::common::{AccessType, PAGE_SHIFT, PagingMode, Trap};
use crate::devices::Device;
use crate::mmu::pte::PageTableEntry;

/// Page table entry bitfield accessors.
pub mod pte;

/// Number of page table levels in Sv39.
const SV39_LEVELS: usize = 3;

/// Number of virtual page number bits per level.
const VPN_BITS_PER_LEVEL: u64 = 9;

/// Mask extracting one 9-bit virtual page number field.
const VPN_FIELD_MASK: u64 = 0x1FF;

/// Size of a page table entry in bytes.
const PTE_SIZE: u64 = 8;

/// The software MMU.
///
/// Owns the translation state (paging mode, root page table PPN) and the
/// ordered device list making up the physical address map. The CPU updates
/// the translation state on every `satp` write.
pub struct Mmu {
    mode: PagingMode,
    root_ppn: u64,
    devices: Vec<Box<dyn Device>>,
}

impl Mmu {
    /// Creates an MMU in Bare mode with an empty device list.
    pub fn new() -> Self {
        Self {
            mode: PagingMode::Bare,
            root_ppn: 0,
            devices: Vec::new(),
        }
    }

    /// Appends a device to the address map.
    ///
    /// Dispatch scans devices in registration order and the first range
    /// containing the address wins, so ranges are expected to be disjoint.
    pub fn add_device(&mut self, device: Box<dyn Device>) {
        self.devices.push(device);
    }

    /// Returns the active paging mode.
    pub fn paging_mode(&self) -> PagingMode {
        self.mode
    }

    /// Returns the physical page number of the root page table.
    pub fn root_ppn(&self) -> u64 {
        self.root_ppn
    }

    /// Reprograms the translation state from a decoded `satp` value.
    pub fn set_paging(&mut self, mode: PagingMode, root_ppn: u64) {
        self.mode = mode;
        self.root_ppn = root_ppn;
    }

    /// Translates a virtual address to a physical address.
    ///
    /// In Bare mode this is the identity. In Sv39 mode the three-level walk
    /// runs to a leaf; any invalid, malformed, or missing entry produces the
    /// page fault matching `access`.
    ///
    /// # Errors
    ///
    /// Returns the page fault flavor of `access` on walk failure, or an
    /// access fault if a page table entry lies outside every device.
    pub fn translate(&mut self, vaddr: u64, access: AccessType) -> Result<u64, Trap> {
        match self.mode {
            PagingMode::Bare => Ok(vaddr),
            PagingMode::Sv39 => self.walk(vaddr, access),
            // Unreachable through satp writes; treat as unmapped.
            _ => Err(access.page_fault(vaddr)),
        }
    }

    /// Runs the Sv39 page table walk.
    fn walk(&mut self, vaddr: u64, access: AccessType) -> Result<u64, Trap> {
        let mut table_base = self.root_ppn << PAGE_SHIFT;

        for level in (0..SV39_LEVELS).rev() {
            let vpn_shift = PAGE_SHIFT + level as u64 * VPN_BITS_PER_LEVEL;
            let vpn = (vaddr >> vpn_shift) & VPN_FIELD_MASK;
            let pte_addr = table_base + vpn * PTE_SIZE;

            // PTE fetches are physical reads; they never recurse into translation.
            let raw = self
                .read_phys(pte_addr, PTE_SIZE)
                .map_err(|_| access.access_fault(vaddr))?;
            let pte = PageTableEntry::new(raw);

            if !pte.is_valid() || pte.is_malformed() {
                return Err(access.page_fault(vaddr));
            }

            if pte.is_leaf() {
                // Superpage leaves take their low address bits from the
                // virtual address; a 4 KiB leaf uses the full PPN.
                let offset_mask = (1u64 << vpn_shift) - 1;
                let base = (pte.ppn() << PAGE_SHIFT) & !offset_mask;
                return Ok(base | (vaddr & offset_mask));
            }

            if level == 0 {
                // Pointer entry at the last level: nothing left to walk.
                return Err(access.page_fault(vaddr));
            }

            table_base = pte.ppn() << PAGE_SHIFT;
        }

        Err(access.page_fault(vaddr))
    }

    /// Loads `size` bytes from a physical address, bypassing translation.
    ///
    /// # Errors
    ///
    /// Returns a load access fault if no device claims the address.
    pub fn read_phys(&mut self, paddr: u64, size: u64) -> Result<u64, Trap> {
        for dev in &mut self.devices {
            if dev.is_valid_addr(paddr) {
                return dev.load(paddr, size);
            }
        }
        Err(Trap::LoadAccessFault(paddr))
    }

    /// Stores `size` bytes to a physical address, bypassing translation.
    ///
    /// # Errors
    ///
    /// Returns a store/AMO access fault if no device claims the address.
    pub fn write_phys(&mut self, paddr: u64, size: u64, value: u64) -> Result<(), Trap> {
        for dev in &mut self.devices {
            if dev.is_valid_addr(paddr) {
                return dev.store(paddr, size, value);
            }
        }
        Err(Trap::StoreAmoAccessFault(paddr))
    }

    /// Loads `size` bytes from a virtual address.
    ///
    /// # Errors
    ///
    /// Returns a load access fault for widths outside {1, 2, 4, 8}, a page
    /// fault on translation failure, or the device's fault on dispatch
    /// failure.
    pub fn load(&mut self, vaddr: u64, size: u64) -> Result<u64, Trap> {
        if !matches!(size, 1 | 2 | 4 | 8) {
            return Err(Trap::LoadAccessFault(vaddr));
        }
        let paddr = self.translate(vaddr, AccessType::Load)?;
        self.read_phys(paddr, size)
    }

    /// Stores `size` bytes to a virtual address.
    ///
    /// # Errors
    ///
    /// Returns a store/AMO access fault for widths outside {1, 2, 4, 8}, a
    /// page fault on translation failure, or the device's fault on dispatch
    /// failure.
    pub fn store(&mut self, vaddr: u64, size: u64, value: u64) -> Result<(), Trap> {
        if !matches!(size, 1 | 2 | 4 | 8) {
            return Err(Trap::StoreAmoAccessFault(vaddr));
        }
        let paddr = self.translate(vaddr, AccessType::Store)?;
        self.write_phys(paddr, size, value)
    }

    /// Fetches one 32-bit instruction word from a virtual address.
    ///
    /// # Errors
    ///
    /// Returns an instruction page fault on translation failure or an
    /// instruction access fault if no device claims the address.
    pub fn fetch(&mut self, vaddr: u64) -> Result<u32, Trap> {
        let paddr = self.translate(vaddr, AccessType::Fetch)?;
        let word = self
            .read_phys(paddr, 4)
            .map_err(|_| Trap::InstructionAccessFault(vaddr))?;
        Ok(word as u32)
    }
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}
