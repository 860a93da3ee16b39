//! Sv39 page table entry bitfields.
//!
//! Field layout, low bit to high: V, R, W, X, U, G, A, D (one bit each),
//! RSW (2 bits), PPN0 (9 bits), PPN1 (9 bits), PPN2 (26 bits), reserved
//! (10 bits). Entries are parsed fresh on every walk and never cached.

/// Page Table Entry valid bit (bit 0).
const PTE_VALID_BIT: u64 = 1;

/// Page Table Entry read permission bit (bit 1).
const PTE_READ_BIT: u64 = 1 << 1;

/// Page Table Entry write permission bit (bit 2).
const PTE_WRITE_BIT: u64 = 1 << 2;

/// Page Table Entry execute permission bit (bit 3).
const PTE_EXEC_BIT: u64 = 1 << 3;

/// Page Table Entry user mode access bit (bit 4).
const PTE_USER_BIT: u64 = 1 << 4;

/// Page Table Entry global mapping bit (bit 5).
const PTE_GLOBAL_BIT: u64 = 1 << 5;

/// Page Table Entry accessed bit (bit 6).
const PTE_ACCESSED_BIT: u64 = 1 << 6;

/// Page Table Entry dirty bit (bit 7).
const PTE_DIRTY_BIT: u64 = 1 << 7;

/// Bit shift to the software-reserved field (bits 8-9).
const PTE_RSW_SHIFT: u64 = 8;

/// Bit shift to the Physical Page Number (bits 10-53).
const PTE_PPN_SHIFT: u64 = 10;

/// Mask for the full 44-bit Physical Page Number.
const PTE_PPN_MASK: u64 = (1 << 44) - 1;

/// A strongly-typed wrapper around a raw 64-bit Sv39 Page Table Entry.
#[derive(Clone, Copy, Debug)]
pub struct PageTableEntry(u64);

impl PageTableEntry {
    /// Creates a new `PageTableEntry` from a raw 64-bit value.
    pub fn new(val: u64) -> Self {
        Self(val)
    }

    /// Returns the underlying raw 64-bit value.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Returns true if the Valid (V) bit is set.
    pub fn is_valid(&self) -> bool {
        self.0 & PTE_VALID_BIT != 0
    }

    /// Returns true if the Read (R) bit is set.
    pub fn can_read(&self) -> bool {
        self.0 & PTE_READ_BIT != 0
    }

    /// Returns true if the Write (W) bit is set.
    pub fn can_write(&self) -> bool {
        self.0 & PTE_WRITE_BIT != 0
    }

    /// Returns true if the Execute (X) bit is set.
    pub fn can_exec(&self) -> bool {
        self.0 & PTE_EXEC_BIT != 0
    }

    /// Returns true if the User (U) bit is set.
    pub fn is_user(&self) -> bool {
        self.0 & PTE_USER_BIT != 0
    }

    /// Returns true if the Global (G) bit is set.
    pub fn is_global(&self) -> bool {
        self.0 & PTE_GLOBAL_BIT != 0
    }

    /// Returns true if the Accessed (A) bit is set.
    pub fn is_accessed(&self) -> bool {
        self.0 & PTE_ACCESSED_BIT != 0
    }

    /// Returns true if the Dirty (D) bit is set.
    pub fn is_dirty(&self) -> bool {
        self.0 & PTE_DIRTY_BIT != 0
    }

    /// Returns the two software-reserved bits.
    pub fn rsw(&self) -> u64 {
        (self.0 >> PTE_RSW_SHIFT) & 0x3
    }

    /// Extracts the full 44-bit Physical Page Number.
    pub fn ppn(&self) -> u64 {
        (self.0 >> PTE_PPN_SHIFT) & PTE_PPN_MASK
    }

    /// Extracts the low 9-bit PPN field (PPN[0]).
    pub fn ppn0(&self) -> u64 {
        self.ppn() & 0x1FF
    }

    /// Extracts the middle 9-bit PPN field (PPN[1]).
    pub fn ppn1(&self) -> u64 {
        (self.ppn() >> 9) & 0x1FF
    }

    /// Extracts the high 26-bit PPN field (PPN[2]).
    pub fn ppn2(&self) -> u64 {
        (self.ppn() >> 18) & 0x3FF_FFFF
    }

    /// Determines if this entry is a leaf mapping.
    ///
    /// In Sv39, a valid entry with R=1 or X=1 is a leaf; a valid entry with
    /// R=0, W=0, X=0 points at the next table level.
    pub fn is_leaf(&self) -> bool {
        self.can_read() || self.can_exec()
    }

    /// Returns true if the permission encoding is the reserved W=1, R=0 shape.
    pub fn is_malformed(&self) -> bool {
        self.can_write() && !self.can_read()
    }
}
