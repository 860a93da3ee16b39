//! Memory-mapped device tests.

use pretty_assertions::assert_eq;
use rstest::rstest;

use rv64emu_core::common::Trap;
use rv64emu_core::config::Region;
use rv64emu_core::devices::{Clint, Device, Plic, Ram, Uart, Virtio};

const UART_REGION: Region = Region {
    base: 0x1000_0000,
    size: 0x1000,
};

const CLINT_REGION: Region = Region {
    base: 0x0200_0000,
    size: 0x10000,
};

#[test]
fn test_ram_bounds() {
    let ram = Ram::new(0x8000_0000, 0x1000);
    assert!(ram.is_valid_addr(0x8000_0000));
    assert!(ram.is_valid_addr(0x8000_0FFF));
    assert!(!ram.is_valid_addr(0x8000_1000));
    assert!(!ram.is_valid_addr(0x7FFF_FFFF));
}

#[test]
fn test_ram_with_image_preloads_contents() {
    let mut image = vec![0u8; 0x1000];
    image[0x10] = 0xAB;
    image[0x11] = 0xCD;
    let mut ram = Ram::with_image(0x8000_0000, 0x1000, image);
    assert_eq!(ram.load(0x8000_0010, 2).unwrap(), 0xCDAB);
}

#[test]
fn test_ram_access_past_end_faults() {
    let mut ram = Ram::new(0x8000_0000, 0x1000);
    // The last byte is fine; an 8-byte read straddling the end is not.
    assert!(ram.load(0x8000_0FFF, 1).is_ok());
    assert_eq!(
        ram.load(0x8000_0FFC, 8).unwrap_err(),
        Trap::LoadAccessFault(0x8000_0FFC)
    );
    assert_eq!(
        ram.store(0x8000_0FFC, 8, 0).unwrap_err(),
        Trap::StoreAmoAccessFault(0x8000_0FFC)
    );
}

#[test]
fn test_uart_lsr_reports_transmitter_ready() {
    let mut uart = Uart::new(UART_REGION);
    // THR empty (bit 5) and transmitter idle (bit 6).
    assert_eq!(uart.load(UART_REGION.base + 5, 1).unwrap(), 0x60);
}

#[test]
fn test_uart_register_write_read_back() {
    let mut uart = Uart::new(UART_REGION);
    uart.store(UART_REGION.base + 3, 1, 0x03).unwrap();
    assert_eq!(uart.load(UART_REGION.base + 3, 1).unwrap(), 0x03);
    uart.store(UART_REGION.base + 1, 1, 0x0F).unwrap();
    assert_eq!(uart.load(UART_REGION.base + 1, 1).unwrap(), 0x0F);
}

#[rstest]
#[case(2)]
#[case(4)]
#[case(8)]
fn test_uart_rejects_wide_access(#[case] size: u64) {
    let mut uart = Uart::new(UART_REGION);
    let addr = UART_REGION.base;
    assert_eq!(
        uart.load(addr, size).unwrap_err(),
        Trap::LoadAccessFault(addr)
    );
    assert_eq!(
        uart.store(addr, size, 0).unwrap_err(),
        Trap::StoreAmoAccessFault(addr)
    );
}

#[test]
fn test_clint_mtimecmp_resets_to_max() {
    // A fresh CLINT must not look like an already-expired timer.
    let mut clint = Clint::new(CLINT_REGION);
    assert_eq!(
        clint.load(CLINT_REGION.base + 0x4000, 8).unwrap(),
        u64::MAX
    );
}

#[test]
fn test_clint_mtime_round_trip() {
    let mut clint = Clint::new(CLINT_REGION);
    let mtime = CLINT_REGION.base + 0xBFF8;
    clint.store(mtime, 8, 0x1122_3344_5566_7788).unwrap();
    assert_eq!(clint.load(mtime, 8).unwrap(), 0x1122_3344_5566_7788);
}

#[test]
fn test_clint_mtimecmp_32_bit_halves() {
    let mut clint = Clint::new(CLINT_REGION);
    let mtimecmp = CLINT_REGION.base + 0x4000;
    clint.store(mtimecmp, 4, 0x5566_7788).unwrap();
    clint.store(mtimecmp + 4, 4, 0x1122_3344).unwrap();
    assert_eq!(clint.load(mtimecmp, 8).unwrap(), 0x1122_3344_5566_7788);
    assert_eq!(clint.load(mtimecmp + 4, 4).unwrap(), 0x1122_3344);
}

#[test]
fn test_clint_msip_keeps_only_pending_bit() {
    let mut clint = Clint::new(CLINT_REGION);
    clint.store(CLINT_REGION.base, 4, 0xFFFF_FFFF).unwrap();
    assert_eq!(clint.load(CLINT_REGION.base, 4).unwrap(), 1);
}

#[test]
fn test_clint_unknown_offset_reads_zero() {
    let mut clint = Clint::new(CLINT_REGION);
    assert_eq!(clint.load(CLINT_REGION.base + 0x8000, 8).unwrap(), 0);
}

#[test]
fn test_plic_accepts_word_access() {
    let region = Region {
        base: 0x0C00_0000,
        size: 0x400_0000,
    };
    let mut plic = Plic::new(region);
    assert_eq!(plic.load(region.base + 0x2000, 4).unwrap(), 0);
    plic.store(region.base + 0x2000, 4, 0xFF).unwrap();
}

#[test]
fn test_virtio_reads_zero() {
    let region = Region {
        base: 0x1000_1000,
        size: 0x1000,
    };
    let mut virtio = Virtio::new(region);
    assert_eq!(virtio.load(region.base, 4).unwrap(), 0);
    assert_eq!(
        virtio.load(region.base, 3).unwrap_err(),
        Trap::LoadAccessFault(region.base)
    );
}
