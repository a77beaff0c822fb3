//! Checksums used for the frame header and frame payload.

/// A 16-bit checksum over a byte range.
///
/// Implementations must be pure: the same bytes always yield the same value.
pub trait Checksum {
    fn checksum(&self, bytes: &[u8]) -> u16;
}

/// CRC-16/CCITT-FALSE (poly `0x1021`, init `0xFFFF`, no reflection, no xorout).
///
/// This is the checksum the link uses for both the frame header and the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc16CcittFalse;

impl Crc16CcittFalse {
    const POLY: u16 = 0x1021;
    const INIT: u16 = 0xffff;

    pub const fn compute(bytes: &[u8]) -> u16 {
        let mut crc = Self::INIT;
        let mut i = 0;
        while i < bytes.len() {
            crc ^= (bytes[i] as u16) << 8;
            let mut bit = 0;
            while bit < 8 {
                if crc & 0x8000 != 0 {
                    crc = (crc << 1) ^ Self::POLY;
                } else {
                    crc <<= 1;
                }
                bit += 1;
            }
            i += 1;
        }
        crc
    }
}

impl Checksum for Crc16CcittFalse {
    fn checksum(&self, bytes: &[u8]) -> u16 {
        Self::compute(bytes)
    }
}

impl<C: Checksum + ?Sized> Checksum for &C {
    fn checksum(&self, bytes: &[u8]) -> u16 {
        (**self).checksum(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value() {
        assert_eq!(Crc16CcittFalse.checksum(b"123456789"), 0x29b1);
    }

    #[test]
    fn empty_input_is_init() {
        assert_eq!(Crc16CcittFalse.checksum(&[]), 0xffff);
    }

    #[test]
    fn usable_in_const_context() {
        const CRC: u16 = Crc16CcittFalse::compute(&[0x40, 0x00, 0x00, 0x05]);
        assert_eq!(CRC, Crc16CcittFalse.checksum(&[0x40, 0x00, 0x00, 0x05]));
    }

    #[test]
    fn detects_single_bit_flip() {
        let a = Crc16CcittFalse.checksum(&[0x80, 0x0a, 0x00, 0x01]);
        let b = Crc16CcittFalse.checksum(&[0x80, 0x0b, 0x00, 0x01]);
        assert_ne!(a, b);
    }
}
