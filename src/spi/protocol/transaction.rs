/// Transaction types and builders for the TinyQV register protocol

use super::commands::{CommandWord, Direction, Width};

/// Transaction type (hardware-independent representation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionType {
    /// Write data to a register
    Write {
        address: u8,
        width: Width,
        value: u32,
    },
    /// Read data from a register
    Read {
        address: u8,
        width: Width,
    },
}

impl TransactionType {
    /// Create a write transaction
    pub fn write(address: u8, width: Width, value: u32) -> Self {
        Self::Write { address, width, value }
    }

    /// Create a read transaction
    pub fn read(address: u8, width: Width) -> Self {
        Self::Read { address, width }
    }

    /// Get the direction for this transaction
    pub fn direction(&self) -> Direction {
        match self {
            Self::Write { .. } => Direction::Write,
            Self::Read { .. } => Direction::Read,
        }
    }

    /// Get the register address
    pub fn address(&self) -> u8 {
        match self {
            Self::Write { address, .. } => *address,
            Self::Read { address, .. } => *address,
        }
    }

    /// Get the transaction width
    pub fn width(&self) -> Width {
        match self {
            Self::Write { width, .. } => *width,
            Self::Read { width, .. } => *width,
        }
    }

    /// Command-phase bytes, most-significant byte first
    pub fn command_bytes(&self) -> [u8; 4] {
        CommandWord::new(self.direction(), self.width(), self.address()).to_bytes()
    }

    /// Expected data-phase length in bytes shifted in (0 for writes)
    pub fn response_len(&self) -> usize {
        match self {
            Self::Write { .. } => 0,
            Self::Read { width, .. } => width.data_len(),
        }
    }

    /// Get the value to write (None for read operations)
    pub fn write_value(&self) -> Option<u32> {
        match self {
            Self::Write { value, .. } => Some(*value),
            Self::Read { .. } => None,
        }
    }

    /// Data-phase bytes for a write, big-endian and truncated to the
    /// transaction width; empty slice for reads
    pub fn payload_bytes<'a>(&self, buf: &'a mut [u8; 4]) -> &'a [u8] {
        match self {
            Self::Write { value, width, .. } => {
                *buf = value.to_be_bytes();
                &buf[4 - width.data_len()..]
            }
            Self::Read { .. } => &buf[..0],
        }
    }
}

/// Transaction builder for fluent API
pub struct Transaction;

impl Transaction {
    /// Start building a 32-bit write transaction
    pub fn write_word(address: u8, value: u32) -> TransactionType {
        TransactionType::write(address, Width::Word, value)
    }

    /// Start building a 32-bit read transaction
    pub fn read_word(address: u8) -> TransactionType {
        TransactionType::read(address, Width::Word)
    }

    /// Start building an 8-bit write transaction
    pub fn write_byte(address: u8, value: u8) -> TransactionType {
        TransactionType::write(address, Width::Byte, u32::from(value))
    }

    /// Start building an 8-bit read transaction
    pub fn read_byte(address: u8) -> TransactionType {
        TransactionType::read(address, Width::Byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::commands::MAX_ADDRESS;

    #[test]
    fn test_write_transaction() {
        let txn = Transaction::write_word(0x04, 0x1234_5678);
        assert_eq!(txn.direction(), Direction::Write);
        assert_eq!(txn.address(), 0x04);
        assert_eq!(txn.write_value(), Some(0x1234_5678));
        assert_eq!(txn.response_len(), 0);
        assert_eq!(txn.command_bytes(), [0xC0, 0x00, 0x00, 0x04]);

        let mut buf = [0u8; 4];
        assert_eq!(txn.payload_bytes(&mut buf), &[0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_read_transaction() {
        let txn = Transaction::read_word(0x08);
        assert_eq!(txn.direction(), Direction::Read);
        assert_eq!(txn.address(), 0x08);
        assert_eq!(txn.write_value(), None);
        assert_eq!(txn.response_len(), 4);
        assert_eq!(txn.command_bytes(), [0x40, 0x00, 0x00, 0x08]);

        let mut buf = [0u8; 4];
        assert!(txn.payload_bytes(&mut buf).is_empty());
    }

    #[test]
    fn test_byte_transaction() {
        let txn = Transaction::write_byte(0x08, 0x01);
        assert_eq!(txn.width(), Width::Byte);
        assert_eq!(txn.command_bytes(), [0x80, 0x00, 0x00, 0x08]);

        let mut buf = [0u8; 4];
        assert_eq!(txn.payload_bytes(&mut buf), &[0x01]);

        let txn = Transaction::read_byte(0x08);
        assert_eq!(txn.command_bytes(), [0x00, 0x00, 0x00, 0x08]);
        assert_eq!(txn.response_len(), 1);
    }

    #[test]
    fn test_command_bytes_all_addresses() {
        for addr in 0..=MAX_ADDRESS {
            let read = Transaction::read_word(addr);
            assert_eq!(read.command_bytes(), [0x40, 0x00, 0x00, addr]);

            let write = Transaction::write_word(addr, 0);
            assert_eq!(write.command_bytes(), [0xC0, 0x00, 0x00, addr]);
        }
    }
}
