/// Command and register definitions for the TinyQV SPI register protocol

/// Transfer direction (command word bit 31)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    /// Read operation (bit 31 clear)
    Read = 0,
    /// Write operation (bit 31 set)
    Write = 1,
}

impl Direction {
    /// Get the direction bit positioned in the command word
    pub fn word_bits(self) -> u32 {
        (self as u32) << 31
    }

    /// Parse the direction out of a raw command word
    pub fn from_word(word: u32) -> Self {
        if word & (1 << 31) != 0 {
            Self::Write
        } else {
            Self::Read
        }
    }
}

/// Transaction width selector (command word bits 30-29)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Width {
    /// 8-bit transaction (selector 0)
    Byte = 0,
    /// 16-bit transaction (selector 1)
    HalfWord = 1,
    /// 32-bit transaction (selector 2)
    Word = 2,
}

impl Width {
    /// Get the width selector positioned in the command word
    pub fn word_bits(self) -> u32 {
        (self as u32) << 29
    }

    /// Number of data-phase bytes for this width
    pub fn data_len(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::HalfWord => 2,
            Self::Word => 4,
        }
    }

    /// Parse the width selector out of a raw command word
    pub fn from_word(word: u32) -> Option<Self> {
        match (word >> 29) & 0x3 {
            0 => Some(Self::Byte),
            1 => Some(Self::HalfWord),
            2 => Some(Self::Word),
            _ => None,
        }
    }
}

/// Highest valid register address (6-bit address field)
pub const MAX_ADDRESS: u8 = 0x3F;

/// Mask for the 6-bit address field in the command word
pub const ADDRESS_MASK: u32 = 0x3F;

/// TinyQV peripheral register addresses
///
/// Peripheral-specific, not protocol-generic: any 6-bit address is
/// legal on the wire, these are the registers the test-harness design
/// implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    /// Control register (bit 0 starts sample generation)
    Ctrl = 0x00,

    /// Sample clock divider
    ClockScale = 0x04,

    /// PCM sample register; carries the current sample on read,
    /// writing bit 0 acknowledges the sample interrupt
    PcmSample = 0x08,
}

impl Into<u8> for Register {
    fn into(self) -> u8 {
        self as u8
    }
}

impl Register {
    /// Get the 6-bit register address
    pub fn address(self) -> u8 {
        self as u8
    }

    /// Create from raw address value
    pub fn from_address(addr: u8) -> Option<Self> {
        match addr {
            0x00 => Some(Self::Ctrl),
            0x04 => Some(Self::ClockScale),
            0x08 => Some(Self::PcmSample),
            _ => None,
        }
    }
}

/// Control register flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ctrl(u32);

bitflags::bitflags! {
    impl Ctrl: u32 {
        /// Sample generation running
        const RUN = 1 << 0;
    }
}

/// Value written to the PCM sample register to acknowledge the
/// sample-ready interrupt
pub const IRQ_ACK: u8 = 0x01;

/// A fully-encoded 32-bit command word
///
/// | Bits  | Meaning |
/// | ----- | ------- |
/// | 31    | Read or write command: 1 for a write, 0 for a read |
/// | 30-29 | Transaction width 0, 1 or 2 for 8, 16 or 32 bits |
/// | 28-6  | Unused, must be zero |
/// | 5-0   | The register address |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandWord(u32);

impl CommandWord {
    /// Encode a command word; the address is masked to its 6-bit field
    pub fn new(direction: Direction, width: Width, address: u8) -> Self {
        Self(direction.word_bits() | width.word_bits() | (u32::from(address) & ADDRESS_MASK))
    }

    /// Get the raw 32-bit command word
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Wire representation, most-significant byte first
    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Get the direction field
    pub fn direction(self) -> Direction {
        Direction::from_word(self.0)
    }

    /// Get the width field (None for the reserved selector 3)
    pub fn width(self) -> Option<Width> {
        Width::from_word(self.0)
    }

    /// Get the 6-bit address field
    pub fn address(self) -> u8 {
        (self.0 & ADDRESS_MASK) as u8
    }

    /// Decode a command word from its wire bytes
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }
}
