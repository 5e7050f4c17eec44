use std::fmt;

/// Errors reported by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The CPU fetched one of the opcode holes and locked up.
    ///
    /// `addr` is the address the opcode was fetched from.
    IllegalOpcode { opcode: u8, addr: u16 },
    /// A boot ROM image must be exactly 256 bytes.
    BootRomSize(usize),
    /// Cartridge type byte (header offset 0x147) with no matching mapper.
    UnsupportedCartridge(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IllegalOpcode { opcode, addr } => {
                write!(f, "illegal opcode 0x{:02X} at 0x{:04X}", opcode, addr)
            }
            Error::BootRomSize(len) => {
                write!(f, "boot ROM must be 256 bytes, got {}", len)
            }
            Error::UnsupportedCartridge(kind) => {
                write!(f, "unsupported cartridge type 0x{:02X}", kind)
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
