//! Commands accepted by NRF24L01 devices.



/// Mask of the register address bits in the register access commands.
const ADDRESS: u8 = 0b00011111;

/// Register write bit of the register access commands.
const WRITE: u8 = 0b00100000;



#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Command {
    /// Command to read the payload at the top of the RX FIFO.
    ReadPayload = 0b01100001,

    /// Command to write a TX payload.
    WritePayload = 0b10100000,

    /// Flushes the TX FIFO.
    FlushTX = 0b11100001,

    /// Flushes the RX FIFO.
    FlushRX = 0b11100010,

    /// No operation. Clocks out the STATUS register.
    NOP = 0b11111111,
}

impl Command {
    /// Builds the command byte that reads the given register.
    pub const fn read(register: u8) -> u8 {
        register & ADDRESS
    }

    /// Builds the command byte that writes the given register.
    pub const fn write(register: u8) -> u8 {
        WRITE | (register & ADDRESS)
    }
}

impl Into<u8> for Command {
    fn into(self) -> u8 {
        self as u8
    }
}
