//! Registers of NRF24L01 devices.



#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Register {
    /// Configuration register.
    Config = 0x00,

    /// Enable auto-acknowledge register.
    EnableAutoACK = 0x01,

    /// Enabled RX addresses register.
    EnabledRXAddress = 0x02,

    /// Setup address width register.
    AddressWidth = 0x03,

    /// Setup retries register.
    SetupRetries = 0x04,

    /// RF Channel register.
    RFChannel = 0x05,

    /// RF Setup register.
    RFSetup = 0x06,

    /// Status register.
    Status = 0x07,

    /// Observe TX register.
    ObserveTX = 0x08,

    /// Receive Power Detector register.
    PowerDetector = 0x09,

    /// Pipe 0 RX Address register.
    RX0Address = 0x0A,

    /// Pipe 1 RX Address register.
    RX1Address = 0x0B,

    /// TX Address register.
    TXAddress = 0x10,

    /// Pipe 0 RX Payload Width register.
    RX0PayloadWidth = 0x11,

    /// FIFO Status register.
    FIFOStatus = 0x17,
}

impl Register {
    /// Address of the RX address register of the given pipe.
    pub const fn rxaddress(pipe: u8) -> u8 {
        Register::RX0Address as u8 + pipe
    }

    /// Address of the RX payload width register of the given pipe.
    pub const fn rxwidth(pipe: u8) -> u8 {
        Register::RX0PayloadWidth as u8 + pipe
    }
}

impl Into<u8> for Register {
    fn into(self) -> u8 {
        self as u8
    }
}

impl Into<u8> for &Register {
    fn into(self) -> u8 {
        *self as u8
    }
}
