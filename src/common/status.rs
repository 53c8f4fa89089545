//! Bit views over single register bytes.
//! Every view is a copy of the byte read from the device and must be read
//! again at each decision point, the device changes them on its own while
//! retransmitting.



/// View over the STATUS register.
/// The device clocks this register out as the first byte of every transaction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub struct Status(pub u8);

impl Status {
    /// Data ready IRQ bit. Write 1 to clear.
    pub const RX_DR: u8 = 1 << 6;

    /// Data sent IRQ bit. Write 1 to clear.
    pub const TX_DS: u8 = 1 << 5;

    /// Maximum retransmits IRQ bit. Write 1 to clear.
    pub const MAX_RT: u8 = 1 << 4;

    /// A payload is available in the RX FIFO.
    pub const fn dataready(&self) -> bool {
        (self.0 & Self::RX_DR) != 0
    }

    /// The payload at the top of the TX FIFO was sent (and acknowledged).
    pub const fn datasent(&self) -> bool {
        (self.0 & Self::TX_DS) != 0
    }

    /// The device exhausted its retransmits without an acknowledge.
    pub const fn maxretries(&self) -> bool {
        (self.0 & Self::MAX_RT) != 0
    }

    /// Pipe of the payload at the top of the RX FIFO.
    pub const fn pipe(&self) -> u8 {
        (self.0 >> 1) & 0b111
    }

    /// The TX FIFO has no free slots.
    pub const fn txfull(&self) -> bool {
        (self.0 & 1) != 0
    }
}



/// View over the FIFO_STATUS register.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub struct FifoStatus(pub u8);

impl FifoStatus {
    /// The RX FIFO holds no payloads.
    pub const fn rxempty(&self) -> bool {
        (self.0 & 1) != 0
    }

    /// The RX FIFO has no free slots.
    pub const fn rxfull(&self) -> bool {
        (self.0 & (1 << 1)) != 0
    }

    /// The TX FIFO holds no payloads.
    pub const fn txempty(&self) -> bool {
        (self.0 & (1 << 4)) != 0
    }

    /// The TX FIFO has no free slots.
    pub const fn txfull(&self) -> bool {
        (self.0 & (1 << 5)) != 0
    }

    /// The last payload is being reused.
    pub const fn txreuse(&self) -> bool {
        (self.0 & (1 << 6)) != 0
    }
}



/// View over the CONFIG register.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub struct ConfigRegister(pub u8);

impl ConfigRegister {
    /// Primary receiver bit.
    pub const PRIM_RX: u8 = 1;

    /// Power up bit.
    pub const PWR_UP: u8 = 1 << 1;

    /// CRC encoding scheme bit (set for 2 bytes).
    pub const CRCO: u8 = 1 << 2;

    /// Enable CRC bit.
    pub const EN_CRC: u8 = 1 << 3;

    /// Mask maximum retransmits IRQ bit.
    pub const MASK_MAX_RT: u8 = 1 << 4;

    /// Mask data sent IRQ bit.
    pub const MASK_TX_DS: u8 = 1 << 5;

    /// Mask data ready IRQ bit.
    pub const MASK_RX_DR: u8 = 1 << 6;

    /// The device is a primary receiver.
    pub const fn primrx(&self) -> bool {
        (self.0 & Self::PRIM_RX) != 0
    }

    /// The device is powered up.
    pub const fn powered(&self) -> bool {
        (self.0 & Self::PWR_UP) != 0
    }

    /// Returns a copy with the primary receiver bit set to the given value.
    pub const fn withprimrx(self, rx: bool) -> Self {
        match rx {
            true  => Self(self.0 |  Self::PRIM_RX),
            false => Self(self.0 & !Self::PRIM_RX),
        }
    }
}



/// View over the OBSERVE_TX register.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub struct ObserveTx(pub u8);

impl ObserveTx {
    /// Retransmits of the current packet.
    pub const fn retransmits(&self) -> u8 {
        self.0 & 0xF
    }

    /// Lost packets since the last channel change.
    pub const fn lost(&self) -> u8 {
        self.0 >> 4
    }
}



/// Extracts the payload width from a RX_PW_Px register byte.
pub const fn payloadwidth(raw: u8) -> u8 {
    raw & 0b00111111
}
