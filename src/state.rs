//! Direction of NRF24L01 devices.



/// Half duplex direction of the device, mirrors the PRIM_RX bit of the
/// CONFIG register.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// The device is a primary transmitter.
    Transmit,

    /// The device is a primary receiver.
    Receive,
}

impl Direction {
    /// Value of the PRIM_RX bit for this direction.
    pub const fn primrx(self) -> bool {
        match self {
            Direction::Transmit => false,
            Direction::Receive => true,
        }
    }
}

#[cfg(feature = "log")]
impl defmt::Format for Direction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Direction::Transmit => defmt::write!(f, "Transmit"),
            Direction::Receive => defmt::write!(f, "Receive"),
        }
    }
}
