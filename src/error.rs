//! Errors emitted by NRF24L01 device drivers.
//! There are 2 types of errors, driver errors and hardware errors.
//! Synchronous calls return at least a driver error, optionally paired with
//! the hardware error that caused it. Errors of an installed transfer are
//! reported through its error callback as a `Fault`.



use core::convert::Infallible;

use super::{
    common::{ FifoStatus, Status, },
    Direction,
};



/// A set of possible usage and transfer errors in the driver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub enum Error {
    /// A transfer in the same direction is already installed.
    Busy,

    /// The transfer was cancelled by the user.
    Cancelled,

    /// The creation of the driver failed.
    /// Probably hardware error.
    FailedDriverCreation,

    /// The configuration of the device failed.
    FailedDriverConfiguration,

    /// The radio failed to switch to the given direction.
    FailedModeSet( Direction ),

    /// Failed to upload a payload to the device.
    FailedPacketUpload,

    /// A received frame declares more data than could be stored.
    FrameOverflow {
        /// Data size declared by the frame header.
        declared: u8,

        /// Bytes that could be stored.
        capacity: u8,
    },

    /// The device reported a payload on a pipe that does not exist.
    IllegalPipeNumber( u8 ),

    /// A transaction reached the maximum number of retries without a response.
    MaxRetries,
}



/// Snapshot handed to the error callback of a transfer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub struct Fault {
    /// Classification of the failure.
    pub error: Error,

    /// STATUS register when the failure was detected.
    pub status: Status,

    /// FIFO_STATUS register when the failure was detected.
    pub fifo: FifoStatus,
}



/// A set of possible hardware errors in the driver.
#[derive(Debug)]
pub enum HardwareError<SPI, CE, IRQ = Infallible> {
    /// An error with the SPI hardware.
    Serial( SPI ),

    /// An error with the IRQ pin.
    Interrupt( IRQ ),

    /// An error with the CE pin.
    ChipEnable( CE ),
}

impl<SPI, CE> HardwareError<SPI, CE> {
    /// Reinterprets an error that cannot come from the IRQ pin.
    pub fn widen<IRQ>(self) -> HardwareError<SPI, CE, IRQ> {
        match self {
            HardwareError::Serial( e ) => HardwareError::Serial( e ),
            HardwareError::ChipEnable( e ) => HardwareError::ChipEnable( e ),
            HardwareError::Interrupt( never ) => match never {},
        }
    }
}

#[cfg(feature = "log")]
impl<SPI, CE, IRQ> defmt::Format for HardwareError<SPI, CE, IRQ> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            HardwareError::Serial( _ ) => defmt::write!(f, "SPI Serial Error"),
            HardwareError::Interrupt( _ ) => defmt::write!(f, "Interrupt Error"),
            HardwareError::ChipEnable( _ ) => defmt::write!(f, "Digital IO Error"),
        }
    }
}
