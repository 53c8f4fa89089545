//! Chip vocabulary shared by the whole driver : SPI commands, register
//! addresses and bit views over single register bytes.



mod command;
mod register;
mod status;



pub use command::*;
pub use register::*;
pub use status::*;



/// Size of a payload slot in the device FIFOs.
pub const PAYLOAD_SIZE: usize = 32;

/// Number of RX data pipes of the device.
pub const PIPES: u8 = 6;
