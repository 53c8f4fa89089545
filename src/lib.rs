//! NRF24L01 no-std transfer driver for interrupt driven embedded `Rust`.
//!
//! The driver moves buffers of any length through the 32 byte FIFOs of the
//! device. Buffers are cut into frames carrying a one byte length header, so
//! the receiver gets back exactly the bytes that were sent.
//!
//! The driver never blocks waiting for the device :
//!   - `send` / `recv` install a transfer and return.
//!   - The IRQ handler (or a polling loop) raises an `EventFlag`.
//!   - `event` consumes the flag and advances the transfer in the current
//!     direction by one step.
//!   - When the transfer finishes its callback is invoked with the buffer.
//!
//! The surrounding system must serialize calls to the driver (e.g. by masking
//! the IRQ while `event` runs). Only the `EventFlag` is touched from the
//! interrupt context.



#![no_std]



pub mod common;
pub mod engine;
pub mod frame;



mod config;
mod error;
mod event;
mod state;

#[cfg(feature = "control-loop")]
mod control;



pub use config::*;

pub use engine::{
    RxCallback, RxDone, RxErrorCallback, RxFailed,
    TxCallback, TxDone, TxErrorCallback, TxFailed,
};

pub use error::*;

pub use event::*;

pub use state::*;



use common::*;

use engine::{
    RxOperation, TxOperation,
};

use embedded_hal::{
    digital::{ self, OutputPin, },
    spi::{ self, SpiDevice, },
};



/// Hardware error type emitted by the driver.
pub type HWError<SPI, CE> = HardwareError<<SPI as spi::ErrorType>::Error, <CE as digital::ErrorType>::Error>;

/// Common error type emitted by the driver.
pub type DriverError<SPI, CE> = (Error, Option<HWError<SPI, CE>>);



/// Interrupt driven NRF24L01 transfer driver.
/// Holds at most one transmit and one receive transfer, borrowing their
/// buffers and the pending event marker for `'a`.
pub struct Driver<'a, SPI, CE> {
    /// The SPI interface to the NRF24 device.
    spi: SPI,

    /// The CE pin output to the NRF24 device.
    ce: CE,

    /// Pending event marker, raised from the IRQ context.
    pending: &'a EventFlag,

    /// Installed transmit transfer.
    tx: Option<TxOperation<'a, SPI, CE>>,

    /// Installed receive transfer.
    rx: Option<RxOperation<'a, SPI, CE>>,
}

/// High level methods to use NRF24L01 devices.
/// Creating the driver and starting / dispatching transfers.
impl<'a, SPI: SpiDevice, CE: OutputPin> Driver<'a, SPI, CE> {
    /// Creates a new NRF24L01 driver.
    /// Sets the payload width of all RX pipes to the frame size.
    /// The SPI bus must be operational but no transaction may have been
    /// sent to the device yet.
    pub fn new(spi: SPI, ce: CE, pending: &'a EventFlag) -> Result<Self, DriverError<SPI, CE>> {
        let mut driver = Self {
            spi,
            ce,
            pending,
            tx: None,
            rx: None,
        };

        // Disable CE.
        if let Err( hwe ) = driver.ce.set_low() {
            return Err( (Error::FailedDriverCreation, Some( HardwareError::ChipEnable(hwe) )) );
        }

        // Payload size is fixed by the framing.
        for pipe in (0..PIPES).rev() {
            if let Err( hwe ) = driver.writereg( Register::rxwidth(pipe), PAYLOAD_SIZE as u8 ) {
                return Err( (Error::FailedDriverCreation, Some(hwe)) );
            }
        }

        // Drop events raised before the driver existed.
        driver.pending.take();

        #[cfg(feature = "log")]
        defmt::debug!("Driver created");

        Ok( driver )
    }

    /// Starts sending `data`.
    /// Switches the device to transmit mode if needed, uploads the first frame
    /// and enables the device. The rest of the data is uploaded from `event`.
    /// Exactly one of the callbacks is invoked once the transfer ends, unless
    /// this method returns an error.
    pub fn send(&mut self, data: &'a [u8], oncomplete: TxCallback<'a, SPI, CE>, onerror: TxErrorCallback<'a, SPI, CE>, context: usize) -> Result<(), DriverError<SPI, CE>> {
        // Only one transfer per direction.
        if self.tx.is_some() { return Err( (Error::Busy, None) ) }

        self.setdirection( Direction::Transmit )?;

        self.tx = Some( TxOperation::new(data, oncomplete, onerror, context) );

        // Upload the first frame without waiting for an event.
        if let Err( hwe ) = self.txstep() {
            // Callbacks only run after the last transaction of a step, so the
            // transfer is still the one installed above.
            self.tx = None;
            return Err( (Error::FailedPacketUpload, Some(hwe)) );
        }

        // A frame is in the FIFO, a CE failure leaves the transfer running.
        if let Err( hwe ) = self.ce.set_high() {
            return Err( (Error::FailedModeSet( Direction::Transmit ), Some( HardwareError::ChipEnable(hwe) )) );
        }

        #[cfg(feature = "log")]
        defmt::debug!("TX Driver : Started transfer of {} bytes", data.len());

        Ok( () )
    }

    /// Starts receiving a frame into `buffer`.
    /// Switches the device to receive mode if needed and enables the device.
    /// The frame is read from `event`. Raises an event, a frame may already
    /// wait in the FIFO behind a held IRQ line.
    /// Exactly one of the callbacks is invoked once the transfer ends, unless
    /// this method returns an error.
    pub fn recv(&mut self, buffer: &'a mut [u8], oncomplete: RxCallback<'a, SPI, CE>, onerror: RxErrorCallback<'a, SPI, CE>, context: usize) -> Result<(), DriverError<SPI, CE>> {
        // Only one transfer per direction.
        if self.rx.is_some() { return Err( (Error::Busy, None) ) }

        self.setdirection( Direction::Receive )?;

        if let Err( hwe ) = self.ce.set_high() {
            return Err( (Error::FailedModeSet( Direction::Receive ), Some( HardwareError::ChipEnable(hwe) )) );
        }

        #[cfg(feature = "log")]
        defmt::debug!("RX Driver : Listening with {} bytes of space", buffer.len());

        self.rx = Some( RxOperation::new(buffer, oncomplete, onerror, context) );
        self.pending.raise();

        Ok( () )
    }

    /// Dispatches a pending event to the engine of the current direction.
    /// Does nothing if no event was raised since the last call.
    pub fn event(&mut self) -> Result<(), HWError<SPI, CE>> {
        if !self.pending.take() { return Ok( () ) }

        match self.direction()? {
            Direction::Receive => self.rxstep(),
            Direction::Transmit => self.txstep(),
        }
    }

    /// Raises the pending event marker.
    /// Used by polling integrations without an IRQ handler.
    pub fn notify(&self) {
        self.pending.raise()
    }

    /// Returns `true` if a transmit transfer is installed.
    pub fn sending(&self) -> bool {
        self.tx.is_some()
    }

    /// Returns `true` if a receive transfer is installed.
    pub fn receiving(&self) -> bool {
        self.rx.is_some()
    }

    /// Disables the device (CE low).
    /// Installed transfers are kept but make no progress until `resume`.
    pub fn standby(&mut self) -> Result<(), HWError<SPI, CE>> {
        self.ce.set_low().map_err( HardwareError::ChipEnable )
    }

    /// Enables the device (CE high) after a `standby`.
    pub fn resume(&mut self) -> Result<(), HWError<SPI, CE>> {
        self.ce.set_high().map_err( HardwareError::ChipEnable )
    }

    /// Configures the NRF24L01 device.
    /// The RX payload widths are left untouched.
    pub fn configure(&mut self, config: &Config) -> Result<(), DriverError<SPI, CE>> {
        let fail = |hwe: HWError<SPI, CE>| (Error::FailedDriverConfiguration, Some(hwe));

        self.writereg( Register::Config, config.configreg() ).map_err(fail)?;
        self.writereg( Register::EnableAutoACK, config.autoack ).map_err(fail)?;
        self.writereg( Register::EnabledRXAddress, config.pipes ).map_err(fail)?;
        self.writereg( Register::AddressWidth, config.setupaw() ).map_err(fail)?;
        self.writereg( Register::SetupRetries, config.setupretr() ).map_err(fail)?;
        self.writereg( Register::RFChannel, config.ch ).map_err(fail)?;
        self.writereg( Register::RFSetup, config.rfsetup() ).map_err(fail)?;

        // Addresses are sent LSByte first.
        let main = config.main;
        let mut buf = [Command::write( Register::RX0Address as u8 ), main[4], main[3], main[2], main[1], main[0]];
        self.writebuf( &buf ).map_err(fail)?;

        buf[0] = Command::write( Register::TXAddress as u8 );
        self.writebuf( &buf ).map_err(fail)?;

        let (base, sub) = (config.base, config.sub);
        buf = [Command::write( Register::RX1Address as u8 ), sub[0], base[3], base[2], base[1], base[0]];
        self.writebuf( &buf ).map_err(fail)?;

        // Pipes 2-5 only hold their LSByte.
        for pipe in 2..PIPES {
            self.writereg( Register::rxaddress(pipe), sub[pipe as usize - 1] ).map_err(fail)?;
        }

        #[cfg(feature = "log")]
        defmt::debug!("Finished driver configuration");

        Ok( () )
    }

    /// Releases the SPI device and the CE pin.
    /// Installed transfers are dropped without invoking their callbacks.
    pub fn release(self) -> (SPI, CE) {
        (self.spi, self.ce)
    }
}

/// Intermediate methods for interacting with NRF24L01 devices.
/// Reading specific registers and mode changes.
impl<'a, SPI: SpiDevice, CE: OutputPin> Driver<'a, SPI, CE> {
    /// Reads the current direction of the device from the CONFIG register.
    pub fn direction(&mut self) -> Result<Direction, HWError<SPI, CE>> {
        let config = ConfigRegister( self.readreg( Register::Config )? );

        match config.primrx() {
            true => Ok( Direction::Receive ),
            false => Ok( Direction::Transmit ),
        }
    }

    /// Switches the direction of the device if needed.
    /// Read-modify-write of the PRIM_RX bit, the rest of CONFIG is preserved.
    pub fn setdirection(&mut self, direction: Direction) -> Result<(), DriverError<SPI, CE>> {
        let config = match self.readreg( Register::Config ) {
            Err( hwe ) => return Err( (Error::FailedModeSet( direction ), Some(hwe)) ),
            Ok( c ) => ConfigRegister(c),
        };

        // Already in the requested direction.
        if config.primrx() == direction.primrx() { return Ok( () ) }

        if let Err( hwe ) = self.writereg( Register::Config, config.withprimrx( direction.primrx() ).0 ) {
            return Err( (Error::FailedModeSet( direction ), Some(hwe)) );
        }

        #[cfg(feature = "log")]
        defmt::debug!("Switched direction to {}", direction);

        Ok( () )
    }

    /// Reads the received power detector.
    /// Returns `true` if a carrier above -64 dBm is present on the channel.
    pub fn rpd(&mut self) -> Result<bool, HWError<SPI, CE>> {
        Ok( (self.readreg( Register::PowerDetector )? & 1) != 0 )
    }

    /// Reads the retransmit and lost packet counters.
    pub fn observe(&mut self) -> Result<ObserveTx, HWError<SPI, CE>> {
        Ok( ObserveTx( self.readreg( Register::ObserveTX )? ) )
    }

    /// Reads the device's STATUS and FIFO STATUS registers in one transaction.
    pub fn statuses(&mut self) -> Result<(Status, FifoStatus), HWError<SPI, CE>> {
        let mut buf = [Command::read( Register::FIFOStatus as u8 ), Command::NOP as u8];

        self.spi.transfer_in_place(&mut buf).map_err( HardwareError::Serial )?;

        Ok( (Status(buf[0]), FifoStatus(buf[1])) )
    }

    /// Logs the register map of the device.
    #[cfg(feature = "log")]
    pub fn report(&mut self) {
        let registers = [
            ("Config", 0x00),
            ("Enable Auto Acknowledge", 0x01),
            ("Enable RX Address", 0x02),
            ("Setup Address Width", 0x03),
            ("Setup Retries", 0x04),
            ("RF Channel", 0x05),
            ("RF Setup", 0x06),
            ("Status", 0x07),
            ("Observe TX", 0x08),
            ("Power Detect", 0x09),
            ("Bytes in Pipe 0", 0x11),
            ("Bytes in Pipe 1", 0x12),
            ("Bytes in Pipe 2", 0x13),
            ("Bytes in Pipe 3", 0x14),
            ("Bytes in Pipe 4", 0x15),
            ("Bytes in Pipe 5", 0x16),
            ("FIFO Status", 0x17),
        ];

        for (name, address) in registers {
            let value = self.readreg( address as u8 ).unwrap_or(0xFF);
            defmt::info!("Register [{=u8:#x}] {}: {=u8:b}", address as u8, name, value);
        }
    }
}

/// Basic methods for interacting with the NRF24 device.
/// Writing and reading buffers / commands / registers through SPI.
impl<'a, SPI: SpiDevice, CE: OutputPin> Driver<'a, SPI, CE> {
    /// Low level function to write a buffer to the device.
    /// This function correlates to the `write` SPI function.
    pub fn writebuf(&mut self, buf: &[u8]) -> Result<(), HWError<SPI, CE>> {
        self.spi.write(buf).map_err( HardwareError::Serial )
    }

    /// Low level function to write to a register.
    pub fn writereg<R: Into<u8>>(&mut self, r: R, v: u8) -> Result<(), HWError<SPI, CE>> {
        self.writebuf( &[Command::write( r.into() ), v] )
    }

    /// Low level function to read a register.
    pub fn readreg<R: Into<u8>>(&mut self, r: R) -> Result<u8, HWError<SPI, CE>> {
        let mut buf = [Command::read( r.into() ), Command::NOP as u8];

        self.spi.transfer_in_place(&mut buf).map_err( HardwareError::Serial )?;

        Ok( buf[1] )
    }

    /// Low level function to send a 1 byte command.
    pub fn command(&mut self, c: Command) -> Result<(), HWError<SPI, CE>> {
        self.writebuf( &[c.into()] )
    }

    /// Low level function to upload a payload to the TX FIFO.
    /// The payload must be written in a single transaction.
    pub fn writepayload(&mut self, payload: &[u8; PAYLOAD_SIZE]) -> Result<(), HWError<SPI, CE>> {
        let mut buf = [0u8; PAYLOAD_SIZE + 1];
        buf[0] = Command::WritePayload as u8;
        buf[1..].copy_from_slice( payload );

        self.writebuf( &buf )
    }
}
