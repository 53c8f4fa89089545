//! Receive engine : reads one frame from the RX FIFO into the user buffer.



use embedded_hal::{
    digital::OutputPin,
    spi::SpiDevice,
};

use super::*;



/// Callback invoked when a frame was received.
pub type RxCallback<'a, SPI, CE> = fn(&mut Driver<'a, SPI, CE>, RxDone<'a>);

/// Callback invoked when a reception fails.
pub type RxErrorCallback<'a, SPI, CE> = fn(&mut Driver<'a, SPI, CE>, RxFailed<'a>);



/// Completion record of a receive transfer.
pub struct RxDone<'a> {
    /// The user buffer, handed back for reuse.
    pub buffer: &'a mut [u8],

    /// Number of valid bytes at the start of `buffer`.
    pub len: usize,

    /// Pipe the frame arrived on.
    pub pipe: u8,

    /// User token of the transfer.
    pub context: usize,
}

impl<'a> RxDone<'a> {
    /// The received bytes.
    pub fn data(&self) -> &[u8] {
        &self.buffer[..self.len]
    }
}

/// Failure record of a receive transfer.
pub struct RxFailed<'a> {
    /// The user buffer, handed back for reuse.
    pub buffer: &'a mut [u8],

    /// Number of valid bytes at the start of `buffer`.
    pub len: usize,

    /// Cause of the failure.
    pub fault: Fault,

    /// User token of the transfer.
    pub context: usize,
}



/// A receive transfer installed in the driver.
pub(crate) struct RxOperation<'a, SPI, CE> {
    /// Destination of the received data.
    buffer: &'a mut [u8],

    /// Bytes of `buffer` already filled.
    cursor: usize,

    /// Success callback.
    oncomplete: RxCallback<'a, SPI, CE>,

    /// Failure callback.
    onerror: RxErrorCallback<'a, SPI, CE>,

    /// User token.
    context: usize,
}

impl<'a, SPI, CE> RxOperation<'a, SPI, CE> {
    pub(crate) fn new(buffer: &'a mut [u8], oncomplete: RxCallback<'a, SPI, CE>, onerror: RxErrorCallback<'a, SPI, CE>, context: usize) -> Self {
        Self { buffer, cursor: 0, oncomplete, onerror, context, }
    }
}



impl<'a, SPI: SpiDevice, CE: OutputPin> Driver<'a, SPI, CE> {
    /// Advances the installed receive transfer.
    /// A single frame completes the transfer.
    pub(crate) fn rxstep(&mut self) -> Result<(), HWError<SPI, CE>> {
        // Nothing to do without a transfer.
        if self.rx.is_none() { return Ok( () ) }

        let (status, fifo) = self.statuses()?;

        #[cfg(feature = "log")]
        defmt::trace!("RX Driver : Status {:b} FIFO {:b}", status.0, fifo.0);

        // Spurious wake up, the IRQ line may be shared.
        if fifo.rxempty() {
            #[cfg(feature = "log")]
            defmt::debug!("RX Driver : Woken up with an empty FIFO");

            self.writereg( Register::Status, Status::RX_DR )?;

            return Ok( () );
        }

        let pipe = status.pipe();

        if pipe >= PIPES {
            #[cfg(feature = "log")]
            defmt::warn!("RX Driver : Illegal pipe number ({}). Flushing RX FIFO", pipe);

            self.command( Command::FlushRX )?;
            self.writereg( Register::Status, Status::RX_DR )?;

            self.rxfail( Fault { error: Error::IllegalPipeNumber(pipe), status, fifo, } );

            return Ok( () );
        }

        // Configured width of the pipe, the read must clock out all of it.
        let width = payloadwidth( self.readreg( Register::rxwidth(pipe) )? ).min( PAYLOAD_SIZE as u8 ) as usize;

        let mut raw = [0u8; PAYLOAD_SIZE + 1];
        raw[0] = Command::ReadPayload as u8;

        self.spi.transfer_in_place( &mut raw[..=width] ).map_err( HardwareError::Serial )?;

        #[cfg(feature = "log")]
        defmt::trace!("RX Driver : Downloaded {} bytes from pipe {}", width, pipe);

        let decoded = match &mut self.rx {
            Some( op ) => {
                let decoded = frame::decode( &raw[1..=width], &mut op.buffer[op.cursor..] );

                if let Ok( n ) = decoded {
                    op.cursor += n;
                }

                decoded
            },

            None => return Ok( () ),
        };

        if status.dataready() {
            self.writereg( Register::Status, Status::RX_DR )?;
        }

        match decoded {
            Ok( _ ) => if let Some( op ) = self.rx.take() {
                #[cfg(feature = "log")]
                defmt::debug!("RX Driver : Received {} bytes on pipe {}", op.cursor, pipe);

                (op.oncomplete)( self, RxDone { buffer: op.buffer, len: op.cursor, pipe, context: op.context, } );
            },

            Err( overflow ) => {
                let error = Error::FrameOverflow { declared: overflow.declared, capacity: overflow.capacity, };
                self.rxfail( Fault { error, status, fifo, } );
            },
        }

        Ok( () )
    }

    /// Cancels the installed receive transfer and reports `Error::Cancelled`
    /// to it. Frames already in the RX FIFO are kept.
    /// Returns `false` if there was no transfer installed.
    pub fn cancelrecv(&mut self) -> Result<bool, HWError<SPI, CE>> {
        if self.rx.is_none() { return Ok( false ) }

        let (status, fifo) = self.statuses()?;

        self.rxfail( Fault { error: Error::Cancelled, status, fifo, } );

        Ok( true )
    }

    /// Removes the receive transfer and reports the failure to it.
    fn rxfail(&mut self, fault: Fault) {
        #[cfg(feature = "log")]
        defmt::error!("RX Driver : Transfer failed {}", fault.error);

        if let Some( op ) = self.rx.take() {
            (op.onerror)( self, RxFailed { buffer: op.buffer, len: op.cursor, fault, context: op.context, } );
        }
    }
}
