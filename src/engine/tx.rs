//! Transmit engine : drains the user buffer into the TX FIFO one frame per step.



use embedded_hal::{
    digital::OutputPin,
    spi::SpiDevice,
};

use super::*;



/// Callback invoked when all the data of a transfer was sent.
pub type TxCallback<'a, SPI, CE> = fn(&mut Driver<'a, SPI, CE>, TxDone<'a>);

/// Callback invoked when a transfer fails.
pub type TxErrorCallback<'a, SPI, CE> = fn(&mut Driver<'a, SPI, CE>, TxFailed<'a>);



/// Completion record of a transmit transfer.
pub struct TxDone<'a> {
    /// The buffer that was sent.
    pub data: &'a [u8],

    /// User token of the transfer.
    pub context: usize,
}

/// Failure record of a transmit transfer.
pub struct TxFailed<'a> {
    /// The buffer that was being sent.
    pub data: &'a [u8],

    /// Bytes of `data` handed to the device before the failure.
    /// The last frame handed over may not have reached the receiver.
    pub sent: usize,

    /// Cause of the failure.
    pub fault: Fault,

    /// User token of the transfer.
    pub context: usize,
}



/// A transmit transfer installed in the driver.
pub(crate) struct TxOperation<'a, SPI, CE> {
    /// Data to send.
    data: &'a [u8],

    /// Bytes of `data` already written to the TX FIFO.
    cursor: usize,

    /// Success callback.
    oncomplete: TxCallback<'a, SPI, CE>,

    /// Failure callback.
    onerror: TxErrorCallback<'a, SPI, CE>,

    /// User token.
    context: usize,
}

impl<'a, SPI, CE> TxOperation<'a, SPI, CE> {
    pub(crate) fn new(data: &'a [u8], oncomplete: TxCallback<'a, SPI, CE>, onerror: TxErrorCallback<'a, SPI, CE>, context: usize) -> Self {
        Self { data, cursor: 0, oncomplete, onerror, context, }
    }

    /// Bytes of the user buffer already handed to the device.
    pub(crate) fn sent(&self) -> usize {
        self.cursor
    }
}



impl<'a, SPI: SpiDevice, CE: OutputPin> Driver<'a, SPI, CE> {
    /// Advances the installed transmit transfer by one step.
    /// At most one frame is written to the device per step.
    pub(crate) fn txstep(&mut self) -> Result<(), HWError<SPI, CE>> {
        // Nothing to do without a transfer.
        if self.tx.is_none() { return Ok( () ) }

        let (status, fifo) = self.statuses()?;

        #[cfg(feature = "log")]
        defmt::trace!("TX Driver : Status {:b} FIFO {:b}", status.0, fifo.0);

        // Retransmits exhausted. The error persists until cleared so it is
        // checked before any FIFO condition.
        if status.maxretries() {
            #[cfg(feature = "log")]
            defmt::warn!("TX Driver : Maximum retries reached, flushing TX FIFO");

            self.command( Command::FlushTX )?;
            self.writereg( Register::Status, Status::MAX_RT | Status::TX_DS )?;

            self.txfail( Fault { error: Error::MaxRetries, status, fifo, } );

            return Ok( () );
        }

        // The device is still draining the FIFO.
        if status.txfull() { return Ok( () ) }

        // The previous frame is still in flight.
        if !status.datasent() && !fifo.txempty() { return Ok( () ) }

        // Acknowledge the previous frame.
        if status.datasent() {
            self.writereg( Register::Status, Status::TX_DS )?;
        }

        let (data, cursor) = match &self.tx {
            Some( op ) => (op.data, op.cursor),
            None => return Ok( () ),
        };

        // All data was sent.
        if cursor == data.len() {
            #[cfg(feature = "log")]
            defmt::debug!("TX Driver : Transfer of {} bytes complete", data.len());

            if let Some( op ) = self.tx.take() {
                (op.oncomplete)( self, TxDone { data: op.data, context: op.context, } );
            }

            return Ok( () );
        }

        let (frame, used) = frame::encode( &data[cursor..] );

        self.writepayload( frame.as_bytes() )?;

        #[cfg(feature = "log")]
        defmt::trace!("TX Driver : Uploaded frame with {} bytes", used);

        if let Some( op ) = &mut self.tx {
            op.cursor += used;
        }

        Ok( () )
    }

    /// Cancels the installed transmit transfer.
    /// Flushes the TX FIFO, clears the TX IRQs and reports `Error::Cancelled`
    /// to the transfer. Returns `false` if there was no transfer installed.
    pub fn cancelsend(&mut self) -> Result<bool, HWError<SPI, CE>> {
        if self.tx.is_none() { return Ok( false ) }

        let (status, fifo) = self.statuses()?;

        self.command( Command::FlushTX )?;
        self.writereg( Register::Status, Status::MAX_RT | Status::TX_DS )?;

        self.txfail( Fault { error: Error::Cancelled, status, fifo, } );

        Ok( true )
    }

    /// Removes the transmit transfer and reports the failure to it.
    fn txfail(&mut self, fault: Fault) {
        #[cfg(feature = "log")]
        defmt::error!("TX Driver : Transfer failed {}", fault.error);

        if let Some( op ) = self.tx.take() {
            let sent = op.sent();
            (op.onerror)( self, TxFailed { data: op.data, sent, fault, context: op.context, } );
        }
    }
}
