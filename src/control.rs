//! Control loop of a radio.
//! Replaces the IRQ handler and the sleep loop of the integration with an
//! `async` task that waits on the IRQ pin of the device.



use embassy_futures::select::{
    select, Either,
};

use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    signal::Signal,
};

use embedded_hal::{
    digital::OutputPin,
    spi::SpiDevice,
};

use embedded_hal_async::digital::Wait;

use super::{
    Driver, HardwareError,
};



impl<'a, SPI: SpiDevice, CE: OutputPin> Driver<'a, SPI, CE> {
    /// Dispatches device events until `stop` is signaled.
    /// The IRQ line of the device is active low and stays asserted until a
    /// transfer clears the IRQ bits, so only falling edges raise an event.
    /// Events raised by the driver itself are dispatched without waiting.
    pub async fn listen<IRQ: Wait, M: RawMutex>(&mut self, irq: &mut IRQ, stop: &Signal<M, ()>) -> Result<(), HardwareError<SPI::Error, CE::Error, IRQ::Error>> {
        loop {
            if !self.pending.pending() {
                match select( stop.wait(), irq.wait_for_falling_edge() ).await {
                    // Stop requested.
                    Either::First( _ ) => return Ok( () ),

                    Either::Second( Err( e ) ) => {
                        #[cfg(feature = "log")]
                        defmt::error!("Control loop : IRQ pin failed");

                        return Err( HardwareError::Interrupt( e ) );
                    },

                    Either::Second( Ok( _ ) ) => self.notify(),
                }
            }

            self.event().map_err( HardwareError::widen )?;

            // Yield to allow other tasks to run.
            embassy_futures::yield_now().await;
        }
    }
}
