//! Direction engines of the driver.
//!
//! Each engine advances the transfer installed in its direction by one step
//! per dispatched event. A transfer is removed from the driver right before
//! its callback runs, so callbacks are free to install the next transfer.



mod rx;
mod tx;



pub use rx::*;
pub use tx::*;



pub(self) use super::{
    common::*,
    frame,
    Driver, Error, Fault, HardwareError, HWError,
};
