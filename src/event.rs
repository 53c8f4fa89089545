//! Pending event marker shared between the interrupt context and the driver.



use portable_atomic::{
    AtomicBool, Ordering,
};



/// Edge marker set by the interrupt source and consumed by `Driver::event`.
/// Multiple raises before a consume collapse into a single dispatch.
///
/// Place it in a `static` so the interrupt handler can reach it:
///
/// ```
/// use nrf24link::EventFlag;
///
/// static RADIO: EventFlag = EventFlag::new();
///
/// // Interrupt handler of the IRQ line.
/// fn on_irq() {
///     RADIO.raise();
/// }
/// # on_irq();
/// # assert!(RADIO.take());
/// ```
pub struct EventFlag {
    /// Set while an event waits to be dispatched.
    raised: AtomicBool,
}

impl EventFlag {
    /// Static initializer.
    pub const fn new() -> Self {
        Self { raised: AtomicBool::new(false), }
    }

    /// Marks an event as pending.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Consumes the pending event. Returns `true` if there was one.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    /// Returns `true` if an event is pending, without consuming it.
    pub fn pending(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

impl Default for EventFlag {
    fn default() -> Self {
        Self::new()
    }
}
