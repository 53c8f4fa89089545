#![cfg(feature = "control-loop")]

mod common;

use std::{
    cell::RefCell,
    rc::Rc,
};

use common::*;

use embassy_futures::block_on;

use embassy_sync::{
    blocking_mutex::raw::NoopRawMutex,
    signal::Signal,
};

use embedded_hal::digital;

use embedded_hal_async::digital::Wait;

use nrf24link::{
    EventFlag, HardwareError,
};

type Stop = Signal<NoopRawMutex, ()>;

/// Pin error of the fake IRQ line.
#[derive(Debug)]
struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// IRQ line of the fake device. Low while any IRQ bit is set.
///
/// Every poll of the line first applies `stimulus` to the device (the air
/// side of the test), then samples the line. After `polls` samples the line
/// asks the loop to stop.
struct FakeIrq<'s> {
    chip: Rc<RefCell<Chip>>,
    stimulus: fn(&mut Chip, usize),
    polls: usize,
    sampled: usize,
    edges: usize,
    broken: bool,
    stop: &'s Stop,
}

impl<'s> FakeIrq<'s> {
    fn new(chip: Rc<RefCell<Chip>>, stimulus: fn(&mut Chip, usize), polls: usize, stop: &'s Stop) -> Self {
        Self { chip, stimulus, polls, sampled: 0, edges: 0, broken: false, stop }
    }

    fn low(&self) -> bool {
        self.chip.borrow().irq != 0
    }

    /// Returns the line level before and after one stimulus, or `None` once
    /// the poll budget is spent.
    fn poll(&mut self) -> Option<(bool, bool)> {
        if self.sampled == self.polls {
            self.stop.signal(());
            return None;
        }

        let before = self.low();
        (self.stimulus)(&mut self.chip.borrow_mut(), self.sampled);
        self.sampled += 1;

        Some((before, self.low()))
    }
}

impl digital::ErrorType for FakeIrq<'_> {
    type Error = PinFault;
}

impl Wait for FakeIrq<'_> {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        core::future::pending().await
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        if self.broken { return Err(PinFault) }

        while let Some((_, low)) = self.poll() {
            if low { return Ok(()) }
        }

        core::future::pending().await
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        core::future::pending().await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        if self.broken { return Err(PinFault) }

        while let Some((before, after)) = self.poll() {
            if !before && after {
                self.edges += 1;
                return Ok(());
            }
        }

        core::future::pending().await
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_falling_edge().await
    }
}

fn transmit(chip: &mut Chip, _: usize) {
    chip.transmit();
}

fn idle(_: &mut Chip, _: usize) {}

fn arrival(chip: &mut Chip, poll: usize) {
    if poll == 0 {
        chip.deliver(0, &[3, b'a', b'b', b'c']);
    }
}

#[test]
fn loop_drives_transfer_to_completion() {
    let flag = EventFlag::new();
    let (mut driver, chip, _) = setup(&flag);

    let stop = Stop::new();
    let mut irq = FakeIrq::new(chip.clone(), transmit, 6, &stop);

    let data = [0x77u8; 100];
    driver.send(&data, sent, sendfailed, 8).unwrap();

    assert!(block_on(driver.listen(&mut irq, &stop)).is_ok());

    assert_eq!(records(), vec![Record::Sent { len: 100, context: 8 }]);
    assert_eq!(chip.borrow().sent.len(), 4);
    assert_eq!(irq.edges, 4);
    assert!(!driver.sending());
}

#[test]
fn held_line_without_transfer_dispatches_once() {
    let flag = EventFlag::new();
    let (mut driver, chip, _) = setup(&flag);

    // Primary receiver, no transfer installed.
    chip.borrow_mut().regs[CONFIG] = 0b0000_1011;

    let stop = Stop::new();
    let mut irq = FakeIrq::new(chip.clone(), arrival, 1000, &stop);

    assert!(block_on(driver.listen(&mut irq, &stop)).is_ok());

    // The frame stays in the FIFO and the line stays asserted.
    assert_eq!(irq.edges, 1);
    assert_eq!(chip.borrow().irq, RX_DR);
    assert_eq!(chip.borrow().rxfifo.len(), 1);

    // One CONFIG read for the single edge.
    assert_eq!(chip.borrow().log, vec![vec![0x00, 0xFF]]);
    assert!(records().is_empty());
}

#[test]
fn installed_recv_is_dispatched_without_edge() {
    let flag = EventFlag::new();
    let (mut driver, chip, _) = setup(&flag);

    // Frame already waiting, the line went low before the loop started.
    chip.borrow_mut().deliver(1, &[2, 0x10, 0x20]);

    let mut buffer = [0u8; 32];
    driver.recv(&mut buffer, received, recvfailed, 3).unwrap();

    let stop = Stop::new();
    let mut irq = FakeIrq::new(chip.clone(), idle, 10, &stop);

    assert!(block_on(driver.listen(&mut irq, &stop)).is_ok());

    assert_eq!(irq.edges, 0);
    assert_eq!(records(), vec![Record::Received { data: vec![0x10, 0x20], pipe: 1, context: 3 }]);
    assert_eq!(chip.borrow().irq, 0);
}

#[test]
fn loop_stops_when_signaled_first() {
    let flag = EventFlag::new();
    let (mut driver, chip, _) = setup(&flag);

    let stop = Stop::new();
    stop.signal(());

    let mut irq = FakeIrq::new(chip.clone(), transmit, 3, &stop);

    assert!(block_on(driver.listen(&mut irq, &stop)).is_ok());
    assert!(chip.borrow().log.is_empty());
}

#[test]
fn pin_failure_ends_loop() {
    let flag = EventFlag::new();
    let (mut driver, chip, _) = setup(&flag);

    let stop = Stop::new();
    let mut irq = FakeIrq::new(chip, idle, 1, &stop);
    irq.broken = true;

    assert!(matches!(block_on(driver.listen(&mut irq, &stop)), Err(HardwareError::Interrupt(PinFault))));
}

#[test]
fn bus_failure_ends_loop() {
    let flag = EventFlag::new();
    let (mut driver, chip, _) = setup(&flag);

    let stop = Stop::new();
    let mut irq = FakeIrq::new(chip.clone(), arrival, 1, &stop);

    chip.borrow_mut().fail = Some(0);

    assert!(matches!(block_on(driver.listen(&mut irq, &stop)), Err(HardwareError::Serial(BusFault))));
}
