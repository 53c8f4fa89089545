//! Register level model of an NRF24L01 used to drive the driver in tests.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    convert::Infallible,
    rc::Rc,
};

use embedded_hal::{
    digital::{self, OutputPin},
    spi::{self, Operation, SpiDevice},
};

use nrf24link::{Driver, Error, EventFlag, RxDone, RxFailed, TxDone, TxFailed};

pub const CONFIG: usize = 0x00;
pub const STATUS: usize = 0x07;
pub const RPD: usize = 0x09;
pub const RX_PW_P0: usize = 0x11;
pub const FIFO_STATUS: usize = 0x17;

pub const RX_DR: u8 = 1 << 6;
pub const TX_DS: u8 = 1 << 5;
pub const MAX_RT: u8 = 1 << 4;

/// Simulated device state.
#[derive(Default)]
pub struct Chip {
    /// Register file.
    pub regs: [u8; 0x20],

    /// IRQ bits of STATUS (RX_DR, TX_DS, MAX_RT).
    pub irq: u8,

    /// Frames waiting in the TX FIFO.
    pub txfifo: VecDeque<Vec<u8>>,

    /// Frames that left the TX FIFO.
    pub sent: Vec<Vec<u8>>,

    /// Frames waiting in the RX FIFO with their pipe.
    pub rxfifo: VecDeque<(u8, Vec<u8>)>,

    /// Overrides the pipe number reported in STATUS.
    pub pipe: Option<u8>,

    /// MOSI bytes of every transaction.
    pub log: Vec<Vec<u8>>,

    /// Number of transactions that succeed before the bus fails once.
    pub fail: Option<usize>,
}

impl Chip {
    pub fn status(&self) -> u8 {
        let pipe = match (self.pipe, self.rxfifo.front()) {
            (Some(p), _) => p,
            (None, Some((p, _))) => *p,
            (None, None) => 0b111,
        };

        let full = (self.txfifo.len() >= 3) as u8;

        self.irq | (pipe << 1) | full
    }

    pub fn fifostatus(&self) -> u8 {
        let mut fifo = 0;

        if self.rxfifo.is_empty() { fifo |= 1 }
        if self.rxfifo.len() >= 3 { fifo |= 1 << 1 }
        if self.txfifo.is_empty() { fifo |= 1 << 4 }
        if self.txfifo.len() >= 3 { fifo |= 1 << 5 }

        fifo
    }

    pub fn register(&self, address: usize) -> u8 {
        match address {
            STATUS => self.status(),
            FIFO_STATUS => self.fifostatus(),
            _ => self.regs[address],
        }
    }

    /// Processes one transaction, replacing `buf` with the MISO bytes.
    fn exchange(&mut self, buf: &mut [u8]) {
        self.log.push(buf.to_vec());

        let cmd = buf[0];
        let status = self.status();

        match cmd {
            // R_REGISTER
            0x00..=0x1F => {
                let value = self.register(cmd as usize);
                buf[1..].iter_mut().for_each(|b| *b = value);
            },

            // W_REGISTER
            0x20..=0x3F => {
                let address = (cmd & 0x1F) as usize;

                match address {
                    STATUS => self.irq &= !(buf[1] & (RX_DR | TX_DS | MAX_RT)),
                    _ => self.regs[address] = buf[1],
                }
            },

            // R_RX_PAYLOAD
            0x61 => {
                let frame = self.rxfifo.pop_front().map(|(_, f)| f).unwrap_or_default();

                for (i, b) in buf[1..].iter_mut().enumerate() {
                    *b = frame.get(i).copied().unwrap_or(0);
                }
            },

            // W_TX_PAYLOAD
            0xA0 => self.txfifo.push_back(buf[1..].to_vec()),

            0xE1 => self.txfifo.clear(),
            0xE2 => self.rxfifo.clear(),

            _ => (),
        }

        buf[0] = status;
    }

    /// Moves the oldest TX frame over the air and raises TX_DS.
    pub fn transmit(&mut self) -> bool {
        match self.txfifo.pop_front() {
            Some(frame) => {
                self.sent.push(frame);
                self.irq |= TX_DS;
                true
            },

            None => false,
        }
    }

    /// Delivers a frame on a pipe and raises RX_DR.
    pub fn deliver(&mut self, pipe: u8, frame: &[u8]) {
        self.rxfifo.push_back((pipe, frame.to_vec()));
        self.irq |= RX_DR;
    }

    /// Transactions that start with the given command byte.
    pub fn commands(&self, cmd: u8) -> usize {
        self.log.iter().filter(|t| t[0] == cmd).count()
    }
}

/// Bus handle shared between the driver and the test.
#[derive(Clone, Default)]
pub struct FakeSpi(pub Rc<RefCell<Chip>>);

/// Bus error of the fake device.
#[derive(Debug)]
pub struct BusFault;

impl spi::Error for BusFault {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

impl spi::ErrorType for FakeSpi {
    type Error = BusFault;
}

impl SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();

        let fail = chip.fail;

        match fail {
            Some(0) => {
                chip.fail = None;
                return Err(BusFault);
            },

            Some(n) => chip.fail = Some(n - 1),

            None => (),
        }

        for op in operations {
            match op {
                Operation::TransferInPlace(buf) => chip.exchange(buf),
                Operation::Write(buf) => {
                    let mut copy = buf.to_vec();
                    chip.exchange(&mut copy);
                },
                _ => unimplemented!("the driver only uses in place transfers and writes"),
            }
        }

        Ok(())
    }
}

/// CE pin handle shared between the driver and the test.
#[derive(Clone, Default)]
pub struct FakePin(pub Rc<Cell<bool>>);

impl digital::ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set(true);
        Ok(())
    }
}

pub type TestDriver<'a> = Driver<'a, FakeSpi, FakePin>;

/// Creates a driver on a fresh fake device and clears the creation traffic.
pub fn setup(flag: &EventFlag) -> (TestDriver<'_>, Rc<RefCell<Chip>>, Rc<Cell<bool>>) {
    let spi = FakeSpi::default();
    let ce = FakePin::default();
    let (chip, pin) = (spi.0.clone(), ce.0.clone());

    let driver = Driver::new(spi, ce, flag).expect("driver creation");
    chip.borrow_mut().log.clear();

    (driver, chip, pin)
}

/// Raises an event and dispatches it.
pub fn tick(driver: &mut TestDriver<'_>) {
    driver.notify();
    driver.event().expect("event dispatch");
}

/// Callback invocation seen by the test.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Sent { len: usize, context: usize },
    SendFailed { sent: usize, error: Error, context: usize },
    Received { data: Vec<u8>, pipe: u8, context: usize },
    RecvFailed { len: usize, error: Error, context: usize },
}

thread_local! {
    static RECORDS: RefCell<Vec<Record>> = RefCell::new(Vec::new());
}

/// Takes the callback invocations recorded so far on this thread.
pub fn records() -> Vec<Record> {
    RECORDS.with(|r| r.take())
}

fn record(entry: Record) {
    RECORDS.with(|r| r.borrow_mut().push(entry));
}

pub fn sent(_: &mut TestDriver<'_>, done: TxDone<'_>) {
    record(Record::Sent { len: done.data.len(), context: done.context });
}

pub fn sendfailed(_: &mut TestDriver<'_>, failed: TxFailed<'_>) {
    record(Record::SendFailed { sent: failed.sent, error: failed.fault.error, context: failed.context });
}

pub fn received(_: &mut TestDriver<'_>, done: RxDone<'_>) {
    record(Record::Received { data: done.data().to_vec(), pipe: done.pipe, context: done.context });
}

pub fn recvfailed(_: &mut TestDriver<'_>, failed: RxFailed<'_>) {
    record(Record::RecvFailed { len: failed.len, error: failed.fault.error, context: failed.context });
}
