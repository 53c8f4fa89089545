//! Configuration of NRF24L01 devices.
//! Applied once at startup through `Driver::configure`. The RX payload widths
//! are not part of it, the framing requires them to stay at `PAYLOAD_SIZE`.



use super::{
    common::ConfigRegister,
    Direction,
};



/// CRC checksum configurations of the NRF24L01 device.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CRCBytes {
    /// No CRC bytes with each packet.
    None,

    /// One CRC byte with each packet.
    One,

    /// Two CRC bytes with each packet.
    Two,
}

impl CRCBytes {
    /// CONFIG register bits of this setting.
    pub(crate) const fn bits(self) -> u8 {
        match self {
            CRCBytes::Two  => ConfigRegister::EN_CRC | ConfigRegister::CRCO,
            CRCBytes::One  => ConfigRegister::EN_CRC,
            CRCBytes::None => 0,
        }
    }
}



/// RF gain configurations of NRF24L01 devices.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Gain {
    /// Maximum gain [0 dBm].
    Max,

    /// High gain [-6 dBm].
    High,

    /// Mid gain [-12 dBm].
    Mid,

    /// Low gain [-18 dBm].
    Low,
}



/// RF data rate configurations of NRF24L01 devices.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DataRate {
    /// High data rate [2 Mbps].
    High,

    /// Mid data rate [1 Mbps].
    Mid,

    /// Low data rate [250 kbps].
    /// WARNING : This data rate is incompatible with NRF24L01 (non plus variant) devices.
    Low,
}



#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// CRC checksum configuration.
    pub(crate) crc: CRCBytes,

    /// Address Width (in bytes).
    pub(crate) aw: u8,

    /// RF channel of the device.
    pub(crate) ch: u8,

    /// RF data rate.
    pub(crate) dr: DataRate,

    /// RF gain.
    pub(crate) gain: Gain,

    /// Main channel address (Pipe 0 and TX Pipe).
    pub(crate) main: [u8; 5],

    /// Base channel address (Pipe 1-5).
    pub(crate) base: [u8; 4],

    /// Channel sub-addresses (Pipe 1-5).
    pub(crate) sub: [u8; 5],

    /// Automatic retransmits per packet [0-15].
    pub(crate) retries: u8,

    /// Delay between retransmits [(n+1) * 250 us].
    pub(crate) delay: u8,

    /// Pipes with auto-acknowledge enabled (bit n = pipe n).
    pub(crate) autoack: u8,

    /// Pipes enabled for reception (bit n = pipe n).
    pub(crate) pipes: u8,

    /// IRQ sources reported on the IRQ line (data ready, data sent, max retries).
    pub(crate) irq: (bool, bool, bool),

    /// Direction after configuration.
    pub(crate) direction: Direction,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates a new configuration instance with the power on reset values.
    pub const fn new() -> Self {
        Self {
            crc: CRCBytes::One,
            aw: 5,
            ch: 2,
            dr: DataRate::High,
            gain: Gain::Max,
            main: [0xE7; 5],
            base: [0xC2; 4],
            sub: [0xC2, 0xC3, 0xC4, 0xC5, 0xC6],
            retries: 3,
            delay: 0,
            autoack: 0b111111,
            pipes: 0b000011,
            irq: (true, true, true),
            direction: Direction::Transmit,
        }
    }

    /// Set the CRC configuration.
    pub const fn crc(mut self, crc: CRCBytes) -> Self {
        self.crc = crc;
        self
    }

    /// Set the addres width.
    pub const fn addresswidth(mut self, aw: u8) -> Self {
        self.aw = match aw {
            0..=3 => 3,
            4 => 4,
            _ => 5,
        };

        self
    }

    /// Set the RF channel.
    pub const fn channel(mut self, ch: u8) -> Self {
        self.ch = ch & 0x7F;
        self
    }

    /// Set the RF data rate.
    pub const fn datarate(mut self, dr: DataRate) -> Self {
        self.dr = dr;
        self
    }

    /// Set the RF gain.
    pub const fn gain(mut self, gain: Gain) -> Self {
        self.gain = gain;
        self
    }

    /// Sets the main address (Pipe 0 and TX).
    pub const fn main(mut self, main: [u8; 5]) -> Self {
        self.main = main;
        self
    }

    /// Sets the base address for the multi channel pipes (Pipe 1-5).
    pub const fn base(mut self, base: [u8; 4]) -> Self {
        self.base = base;
        self
    }

    /// Sets the subaddress for a multi channel pipe (Pipe 1-5).
    pub const fn subaddress(mut self, pipe: usize, addr: u8) -> Self {
        let i = match pipe {
            0 | 1 => 0,
            2..=5 => pipe - 1,
            _ => 4,
        };

        self.sub[i] = addr;
        self
    }

    /// Sets the maximum number of retransmits per packet sent.
    /// Set to 0 to disable retransmits.
    pub const fn retries(mut self, retries: u8) -> Self {
        self.retries = if retries > 14 { 15 } else { retries };
        self
    }

    /// Sets the delay between packet retransmission for failed packets.
    /// The delay is set in increments of 250 microseconds (delay = n * 250 us).
    /// If set to 0, the delay will be set to the minimum of 250 us.
    pub const fn delay(mut self, delay: u8) -> Self {
        self.delay = if delay == 0 { 0 } else if delay > 15 { 15 } else { delay - 1 };
        self
    }

    /// Enables or disables auto-acknowledge on a pipe.
    pub const fn autoack(mut self, pipe: u8, enable: bool) -> Self {
        if pipe < 6 {
            match enable {
                true  => self.autoack |=   1 << pipe,
                false => self.autoack &= !(1 << pipe),
            }
        }

        self
    }

    /// Enables or disables reception on a pipe.
    pub const fn pipe(mut self, pipe: u8, enable: bool) -> Self {
        if pipe < 6 {
            match enable {
                true  => self.pipes |=   1 << pipe,
                false => self.pipes &= !(1 << pipe),
            }
        }

        self
    }

    /// Selects which events assert the IRQ line.
    pub const fn interrupts(mut self, dataready: bool, datasent: bool, maxretries: bool) -> Self {
        self.irq = (dataready, datasent, maxretries);
        self
    }

    /// Sets the direction of the device after configuration.
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Value of the CONFIG register. The device is always powered up.
    pub(crate) const fn configreg(&self) -> u8 {
        let mut cfg = ConfigRegister::PWR_UP | self.crc.bits();

        if !self.irq.0 { cfg |= ConfigRegister::MASK_RX_DR }
        if !self.irq.1 { cfg |= ConfigRegister::MASK_TX_DS }
        if !self.irq.2 { cfg |= ConfigRegister::MASK_MAX_RT }

        ConfigRegister(cfg).withprimrx( self.direction.primrx() ).0
    }

    /// Value of the SETUP_RETR register.
    pub(crate) const fn setupretr(&self) -> u8 {
        (self.delay << 4) | (self.retries & 0xF)
    }

    /// Value of the SETUP_AW register.
    pub(crate) const fn setupaw(&self) -> u8 {
        match self.aw {
            0..=3 => 0b01,
            4     => 0b10,
            _     => 0b11,
        }
    }

    /// Value of the RF_SETUP register.
    pub(crate) const fn rfsetup(&self) -> u8 {
        let mut rfsetup = 0;

        match self.dr {
            DataRate::High => rfsetup |= 1 << 3,
            DataRate::Low  => rfsetup |= 1 << 5,
            _ => (),
        }

        match self.gain {
            Gain::Max  => rfsetup |= 0b110,
            Gain::High => rfsetup |= 0b100,
            Gain::Mid  => rfsetup |= 0b010,
            _ => (),
        }

        rfsetup
    }
}
