//! Framing of arbitrary length buffers into fixed size FIFO payloads.
//!
//! Every payload exchanged with the device is `PAYLOAD_SIZE` bytes long. The
//! first byte is a header carrying the number of meaningful bytes that follow
//! it, the rest of the payload is padded with `PADDING`.
//!
//! ```text
//! | header | data[0] .. data[n-1] | PADDING .. PADDING |
//! |   1    |          n           |      31 - n        |
//! ```



use super::common::PAYLOAD_SIZE;



/// Maximum number of meaningful bytes in a frame.
pub const MAX_DATA_SIZE: usize = PAYLOAD_SIZE - 1;

/// Filler byte appended after the meaningful bytes.
pub const PADDING: u8 = 0xCD;



/// Header byte of a frame.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub struct Header(pub u8);

impl Header {
    /// Mask of the data size field. The upper 3 bits are reserved.
    const SIZE: u8 = 0b00011111;

    /// Creates a header for the given data size.
    pub const fn new(size: u8) -> Self {
        Self( size & Self::SIZE )
    }

    /// Number of meaningful bytes in the frame.
    pub const fn datasize(&self) -> u8 {
        self.0 & Self::SIZE
    }
}



/// A complete frame, ready to be written to the TX FIFO.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Frame {
    /// Header followed by data and padding.
    raw: [u8; PAYLOAD_SIZE],
}

impl Frame {
    /// Header of the frame.
    pub const fn header(&self) -> Header {
        Header( self.raw[0] )
    }

    /// The meaningful bytes of the frame.
    pub fn payload(&self) -> &[u8] {
        &self.raw[1..=self.header().datasize() as usize]
    }

    /// The frame as it travels on the wire.
    pub const fn as_bytes(&self) -> &[u8; PAYLOAD_SIZE] {
        &self.raw
    }
}



/// The header of a received frame declares more bytes than can be stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "log", derive(defmt::Format))]
pub struct Overflow {
    /// Data size declared by the header.
    pub declared: u8,

    /// Bytes that could actually be taken from the frame.
    pub capacity: u8,
}



/// Encodes the start of `src` into a frame.
/// Returns the frame and the number of bytes of `src` it carries.
pub fn encode(src: &[u8]) -> (Frame, usize) {
    // Take at most a full frame worth of data.
    let size = src.len().min(MAX_DATA_SIZE);

    let mut raw = [PADDING; PAYLOAD_SIZE];
    raw[0] = Header::new(size as u8).0;
    raw[1..=size].copy_from_slice( &src[..size] );

    ( Frame { raw }, size )
}

/// Decodes a frame read from the RX FIFO into `dest`.
/// `raw` holds the header followed by the bytes clocked out of the device.
/// Returns the number of bytes written to `dest`. Padding is never copied.
pub fn decode(raw: &[u8], dest: &mut [u8]) -> Result<usize, Overflow> {
    // A zero width read carries no header.
    let Some( (header, data) ) = raw.split_first() else { return Ok( 0 ) };

    let declared = Header( *header ).datasize();
    let capacity = data.len().min( dest.len() );

    if declared as usize > capacity {
        return Err( Overflow { declared, capacity: capacity as u8 } );
    }

    let size = declared as usize;
    dest[..size].copy_from_slice( &data[..size] );

    Ok( size )
}
