//! UART transmitter: one start bit, eight data bits LSB first, one stop bit.

use uartpipe_common::{DATA_BITS, FRAME_BITS};

/// Frame phase of the transmitter.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TxPhase {
    /// Line held high, waiting for a send request.
    #[default]
    Idle,
    /// Byte latched; the start bit goes out on the next baud pulse.
    Start,
    /// Shifting data bits, one per baud pulse.
    Data,
    /// All data bits sent; the stop bit goes out on the next baud pulse.
    Stop,
    /// One-tick completion strobe.
    Done,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SerializerInputs {
    /// Send request from the packetizer, carrying the byte to transmit.
    pub send: Option<u8>,
    /// Baud timer pulse for this tick.
    pub baud_pulse: bool,
}

/// Transmitter registers.
///
/// `busy` and `done` are decoded from the phase; the line itself is a
/// register that only changes on baud pulses (and on reset).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Serializer {
    phase: TxPhase,
    shift: u8,
    /// Data bits already driven onto the line in this frame.
    bits_sent: u8,
    line: bool,
}

impl Default for Serializer {
    fn default() -> Self {
        Self {
            phase: TxPhase::Idle,
            shift: 0,
            bits_sent: 0,
            line: true,
        }
    }
}

impl Serializer {
    #[inline]
    pub fn phase(&self) -> TxPhase {
        self.phase
    }

    /// Current `serial_out` level (`true` = high / mark).
    #[inline]
    pub fn line(&self) -> bool {
        self.line
    }

    #[inline]
    pub fn busy(&self) -> bool {
        matches!(self.phase, TxPhase::Start | TxPhase::Data | TxPhase::Stop)
    }

    #[inline]
    pub fn done(&self) -> bool {
        self.phase == TxPhase::Done
    }

    #[inline]
    pub fn bits_sent(&self) -> u8 {
        self.bits_sent
    }

    /// Remaining bits of the latched byte, next bit in position 0.
    #[inline]
    pub fn shift_register(&self) -> u8 {
        self.shift
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Next-state function. Requests outside `Idle` are ignored.
    #[must_use]
    pub fn step(self, input: SerializerInputs) -> Self {
        let mut next = self;
        match self.phase {
            TxPhase::Idle => {
                next.line = true;
                if let Some(byte) = input.send {
                    next.shift = byte;
                    next.bits_sent = 0;
                    next.phase = TxPhase::Start;
                }
            }
            TxPhase::Start => {
                if input.baud_pulse {
                    next.line = false;
                    next.phase = TxPhase::Data;
                }
            }
            TxPhase::Data => {
                if input.baud_pulse {
                    next.line = self.shift & 0x01 != 0;
                    next.shift = self.shift >> 1;
                    next.bits_sent = self.bits_sent + 1;
                    if next.bits_sent == DATA_BITS {
                        next.phase = TxPhase::Stop;
                    }
                }
            }
            TxPhase::Stop => {
                if input.baud_pulse {
                    next.line = true;
                    next.phase = TxPhase::Done;
                }
            }
            TxPhase::Done => {
                next.phase = TxPhase::Idle;
            }
        }
        next
    }
}

/// Line levels of the frame carrying `byte`, one entry per baud period:
/// start bit, data bits LSB first, stop bit.
pub fn frame_levels(byte: u8) -> [bool; FRAME_BITS as usize] {
    let mut levels = [true; FRAME_BITS as usize];
    levels[0] = false;
    for bit in 0..DATA_BITS {
        levels[1 + bit as usize] = (byte >> bit) & 0x01 != 0;
    }
    levels
}
