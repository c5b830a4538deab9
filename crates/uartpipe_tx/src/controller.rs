//! Packetizer: drains the ring buffer into the transmitter one byte at a
//! time.

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ControllerState {
    #[default]
    Idle,
    /// Read issued, waiting for the buffer's registered output.
    Read,
    /// Byte handed to the transmitter, waiting for its done strobe.
    WaitTx,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ControllerInputs {
    pub fifo_empty: bool,
    /// Downstream ready: external `tx_ready` and transmitter not busy.
    pub tx_ready: bool,
    /// Registered read output of the ring buffer.
    pub read_data: Option<u8>,
    pub tx_done: bool,
}

/// Controller registers. Both request lines are registered outputs, so each
/// one is seen by its consumer on the tick after the controller raises it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Controller {
    state: ControllerState,
    read_request: bool,
    send_request: bool,
    payload: u8,
}

impl Controller {
    #[inline]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    #[inline]
    pub fn read_request(&self) -> bool {
        self.read_request
    }

    /// The pending send request and its byte, if raised this tick.
    #[inline]
    pub fn send_request(&self) -> Option<u8> {
        self.send_request.then_some(self.payload)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Next-state function.
    ///
    /// Readiness is only sampled in `Idle`; once a read is issued the
    /// controller cannot issue another until the transmitter reports done.
    #[must_use]
    pub fn step(self, input: ControllerInputs) -> Self {
        let mut next = self;
        match self.state {
            ControllerState::Idle => {
                next.send_request = false;
                next.read_request = false;
                if !input.fifo_empty && input.tx_ready {
                    next.read_request = true;
                    next.state = ControllerState::Read;
                }
            }
            ControllerState::Read => {
                next.read_request = false;
                if let Some(byte) = input.read_data {
                    next.payload = byte;
                    next.send_request = true;
                    next.state = ControllerState::WaitTx;
                }
            }
            ControllerState::WaitTx => {
                next.send_request = false;
                if input.tx_done {
                    next.state = ControllerState::Idle;
                }
            }
        }
        next
    }
}
