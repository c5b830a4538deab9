use anyhow::{bail, Result};
use uartpipe_common::{PipelineConfig, Status};

use crate::baud::BaudTimer;
use crate::controller::{Controller, ControllerInputs, ControllerState};
use crate::ring_buffer::RingBuffer;
use crate::serializer::{Serializer, SerializerInputs, TxPhase};
use crate::stimulus::Stimulus;
use crate::trace::LineTrace;

/// Boundary inputs sampled on one tick.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PipelineInputs {
    /// Synchronous, active-high reset.
    pub reset: bool,
    /// Producer write request (`data_in` + `data_valid`).
    pub data_in: Option<u8>,
    /// Downstream gate for starting a new transfer.
    pub tx_ready: bool,
}

impl Default for PipelineInputs {
    fn default() -> Self {
        Self {
            reset: false,
            data_in: None,
            tx_ready: true,
        }
    }
}

impl PipelineInputs {
    pub fn write(byte: u8) -> Self {
        Self {
            data_in: Some(byte),
            ..Self::default()
        }
    }

    pub fn reset() -> Self {
        Self {
            reset: true,
            ..Self::default()
        }
    }
}

/// Boundary outputs after a tick has committed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PipelineOutputs {
    pub serial_out: bool,
    pub tx_busy: bool,
    /// One-tick completion strobe.
    pub tx_done: bool,
    pub fifo_full: bool,
    pub fifo_empty: bool,
    /// Whether this tick's producer write (if any) was stored.
    pub write_accepted: bool,
    /// Whether the baud timer pulsed during this tick.
    pub baud_pulse: bool,
}

impl PipelineOutputs {
    pub fn status(&self) -> Status {
        let mut status = Status::empty();
        status.set(Status::LINE, self.serial_out);
        status.set(Status::TX_BUSY, self.tx_busy);
        status.set(Status::TX_DONE, self.tx_done);
        status.set(Status::FIFO_FULL, self.fifo_full);
        status.set(Status::FIFO_EMPTY, self.fifo_empty);
        status
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PipelineStats {
    pub ticks: u64,
    pub bytes_accepted: u64,
    pub bytes_dropped: u64,
    pub frames_sent: u64,
    pub resets: u64,
}

/// Registered values every component samples during one tick. Taken before
/// any component moves, so no component ever sees another's next state.
#[derive(Copy, Clone, Debug)]
struct Signals {
    fifo_empty: bool,
    read_request: bool,
    read_data: Option<u8>,
    send_request: Option<u8>,
    tx_busy: bool,
    tx_done: bool,
    baud_pulse: bool,
}

/// Ring buffer, packetizer and transmitter on one shared clock.
///
/// Each call to `tick` is one rising clock edge: all next states are
/// computed from a snapshot of the current registers and then committed
/// together.
pub struct Pipeline {
    config: PipelineConfig,
    fifo: RingBuffer,
    controller: Controller,
    serializer: Serializer,
    baud: BaudTimer,
    stats: PipelineStats,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let period = config.baud_period();
        log::info!(
            "uart pipeline: depth {}, {} Hz / {} baud -> {} ticks per bit ({} rounding, {:+.1} ppm)",
            config.fifo_depth,
            config.clock_hz,
            config.baud_rate,
            period,
            config.rounding,
            config.baud_error_ppm()
        );
        Ok(Self {
            config,
            fifo: RingBuffer::new(config.fifo_depth),
            controller: Controller::default(),
            serializer: Serializer::default(),
            baud: BaudTimer::new(period),
            stats: PipelineStats::default(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn fifo(&self) -> &RingBuffer {
        &self.fifo
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    pub fn baud(&self) -> &BaudTimer {
        &self.baud
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Current boundary outputs, without advancing time.
    pub fn outputs(&self) -> PipelineOutputs {
        self.outputs_with(false, false)
    }

    /// Nothing buffered, nothing in flight, every state machine idle.
    pub fn is_quiescent(&self) -> bool {
        self.fifo.is_empty()
            && self.fifo.registered_read().is_none()
            && self.controller.state() == ControllerState::Idle
            && !self.controller.read_request()
            && self.serializer.phase() == TxPhase::Idle
    }

    /// Hold reset for one tick.
    pub fn reset(&mut self) -> PipelineOutputs {
        self.tick(PipelineInputs::reset())
    }

    /// Advance one clock tick.
    pub fn tick(&mut self, inputs: PipelineInputs) -> PipelineOutputs {
        let signals = self.signals();
        self.stats.ticks = self.stats.ticks.wrapping_add(1);

        if inputs.reset {
            self.apply_reset();
            return self.outputs_with(false, false);
        }

        let write_accepted = self.fifo.tick(inputs.data_in, signals.read_request);
        let controller = self.controller.step(ControllerInputs {
            fifo_empty: signals.fifo_empty,
            tx_ready: inputs.tx_ready && !signals.tx_busy,
            read_data: signals.read_data,
            tx_done: signals.tx_done,
        });
        let serializer = self.serializer.step(SerializerInputs {
            send: signals.send_request,
            baud_pulse: signals.baud_pulse,
        });
        let baud = self.baud.step();

        self.commit(&signals, &inputs, write_accepted, controller, serializer, baud);
        self.outputs_with(write_accepted, signals.baud_pulse)
    }

    /// Drive `stimulus` until it is drained and the pipeline is quiescent,
    /// optionally recording the line. Returns the number of ticks taken.
    pub fn run_until_idle(
        &mut self,
        stimulus: &mut Stimulus,
        mut trace: Option<&mut LineTrace>,
        max_ticks: u64,
    ) -> Result<u64> {
        let mut last = self.outputs();
        for tick in 0..max_ticks {
            if stimulus.is_drained() && self.is_quiescent() {
                return Ok(tick);
            }
            last = self.tick(stimulus.next_inputs(last.fifo_full));
            if let Some(trace) = trace.as_deref_mut() {
                trace.record(&last);
            }
        }
        bail!(
            "pipeline still busy after {} ticks ({} bytes not yet written, {} buffered)",
            max_ticks,
            stimulus.remaining(),
            self.fifo.len()
        )
    }

    fn signals(&self) -> Signals {
        Signals {
            fifo_empty: self.fifo.is_empty(),
            read_request: self.controller.read_request(),
            read_data: self.fifo.registered_read(),
            send_request: self.controller.send_request(),
            tx_busy: self.serializer.busy(),
            tx_done: self.serializer.done(),
            baud_pulse: self.baud.pulse(),
        }
    }

    fn commit(
        &mut self,
        signals: &Signals,
        inputs: &PipelineInputs,
        write_accepted: bool,
        controller: Controller,
        serializer: Serializer,
        baud: BaudTimer,
    ) {
        match inputs.data_in {
            Some(_) if write_accepted => self.stats.bytes_accepted += 1,
            Some(_) => self.stats.bytes_dropped += 1,
            None => {}
        }

        if controller.state() != self.controller.state() {
            log::debug!(
                "tick {}: packetizer {:?} -> {:?}",
                self.stats.ticks,
                self.controller.state(),
                controller.state()
            );
        }

        if let Some(byte) = signals.send_request {
            if self.serializer.phase() != TxPhase::Idle {
                log::warn!(
                    "tick {}: transmitter {:?}, ignoring send request for 0x{:02X}",
                    self.stats.ticks,
                    self.serializer.phase(),
                    byte
                );
            }
        }

        match (self.serializer.phase(), serializer.phase()) {
            (TxPhase::Idle, TxPhase::Start) => {
                log::debug!(
                    "tick {}: frame start 0x{:02X}",
                    self.stats.ticks,
                    serializer.shift_register()
                );
            }
            (TxPhase::Stop, TxPhase::Done) => {
                self.stats.frames_sent += 1;
                log::debug!("tick {}: frame complete", self.stats.ticks);
            }
            _ => {}
        }
        if signals.baud_pulse && self.serializer.busy() {
            log::trace!(
                "tick {}: {:?} line {}",
                self.stats.ticks,
                serializer.phase(),
                u8::from(serializer.line())
            );
        }

        self.controller = controller;
        self.serializer = serializer;
        self.baud = baud;
    }

    fn apply_reset(&mut self) {
        if self.serializer.busy() {
            log::info!(
                "reset truncated frame after {} data bits",
                self.serializer.bits_sent()
            );
        } else {
            log::debug!("pipeline reset");
        }
        self.stats.resets += 1;
        self.fifo.reset();
        self.controller.reset();
        self.serializer.reset();
        self.baud.reset();
    }

    fn outputs_with(&self, write_accepted: bool, baud_pulse: bool) -> PipelineOutputs {
        PipelineOutputs {
            serial_out: self.serializer.line(),
            tx_busy: self.serializer.busy(),
            tx_done: self.serializer.done(),
            fifo_full: self.fifo.is_full(),
            fifo_empty: self.fifo.is_empty(),
            write_accepted,
            baud_pulse,
        }
    }
}
