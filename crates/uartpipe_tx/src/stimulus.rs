use std::collections::VecDeque;

use crate::pipeline::PipelineInputs;

/// Producer that feeds a queue of bytes into the pipeline, one per tick,
/// holding off whenever the buffer reports full.
///
/// `tx_ready` can be held low for a number of ticks at the start of a run
/// to let the buffer fill before the transmitter is released.
#[derive(Clone, Debug, Default)]
pub struct Stimulus {
    pending: VecDeque<u8>,
    tx_ready_after: u64,
    ticks: u64,
}

impl Stimulus {
    pub fn new<I: IntoIterator<Item = u8>>(bytes: I) -> Self {
        Self {
            pending: bytes.into_iter().collect(),
            tx_ready_after: 0,
            ticks: 0,
        }
    }

    pub fn with_tx_ready_after(mut self, ticks: u64) -> Self {
        self.tx_ready_after = ticks;
        self
    }

    pub fn push(&mut self, byte: u8) {
        self.pending.push_back(byte);
    }

    pub fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Inputs for the next tick, given the `fifo_full` level the pipeline
    /// showed after the previous one.
    pub fn next_inputs(&mut self, fifo_full: bool) -> PipelineInputs {
        let tx_ready = self.ticks >= self.tx_ready_after;
        self.ticks = self.ticks.saturating_add(1);
        let data_in = if fifo_full {
            None
        } else {
            self.pending.pop_front()
        };
        PipelineInputs {
            reset: false,
            data_in,
            tx_ready,
        }
    }
}
