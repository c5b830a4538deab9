//! Cycle-stepped model of a buffered UART transmit path.
//!
//! A producer writes bytes into a [`RingBuffer`]; a packetizer
//! ([`Controller`]) drains it one byte at a time into a [`Serializer`],
//! which shifts each byte onto a single idle-high line at a rate set by a
//! free-running [`BaudTimer`]. [`Pipeline`] wires the three together on one
//! shared clock.

pub mod baud;
pub mod controller;
pub mod pipeline;
pub mod ring_buffer;
pub mod serializer;
pub mod stimulus;
pub mod trace;

pub use baud::BaudTimer;
pub use controller::{Controller, ControllerState};
pub use pipeline::{Pipeline, PipelineInputs, PipelineOutputs, PipelineStats};
pub use ring_buffer::RingBuffer;
pub use serializer::{frame_levels, Serializer, TxPhase};
pub use stimulus::Stimulus;
pub use trace::{Frame, LineTrace};

pub use uartpipe_common::{DivisorRounding, PipelineConfig, Status, DATA_BITS, FRAME_BITS};
