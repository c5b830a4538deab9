use std::fmt;

use uartpipe_common::FRAME_BITS;

use crate::pipeline::PipelineOutputs;

/// Per-tick recording of `serial_out`, plus the ticks on which the baud
/// timer pulsed.
///
/// The transmitter only moves the line on baud pulses, so sampling the
/// line right after each pulse gives one level per baud period. That view
/// is what `baud_levels`, `render` and `frames` work from.
#[derive(Clone, Debug, Default)]
pub struct LineTrace {
    line: Vec<bool>,
    period_starts: Vec<usize>,
}

/// One start-to-stop window of the line, as seen on baud period
/// boundaries.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    /// Index into `LineTrace::baud_levels` of the start bit.
    pub period: usize,
    pub levels: [bool; FRAME_BITS as usize],
}

impl Frame {
    /// Low start bit and high stop bit.
    pub fn is_well_formed(&self) -> bool {
        !self.levels[0] && self.levels[FRAME_BITS as usize - 1]
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = FRAME_BITS as usize - 1;
        for (i, &level) in self.levels.iter().enumerate() {
            if i == 1 || i == last {
                f.write_str(" ")?;
            }
            f.write_str(if level { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl LineTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outputs: &PipelineOutputs) {
        if outputs.baud_pulse {
            self.period_starts.push(self.line.len());
        }
        self.line.push(outputs.serial_out);
    }

    pub fn clear(&mut self) {
        self.line.clear();
        self.period_starts.clear();
    }

    /// Number of ticks recorded.
    pub fn ticks(&self) -> usize {
        self.line.len()
    }

    /// Raw line level after every recorded tick.
    pub fn line(&self) -> &[bool] {
        &self.line
    }

    /// Line level held during each complete or in-progress baud period.
    pub fn baud_levels(&self) -> Vec<bool> {
        self.period_starts.iter().map(|&tick| self.line[tick]).collect()
    }

    /// `baud_levels` as a string of `0` and `1`.
    pub fn render(&self) -> String {
        self.baud_levels()
            .iter()
            .map(|&level| if level { '1' } else { '0' })
            .collect()
    }

    /// Split the period view into frames: every low level found while
    /// scanning opens a window of `FRAME_BITS` periods. A window cut off by
    /// the end of the trace is dropped.
    pub fn frames(&self) -> Vec<Frame> {
        let levels = self.baud_levels();
        let width = FRAME_BITS as usize;
        let mut frames = Vec::new();
        let mut i = 0;
        while i < levels.len() {
            if levels[i] {
                i += 1;
                continue;
            }
            let Some(window) = levels.get(i..i + width) else {
                break;
            };
            let mut frame = Frame {
                period: i,
                levels: [true; FRAME_BITS as usize],
            };
            frame.levels.copy_from_slice(window);
            frames.push(frame);
            i += width;
        }
        frames
    }
}
