use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uartpipe_common::{PipelineConfig, FRAME_BITS};
use uartpipe_tx::{frame_levels, Frame, LineTrace, Pipeline, PipelineStats, Stimulus};

/// What to push through the pipeline.
pub enum Payload {
    Text(String),
    /// `len` random bytes; a fixed `seed` makes the run reproducible.
    Random { len: usize, seed: Option<u64> },
}

impl Payload {
    pub fn bytes(&self) -> Vec<u8> {
        match self {
            Payload::Text(text) => text.as_bytes().to_vec(),
            Payload::Random { len, seed } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_entropy(),
                };
                (0..*len).map(|_| rng.gen()).collect()
            }
        }
    }
}

/// Outcome of one run: what went in, what the line carried.
pub struct RunReport {
    pub payload: Vec<u8>,
    pub baud_period: u32,
    pub ticks: u64,
    pub stats: PipelineStats,
    /// Line level per baud period, `0`/`1`.
    pub waveform: String,
    pub frames: Vec<Frame>,
}

impl RunReport {
    /// Indices of frames that do not carry the corresponding payload byte,
    /// including payload bytes that never showed up on the line.
    pub fn mismatches(&self) -> Vec<usize> {
        let count = self.payload.len().max(self.frames.len());
        (0..count)
            .filter(|&i| match (self.frames.get(i), self.payload.get(i)) {
                (Some(frame), Some(&byte)) => frame.levels != frame_levels(byte),
                _ => true,
            })
            .collect()
    }

    pub fn verified(&self) -> bool {
        self.mismatches().is_empty()
    }
}

/// Upper bound on ticks needed to send `len` bytes: one frame plus the wait
/// for the first pulse and the packetizer handshake, per byte.
pub fn tick_budget(config: &PipelineConfig, len: usize, tx_ready_after: u64) -> u64 {
    let per_byte = (u64::from(FRAME_BITS) + 1) * u64::from(config.baud_period()) + 16;
    (len as u64 + 1) * per_byte + tx_ready_after
}

/// Push `payload` through a freshly built pipeline and record the line.
pub fn run(config: PipelineConfig, payload: &[u8], tx_ready_after: u64) -> Result<RunReport> {
    let mut pipeline = Pipeline::new(config).context("invalid pipeline configuration")?;
    let mut stimulus = Stimulus::new(payload.iter().copied()).with_tx_ready_after(tx_ready_after);
    let mut trace = LineTrace::new();

    let budget = tick_budget(&config, payload.len(), tx_ready_after);
    let ticks = pipeline
        .run_until_idle(&mut stimulus, Some(&mut trace), budget)
        .with_context(|| format!("sending {} bytes", payload.len()))?;
    log::info!(
        "sent {} bytes in {} ticks ({} frames)",
        payload.len(),
        ticks,
        pipeline.stats().frames_sent
    );

    Ok(RunReport {
        payload: payload.to_vec(),
        baud_period: pipeline.baud().period(),
        ticks,
        stats: *pipeline.stats(),
        waveform: trace.render(),
        frames: trace.frames(),
    })
}
