use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, ensure, Result};
use typed_builder::TypedBuilder;

/// Default ring buffer depth in bytes.
pub const DEFAULT_FIFO_DEPTH: usize = 16;
/// Default system clock: 50 MHz.
pub const DEFAULT_CLOCK_HZ: u32 = 50_000_000;
/// Default line rate.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// How the baud divisor `clock_hz / baud_rate` is rounded when the clock is
/// not an exact multiple of the baud rate.
///
/// - `Ceil`: never faster than the target rate (the default).
/// - `Floor`: never slower than the target rate.
/// - `Nearest`: smallest absolute error, ties round up.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DivisorRounding {
    #[default]
    Ceil,
    Floor,
    Nearest,
}

impl DivisorRounding {
    /// Divide `clock_hz` by `baud_rate` under this policy. Returns 0 for a
    /// zero baud rate; `PipelineConfig::validate` rejects that case.
    pub fn divide(self, clock_hz: u64, baud_rate: u64) -> u64 {
        if baud_rate == 0 {
            return 0;
        }
        match self {
            DivisorRounding::Ceil => clock_hz.div_ceil(baud_rate),
            DivisorRounding::Floor => clock_hz / baud_rate,
            DivisorRounding::Nearest => (clock_hz + baud_rate / 2) / baud_rate,
        }
    }
}

impl FromStr for DivisorRounding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ceil" | "up" => Ok(DivisorRounding::Ceil),
            "floor" | "down" => Ok(DivisorRounding::Floor),
            "nearest" | "round" => Ok(DivisorRounding::Nearest),
            other => Err(anyhow!(
                "unknown rounding policy '{other}', expected ceil, floor or nearest"
            )),
        }
    }
}

impl fmt::Display for DivisorRounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DivisorRounding::Ceil => "ceil",
            DivisorRounding::Floor => "floor",
            DivisorRounding::Nearest => "nearest",
        };
        f.write_str(name)
    }
}

/// Fixed parameters of one pipeline instance.
///
/// These are the model's equivalent of synthesis-time constants: they are
/// read once when the pipeline is built and never change afterwards.
#[derive(TypedBuilder, Copy, Clone, Debug, Eq, PartialEq)]
pub struct PipelineConfig {
    /// Ring buffer capacity in bytes. Must be a power of two.
    #[builder(default = DEFAULT_FIFO_DEPTH)]
    pub fifo_depth: usize,
    #[builder(default = DEFAULT_CLOCK_HZ)]
    pub clock_hz: u32,
    #[builder(default = DEFAULT_BAUD_RATE)]
    pub baud_rate: u32,
    #[builder(default)]
    pub rounding: DivisorRounding,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.fifo_depth.is_power_of_two(),
            "fifo depth must be a non-zero power of two, got {}",
            self.fifo_depth
        );
        ensure!(self.baud_rate > 0, "baud rate must be non-zero");
        ensure!(
            self.clock_hz >= self.baud_rate,
            "clock ({} Hz) must be at least the baud rate ({})",
            self.clock_hz,
            self.baud_rate
        );
        ensure!(
            self.baud_period() >= 1,
            "baud divisor rounds to zero ticks ({} Hz / {} baud, {})",
            self.clock_hz,
            self.baud_rate,
            self.rounding
        );
        Ok(())
    }

    /// Number of clock ticks per baud period.
    pub fn baud_period(&self) -> u32 {
        let period = self
            .rounding
            .divide(u64::from(self.clock_hz), u64::from(self.baud_rate));
        // clock_hz is a u32, so the quotient always fits.
        period as u32
    }

    /// Actual line rate produced by the rounded divisor.
    pub fn effective_baud(&self) -> f64 {
        let period = self.baud_period();
        if period == 0 {
            return 0.0;
        }
        f64::from(self.clock_hz) / f64::from(period)
    }

    /// Steady-state deviation from the requested baud rate in parts per
    /// million. Negative means the line runs slow.
    pub fn baud_error_ppm(&self) -> f64 {
        if self.baud_rate == 0 {
            return 0.0;
        }
        let target = f64::from(self.baud_rate);
        (self.effective_baud() - target) / target * 1_000_000.0
    }
}

#[cfg(test)]
mod tests;
