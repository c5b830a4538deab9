use anyhow::{bail, Result};
use clap::Parser;
use uartpipe::Payload;
use uartpipe_common::config::{DEFAULT_BAUD_RATE, DEFAULT_CLOCK_HZ, DEFAULT_FIFO_DEPTH};
use uartpipe_common::{DivisorRounding, PipelineConfig};

const DEFAULT_TEXT: &str = "Hello, UART!";

#[derive(Parser, Debug)]
#[command(
    name = "uartpipe",
    about = "Push bytes through a cycle-stepped UART transmit pipeline"
)]
struct Args {
    /// Text to transmit.
    text: Option<String>,

    /// Send this many random bytes instead of text.
    #[arg(long, value_name = "N", conflicts_with = "text")]
    random: Option<usize>,

    /// Seed for --random.
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// Ring buffer depth (power of two).
    #[arg(long, default_value_t = DEFAULT_FIFO_DEPTH)]
    depth: usize,

    #[arg(long, value_name = "HZ", default_value_t = DEFAULT_CLOCK_HZ)]
    clock_hz: u32,

    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Baud divisor rounding: ceil, floor or nearest.
    #[arg(long, default_value = "ceil")]
    rounding: DivisorRounding,

    /// Hold tx_ready low for this many ticks before releasing the packetizer.
    #[arg(long, value_name = "TICKS", default_value_t = 0)]
    tx_ready_after: u64,

    /// Print the line level of every baud period.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    waveform: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let payload = match (args.text, args.random) {
        (_, Some(len)) => Payload::Random {
            len,
            seed: args.seed,
        },
        (Some(text), None) => Payload::Text(text),
        (None, None) => {
            log::info!("No payload provided, sending '{}'", DEFAULT_TEXT);
            Payload::Text(DEFAULT_TEXT.to_string())
        }
    };
    let bytes = payload.bytes();

    let config = PipelineConfig::builder()
        .fifo_depth(args.depth)
        .clock_hz(args.clock_hz)
        .baud_rate(args.baud)
        .rounding(args.rounding)
        .build();

    let report = uartpipe::run(config, &bytes, args.tx_ready_after)?;

    println!(
        "{} bytes, {} ticks per bit ({:.1} baud effective, {:+.1} ppm), {} ticks",
        report.payload.len(),
        report.baud_period,
        config.effective_baud(),
        config.baud_error_ppm(),
        report.ticks
    );
    for (frame, byte) in report.frames.iter().zip(report.payload.iter()) {
        println!("  0x{:02X}  {}", byte, frame);
    }
    if args.waveform {
        println!("{}", report.waveform);
    }

    let mismatches = report.mismatches();
    if !mismatches.is_empty() {
        bail!("{} frames did not match the payload: {:?}", mismatches.len(), mismatches);
    }
    Ok(())
}
