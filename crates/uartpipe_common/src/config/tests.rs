use super::*;

#[test]
fn defaults_match_reference_parameters() {
    let config = PipelineConfig::default();
    assert_eq!(config.fifo_depth, 16);
    assert_eq!(config.clock_hz, 50_000_000);
    assert_eq!(config.baud_rate, 115_200);
    assert_eq!(config.rounding, DivisorRounding::Ceil);
    assert!(config.validate().is_ok());
}

#[test]
fn default_divisor_is_ceiling_of_ratio() {
    // 50e6 / 115200 = 434.03
    let config = PipelineConfig::default();
    assert_eq!(config.baud_period(), 435);

    let floor = PipelineConfig::builder()
        .rounding(DivisorRounding::Floor)
        .build();
    assert_eq!(floor.baud_period(), 434);

    let nearest = PipelineConfig::builder()
        .rounding(DivisorRounding::Nearest)
        .build();
    assert_eq!(nearest.baud_period(), 434);
}

#[test]
fn exact_divisors_are_policy_independent() {
    for rounding in [
        DivisorRounding::Ceil,
        DivisorRounding::Floor,
        DivisorRounding::Nearest,
    ] {
        let config = PipelineConfig::builder()
            .clock_hz(1_000)
            .baud_rate(100)
            .rounding(rounding)
            .build();
        assert_eq!(config.baud_period(), 10, "{rounding}");
        assert_eq!(config.baud_error_ppm(), 0.0);
    }
}

#[test]
fn nearest_rounds_half_up() {
    // 25 / 10 = 2.5
    assert_eq!(DivisorRounding::Nearest.divide(25, 10), 3);
    // 24 / 10 = 2.4
    assert_eq!(DivisorRounding::Nearest.divide(24, 10), 2);
    // 26 / 10 = 2.6
    assert_eq!(DivisorRounding::Nearest.divide(26, 10), 3);
}

#[test]
fn ceiling_divisor_runs_slow() {
    let config = PipelineConfig::default();
    assert!(config.baud_error_ppm() < 0.0);
    let floor = PipelineConfig::builder()
        .rounding(DivisorRounding::Floor)
        .build();
    assert!(floor.baud_error_ppm() > 0.0);
}

#[test]
fn validate_rejects_bad_parameters() {
    let not_pow2 = PipelineConfig::builder().fifo_depth(12).build();
    assert!(not_pow2.validate().is_err());

    let zero_depth = PipelineConfig::builder().fifo_depth(0).build();
    assert!(zero_depth.validate().is_err());

    let zero_baud = PipelineConfig::builder().baud_rate(0).build();
    assert!(zero_baud.validate().is_err());

    let slow_clock = PipelineConfig::builder()
        .clock_hz(9_600)
        .baud_rate(115_200)
        .build();
    assert!(slow_clock.validate().is_err());

    let minimal = PipelineConfig::builder()
        .fifo_depth(1)
        .clock_hz(4)
        .baud_rate(4)
        .build();
    assert!(minimal.validate().is_ok());
    assert_eq!(minimal.baud_period(), 1);
}

#[test]
fn rounding_parses_from_cli_names() {
    assert_eq!("ceil".parse::<DivisorRounding>().unwrap(), DivisorRounding::Ceil);
    assert_eq!("FLOOR".parse::<DivisorRounding>().unwrap(), DivisorRounding::Floor);
    assert_eq!("round".parse::<DivisorRounding>().unwrap(), DivisorRounding::Nearest);
    assert!("sideways".parse::<DivisorRounding>().is_err());
}
