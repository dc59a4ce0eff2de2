/// Frequency used when the custom field holds nothing usable
pub const FALLBACK_FREQUENCY_HZ: f32 = 440.0;

/// Readout text for a frequency, e.g. "963 Hz"
pub fn format_frequency(freq: f32) -> String {
    format!("{} Hz", freq)
}

/// Resolves the custom frequency field; blank, garbage or non-positive input
/// falls back to [`FALLBACK_FREQUENCY_HZ`]
pub fn parse_custom_frequency(input: &str) -> f32 {
    match input.trim().parse::<f32>() {
        Ok(freq) if freq.is_finite() && freq > 0.0 => freq,
        _ => FALLBACK_FREQUENCY_HZ,
    }
}

/// Slider percentage to linear gain
pub fn volume_fraction(percent: u8) -> f32 {
    percent.min(100) as f32 / 100.0
}

/// Short description of the platform the app runs on
pub fn platform_descriptor() -> String {
    format!("Desktop ({})", std::env::consts::OS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_readout_drops_trailing_zero() {
        assert_eq!(format_frequency(963.0), "963 Hz");
        assert_eq!(format_frequency(0.0), "0 Hz");
        assert_eq!(format_frequency(432.5), "432.5 Hz");
    }

    #[test]
    fn custom_frequency_falls_back_to_a440() {
        assert_eq!(parse_custom_frequency(" 528 "), 528.0);
        assert_eq!(parse_custom_frequency("7.83"), 7.83);
        assert_eq!(parse_custom_frequency(""), 440.0);
        assert_eq!(parse_custom_frequency("abc"), 440.0);
        assert_eq!(parse_custom_frequency("0"), 440.0);
        assert_eq!(parse_custom_frequency("-20"), 440.0);
    }

    #[test]
    fn volume_percent_maps_to_unit_range() {
        assert_eq!(volume_fraction(30), 0.3);
        assert_eq!(volume_fraction(0), 0.0);
        assert_eq!(volume_fraction(250), 1.0);
    }
}
