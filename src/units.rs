use alloy::primitives::U256;
use alloy::primitives::utils::format_units;

/// `raw / 10^decimals` as a float.
pub fn to_human(raw: U256, decimals: u8) -> f64 {
    if raw.is_zero() {
        return 0.0;
    }
    format_units(raw, decimals)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or_else(|| {
            // format_units tops out at 77 decimals
            let raw: f64 = raw.to_string().parse().unwrap_or(f64::NAN);
            raw / 10f64.powi(decimals as i32)
        })
}
