//! Display formatting for totals.

/// Hours in one person-month.
pub const HOURS_PER_PERSON_MONTH: f64 = 160.0;

/// Largest supported number of decimals.
const MAX_DECIMALS: usize = 20;

/// Magnitudes from here on print in exponent form, whatever the decimals.
const EXPONENT_FORM_FROM: f64 = 1e21;

/// Convert hours to person-months.
pub fn person_months(hours: f64) -> f64 {
    hours / HOURS_PER_PERSON_MONTH
}

/// What a total slot shows when its value is not positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZeroDisplay {
    /// Format the value like any other (`"0.00"`).
    Shown,
    /// Show a dash placeholder.
    Dash,
    /// Leave the slot empty.
    Blank,
}

/// How one kind of total slot is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TotalFormat {
    pub decimals: usize,
    pub unit: &'static str,
    pub zero: ZeroDisplay,
}

impl TotalFormat {
    pub const fn new(decimals: usize, unit: &'static str) -> TotalFormat {
        TotalFormat {
            decimals,
            unit,
            zero: ZeroDisplay::Shown,
        }
    }

    pub const fn with_zero(self, zero: ZeroDisplay) -> TotalFormat {
        TotalFormat { zero, ..self }
    }

    /// Render a total for display.
    pub fn render(&self, value: f64) -> String {
        if value > 0.0 {
            return format!("{}{}", to_fixed(value, self.decimals), self.unit);
        }
        match self.zero {
            ZeroDisplay::Shown => format!("{}{}", to_fixed(value, self.decimals), self.unit),
            ZeroDisplay::Dash => "-".to_string(),
            ZeroDisplay::Blank => String::new(),
        }
    }
}

/// Format a number with a fixed count of decimals.
///
/// Exact halfway values round away from zero (`0.25` -> `"0.3"`), matching
/// what users see from browser-side number formatting. Negative zero prints
/// as zero, and magnitudes of `1e21` or more print as `1e+21`.
pub fn to_fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.abs() >= EXPONENT_FORM_FROM {
        return format!("{:e}", value).replacen('e', "e+", 1);
    }

    let decimals = decimals.min(MAX_DECIMALS);
    let magnitude = value.abs();
    let digits = match halfway_numerator(magnitude, decimals) {
        Some(numerator) => place_decimal_point((numerator + 1) / 2, decimals),
        None => format!("{:.*}", decimals, magnitude),
    };

    if value < 0.0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// If `magnitude` lies exactly halfway between two multiples of
/// `10^-decimals`, return the odd integer `magnitude * 10^decimals * 2`.
///
/// With `magnitude = m * 2^-s` the doubled, scaled value is
/// `m * 5^d * 2^(d + 1 - s)`, an odd integer exactly when the trailing zero
/// bits of `m` plus `d + 1` equal `s`.
fn halfway_numerator(magnitude: f64, decimals: usize) -> Option<u128> {
    let bits = magnitude.to_bits();
    let exponent_bits = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if exponent_bits == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exponent_bits - 1075)
    };
    if mantissa == 0 || exponent >= 0 {
        return None;
    }

    let shift = exponent.unsigned_abs();
    let zeros = mantissa.trailing_zeros();
    if zeros + decimals as u32 + 1 != shift {
        return None;
    }
    Some(u128::from(mantissa >> zeros) * 5u128.pow(decimals as u32))
}

fn place_decimal_point(scaled: u128, decimals: usize) -> String {
    let mut digits = scaled.to_string();
    if decimals == 0 {
        return digits;
    }
    if digits.len() <= decimals {
        digits.insert_str(0, &"0".repeat(decimals + 1 - digits.len()));
    }
    digits.insert(digits.len() - decimals, '.');
    digits
}
