//! Shortest-form float rendering with 17 significant digits.
//!
//! Output follows the C `%.17g` conversion: the value is rounded to 17
//! significant digits, trailing fractional zeros are dropped, and scientific
//! notation (`d.ddde+XX`, at least two exponent digits) is used when the
//! decimal exponent is below -4 or at least 17. Seventeen digits are enough
//! for every finite double to survive a text round trip.

/// Significant digits kept.
const PRECISION: usize = 17;

/// Largest decimal exponent still written in fixed notation, one below
/// [`PRECISION`].
const MAX_FIXED_EXP: i32 = 16;

/// Render a finite float.
///
/// # Panics
///
/// When `f` is NaN or infinite; JSON has no spelling for either.
pub(crate) fn format_float(f: f64) -> String {
    assert!(f.is_finite(), "cannot serialize non-finite float {f}");

    // Rounded to PRECISION digits, so the exponent is the one %g would pick.
    let sci = format!("{:.*e}", PRECISION - 1, f);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        unreachable!("exponent form always contains 'e': {sci}");
    };
    let Ok(exp) = exp.parse::<i32>() else {
        unreachable!("exponent is a decimal integer: {sci}");
    };

    if exp < -4 || exp > MAX_FIXED_EXP {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.unsigned_abs())
    } else {
        let decimals = MAX_FIXED_EXP.abs_diff(exp) as usize;
        let fixed = format!("{f:.decimals$}");
        trim_fraction(&fixed).to_owned()
    }
}

/// Drop trailing zeros after the decimal point, and the point itself when
/// nothing is left behind it.
fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
