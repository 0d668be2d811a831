//! Exact decimal rendering of raw token amounts.
//!
//! Raw amounts are unscaled integers in the token's smallest unit. Everything here stays in
//! `BigUint` so large supplies never lose precision.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

pub fn pow10(exp: u32) -> BigUint {
    BigUint::from(10u32).pow(exp)
}

/// `amount_raw / 10^decimals` with trailing fractional zeros removed. Integral values are
/// rendered without a decimal point.
pub fn format_ui_amount(amount_raw: &BigUint, decimals: u8) -> String {
    let factor = pow10(decimals as u32);
    let whole = amount_raw / &factor;
    let frac = amount_raw % &factor;
    if frac.is_zero() {
        return whole.to_string();
    }

    let padded = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{}.{}", whole, padded.trim_end_matches('0'))
}

/// `amount_raw / 10^decimals` rounded half-up to exactly `places` fractional digits.
///
/// Falls back to float division when `amount_raw` is not an unsigned integer string.
pub fn format_ui_amount_fixed(amount_raw: &str, decimals: u8, places: u8) -> String {
    match amount_raw.trim().parse::<BigUint>() {
        Ok(raw) => fixed_from_biguint(&raw, decimals, places),
        Err(_) => fixed_from_float(amount_raw, decimals, places),
    }
}

fn fixed_from_biguint(raw: &BigUint, decimals: u8, places: u8) -> String {
    let mul = pow10(places as u32);
    let denom = pow10(decimals as u32);
    let scaled = raw * &mul;
    let q = &scaled / &denom;
    let r = &scaled % &denom;
    let rounded = if r * 2u32 >= denom { q + 1u32 } else { q };

    let whole = &rounded / &mul;
    if places == 0 {
        return whole.to_string();
    }
    let frac = &rounded % &mul;
    format!("{}.{:0>width$}", whole, frac.to_string(), width = places as usize)
}

fn fixed_from_float(amount_raw: &str, decimals: u8, places: u8) -> String {
    let value = amount_raw
        .trim()
        .parse::<f64>()
        .unwrap_or(f64::NAN)
        / 10f64.powi(decimals as i32);
    if value.is_finite() {
        format!("{:.*}", places as usize, value)
    } else {
        "0.00".to_string()
    }
}

/// Best-effort float view of a raw amount, for log lines only.
pub fn approx_ui_amount(amount_raw: &BigUint, decimals: u8) -> f64 {
    amount_raw.to_f64().unwrap_or(f64::INFINITY) / 10f64.powi(decimals as i32)
}

/// `AbCdEf…wxyz` style display form of an address.
pub fn shorten(address: &str, chars: usize) -> String {
    let len = address.chars().count();
    if len <= chars * 2 + 3 {
        return address.to_string();
    }
    let head: String = address.chars().take(chars + 2).collect();
    let tail: String = address.chars().skip(len - chars).collect();
    format!("{}…{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(s: &str) -> BigUint {
        s.parse().unwrap()
    }

    #[test]
    fn plain_format_strips_trailing_zeros() {
        assert_eq!(format_ui_amount(&big("1000"), 6), "0.001");
        assert_eq!(format_ui_amount(&big("500"), 6), "0.0005");
        assert_eq!(format_ui_amount(&big("1500000"), 6), "1.5");
        assert_eq!(format_ui_amount(&big("123456789"), 3), "123456.789");
    }

    #[test]
    fn plain_format_omits_point_for_integers() {
        assert_eq!(format_ui_amount(&big("2000000"), 6), "2");
        assert_eq!(format_ui_amount(&big("0"), 9), "0");
        assert_eq!(format_ui_amount(&big("42"), 0), "42");
    }

    #[test]
    fn plain_format_never_ends_with_zero_after_point() {
        for raw in [1u64, 10, 100, 101, 1_010, 99_990, 1_000_001, u64::MAX] {
            for decimals in [0u8, 1, 2, 6, 9, 12] {
                let out = format_ui_amount(&BigUint::from(raw), decimals);
                if let Some((_, frac)) = out.split_once('.') {
                    assert!(!frac.is_empty(), "{raw}/{decimals} -> {out}");
                    assert!(!frac.ends_with('0'), "{raw}/{decimals} -> {out}");
                }
            }
        }
    }

    #[test]
    fn plain_format_beyond_u64() {
        let raw = big("340282366920938463463374607431768211456123");
        assert_eq!(
            format_ui_amount(&raw, 9),
            "340282366920938463463374607431768.211456123"
        );
    }

    #[test]
    fn fixed_format_rounds_half_up() {
        assert_eq!(format_ui_amount_fixed("125", 2, 1), "1.3");
        assert_eq!(format_ui_amount_fixed("124", 2, 1), "1.2");
        assert_eq!(format_ui_amount_fixed("999", 3, 2), "1.00");
        assert_eq!(format_ui_amount_fixed("1", 9, 2), "0.00");
        assert_eq!(format_ui_amount_fixed("5000000", 9, 2), "0.01");
    }

    #[test]
    fn fixed_format_pads_fraction() {
        assert_eq!(format_ui_amount_fixed("1000000", 6, 2), "1.00");
        assert_eq!(format_ui_amount_fixed("7", 0, 4), "7.0000");
        assert_eq!(format_ui_amount_fixed("1234", 2, 0), "12");
        for places in 1u8..8 {
            let out = format_ui_amount_fixed("123456789", 4, places);
            let (_, frac) = out.split_once('.').unwrap();
            assert_eq!(frac.len(), places as usize, "{out}");
        }
    }

    #[test]
    fn fixed_format_falls_back_for_non_integer_input() {
        assert_eq!(format_ui_amount_fixed("12.5", 1, 2), "1.25");
        assert_eq!(format_ui_amount_fixed("not-a-number", 6, 2), "0.00");
        assert_eq!(format_ui_amount_fixed("-100", 2, 2), "-1.00");
    }

    #[test]
    fn shorten_keeps_short_addresses() {
        assert_eq!(shorten("abcdefghijk", 4), "abcdefghijk");
        assert_eq!(
            shorten("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM", 4),
            "9WzDXw…AWWM"
        );
    }
}
