//! Exact numeric normalization for physical measurements.
//!
//! Internal measurements are stored as binary floats; carrier payloads must
//! carry exact fixed-point decimals. A weight that should serialize as
//! `4.409` must never leak as `4.40899999999999980815...`, so every value
//! crosses the float/decimal boundary exactly once, through the shortest
//! round-trip decimal string, and is then rounded half-up to a fixed number
//! of places. Serialization happens from the decimal mantissa, never back
//! through an `f64`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places applied to outbound weights, dimensions, and unit values.
///
/// A configuration constant shared by every carrier, not a per-carrier knob.
pub const DEFAULT_MEASURE_PRECISION: u32 = 3;

/// Kilograms → pounds.
pub const KG_TO_LB: Decimal = Decimal::from_parts(220_462_262, 0, 0, false, 8);

/// Centimetres → inches.
pub const CM_TO_IN: Decimal = Decimal::from_parts(393_700_787, 0, 0, false, 9);

/// Weight unit carried on canonical requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeightUnit {
    Kilogram,
    Pound,
}

impl WeightUnit {
    /// Two-letter carrier-facing code.
    pub fn code(&self) -> &'static str {
        match self {
            WeightUnit::Kilogram => "KG",
            WeightUnit::Pound => "LB",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Dimension unit carried on canonical requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DimensionUnit {
    Centimeter,
    Inch,
}

impl DimensionUnit {
    /// Two-letter carrier-facing code.
    pub fn code(&self) -> &'static str {
        match self {
            DimensionUnit::Centimeter => "CM",
            DimensionUnit::Inch => "IN",
        }
    }
}

impl fmt::Display for DimensionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Round a decimal to at most `places` fractional digits, half-up.
///
/// Equivalent to scaling by `10^places`, rounding the midpoint away from
/// zero, and re-expressing the integer mantissa at the fixed scale. The
/// result serializes with at most `places` digits after the point, and the
/// operation is idempotent: `normalize(normalize(x, p), p) == normalize(x, p)`.
pub fn normalize(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an internal floating-point measurement to an exact decimal.
///
/// Goes through the float's shortest round-trip decimal representation, so
/// `4.409_f64` becomes the decimal `4.409` and binary expansion artifacts
/// cannot appear. Non-finite inputs collapse to zero; callers validate
/// ranges upstream.
pub fn decimal_from_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&value.to_string()).unwrap_or(Decimal::ZERO)
}

/// Float ingestion and normalization in one step.
pub fn normalized_from_f64(value: f64, places: u32) -> Decimal {
    normalize(decimal_from_f64(value), places)
}

/// Kilograms to pounds, unrounded. Callers normalize after converting.
pub fn kg_to_lb(kg: Decimal) -> Decimal {
    kg * KG_TO_LB
}

/// Centimetres to inches, unrounded. Callers normalize after converting.
pub fn cm_to_in(cm: Decimal) -> Decimal {
    cm * CM_TO_IN
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_rounds_half_up() {
        assert_eq!(normalize(dec!(1.2345), 3), dec!(1.235));
        assert_eq!(normalize(dec!(1.2344), 3), dec!(1.234));
        assert_eq!(normalize(dec!(0.0005), 3), dec!(0.001));
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in ["4.409", "0.0005", "12.3456789", "2", "0.1"] {
            let x = Decimal::from_str(raw).unwrap();
            let once = normalize(x, 3);
            assert_eq!(normalize(once, 3), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn test_normalize_serialized_scale() {
        let n = normalize(dec!(12.3456789), 3);
        let text = n.to_string();
        let frac = text.split('.').nth(1).unwrap_or("");
        assert!(frac.len() <= 3, "too many fractional digits: {text}");
    }

    #[test]
    fn test_normalize_leaves_short_values_alone() {
        assert_eq!(normalize(dec!(2), 3).to_string(), "2");
        assert_eq!(normalize(dec!(4.4), 3).to_string(), "4.4");
    }

    #[test]
    fn test_decimal_from_f64_shortest_representation() {
        // 4.409 is not representable in binary; the decimal must still be exact.
        assert_eq!(decimal_from_f64(4.409).to_string(), "4.409");
        assert_eq!(decimal_from_f64(0.1).to_string(), "0.1");
        assert_eq!(decimal_from_f64(2.0).to_string(), "2");
    }

    #[test]
    fn test_decimal_from_f64_non_finite() {
        assert_eq!(decimal_from_f64(f64::NAN), Decimal::ZERO);
        assert_eq!(decimal_from_f64(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_two_kilograms_is_exactly_4_409_pounds() {
        let lb = normalize(kg_to_lb(decimal_from_f64(2.0)), 3);
        assert_eq!(lb.to_string(), "4.409");
    }

    #[test]
    fn test_cm_to_in() {
        let inches = normalize(cm_to_in(dec!(30)), 3);
        assert_eq!(inches.to_string(), "11.811");
    }

    #[test]
    fn test_unit_codes() {
        assert_eq!(WeightUnit::Kilogram.code(), "KG");
        assert_eq!(WeightUnit::Pound.code(), "LB");
        assert_eq!(DimensionUnit::Centimeter.code(), "CM");
        assert_eq!(DimensionUnit::Inch.code(), "IN");
    }
}
