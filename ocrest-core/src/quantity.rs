//! Storage quantities normalized to bytes
use crate::{Error, Result};
use std::{fmt, str::FromStr};

/// Unit of a storage quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapacityUnit {
    /// Plain bytes
    Bytes,
    /// 2^10 bytes
    Ki,
    /// 2^20 bytes
    Mi,
    /// 2^30 bytes
    Gi,
    /// 2^40 bytes
    Ti,
    /// 2^50 bytes
    Pi,
    /// 2^60 bytes
    Ei,
    /// 10^3 bytes
    K,
    /// 10^6 bytes
    M,
    /// 10^9 bytes
    G,
    /// 10^12 bytes
    T,
    /// 10^15 bytes
    P,
    /// 10^18 bytes
    E,
}

impl CapacityUnit {
    /// Number of bytes in one unit
    pub fn multiplier(self) -> u64 {
        match self {
            CapacityUnit::Bytes => 1,
            CapacityUnit::Ki => 1 << 10,
            CapacityUnit::Mi => 1 << 20,
            CapacityUnit::Gi => 1 << 30,
            CapacityUnit::Ti => 1 << 40,
            CapacityUnit::Pi => 1 << 50,
            CapacityUnit::Ei => 1 << 60,
            CapacityUnit::K => 1_000,
            CapacityUnit::M => 1_000_000,
            CapacityUnit::G => 1_000_000_000,
            CapacityUnit::T => 1_000_000_000_000,
            CapacityUnit::P => 1_000_000_000_000_000,
            CapacityUnit::E => 1_000_000_000_000_000_000,
        }
    }

    /// The suffix used on the wire
    pub fn suffix(self) -> &'static str {
        match self {
            CapacityUnit::Bytes => "",
            CapacityUnit::Ki => "Ki",
            CapacityUnit::Mi => "Mi",
            CapacityUnit::Gi => "Gi",
            CapacityUnit::Ti => "Ti",
            CapacityUnit::Pi => "Pi",
            CapacityUnit::Ei => "Ei",
            CapacityUnit::K => "k",
            CapacityUnit::M => "M",
            CapacityUnit::G => "G",
            CapacityUnit::T => "T",
            CapacityUnit::P => "P",
            CapacityUnit::E => "E",
        }
    }

    /// Convert `magnitude` units into bytes
    ///
    /// Fails with [`Error::ArithmeticOverflow`] instead of wrapping.
    pub fn to_bytes(self, magnitude: u64) -> Result<u64> {
        magnitude
            .checked_mul(self.multiplier())
            .ok_or_else(|| Error::ArithmeticOverflow {
                magnitude,
                unit: self.suffix().to_string(),
            })
    }
}

impl fmt::Display for CapacityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for CapacityUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "" | "B" => CapacityUnit::Bytes,
            "Ki" => CapacityUnit::Ki,
            "Mi" => CapacityUnit::Mi,
            "Gi" => CapacityUnit::Gi,
            "Ti" => CapacityUnit::Ti,
            "Pi" => CapacityUnit::Pi,
            "Ei" => CapacityUnit::Ei,
            "k" | "K" => CapacityUnit::K,
            "M" => CapacityUnit::M,
            "G" => CapacityUnit::G,
            "T" => CapacityUnit::T,
            "P" => CapacityUnit::P,
            "E" => CapacityUnit::E,
            other => {
                return Err(Error::InvalidValue {
                    property: "capacity".into(),
                    reason: format!("unknown unit {other:?}"),
                })
            }
        })
    }
}

/// Parse a quantity such as `5Gi`, `500M` or `1024` into bytes
///
/// Only whole magnitudes are accepted.
pub fn parse_bytes(quantity: &str) -> Result<u64> {
    let quantity = quantity.trim();
    let split = quantity
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(quantity.len());
    let (digits, suffix) = quantity.split_at(split);
    let magnitude = digits.parse::<u64>().map_err(|e| Error::InvalidValue {
        property: "capacity".into(),
        reason: format!("{quantity:?} is not a whole quantity: {e}"),
    })?;
    suffix.parse::<CapacityUnit>()?.to_bytes(magnitude)
}

#[cfg(test)]
mod tests {
    use super::{parse_bytes, CapacityUnit};
    use crate::Error;

    #[test]
    fn units_normalize_to_bytes() {
        assert_eq!(CapacityUnit::Gi.to_bytes(5).unwrap(), 5 * 1024 * 1024 * 1024);
        assert_eq!(CapacityUnit::M.to_bytes(500).unwrap(), 500_000_000);
        assert_eq!(CapacityUnit::Bytes.to_bytes(7).unwrap(), 7);
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        assert!(matches!(
            CapacityUnit::Ei.to_bytes(16),
            Err(Error::ArithmeticOverflow { magnitude: 16, ref unit }) if unit == "Ei"
        ));
        assert_eq!(CapacityUnit::Ei.to_bytes(15).unwrap(), 15 << 60);
        assert!(parse_bytes("20E").is_err());
    }

    #[test]
    fn quantities_parse() {
        assert_eq!(parse_bytes("1Gi").unwrap(), 1 << 30);
        assert_eq!(parse_bytes("1024").unwrap(), 1024);
        assert_eq!(parse_bytes(" 3k ").unwrap(), 3000);
        assert!(parse_bytes("1.5Gi").is_err());
        assert!(parse_bytes("Gi").is_err());
        assert!(parse_bytes("5Zi").is_err());
    }
}
