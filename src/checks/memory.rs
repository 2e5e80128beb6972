//! Memory limit strings.
//!
//! PHP writes memory sizes as a number with an optional `K`, `M` or `G`
//! suffix, in binary multiples. `-1` means no limit.

const KIB: f64 = 1024.0;
const MIB: i64 = 1024 * 1024;

/// Value PHP uses for "no memory limit".
pub const UNLIMITED: i64 = -1;

/// Parse a memory size into bytes, rounding to the nearest byte.
///
/// ```
/// use ssreqcheck::checks::memory::memory_limit_bytes;
///
/// assert_eq!(memory_limit_bytes("64M"), Some(67_108_864));
/// assert_eq!(memory_limit_bytes("1048576"), Some(1_048_576));
/// assert_eq!(memory_limit_bytes("lots"), None);
/// ```
pub fn memory_limit_bytes(value: &str) -> Option<i64> {
    let value = value.trim();
    let last = value.chars().last()?;

    let (number, multiplier) = match last.to_ascii_lowercase() {
        'k' => (&value[..value.len() - 1], KIB),
        'm' => (&value[..value.len() - 1], KIB * KIB),
        'g' => (&value[..value.len() - 1], KIB * KIB * KIB),
        _ => (value, 1.0),
    };

    let number: f64 = number.trim().parse().ok()?;
    let bytes = (number * multiplier).round();
    if !bytes.is_finite() || bytes.abs() > i64::MAX as f64 {
        return None;
    }
    Some(bytes as i64)
}

/// Whether a parsed limit means "no limit".
pub fn is_unlimited(bytes: i64) -> bool {
    bytes < 0
}

/// Render bytes in a form the runtime accepts back: whole mebibytes as
/// `NM`, anything else as plain bytes.
pub fn format_memory_bytes(bytes: i64) -> String {
    if bytes > 0 && bytes % MIB == 0 {
        format!("{}M", bytes / MIB)
    } else {
        bytes.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_are_binary_multiples() {
        assert_eq!(memory_limit_bytes("64M"), Some(67_108_864));
        assert_eq!(memory_limit_bytes("1G"), Some(1_073_741_824));
        assert_eq!(memory_limit_bytes("512K"), Some(524_288));
    }

    #[test]
    fn suffixes_ignore_case() {
        assert_eq!(memory_limit_bytes("64m"), memory_limit_bytes("64M"));
        assert_eq!(memory_limit_bytes("1g"), Some(1_073_741_824));
        assert_eq!(memory_limit_bytes("512k"), Some(524_288));
    }

    #[test]
    fn no_suffix_is_bytes() {
        assert_eq!(memory_limit_bytes("1048576"), Some(1_048_576));
        assert_eq!(memory_limit_bytes(" 4096 "), Some(4096));
    }

    #[test]
    fn fractions_round_to_nearest() {
        assert_eq!(memory_limit_bytes("1.5M"), Some(1_572_864));
        assert_eq!(memory_limit_bytes("0.0001K"), Some(0));
        assert_eq!(memory_limit_bytes("0.0006K"), Some(1));
    }

    #[test]
    fn unlimited_passes_through() {
        assert_eq!(memory_limit_bytes("-1"), Some(UNLIMITED));
        assert!(is_unlimited(UNLIMITED));
        assert!(!is_unlimited(0));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(memory_limit_bytes(""), None);
        assert_eq!(memory_limit_bytes("M"), None);
        assert_eq!(memory_limit_bytes("lots"), None);
        assert_eq!(memory_limit_bytes("64MB"), None);
    }

    #[test]
    fn format_prefers_megabytes() {
        assert_eq!(format_memory_bytes(134_217_728), "128M");
        assert_eq!(format_memory_bytes(1_000), "1000");
        assert_eq!(format_memory_bytes(0), "0");
    }

    #[test]
    fn format_then_parse_is_identity() {
        for bytes in [1_i64, 524_288, 67_108_864, 100_000_001] {
            assert_eq!(memory_limit_bytes(&format_memory_bytes(bytes)), Some(bytes));
        }
    }
}
