// roitab - core/label.rs
//
// Coordinate label decomposition.
//
// A label such as "y12x34" carries up to two axis coordinates, each tagged
// by a literal marker character ('x' or 'y') followed by a digit run. The
// two axes are extracted by two INDEPENDENT splits over the same full label,
// never by a shared-state sequential parse: each split sees the whole
// original string, so an irregular label contributes its prefix text to both
// residuals. Downstream output depends on this exact dual-split behaviour.

use crate::core::model::ParsedCoordinate;
use crate::util::constants;
use crate::util::error::LabelError;
use regex::Regex;
use std::sync::OnceLock;

/// One axis extracted from a label: residual prefix text plus numeral.
struct AxisSplit {
    res: String,
    num: u64,
}

/// Decompose a coordinate label into its two axis components.
///
/// Per marker ('x', 'y'): the digit run immediately after the marker is the
/// axis numeral (0 when empty), and the text before the marker — with axis
/// marker characters excluded — is the axis residual. A marker that does not
/// appear contributes numeral 0 and an empty residual.
///
/// # Errors
/// - [`LabelError::NoMarkers`] when the label contains neither marker.
/// - [`LabelError::RepeatedMarker`] when a marker occurs more than once
///   (the split would produce more than two parts, which is ambiguous).
/// - [`LabelError::NumeralOverflow`] when a digit run exceeds
///   [`constants::MAX_NUMERAL_DIGITS`].
/// - [`LabelError::LabelTooLong`] when the token exceeds
///   [`constants::MAX_LABEL_LENGTH`].
pub fn parse_label(label: &str) -> Result<ParsedCoordinate, LabelError> {
    if label.len() > constants::MAX_LABEL_LENGTH {
        return Err(LabelError::LabelTooLong {
            length: label.len(),
            max_length: constants::MAX_LABEL_LENGTH,
        });
    }

    let x = split_axis(label, 'x')?;
    let y = split_axis(label, 'y')?;

    if x.is_none() && y.is_none() {
        return Err(LabelError::NoMarkers {
            label: label.to_string(),
        });
    }

    let (xres, xnum) = x.map(|a| (a.res, a.num)).unwrap_or_default();
    let (yres, ynum) = y.map(|a| (a.res, a.num)).unwrap_or_default();

    Ok(ParsedCoordinate {
        xres,
        yres,
        xnum,
        ynum,
    })
}

/// Element number for a parsed coordinate: the sum of its axis numerals.
///
/// Cannot overflow: each numeral is capped at
/// [`constants::MAX_NUMERAL_DIGITS`] decimal digits by `parse_label`.
pub fn element_key(parsed: &ParsedCoordinate) -> u64 {
    parsed.xnum + parsed.ynum
}

/// Coordinate-pair type for a parsed coordinate: both residuals
/// concatenated, with every digit character removed.
///
/// This is the output column discriminator. Labels whose text consists only
/// of markers and numerals (e.g. "y12x34", "x7") yield the empty string,
/// which is a valid column name.
pub fn pair_type(parsed: &ParsedCoordinate) -> String {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| {
        // Literal 0-9 only; the pattern is exercised by the unit tests below.
        Regex::new("[0-9]+").expect("pair_type: invalid digit regex")
    });

    let joined = format!("{}{}", parsed.xres, parsed.yres);
    digits.replace_all(&joined, "").into_owned()
}

/// Split out one axis from the full label.
///
/// Returns `Ok(None)` when the marker does not appear. The residual excludes
/// axis marker characters, so the other axis's marker sitting in the prefix
/// (as in "y12x34" seen from the 'x' split) does not leak into the
/// coordinate-pair type.
fn split_axis(label: &str, marker: char) -> Result<Option<AxisSplit>, LabelError> {
    let mut occurrences = label.match_indices(marker);
    let Some((idx, _)) = occurrences.next() else {
        return Ok(None);
    };
    if occurrences.next().is_some() {
        return Err(LabelError::RepeatedMarker {
            label: label.to_string(),
            marker,
        });
    }

    // Marker characters are one byte, so idx + 1 stays on a char boundary.
    let after = &label[idx + 1..];
    let digit_len = after.chars().take_while(char::is_ascii_digit).count();
    if digit_len > constants::MAX_NUMERAL_DIGITS {
        return Err(LabelError::NumeralOverflow {
            label: label.to_string(),
            marker,
            digits: digit_len,
            max_digits: constants::MAX_NUMERAL_DIGITS,
        });
    }

    let num = if digit_len == 0 {
        0
    } else {
        after[..digit_len].parse::<u64>().map_err(|_| {
            // Unreachable for <= 18 ASCII digits; kept as an error rather
            // than a panic so a bound change cannot introduce one.
            LabelError::NumeralOverflow {
                label: label.to_string(),
                marker,
                digits: digit_len,
                max_digits: constants::MAX_NUMERAL_DIGITS,
            }
        })?
    };

    let res: String = label[..idx]
        .chars()
        .filter(|c| !matches!(c, 'x' | 'y'))
        .collect();

    Ok(Some(AxisSplit { res, num }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(label: &str) -> ParsedCoordinate {
        parse_label(label).expect("label should parse")
    }

    #[test]
    fn test_dual_marker_label() {
        let p = parsed("y12x34");
        assert_eq!(p.xnum, 34);
        assert_eq!(p.ynum, 12);
        assert_eq!(element_key(&p), 46);
        assert_eq!(pair_type(&p), "");
    }

    #[test]
    fn test_zero_coordinates() {
        let p = parsed("y0x0");
        assert_eq!(element_key(&p), 0);
        assert_eq!(pair_type(&p), "");
    }

    #[test]
    fn test_x_only_label() {
        let p = parsed("x7");
        assert_eq!(p.xnum, 7);
        assert_eq!(p.ynum, 0, "missing y marker defaults to 0");
        assert_eq!(p.yres, "", "missing y marker leaves an empty residual");
        assert_eq!(element_key(&p), 7);
        assert_eq!(pair_type(&p), "");
    }

    #[test]
    fn test_y_only_label() {
        let p = parsed("y451");
        assert_eq!(p.ynum, 451);
        assert_eq!(p.xnum, 0);
        assert_eq!(element_key(&p), 451);
    }

    #[test]
    fn test_marker_without_digits_defaults_to_zero() {
        let p = parsed("x");
        assert_eq!(p.xnum, 0);
        assert_eq!(element_key(&p), 0);
    }

    /// ElementKey is commutative in its numeral sum: any label yielding
    /// xnum=5, ynum=3 produces the same key as "y3x5".
    #[test]
    fn test_element_key_commutative_sum() {
        assert_eq!(element_key(&parsed("y3x5")), 8);
        assert_eq!(element_key(&parsed("x5y3")), 8);
        assert_eq!(element_key(&parsed("y5x3")), 8);
    }

    /// The pair type captures annotation text adjacent to the axis number.
    #[test]
    fn test_residual_tag_survives() {
        let p = parsed("roix12");
        assert_eq!(p.xres, "roi");
        assert_eq!(p.xnum, 12);
        assert_eq!(pair_type(&p), "roi");
    }

    /// Both splits see the whole label independently, so an irregular label
    /// contributes its leading text to both residuals.
    #[test]
    fn test_dual_split_sees_full_label() {
        let p = parsed("a3y2x9");
        assert_eq!(p.yres, "a3");
        assert_eq!(p.xres, "a32", "x split sees the y numeral in its prefix");
        assert_eq!(element_key(&p), 11);
        assert_eq!(pair_type(&p), "aa");
    }

    /// The pair type never contains digit characters, whatever the label.
    #[test]
    fn test_pair_type_strips_all_digits() {
        for label in ["y12x34", "roi9x1", "a1b2c3y4", "x123456"] {
            let t = pair_type(&parsed(label));
            assert!(
                !t.chars().any(|c| c.is_ascii_digit()),
                "pair type '{t}' for label '{label}' contains a digit"
            );
        }
    }

    #[test]
    fn test_no_markers_is_error() {
        assert!(matches!(
            parse_label("roi42"),
            Err(LabelError::NoMarkers { .. })
        ));
        assert!(matches!(
            parse_label(""),
            Err(LabelError::NoMarkers { .. })
        ));
    }

    #[test]
    fn test_repeated_marker_is_error() {
        assert!(matches!(
            parse_label("x1x2"),
            Err(LabelError::RepeatedMarker { marker: 'x', .. })
        ));
        assert!(matches!(
            parse_label("y1y2x3"),
            Err(LabelError::RepeatedMarker { marker: 'y', .. })
        ));
    }

    #[test]
    fn test_numeral_overflow_is_error() {
        // 19 digits exceeds the 18-digit cap.
        let label = format!("x{}", "9".repeat(19));
        assert!(matches!(
            parse_label(&label),
            Err(LabelError::NumeralOverflow { .. })
        ));
    }

    #[test]
    fn test_numeral_at_cap_parses() {
        let label = format!("x{}", "9".repeat(18));
        let p = parsed(&label);
        assert_eq!(p.xnum, 999_999_999_999_999_999);
    }

    #[test]
    fn test_label_too_long_is_error() {
        let label = format!("x{}", "a".repeat(600));
        assert!(matches!(
            parse_label(&label),
            Err(LabelError::LabelTooLong { .. })
        ));
    }
}
