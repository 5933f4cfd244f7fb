//! Tests for the human-readable size formatter

use rstest::rstest;

use docktree::domain::format_size;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;
const TIB: u64 = GIB * 1024;

#[rstest]
#[case(0, "0 B")]
#[case(1, "1 B")]
#[case(1023, "1023 B")]
#[case(KIB, "1.0 KiB")]
#[case(1023 * KIB, "1023.0 KiB")]
#[case(MIB, "1.0 MiB")]
#[case(1023 * MIB, "1023.0 MiB")]
#[case(GIB, "1.0 GiB")]
#[case(1023 * GIB, "1023.0 GiB")]
#[case(TIB, "1.0 TiB")]
#[case(1023 * TIB, "1023.0 TiB")]
fn given_byte_count_when_formatting_then_uses_largest_binary_unit(
    #[case] bytes: u64,
    #[case] expected: &str,
) {
    assert_eq!(format_size(bytes), expected);
}

#[test]
fn given_values_below_one_kib_when_formatting_then_prints_plain_bytes() {
    for b in 0..KIB {
        assert_eq!(format_size(b), format!("{} B", b));
    }
}

#[rstest]
#[case(KIB, "KiB")]
#[case(MIB, "MiB")]
#[case(GIB, "GiB")]
#[case(TIB, "TiB")]
fn given_values_in_unit_range_when_formatting_then_matches_one_decimal_division(
    #[case] unit: u64,
    #[case] suffix: &str,
) {
    for factor in [1, 2, 7, 100, 511, 1000] {
        let bytes = unit * factor + unit / 3;
        let expected = format!("{:.1} {}", bytes as f64 / unit as f64, suffix);
        assert_eq!(format_size(bytes), expected);
    }
}
