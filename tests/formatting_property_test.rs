use admin_form_kit::{
    Equality, Value, add_field, contains, format_number, number_format, parse_locale_float,
    remove_field,
};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::FileFailurePersistence;

const FORMATTING_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/formatting_property_test.txt";
const DEFAULT_FORMATTING_PROPTEST_CASES: u32 = 256;

fn env_proptest_cases(var_name: &str, default_cases: u32) -> u32 {
    std::env::var(var_name)
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default_cases)
}

fn formatting_proptest_cases() -> u32 {
    std::env::var("ADMIN_FORM_KIT_FORMATTING_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or_else(|| {
            env_proptest_cases(
                "ADMIN_FORM_KIT_PROPTEST_CASES",
                DEFAULT_FORMATTING_PROPTEST_CASES,
            )
        })
}

fn rounded(value: f64, decimals: u32) -> f64 {
    let k = 10f64.powi(decimals as i32);
    (value * k).round() / k
}

#[test]
fn binary_exact_ties_round_away_from_zero() {
    assert_eq!(format_number(0.125, 2), "0.13");
    assert_eq!(format_number(-0.125, 2), "-0.13");
    assert_eq!(format_number(0.375, 2), "0.38");
    assert_eq!(format_number(2.5, 0), "3");
    assert_eq!(format_number(0.5, 0), "1");
    assert_eq!(format_number(1.0625, 3), "1.063");
    assert_eq!(format_number(1_234.5, 0), "1,235");
    assert_eq!(format_number(0.0625, 1), "0.1");
}

fn field_id_strategy() -> BoxedStrategy<String> {
    "[a-z_]{1,8}".boxed()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: formatting_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(FORMATTING_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn stripped_format_parses_back_to_the_rounded_value(
        value in -1.0e9f64..1.0e9,
        decimals in 0u32..=6,
    ) {
        let formatted = format_number(value, decimals);
        let parsed = formatted.replace(',', "").parse::<f64>();
        prop_assert_eq!(parsed, Ok(rounded(value, decimals)), "formatted={}", formatted);
    }

    #[test]
    fn fraction_always_has_the_requested_width(
        value in -1.0e12f64..1.0e12,
        decimals in 1u32..=8,
    ) {
        let formatted = format_number(value, decimals);
        let fraction = formatted.rsplit_once('.').map(|(_, fraction)| fraction.len());
        prop_assert_eq!(fraction, Some(decimals as usize), "formatted={}", formatted);
    }

    #[test]
    fn locale_formatted_text_parses_back(
        value in -1.0e9f64..1.0e9,
        decimals in 0u32..=4,
    ) {
        let formatted = number_format(value, decimals, ",", ".");
        let parsed = parse_locale_float(&formatted);
        prop_assert_eq!(parsed, Ok(rounded(value, decimals)), "formatted={}", formatted);
    }

    #[test]
    fn loose_membership_matches_numeric_strings(
        haystack in vec(-1_000i64..1_000, 0..12),
        needle in -1_000i64..1_000,
    ) {
        let values = haystack.iter().map(|n| Value::from(n.to_string())).collect::<Vec<_>>();
        let expected = haystack.contains(&needle);
        let needle = Value::from(needle);
        prop_assert_eq!(contains(&needle, &values, Equality::Loose), expected);
        prop_assert!(!contains(&needle, &values, Equality::Strict));
    }

    #[test]
    fn added_field_is_present_exactly_once(
        existing in vec(field_id_strategy(), 0..6),
        field in field_id_strategy(),
    ) {
        let csv = existing.join(",");
        let updated = add_field(&field, &csv);
        let occurrences = updated.split(',').filter(|id| *id == field).count();
        prop_assert_eq!(occurrences, 1, "csv={} updated={}", csv, updated);
        prop_assert_eq!(add_field(&field, &updated), updated.clone());
    }

    #[test]
    fn removed_field_is_absent(
        existing in vec(field_id_strategy(), 0..6),
        field in field_id_strategy(),
    ) {
        let csv = add_field(&field, &existing.join(","));
        let updated = remove_field(&field, &csv);
        prop_assert!(updated.split(',').all(|id| id != field), "updated={}", updated);
        prop_assert_eq!(remove_field(&field, &updated), updated.clone());
    }
}
