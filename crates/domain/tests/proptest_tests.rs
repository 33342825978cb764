//! Property-based tests for the normalizer and payload validation
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{
    DomainError, RawRoutePayload,
    normalize::{normalize_direction, normalize_stop_name},
    value_objects::{Direction, StopName},
};
use proptest::prelude::*;

// ============================================================================
// Normalizer Property Tests
// ============================================================================

mod normalizer_tests {
    use super::*;

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in "[ \\ta-zA-Z0-9]{0,40}") {
            let once = normalize_stop_name(&raw);
            let twice = normalize_stop_name(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn normalized_has_no_edge_or_double_spaces(raw in "[ \\t\\na-zA-Z]{0,40}") {
            let name = normalize_stop_name(&raw);
            prop_assert!(!name.starts_with(' '));
            prop_assert!(!name.ends_with(' '));
            prop_assert!(!name.contains("  "));
            prop_assert!(!name.contains('\t'));
            prop_assert!(!name.contains('\n'));
        }

        #[test]
        fn padding_does_not_change_result(
            word in "[a-zA-Z]{1,12}",
            left in "[ \\t]{0,5}",
            right in "[ \\t]{0,5}"
        ) {
            let padded = format!("{left}{word}{right}");
            prop_assert_eq!(normalize_stop_name(&padded), word);
        }

        #[test]
        fn stop_name_parse_matches_normalizer(raw in "[ a-zA-Z]{0,30}") {
            let normalized = normalize_stop_name(&raw);
            match StopName::parse(&raw) {
                Ok(name) => prop_assert_eq!(name.as_str(), normalized.as_str()),
                Err(_) => prop_assert!(normalized.is_empty()),
            }
        }
    }
}

// ============================================================================
// Direction Property Tests
// ============================================================================

mod direction_tests {
    use super::*;

    proptest! {
        #[test]
        fn any_casing_of_up_or_down_parses(
            upper_mask in prop::collection::vec(any::<bool>(), 4),
            pick_up in any::<bool>(),
            pad in "[ ]{0,3}"
        ) {
            let base = if pick_up { "up" } else { "down" };
            let mixed: String = base
                .chars()
                .zip(upper_mask.iter().cycle())
                .map(|(c, &up)| if up { c.to_ascii_uppercase() } else { c })
                .collect();
            let raw = format!("{pad}{mixed}{pad}");

            let expected = if pick_up { Direction::Up } else { Direction::Down };
            prop_assert_eq!(normalize_direction(&raw).unwrap(), expected);
        }

        #[test]
        fn other_words_are_rejected(raw in "[a-z]{1,10}") {
            prop_assume!(raw != "up" && raw != "down");
            let is_invalid = matches!(
                normalize_direction(&raw),
                Err(DomainError::InvalidDirection(ref r)) if *r == raw
            );
            prop_assert!(is_invalid);
        }
    }
}

// ============================================================================
// Validation Property Tests
// ============================================================================

mod validation_tests {
    use super::*;

    fn distinct_stops() -> impl Strategy<Value = Vec<String>> {
        prop::collection::hash_set("[a-z]{3,10}", 2..12)
            .prop_map(|set| set.into_iter().collect())
    }

    proptest! {
        #[test]
        fn distinct_stops_validate_in_order(stops in distinct_stops()) {
            let payload = RawRoutePayload::new("20", "UP", stops.clone());
            let route = payload.validate().unwrap();
            let names: Vec<String> = route.stops.iter().map(ToString::to_string).collect();
            prop_assert_eq!(names, stops);
        }

        #[test]
        fn repeating_any_stop_is_rejected(stops in distinct_stops(), pick in any::<prop::sample::Index>()) {
            let mut with_dup = stops.clone();
            with_dup.push(stops[pick.index(stops.len())].clone());
            let payload = RawRoutePayload::new("20", "DOWN", with_dup);
            let is_duplicate = matches!(
                payload.validate(),
                Err(DomainError::DuplicateStopInRoute { .. })
            );
            prop_assert!(is_duplicate);
        }

        #[test]
        fn fewer_than_two_stops_is_insufficient(stop in "[a-z]{1,10}") {
            let payload = RawRoutePayload::new("20", "UP", vec![stop]);
            let is_insufficient = matches!(
                payload.validate(),
                Err(DomainError::InsufficientStops { count: 1, .. })
            );
            prop_assert!(is_insufficient);
        }
    }
}
