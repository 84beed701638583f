//! Property-based tests for the pipeline's pure invariants.
//!
//! Randomly generated inputs verify the composition laws, the single-pass
//! transduction fusion, the persistence encoding, and the queue retention
//! policy.

use checkpost_core::{
    compose,
    fp::{self, list_combine},
    Record,
};
use checkpost_submit::{surviving_records, RecordOutcome};
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}"
}

proptest! {
    /// compose! applies right to left for any affine functions and input.
    #[test]
    fn compose_is_right_to_left(x in any::<i32>(), a in -100i32..100, b in -100i32..100) {
        let scale = move |v: i32| v.wrapping_mul(a);
        let shift = move |v: i32| v.wrapping_add(b);

        let pipeline = compose!(scale, shift);
        prop_assert_eq!(pipeline(x), scale(shift(x)));

        let pipeline = compose!(shift, scale);
        prop_assert_eq!(pipeline(x), shift(scale(x)));
    }

    /// Zero-function composition is the identity for any input.
    #[test]
    fn empty_composition_is_identity(x in any::<i64>()) {
        let id = compose!();
        prop_assert_eq!(id(x), x);
    }

    /// Currying one argument at a time equals the direct call.
    #[test]
    fn curry3_equals_direct_application(a in any::<i32>(), b in any::<i32>(), c in any::<i32>()) {
        let combine = |a: i32, b: i32, c: i32| {
            a.wrapping_mul(31).wrapping_add(b).wrapping_mul(31).wrapping_add(c)
        };
        prop_assert_eq!(fp::curry3(combine)(a)(b)(c), combine(a, b, c));
    }

    /// Fused transduction equals the two-pass filter-then-map pipeline and
    /// preserves element order.
    #[test]
    fn transduction_fuses_filter_and_map(values in prop::collection::vec(any::<i32>(), 0..64)) {
        let fused = fp::transduce(
            |combine| {
                fp::transduce_filter(
                    |v: &i32| v % 2 == 0,
                    fp::transduce_map(|v: i32| v.wrapping_mul(3), combine),
                )
            },
            list_combine,
            Vec::new(),
            values.clone(),
        );

        let two_pass: Vec<i32> =
            values.into_iter().filter(|v| v % 2 == 0).map(|v| v.wrapping_mul(3)).collect();

        prop_assert_eq!(fused, two_pass);
    }

    /// The persistence encoding round-trips any pending list.
    #[test]
    fn queue_encoding_round_trips(
        entries in prop::collection::vec((name_strategy(), proptest::option::of(name_strategy())), 0..16)
    ) {
        let records: Vec<Record> = entries
            .into_iter()
            .map(|(name, id)| match id {
                Some(id) => Record::with_id(name, id),
                None => Record::new(name),
            })
            .collect();

        let bytes = serde_json::to_vec(&records).expect("pending list encodes");
        let decoded: Vec<Record> = serde_json::from_slice(&bytes).expect("pending list decodes");
        prop_assert_eq!(decoded, records);
    }

    /// Retention keeps exactly the undelivered records, in order.
    #[test]
    fn retention_policy_matches_naive_filter(
        outcomes in prop::collection::vec((name_strategy(), any::<bool>()), 0..32)
    ) {
        let outcomes: Vec<RecordOutcome> = outcomes
            .into_iter()
            .map(|(name, delivered)| RecordOutcome { record: Record::new(name), delivered })
            .collect();

        let expected: Vec<String> = outcomes
            .iter()
            .filter(|o| !o.delivered)
            .map(|o| o.record.name.clone())
            .collect();

        let survivors: Vec<String> =
            surviving_records(outcomes).into_iter().map(|r| r.name).collect();

        prop_assert_eq!(survivors, expected);
    }

    /// Scan parsing recovers the name and id it was handed.
    #[test]
    fn scan_parsing_recovers_fields(name in name_strategy(), id in name_strategy()) {
        let record = checkpost_submit::record_from_scan(&format!("name={name}&id={id}"))
            .expect("payload parses");
        prop_assert_eq!(record.name, name);
        prop_assert_eq!(record.id, Some(id));
    }
}
