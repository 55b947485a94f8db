//! Property-based invariant tests for offer validation.
//!
//! 1. `parse` accepts exactly the offers whose types are a non-empty string
//!    list, whose actions are a non-empty int32 list, and which carry a
//!    non-empty string list of file types whenever the file sentinel is
//!    among the types.
//! 2. Accepted offers preserve type and action order verbatim.
//! 3. One diagnostic is recorded per sentinel that is not in last position.
//! 4. File types are kept iff the sentinel is offered.

use dropneg_core::offer::{FIELD_ACTIONS, FIELD_FILETYPES, FIELD_TYPES};
use dropneg_core::{DropAction, FILE_SENTINEL, FieldValue, OfferDiagnostic, OfferSpec, RawOffer};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn type_id() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("text/plain".to_string()),
        Just("text/html".to_string()),
        Just("image/png".to_string()),
        Just(FILE_SENTINEL.to_string()),
    ]
}

fn string_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(type_id(), 0..5)
}

/// A field that may be absent, string-typed, or int-typed.
fn field(strings: bool) -> impl Strategy<Value = Option<FieldValue>> {
    let ints = prop::collection::vec(any::<i32>(), 0..4).prop_map(FieldValue::Int32s);
    let strs = string_list().prop_map(FieldValue::Strings);
    let (right, wrong) = if strings {
        (strs.boxed(), ints.boxed())
    } else {
        (ints.boxed(), strs.boxed())
    };
    prop_oneof![
        1 => Just(None::<FieldValue>),
        5 => right.prop_map(Some),
        1 => wrong.prop_map(Some),
    ]
}

fn raw_offer() -> impl Strategy<Value = RawOffer> {
    (field(true), field(true), field(false)).prop_map(|(types, file_types, actions)| {
        let mut raw = RawOffer::new();
        for (name, value) in [
            (FIELD_TYPES, types),
            (FIELD_FILETYPES, file_types),
            (FIELD_ACTIONS, actions),
        ] {
            if let Some(value) = value {
                raw.insert(name, value);
            }
        }
        raw
    })
}

fn non_empty_strings(value: Option<&FieldValue>) -> Option<&Vec<String>> {
    match value {
        Some(FieldValue::Strings(v)) if !v.is_empty() => Some(v),
        _ => None,
    }
}

fn non_empty_ints(value: Option<&FieldValue>) -> Option<&Vec<i32>> {
    match value {
        Some(FieldValue::Int32s(v)) if !v.is_empty() => Some(v),
        _ => None,
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Acceptance matches the validity conditions
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn accepts_exactly_valid_offers(raw in raw_offer()) {
        let types = non_empty_strings(raw.get(FIELD_TYPES));
        let has_sentinel = types.is_some_and(|t| t.iter().any(|t| t == FILE_SENTINEL));
        let file_ok = !has_sentinel || non_empty_strings(raw.get(FIELD_FILETYPES)).is_some();
        let actions = non_empty_ints(raw.get(FIELD_ACTIONS));
        let valid = types.is_some() && file_ok && actions.is_some();

        let parsed = OfferSpec::parse(&raw);
        prop_assert_eq!(parsed.is_ok(), valid, "raw={:?} parsed={:?}", raw, parsed);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2–4. Accepted offers are faithful
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn accepted_offers_preserve_order_and_diagnose_sentinels(
        types in prop::collection::vec(type_id(), 1..6),
        file_types in prop::collection::vec(type_id(), 1..4),
        actions in prop::collection::vec(any::<i32>(), 1..4),
    ) {
        let raw = RawOffer::new()
            .with_types(types.clone())
            .with_file_types(file_types.clone())
            .with_actions(actions.iter().copied().map(DropAction));
        let spec = OfferSpec::parse(&raw).unwrap();

        prop_assert_eq!(spec.types(), types.as_slice());
        let codes: Vec<i32> = spec.actions().iter().map(|a| a.code()).collect();
        prop_assert_eq!(codes, actions);

        let misplaced: Vec<usize> = types
            .iter()
            .enumerate()
            .filter(|(i, t)| t.as_str() == FILE_SENTINEL && *i != types.len() - 1)
            .map(|(i, _)| i)
            .collect();
        let diagnosed: Vec<usize> = spec
            .diagnostics()
            .iter()
            .filter_map(|d| match d {
                OfferDiagnostic::FileSentinelNotLast { index } => Some(*index),
                _ => None,
            })
            .collect();
        prop_assert_eq!(diagnosed, misplaced);

        let has_sentinel = types.iter().any(|t| t == FILE_SENTINEL);
        if has_sentinel {
            prop_assert_eq!(spec.file_types(), file_types.as_slice());
        } else {
            prop_assert!(spec.file_types().is_empty());
        }
        prop_assert!(spec.direct_types().all(|(id, _)| id != FILE_SENTINEL));
    }
}
