use crate::rules::{ShapeRule, View};
use crate::test::helpers::{assert_dims, seq_value};
use crate::{Error, Kwargs, PaddedValue, Value};

fn infer(value: &PaddedValue, requested: Vec<i64>) -> crate::Result<Vec<tessel_shape::Shape>> {
    let inputs = vec![value.logical().clone()];
    let args = vec![Value::Tensor(value.clone()), Value::IntList(requested)];
    View.infer(&inputs, &args, &Kwargs::new())
}

#[test]
fn test_equal_rank_takes_requested_verbatim() {
    let value = seq_value(&[2, 6], &[1, 1]);
    let out = infer(&value, vec![3, 4]).unwrap();
    assert_dims(&out[0], &[3, 4]);
}

#[test]
fn test_equal_rank_resolves_wildcard() {
    let value = seq_value(&[6], &[1]);
    let out = infer(&value, vec![-1]).unwrap();
    assert_dims(&out[0], &[6]);
}

#[test]
fn test_collapse_replays_grouping_on_logical_dims() {
    // Physical and logical agree; the grouping is [0][1, 2]
    let value = seq_value(&[2, 3, 4], &[1, 1, 1]);
    let out = infer(&value, vec![2, 12]).unwrap();
    assert_dims(&out[0], &[2, 12]);
}

#[test]
fn test_collapse_keeps_logical_extents_under_padding() {
    // Logical [3, 4] padded to [4, 4]; flattening the physical 16 must
    // report the logical 12
    let value = seq_value(&[3, 4], &[2, 1]);
    assert_eq!(value.physical_sizes().as_slice(), &[4, 4]);

    let out = infer(&value, vec![16]).unwrap();
    assert_dims(&out[0], &[12]);
    assert!(out[0][0].is_padded());
}

#[test]
fn test_collapse_of_aligned_padded_dims() {
    let value = seq_value(&[16, 16, 16], &[2, 1, 1]);
    assert_eq!(value.physical_sizes().as_slice(), &[16, 16, 16]);

    let out = infer(&value, vec![256, 16]).unwrap();
    assert_dims(&out[0], &[256, 16]);
}

#[test]
fn test_expanding_grafts_onto_shared_prefix() {
    let value = seq_value(&[2, 12], &[1, 1]);
    let out = infer(&value, vec![2, 3, 4]).unwrap();
    assert_dims(&out[0], &[2, 3, 4]);
}

#[test]
fn test_expanding_resolves_wildcard_against_logical_count() {
    let value = seq_value(&[2, 12], &[1, 1]);
    let out = infer(&value, vec![2, -1, 4]).unwrap();
    assert_dims(&out[0], &[2, 3, 4]);
}

#[test]
fn test_expanding_falls_back_to_unit_insertion() {
    // Physical [4, 5] vs logical [3, 5]: grafting would claim 4 rows, but
    // the 1-insertion reading preserves the element count
    let value = seq_value(&[3, 5], &[2, 1]);
    assert_eq!(value.physical_sizes().as_slice(), &[4, 5]);

    let out = infer(&value, vec![4, 1, 5]).unwrap();
    assert_dims(&out[0], &[3, 1, 5]);
    assert!(out[0][0].is_padded());
}

#[test]
fn test_irreconcilable_expansion_degrades_to_unresolved() {
    let value = seq_value(&[3, 3], &[2, 1]);
    assert_eq!(value.physical_sizes().as_slice(), &[4, 3]);

    let out = infer(&value, vec![2, 2, 3]).unwrap();
    assert_eq!(out[0].len(), 3);
    assert!(out[0].iter().all(|d| d.is_unresolved()));
}

#[test]
fn test_expansion_sharing_no_end_is_malformed() {
    let value = seq_value(&[4, 3], &[1, 1]);
    let err = infer(&value, vec![6, 2, 1]).unwrap_err();
    assert!(matches!(err, Error::MalformedArgument { op: "view", .. }));
}

#[test]
fn test_double_wildcard_is_malformed() {
    let value = seq_value(&[2, 6], &[1, 1]);
    let err = infer(&value, vec![-1, -1]).unwrap_err();
    assert!(matches!(err, Error::MalformedArgument { op: "view", .. }));
}
