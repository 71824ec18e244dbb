use tessel_shape::dim;

use crate::test::helpers::{assert_dims, assert_values, seq_buffer, seq_value};
use crate::{Error, PaddedValue};

#[test]
fn test_wrap_pads_to_multiplier() {
    let value = seq_value(&[5, 3], &[8, 1]);

    assert_eq!(value.physical_sizes().as_slice(), &[8, 3]);
    assert_dims(value.logical(), &[5, 3]);
    assert!(value.logical()[0].is_padded());
    assert!(!value.logical()[1].is_padded());
}

#[test]
fn test_wrap_holds_padding_invariant() {
    for (sizes, multipliers) in [(&[5usize, 3][..], &[8usize, 1][..]), (&[16, 16], &[8, 8]), (&[1], &[7])] {
        let value = seq_value(sizes, multipliers);
        for ((&physical, &logical), &m) in
            value.physical_sizes().iter().zip(sizes).zip(multipliers)
        {
            assert_eq!(physical % m, 0);
            assert!(physical >= logical);
            assert!(physical < logical + m);
        }
    }
}

#[test]
fn test_aligned_extents_skip_padding() {
    let buffer = seq_buffer(&[8, 4]);
    let value = PaddedValue::wrap().buffer(buffer.clone()).multipliers(vec![4, 4]).call().unwrap();

    // Nothing to pad, so the wrapped buffer is the original storage
    assert!(value.unwrap().ptr_eq(&buffer));
    assert!(value.logical()[0].is_padded());
}

#[test]
fn test_neutral_fills_the_padding() {
    let value = PaddedValue::wrap()
        .buffer(seq_buffer(&[2]))
        .multipliers(vec![4])
        .neutral(f32::NEG_INFINITY)
        .call()
        .unwrap();

    assert_values(&value.unwrap(), &[0.0, 1.0, f32::NEG_INFINITY, f32::NEG_INFINITY]);
}

#[test]
fn test_materialize_recovers_original_values() {
    let value = seq_value(&[3, 5], &[2, 8]);
    assert_eq!(value.physical_sizes().as_slice(), &[4, 8]);

    let recovered = value.materialize().unwrap();
    assert_eq!(recovered.sizes().as_slice(), &[3, 5]);
    let expected: Vec<f32> = (0..15).map(|v| v as f32).collect();
    assert_values(&recovered, &expected);
}

#[test]
fn test_unit_multipliers_materialize_in_place() {
    let buffer = seq_buffer(&[3, 5]);
    let value = PaddedValue::wrap().buffer(buffer.clone()).multipliers(vec![1, 1]).call().unwrap();

    assert!(value.materialize().unwrap().ptr_eq(&buffer));
    assert!(value.logical().iter().all(|d| !d.is_padded()));
}

#[test]
fn test_unresolved_shape_cannot_materialize() {
    let value = PaddedValue::from_inferred(seq_buffer(&[6]), dim::unresolved(2));
    let err = value.materialize().unwrap_err();
    assert!(matches!(err, Error::UnresolvedShape));
}

#[test]
fn test_from_buffer_has_no_padding() {
    let value = PaddedValue::from_buffer(seq_buffer(&[2, 6]));
    assert_dims(value.logical(), &[2, 6]);
    assert_eq!(value.multipliers(), &[1, 1]);
    assert!(value.logical().iter().all(|d| !d.is_padded()));
}

#[test]
fn test_zero_multiplier_is_rejected() {
    let result = PaddedValue::wrap().buffer(seq_buffer(&[4])).multipliers(vec![0]).call();
    assert!(matches!(result.unwrap_err(), Error::Algebra { .. }));
}
