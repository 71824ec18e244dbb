use crate::Error;
use crate::test::helpers::{assert_values, seq_buffer};

#[test]
fn test_padding_appends_neutral_fill() {
    let buffer = seq_buffer(&[2, 3]);
    let padded = buffer.apply_padding(&[(0, 1), (0, 1)], -1.0).unwrap();

    assert_eq!(padded.sizes().as_slice(), &[3, 4]);
    assert_values(&padded, &[0.0, 1.0, 2.0, -1.0, 3.0, 4.0, 5.0, -1.0, -1.0, -1.0, -1.0, -1.0]);
}

#[test]
fn test_zero_width_padding_keeps_storage() {
    let buffer = seq_buffer(&[2, 3]);
    let padded = buffer.apply_padding(&[(0, 0), (0, 0)], 0.0).unwrap();
    assert!(buffer.ptr_eq(&padded));
}

#[test]
fn test_padding_rejects_rank_mismatch() {
    let buffer = seq_buffer(&[2, 3]);
    let err = buffer.apply_padding(&[(0, 1)], 0.0).unwrap_err();
    assert!(matches!(err, Error::RankMismatch { expected: 2, got: 1 }));
}

#[test]
fn test_slice_truncates_high_end() {
    let buffer = seq_buffer(&[3, 4]);
    let sliced = buffer.slice_to(&[2, 2]).unwrap();

    assert_eq!(sliced.sizes().as_slice(), &[2, 2]);
    assert_values(&sliced, &[0.0, 1.0, 4.0, 5.0]);
}

#[test]
fn test_full_slice_keeps_storage() {
    let buffer = seq_buffer(&[3, 4]);
    let sliced = buffer.slice_to(&[3, 4]).unwrap();
    assert!(buffer.ptr_eq(&sliced));
}

#[test]
fn test_slice_rejects_oversized_range() {
    let buffer = seq_buffer(&[3, 4]);
    let err = buffer.slice_to(&[3, 5]).unwrap_err();
    assert!(matches!(err, Error::InvalidSliceRange { dim: 1, end: 5, extent: 4 }));
}

#[test]
fn test_slice_rejects_empty_dimension() {
    let buffer = seq_buffer(&[3, 4]);
    let err = buffer.slice_to(&[0, 4]).unwrap_err();
    assert!(matches!(err, Error::InvalidSliceRange { dim: 0, end: 0, .. }));
}

#[test]
fn test_pad_then_slice_recovers_original() {
    let buffer = seq_buffer(&[3, 2]);
    let padded = buffer.apply_padding(&[(0, 5), (0, 2)], 0.0).unwrap();
    let recovered = padded.slice_to(&[3, 2]).unwrap();

    assert_eq!(recovered.sizes().as_slice(), &[3, 2]);
    assert_values(&recovered, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn test_clones_alias_assignment() {
    let buffer = seq_buffer(&[2]);
    let alias = buffer.clone();
    alias.assign(ndarray::ArrayD::from_elem(ndarray::IxDyn(&[2]), 9.0));

    assert!(buffer.ptr_eq(&alias));
    assert_values(&buffer, &[9.0, 9.0]);
}
