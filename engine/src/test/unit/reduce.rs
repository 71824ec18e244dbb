use crate::rules::{Reduce, ShapeRule};
use crate::test::helpers::{assert_dims, seq_value, tensor};
use crate::{Error, Kwargs, Value};

fn inputs(sizes: &[usize], multipliers: &[usize]) -> Vec<tessel_shape::Shape> {
    vec![seq_value(sizes, multipliers).logical().clone()]
}

#[test]
fn test_no_axes_reduce_to_scalar() {
    let out = Reduce.infer(&inputs(&[2, 3], &[1, 1]), &[tensor(&[2, 3], &[1, 1])], &Kwargs::new()).unwrap();
    assert!(out[0].is_empty());
}

#[test]
fn test_axis_list_removes_named_dims() {
    let args = vec![tensor(&[2, 3, 4], &[1, 1, 1]), Value::IntList(vec![0, 2])];
    let out = Reduce.infer(&inputs(&[2, 3, 4], &[1, 1, 1]), &args, &Kwargs::new()).unwrap();
    assert_dims(&out[0], &[3]);
}

#[test]
fn test_single_int_axis_is_accepted() {
    let args = vec![tensor(&[2, 3], &[1, 1]), Value::Int(-1)];
    let out = Reduce.infer(&inputs(&[2, 3], &[1, 1]), &args, &Kwargs::new()).unwrap();
    assert_dims(&out[0], &[2]);
}

#[test]
fn test_keepdim_collapses_to_unit() {
    let args = vec![tensor(&[2, 3], &[1, 1]), Value::IntList(vec![1]), Value::Bool(true)];
    let out = Reduce.infer(&inputs(&[2, 3], &[1, 1]), &args, &Kwargs::new()).unwrap();

    assert_dims(&out[0], &[2, 1]);
    assert!(!out[0][1].is_padded());
}

#[test]
fn test_surviving_dims_keep_padded_flags() {
    let args = vec![tensor(&[5, 3], &[8, 1]), Value::IntList(vec![1])];
    let out = Reduce.infer(&inputs(&[5, 3], &[8, 1]), &args, &Kwargs::new()).unwrap();

    assert_dims(&out[0], &[5]);
    assert!(out[0][0].is_padded());
}

#[test]
fn test_out_of_range_axis_is_rejected() {
    let args = vec![tensor(&[2, 3], &[1, 1]), Value::IntList(vec![3])];
    let err = Reduce.infer(&inputs(&[2, 3], &[1, 1]), &args, &Kwargs::new()).unwrap_err();
    assert!(matches!(err, Error::AxisOutOfRange { axis: 3, .. }));
}
