//! Shape-preserving and broadcasting elementwise rules.

use smallvec::smallvec;

use tessel_shape::{Dim, Shape, algebra};

use crate::call::{Kwargs, Value};
use crate::error::Result;
use crate::rules::{ShapeRule, first_input};

/// Output logical shape = first input logical shape, unchanged.
///
/// Covers clone/detach-style ops, elementwise unary math, and the in-place
/// family (whose results alias the mutated input and therefore keep its
/// shape).
pub struct PassThrough;

impl ShapeRule for PassThrough {
    fn infer(&self, inputs: &[Shape], _args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        Ok(vec![first_input("pass-through", inputs)?.clone()])
    }
}

/// Elementwise binary broadcasting (add/sub/mul/div/pow).
///
/// Shapes align from the trailing dimension; each position takes the larger
/// extent, a missing dimension or an unwrapped scalar operand counts as
/// size 1. Uses the operands' own logical shapes rather than the flattened
/// input list, because either side may be a plain scalar.
pub struct Broadcast;

impl ShapeRule for Broadcast {
    fn infer(&self, _inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let lhs = operand_shape(args.first());
        let rhs = operand_shape(args.get(1));
        Ok(vec![algebra::broadcast_shapes(&lhs, &rhs)])
    }
}

fn operand_shape(arg: Option<&Value>) -> Shape {
    match arg.and_then(Value::as_tensor) {
        Some(tensor) => tensor.logical().clone(),
        None => smallvec![Dim::new(1)],
    }
}
