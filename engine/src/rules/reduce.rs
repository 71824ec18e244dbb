//! Axis-reducing rules (sum, mean).
//!
//! The padded original treated reductions as shape-preserving, which is only
//! right for the keepdim-over-nothing corner. Here they get real semantics:
//! no axis argument reduces everything to a scalar; an axis list removes (or
//! with keepdim collapses to 1) exactly the named dimensions.

use tessel_shape::{Dim, Shape};

use crate::call::{Kwargs, Value};
use crate::error::Result;
use crate::rules::{ShapeRule, first_input, normalize_axis};

pub struct Reduce;

impl ShapeRule for Reduce {
    fn infer(&self, inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let input = first_input("reduce", inputs)?;

        let axes = match args.get(1) {
            Some(Value::IntList(axes)) => axes.clone(),
            Some(Value::Int(axis)) => vec![*axis],
            _ => {
                // Full reduction to a scalar
                return Ok(vec![Shape::new()]);
            }
        };
        let keepdim = args.get(2).and_then(Value::as_bool).unwrap_or(false);

        let mut reduced = vec![false; input.len()];
        for &axis in &axes {
            reduced[normalize_axis(axis, input.len())?] = true;
        }

        let out: Shape = input
            .iter()
            .zip(&reduced)
            .filter_map(|(&d, &r)| match (r, keepdim) {
                (false, _) => Some(d),
                (true, true) => Some(Dim::new(1)),
                (true, false) => None,
            })
            .collect();

        Ok(vec![out])
    }
}
