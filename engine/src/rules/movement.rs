//! Movement rules: dimension insertion/removal, axis swaps, explicit
//! expansion, narrowing slices, splits and stacking.

use snafu::ensure;

use tessel_shape::{Dim, Shape};

use crate::call::{Kwargs, Value};
use crate::error::{MalformedArgumentSnafu, Result};
use crate::rules::{ShapeRule, first_input, int_arg, int_list_arg, normalize_axis};

/// Insert a size-1 dimension at the (possibly negative) axis.
pub struct Unsqueeze;

impl ShapeRule for Unsqueeze {
    fn infer(&self, inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let input = first_input("unsqueeze", inputs)?;
        let axis = int_arg("unsqueeze", args, 1)?;
        let axis = normalize_axis(axis, input.len() + 1)?;

        let mut out = input.clone();
        out.insert(axis, Dim::new(1));
        Ok(vec![out])
    }
}

/// Swap the two named dimensions in place.
pub struct Transpose;

impl ShapeRule for Transpose {
    fn infer(&self, inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let input = first_input("transpose", inputs)?;
        let dim0 = normalize_axis(int_arg("transpose", args, 1)?, input.len())?;
        let dim1 = normalize_axis(int_arg("transpose", args, 2)?, input.len())?;

        let mut out = input.clone();
        out.swap(dim0, dim1);
        Ok(vec![out])
    }
}

/// The argument-less 2D transpose (`t`).
///
/// Identity below rank 2 and a swap of both dimensions at rank 2; the host
/// rejects higher ranks before dispatch, so anything else is malformed.
pub struct TransposeSelf;

impl ShapeRule for TransposeSelf {
    fn infer(&self, inputs: &[Shape], _args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let input = first_input("t", inputs)?;
        ensure!(
            input.len() <= 2,
            MalformedArgumentSnafu { op: "t", reason: format!("rank {} exceeds 2", input.len()) }
        );

        let mut out = input.clone();
        if out.len() == 2 {
            out.swap(0, 1);
        }
        Ok(vec![out])
    }
}

/// Output logical shape = the explicit target-shape argument, discarding any
/// derivation from the input. A `-1` entry keeps the input dimension at the
/// same trailing-aligned position.
pub struct Expand;

impl ShapeRule for Expand {
    fn infer(&self, inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let input = first_input("expand", inputs)?;
        let target = int_list_arg("expand", args, 1)?;

        let offset = target.len().saturating_sub(input.len());
        let out = target
            .iter()
            .enumerate()
            .map(|(idx, &size)| {
                if size == -1 {
                    input.get(idx.wrapping_sub(offset)).copied().ok_or_else(|| {
                        MalformedArgumentSnafu { op: "expand", reason: format!("-1 at new dimension {idx}") }.build()
                    })
                } else {
                    Ok(Dim::new(size as usize))
                }
            })
            .collect::<Result<Shape>>()?;

        Ok(vec![out])
    }
}

/// Remove the selected dimension.
pub struct Select;

impl ShapeRule for Select {
    fn infer(&self, inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let input = first_input("select", inputs)?;
        let axis = normalize_axis(int_arg("select", args, 1)?, input.len())?;

        let index = int_arg("select", args, 2)?;
        if index < 0 {
            // Negative indices need a resolved extent to validate against
            ensure!(
                input[axis].size().is_some(),
                MalformedArgumentSnafu { op: "select", reason: "negative index into unresolved dimension".to_string() }
            );
        }

        let mut out = input.clone();
        out.remove(axis);
        Ok(vec![out])
    }
}

/// Narrowing slice along one dimension (start always resolves within the
/// logical extent; the end clamps to it).
pub struct SliceNarrow;

impl ShapeRule for SliceNarrow {
    fn infer(&self, inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let input = first_input("slice", inputs)?;
        let axis = normalize_axis(args.get(1).and_then(Value::as_int).unwrap_or(0), input.len())?;

        let mut out = input.clone();
        let Some(extent) = input[axis].size() else {
            // Narrowing an unresolved dimension stays unresolved
            return Ok(vec![out]);
        };
        let extent = extent as i64;

        let start = args.get(2).and_then(Value::as_int).unwrap_or(0);
        let end = args.get(3).and_then(Value::as_int).unwrap_or(i64::MAX);
        let step = args.get(4).and_then(Value::as_int).unwrap_or(1);
        ensure!(step >= 1, MalformedArgumentSnafu { op: "slice", reason: format!("step {step} must be positive") });

        let start = (if start < 0 { start + extent } else { start }).clamp(0, extent);
        let end = (if end < 0 { end + extent } else { end }).clamp(0, extent).min(extent);

        let size = if end > start { ((end - start) as usize).div_ceil(step as usize) } else { 0 };
        out[axis] = Dim::with_padding(size, input[axis].is_padded());
        Ok(vec![out])
    }
}

/// One output shape per requested chunk, substituted into the split axis.
pub struct SplitWithSizes;

impl ShapeRule for SplitWithSizes {
    fn infer(&self, inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let input = first_input("split_with_sizes", inputs)?;
        let chunks = int_list_arg("split_with_sizes", args, 1)?;
        let axis = normalize_axis(args.get(2).and_then(Value::as_int).unwrap_or(0), input.len())?;

        Ok(chunks
            .iter()
            .map(|&chunk| {
                let mut out = input.clone();
                out[axis] = Dim::new(chunk as usize);
                out
            })
            .collect())
    }
}

/// First operand's shape with a new dimension of size `count(operands)`
/// inserted at the (possibly negative) axis.
pub struct Stack;

impl ShapeRule for Stack {
    fn infer(&self, inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let input = first_input("stack", inputs)?;
        let count = args
            .first()
            .and_then(Value::as_list)
            .map(<[Value]>::len)
            .ok_or_else(|| MalformedArgumentSnafu { op: "stack", reason: "expected operand list".to_string() }.build())?;
        let axis = normalize_axis(args.get(1).and_then(Value::as_int).unwrap_or(0), input.len() + 1)?;

        let mut out = input.clone();
        out.insert(axis, Dim::new(count));
        Ok(vec![out])
    }
}
