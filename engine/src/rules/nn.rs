//! Rules for lookup and composed neural-net operations: attention, advanced
//! indexing, embedding and the functional linear composition.

use tessel_shape::{Shape, algebra, dim};

use crate::call::{Kwargs, Value};
use crate::error::{MalformedArgumentSnafu, Result};
use crate::rules::{ShapeRule, first_input, tensor_arg};

/// Scaled-dot-product attention (flash / efficient variants).
///
/// Primary output keeps the query's logical shape; the auxiliary output
/// (the log-sum-exp statistics) drops the trailing head dimension.
pub struct Attention;

impl ShapeRule for Attention {
    fn infer(&self, inputs: &[Shape], _args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let input = first_input("attention", inputs)?;
        let aux: Shape = input[..input.len().saturating_sub(1)].iter().copied().collect();
        Ok(vec![input.clone(), aux])
    }
}

/// Advanced indexing: each tensor-like index substitutes its own leading
/// logical dimension for the dimension it indexes; `None` leaves the
/// dimension untouched.
pub struct Index;

impl ShapeRule for Index {
    fn infer(&self, inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let input = first_input("index", inputs)?;
        let indices = args
            .get(1)
            .and_then(Value::as_list)
            .ok_or_else(|| MalformedArgumentSnafu { op: "index", reason: "expected index list".to_string() }.build())?;

        let mut out = input.clone();
        for (axis, index) in indices.iter().enumerate() {
            match index {
                Value::None => continue,
                Value::Tensor(t) => {
                    let lead = *t.logical().first().ok_or_else(|| {
                        MalformedArgumentSnafu { op: "index", reason: format!("0-d index at dimension {axis}") }.build()
                    })?;
                    if axis < out.len() {
                        out[axis] = lead;
                    }
                }
                other => {
                    return MalformedArgumentSnafu { op: "index", reason: format!("unsupported index {other:?}") }.fail();
                }
            }
        }

        Ok(vec![out])
    }
}

/// Embedding lookup: indices' logical shape concatenated with the table's
/// trailing dimensions (dimension 0 of the table excluded). The table itself
/// is never padded.
pub struct Embedding;

impl ShapeRule for Embedding {
    fn infer(&self, inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let table = first_input("embedding", inputs)?;
        let indices = tensor_arg("embedding", args, 1)?.logical();

        let out: Shape = indices.iter().chain(table.iter().skip(1)).copied().collect();
        Ok(vec![out])
    }
}

/// Functional linear composition.
///
/// Strips the common trailing suffix between the input's *logical* shape and
/// the weight's *physical* shape (the contraction extent they share), then
/// concatenates the stripped prefixes: batch dims from the input, output
/// features from the weight.
pub struct Linear;

impl ShapeRule for Linear {
    fn infer(&self, inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let input = first_input("linear", inputs)?;
        let weight = dim::from_sizes(&tensor_arg("linear", args, 1)?.physical_sizes());

        let (input_prefix, weight_prefix) = algebra::strip_common_suffix(input, &weight);
        let out: Shape = input_prefix.iter().chain(&weight_prefix).copied().collect();
        Ok(vec![out])
    }
}
