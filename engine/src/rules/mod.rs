//! Shape-inference rules.
//!
//! One rule per operation category predicts the logical output shape(s) of an
//! operation from the logical input shapes and the raw call arguments. The
//! [`RuleTable`] maps operation identifiers to rules; it is built once at
//! startup and never mutated afterwards - a lookup miss is a hard
//! [`UnsupportedOperation`](crate::Error::UnsupportedOperation), never a
//! silent fallback.

use std::collections::HashMap;

use snafu::ensure;

use tessel_shape::Shape;

use crate::call::{Kwargs, Value};
use crate::error::{ArityMismatchSnafu, AxisOutOfRangeSnafu, MalformedArgumentSnafu, Result, UnsupportedOperationSnafu};
use crate::op::OpId;

mod elementwise;
mod matmul;
mod movement;
mod nn;
mod reduce;
mod view;

pub use elementwise::{Broadcast, PassThrough};
pub use matmul::{Matmul, MatmulKind};
pub use movement::{Expand, Select, SliceNarrow, SplitWithSizes, Stack, Transpose, TransposeSelf, Unsqueeze};
pub use nn::{Attention, Embedding, Index, Linear};
pub use reduce::Reduce;
pub use view::View;

/// Predicts logical output shapes for one operation category.
///
/// `inputs` are the logical shapes of all wrapped operands in argument order
/// (nested lists flattened); `args`/`kwargs` are the raw call arguments with
/// wrapped operands still in place, for rules that need a specific operand's
/// logical or physical shape.
pub trait ShapeRule {
    fn infer(&self, inputs: &[Shape], args: &[Value], kwargs: &Kwargs) -> Result<Vec<Shape>>;
}

/// Immutable operation-to-rule mapping.
pub struct RuleTable {
    rules: HashMap<OpId, Box<dyn ShapeRule>>,
}

impl RuleTable {
    /// Empty table; use [`RuleTable::with_defaults`] for the full catalog.
    pub fn new() -> Self {
        Self { rules: HashMap::new() }
    }

    /// Table covering the whole built-in kernel catalog.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();

        for op in [
            OpId::Clone,
            OpId::Detach,
            OpId::OnesLike,
            OpId::Polar,
            OpId::Where,
            OpId::Tril,
            OpId::Sin,
            OpId::Rsqrt,
            OpId::Silu,
            OpId::Unbind,
            OpId::ToCopy,
            OpId::CopyInPlace,
            OpId::IndexPutInPlace,
        ] {
            table.register(op, PassThrough);
        }

        for op in [OpId::Add, OpId::Sub, OpId::Mul, OpId::Div, OpId::Pow] {
            table.register(op, Broadcast);
        }

        table.register(OpId::Sum, Reduce);
        table.register(OpId::Mean, Reduce);
        table.register(OpId::Slice, SliceNarrow);

        table.register(OpId::Unsqueeze, Unsqueeze);
        table.register(OpId::Transpose, Transpose);
        table.register(OpId::T, TransposeSelf);
        table.register(OpId::Expand, Expand);
        table.register(OpId::Select, Select);
        table.register(OpId::SplitWithSizes, SplitWithSizes);
        table.register(OpId::Stack, Stack);

        table.register(OpId::View, View);
        table.register(OpId::UnsafeView, View);
        table.register(OpId::ViewAsReal, View);

        table.register(OpId::Mm, Matmul { kind: MatmulKind::Mm });
        table.register(OpId::Addmm, Matmul { kind: MatmulKind::Addmm });
        table.register(OpId::Bmm, Matmul { kind: MatmulKind::Bmm });

        table.register(OpId::FlashAttention, Attention);
        table.register(OpId::EfficientAttention, Attention);

        table.register(OpId::Index, Index);
        table.register(OpId::Embedding, Embedding);
        table.register(OpId::Linear, Linear);

        table
    }

    /// Add or overwrite one entry. Intended for initialization only; the
    /// table is read-only once dispatch starts.
    pub fn register(&mut self, op: OpId, rule: impl ShapeRule + 'static) {
        self.rules.insert(op, Box::new(rule));
    }

    /// Resolve the rule for an operation.
    ///
    /// # Errors
    ///
    /// [`UnsupportedOperation`](crate::Error::UnsupportedOperation) on a
    /// lookup miss.
    pub fn get(&self, op: OpId) -> Result<&dyn ShapeRule> {
        self.rules.get(&op).map(|r| r.as_ref()).ok_or_else(|| UnsupportedOperationSnafu { op: op.name() }.build())
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// =========================================================================
// Shared Helpers
// =========================================================================

/// Resolve a possibly negative axis against a rank.
///
/// `slots` is the number of valid positions: `ndim` for ops addressing an
/// existing dimension, `ndim + 1` for ops inserting one (unsqueeze, stack).
pub(crate) fn normalize_axis(axis: i64, slots: usize) -> Result<usize> {
    let resolved = if axis < 0 { axis + slots as i64 } else { axis };
    ensure!(resolved >= 0 && (resolved as usize) < slots, AxisOutOfRangeSnafu { axis, ndim: slots });
    Ok(resolved as usize)
}

/// First logical input shape; the common precondition of single-input rules.
pub(crate) fn first_input<'a>(op: &'static str, inputs: &'a [Shape]) -> Result<&'a Shape> {
    inputs.first().ok_or_else(|| ArityMismatchSnafu { op, expected: 1usize, got: 0usize }.build())
}

/// Wrapped tensor operand at a position; malformed-argument error otherwise.
pub(crate) fn tensor_arg<'a>(op: &'static str, args: &'a [Value], idx: usize) -> Result<&'a crate::PaddedValue> {
    args.get(idx)
        .and_then(Value::as_tensor)
        .ok_or_else(|| MalformedArgumentSnafu { op, reason: format!("expected tensor at position {idx}") }.build())
}

pub(crate) fn int_arg(op: &'static str, args: &[Value], idx: usize) -> Result<i64> {
    args.get(idx)
        .and_then(Value::as_int)
        .ok_or_else(|| MalformedArgumentSnafu { op, reason: format!("expected integer at position {idx}") }.build())
}

pub(crate) fn int_list_arg<'a>(op: &'static str, args: &'a [Value], idx: usize) -> Result<&'a [i64]> {
    args.get(idx)
        .and_then(Value::as_int_list)
        .ok_or_else(|| MalformedArgumentSnafu { op, reason: format!("expected size list at position {idx}") }.build())
}
