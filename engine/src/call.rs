//! Dispatch argument model.
//!
//! Intercepted calls arrive as a positional argument list mixing wrapped
//! tensors, raw buffers and plain scalars, with nested lists (stack operands,
//! index tuples). [`Value`] models that tree; the helpers here are the
//! flatten/map traversals the dispatch loop runs over it.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use tessel_shape::Shape;

use crate::buffer::Buffer;
use crate::value::PaddedValue;

/// One positional (or keyword) argument of an intercepted call.
#[derive(Debug, Clone)]
pub enum Value {
    /// Wrapped tensor with tracked logical shape.
    Tensor(PaddedValue),

    /// Raw tensor operand not yet wrapped; normalized to a multiplier-1
    /// [`Value::Tensor`] at dispatch entry.
    Raw(Buffer),

    Int(i64),
    Float(f64),
    Bool(bool),
    IntList(Vec<i64>),
    List(Vec<Value>),
    None,
}

/// Keyword arguments. Rarely consulted by rules, carried for signature
/// fidelity with the host's dispatch protocol.
pub type Kwargs = BTreeMap<&'static str, Value>;

impl Value {
    pub fn as_tensor(&self) -> Option<&PaddedValue> {
        match self {
            Value::Tensor(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            Value::IntList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

/// Wrap every raw buffer as a multiplier-1 padded value (dispatch step 1),
/// so each participant has a well-defined logical shape.
pub fn promote_raw(args: &[Value]) -> Vec<Value> {
    args.iter()
        .map(|arg| match arg {
            Value::Raw(buffer) => Value::Tensor(PaddedValue::from_buffer(buffer.clone())),
            Value::List(items) => Value::List(promote_raw(items)),
            other => other.clone(),
        })
        .collect()
}

/// Collect the logical shapes of all wrapped operands in argument order,
/// descending into nested lists.
pub fn logical_shapes(args: &[Value]) -> Vec<Shape> {
    let mut shapes = Vec::new();
    collect_logical(args, &mut shapes);
    shapes
}

fn collect_logical(args: &[Value], out: &mut Vec<Shape>) {
    for arg in args {
        match arg {
            Value::Tensor(v) => out.push(v.logical().clone()),
            Value::List(items) => collect_logical(items, out),
            _ => {}
        }
    }
}

/// Substitute every wrapped tensor with its physical buffer, preserving the
/// argument structure (dispatch step 4).
pub fn to_physical(args: &[Value]) -> Vec<Value> {
    args.iter()
        .map(|arg| match arg {
            Value::Tensor(v) => Value::Raw(v.unwrap()),
            Value::List(items) => Value::List(to_physical(items)),
            other => other.clone(),
        })
        .collect()
}

/// Physical extents of all tensor-like operands, for trace records.
pub fn physical_sizes(args: &[Value]) -> Vec<SmallVec<[usize; 4]>> {
    let mut sizes = Vec::new();
    collect_physical(args, &mut sizes);
    sizes
}

fn collect_physical(args: &[Value], out: &mut Vec<SmallVec<[usize; 4]>>) {
    for arg in args {
        match arg {
            Value::Tensor(v) => out.push(v.physical_sizes()),
            Value::Raw(b) => out.push(b.sizes()),
            Value::List(items) => collect_physical(items, out),
            _ => {}
        }
    }
}
