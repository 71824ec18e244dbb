//! The dispatch loop: one activation per intercepted operation.
//!
//! No state persists across activations; inference is a pure function of the
//! operands and the immutable rule table, so a dispatch repeated with
//! identical arguments is bit-identical (idempotent). Failures raise to the
//! caller immediately - shape inference is deterministic and a retry could
//! not change the outcome.

use tessel_shape::dim;

use crate::buffer::Buffer;
use crate::call::{self, Kwargs, Value};
use crate::error::Result;
use crate::op::OpId;
use crate::rules::RuleTable;
use crate::value::PaddedValue;

/// The host-runtime kernel boundary.
///
/// Implementations execute the real numeric operation on *physical* (still
/// padded) buffers and return the physical outputs in order. The engine
/// treats kernels as correct primitives; it never inspects buffer contents.
///
/// In-place operations must return the mutated input's own storage
/// (observable through [`Buffer::ptr_eq`]); the engine re-wraps whatever
/// storage comes back without copying, so aliasing survives dispatch.
pub trait Kernels {
    fn call(&self, op: OpId, args: &[Value], kwargs: &Kwargs) -> Result<Vec<Buffer>>;
}

/// Shape-inference dispatch engine.
///
/// Owns the immutable rule table and the kernel backend. Single-threaded,
/// synchronous: each [`Engine::dispatch`] runs to completion before
/// returning.
pub struct Engine<K> {
    rules: RuleTable,
    kernels: K,
}

impl<K: Kernels> Engine<K> {
    /// Engine with the default rule catalog.
    pub fn new(kernels: K) -> Self {
        Self { rules: RuleTable::with_defaults(), kernels }
    }

    /// Engine with a caller-extended rule table.
    pub fn with_rules(rules: RuleTable, kernels: K) -> Self {
        Self { rules, kernels }
    }

    /// Execute one intercepted operation.
    ///
    /// The six steps: normalize raw operands to multiplier-1 wrapped values;
    /// look up the rule (miss is fatal); infer logical output shapes; run
    /// the kernel on physical buffers with the argument structure preserved;
    /// wrap each physical output with its inferred shape; pass outputs
    /// beyond the inferred list through unwrapped.
    ///
    /// # Errors
    ///
    /// - [`UnsupportedOperation`](crate::Error::UnsupportedOperation) when
    ///   the registry has no rule for `op`
    /// - any rule or kernel failure, raised as-is
    pub fn dispatch(&self, op: OpId, args: &[Value], kwargs: &Kwargs) -> Result<Vec<Value>> {
        let rule = self.rules.get(op)?;

        let args = call::promote_raw(args);
        let input_shapes = call::logical_shapes(&args);
        let output_shapes = rule.infer(&input_shapes, &args, kwargs)?;

        let physical_args = call::to_physical(&args);
        let outputs = self.kernels.call(op, &physical_args, kwargs)?;

        tracing::debug!(
            op = %op,
            physical_in = ?call::physical_sizes(&args),
            physical_out = ?outputs.first().map(|b| b.sizes()),
            logical_in = %render(&input_shapes),
            logical_out = %render(&output_shapes),
            "dispatch"
        );

        Ok(outputs
            .into_iter()
            .enumerate()
            .map(|(idx, buffer)| match output_shapes.get(idx) {
                Some(shape) => Value::Tensor(PaddedValue::from_inferred(buffer, shape.clone())),
                None => Value::Raw(buffer),
            })
            .collect())
    }

    /// The rule table, for init-time extension before dispatch starts.
    pub fn rules_mut(&mut self) -> &mut RuleTable {
        &mut self.rules
    }
}

fn render(shapes: &[tessel_shape::Shape]) -> String {
    let parts: Vec<String> = shapes.iter().map(dim::display).collect();
    parts.join(" ")
}
