//! Padded-buffer dispatch engine.
//!
//! Tensor computation runs on hardware-aligned ("padded") buffers while user
//! code keeps observing the original ("logical") extents. This crate wraps
//! physical buffers in [`PaddedValue`]s, predicts the logical output shape of
//! every operation through an immutable rule table, and lets the host's real
//! numeric kernels run untouched on the padded data.
//!
//! # Module Organization
//!
//! - [`buffer`] - physical buffer handle with pad/slice mechanics
//! - [`value`] - the [`PaddedValue`] wrapper (buffer + logical shape +
//!   multipliers + neutral fill)
//! - [`op`] - stable operation identifiers matching the kernel catalog
//! - [`call`] - the dispatch argument model and tree traversal helpers
//! - [`rules`] - shape-inference rules and the [`rules::RuleTable`]
//! - [`dispatch`] - the per-operation control loop and the [`Kernels`]
//!   host boundary
//!
//! # Examples
//!
//! ```ignore
//! let engine = Engine::new(backend);
//! let x = PaddedValue::wrap().buffer(buf).multipliers(vec![8, 1]).call()?;
//! let out = engine.dispatch(OpId::Mm, &[Value::Tensor(x), Value::Tensor(w)], &Kwargs::new())?;
//! let result = out[0].as_tensor().unwrap().materialize()?;
//! ```

pub mod buffer;
pub mod call;
pub mod dispatch;
pub mod error;
pub mod op;
pub mod rules;
pub mod value;

pub use buffer::Buffer;
pub use call::{Kwargs, Value};
pub use dispatch::{Engine, Kernels};
pub use error::{Error, Result};
pub use op::OpId;
pub use value::PaddedValue;
