use snafu::Snafu;

use tessel_shape::Shape;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Operation identifier absent from the rule table. Always fatal to the
    /// call; callers extend the registry rather than fall back silently.
    #[snafu(display("operation '{op}' has no shape-inference rule"))]
    UnsupportedOperation { op: &'static str },

    /// Truncating slice asked for a range outside the physical extent.
    #[snafu(display("invalid slice range on dimension {dim}: 0..{end} for extent {extent}"))]
    InvalidSliceRange { dim: usize, end: usize, extent: usize },

    /// The logical shape carries unresolved dimensions (a view inference gave
    /// up); the value can flow through further ops but not materialize.
    #[snafu(display("logical shape contains unresolved dimensions; cannot materialize"))]
    UnresolvedShape,

    /// Matmul-family batch/inner dimension mismatch.
    #[snafu(display("incompatible contraction: {lhs:?} x {rhs:?}"))]
    IncompatibleContraction { lhs: Box<Shape>, rhs: Box<Shape> },

    #[snafu(display("axis {axis} is out of range for rank {ndim}"))]
    AxisOutOfRange { axis: i64, ndim: usize },

    #[snafu(display("rank mismatch: expected {expected} dimensions, got {got}"))]
    RankMismatch { expected: usize, got: usize },

    /// Wrong operand arity for a rule; a precondition, checked at entry.
    #[snafu(display("operation '{op}' expected {expected} tensor operands, got {got}"))]
    ArityMismatch { op: &'static str, expected: usize, got: usize },

    /// Argument structure the rule cannot interpret; a programmer error.
    #[snafu(display("malformed argument for '{op}': {reason}"))]
    MalformedArgument { op: &'static str, reason: String },

    /// Underlying kernel reported a failure; not recoverable by the engine.
    #[snafu(display("kernel '{op}' failed: {reason}"))]
    Kernel { op: &'static str, reason: String },

    #[snafu(display("shape algebra error"))]
    Algebra { source: tessel_shape::Error },
}
