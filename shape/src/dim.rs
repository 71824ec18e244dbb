//! Dimension value type with padding provenance.
//!
//! A logical dimension is either a concrete size (which remembers whether the
//! physical dimension behind it is padded) or explicitly unresolved. The
//! unresolved state replaces the magic sentinel value some systems use for
//! "shape inference gave up": a sum type cannot collide with a legitimate
//! size, and any shape carrying it refuses materialization downstream.

use smallvec::SmallVec;

/// One logical dimension.
///
/// Arithmetic on dimensions combines sizes numerically and ORs the padded
/// flags, so provenance survives derived quantities (e.g. the product of a
/// padded and an unpadded dimension is marked padded). `Unresolved` absorbs:
/// any operation touching it yields `Unresolved`.
///
/// # Examples
///
/// ```rust
/// # use tessel_shape::Dim;
/// let a = Dim::with_padding(16, true);
/// let b = Dim::new(3);
/// let c = a * b;
/// assert_eq!(c.size(), Some(48));
/// assert!(c.is_padded());
///
/// assert!((a * Dim::Unresolved).is_unresolved());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    /// Concrete size with padding provenance.
    Resolved { size: usize, padded: bool },

    /// Size could not be inferred; blocks materialization.
    Unresolved,
}

/// Shape type - ordered sequence of logical dimensions.
///
/// Uses SmallVec with inline capacity of 4 to avoid heap allocation for the
/// common tensor ranks (1D-4D).
pub type Shape = SmallVec<[Dim; 4]>;

impl Dim {
    /// Concrete, unpadded dimension.
    pub fn new(size: usize) -> Self {
        Dim::Resolved { size, padded: false }
    }

    /// Concrete dimension with an explicit padded flag.
    pub fn with_padding(size: usize, padded: bool) -> Self {
        Dim::Resolved { size, padded }
    }

    /// Concrete size, `None` when unresolved.
    pub fn size(&self) -> Option<usize> {
        match self {
            Dim::Resolved { size, .. } => Some(*size),
            Dim::Unresolved => None,
        }
    }

    /// Whether the physical dimension behind this one carries padding.
    ///
    /// Unresolved dimensions report `false`; they are rejected before the
    /// flag could matter.
    pub fn is_padded(&self) -> bool {
        matches!(self, Dim::Resolved { padded: true, .. })
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Dim::Unresolved)
    }

    fn combine(self, other: Dim, f: impl FnOnce(usize, usize) -> usize) -> Dim {
        match (self, other) {
            (Dim::Resolved { size: a, padded: pa }, Dim::Resolved { size: b, padded: pb }) => {
                Dim::Resolved { size: f(a, b), padded: pa || pb }
            }
            _ => Dim::Unresolved,
        }
    }
}

impl std::ops::Add for Dim {
    type Output = Dim;

    fn add(self, rhs: Dim) -> Dim {
        self.combine(rhs, |a, b| a + b)
    }
}

impl std::ops::Sub for Dim {
    type Output = Dim;

    fn sub(self, rhs: Dim) -> Dim {
        self.combine(rhs, |a, b| a - b)
    }
}

impl std::ops::Mul for Dim {
    type Output = Dim;

    fn mul(self, rhs: Dim) -> Dim {
        self.combine(rhs, |a, b| a * b)
    }
}

impl std::fmt::Display for Dim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dim::Resolved { size, padded: false } => write!(f, "{size}"),
            Dim::Resolved { size, padded: true } => write!(f, "{size}(P)"),
            Dim::Unresolved => write!(f, "?"),
        }
    }
}

// =========================================================================
// Shape Utilities
// =========================================================================

/// Build a shape of plain (unpadded, resolved) dimensions.
pub fn from_sizes(sizes: &[usize]) -> Shape {
    sizes.iter().map(|&s| Dim::new(s)).collect()
}

/// Shape with every dimension unresolved.
pub fn unresolved(rank: usize) -> Shape {
    std::iter::repeat_n(Dim::Unresolved, rank).collect()
}

/// Check that every dimension is resolved.
pub fn is_resolved(shape: &Shape) -> bool {
    shape.iter().all(|d| !d.is_unresolved())
}

/// Concrete sizes, `None` when any dimension is unresolved.
pub fn sizes(shape: &Shape) -> Option<SmallVec<[usize; 4]>> {
    shape.iter().map(Dim::size).collect()
}

/// Total element count, `None` when any dimension is unresolved.
pub fn numel(shape: &Shape) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, d| d.size().map(|s| acc * s))
}

/// Render a shape for diagnostics, e.g. `[8(P), 16, ?]`.
pub fn display(shape: &Shape) -> String {
    let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
    format!("[{}]", dims.join(", "))
}
