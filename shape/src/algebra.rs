//! Shape algebra helpers: common-affix stripping, broadcast resolution and
//! the greedy dimension grouping behind reshape inference.
//!
//! All routines compare dimensions by *size* only - the padded flag is
//! provenance, not identity - and treat unresolved dimensions as unequal to
//! everything.

use smallvec::SmallVec;

use crate::dim::{Dim, Shape};

/// Strip the longest common leading run from both shapes.
///
/// Equality is by concrete size; the loop stops at the first mismatch or at
/// the end of the shorter shape, so it never indexes out of range.
///
/// # Examples
///
/// ```rust
/// # use tessel_shape::{algebra::strip_common_prefix, dim::from_sizes};
/// let (a, b) = strip_common_prefix(&from_sizes(&[2, 3, 4]), &from_sizes(&[2, 3, 7, 8]));
/// assert_eq!(a, from_sizes(&[4]));
/// assert_eq!(b, from_sizes(&[7, 8]));
/// ```
pub fn strip_common_prefix(lhs: &Shape, rhs: &Shape) -> (Shape, Shape) {
    let mut idx = 0;
    while idx < lhs.len() && idx < rhs.len() {
        match (lhs[idx].size(), rhs[idx].size()) {
            (Some(a), Some(b)) if a == b => idx += 1,
            _ => break,
        }
    }

    (lhs[idx..].iter().copied().collect(), rhs[idx..].iter().copied().collect())
}

/// Strip the longest common trailing run from both shapes.
///
/// The mirror of [`strip_common_prefix`]: returns the leading remainders.
pub fn strip_common_suffix(lhs: &Shape, rhs: &Shape) -> (Shape, Shape) {
    let mut idx = 0;
    while idx < lhs.len() && idx < rhs.len() {
        let a = lhs[lhs.len() - idx - 1].size();
        let b = rhs[rhs.len() - idx - 1].size();
        match (a, b) {
            (Some(a), Some(b)) if a == b => idx += 1,
            _ => break,
        }
    }

    (lhs[..lhs.len() - idx].iter().copied().collect(), rhs[..rhs.len() - idx].iter().copied().collect())
}

/// Resolve the broadcast shape of two operands.
///
/// Shapes are aligned from the trailing dimension; a missing dimension counts
/// as size 1 and each result position takes the larger size. This is the
/// permissive max() resolution used by padded elementwise dispatch - the
/// kernel has already validated operand compatibility, so no mismatch error
/// is produced here. Padded flags OR per position; an unresolved operand
/// dimension makes the result position unresolved.
///
/// # Examples
///
/// ```rust
/// # use tessel_shape::{algebra::broadcast_shapes, dim::from_sizes};
/// let out = broadcast_shapes(&from_sizes(&[3, 1]), &from_sizes(&[1, 4]));
/// assert_eq!(out, from_sizes(&[3, 4]));
///
/// let out = broadcast_shapes(&from_sizes(&[5]), &from_sizes(&[3, 5]));
/// assert_eq!(out, from_sizes(&[3, 5]));
/// ```
pub fn broadcast_shapes(lhs: &Shape, rhs: &Shape) -> Shape {
    let rank = lhs.len().max(rhs.len());
    let mut result: Shape = SmallVec::with_capacity(rank);

    for idx in 0..rank {
        let l = (idx < lhs.len()).then(|| lhs[lhs.len() - idx - 1]).unwrap_or(Dim::new(1));
        let r = (idx < rhs.len()).then(|| rhs[rhs.len() - idx - 1]).unwrap_or(Dim::new(1));

        let dim = match (l, r) {
            (Dim::Resolved { size: a, padded: pa }, Dim::Resolved { size: b, padded: pb }) => {
                Dim::with_padding(a.max(b), pa || pb)
            }
            _ => Dim::Unresolved,
        };
        result.push(dim);
    }

    result.reverse();
    result
}

/// Grouping of input dimensions per output dimension for a collapsing
/// reshape. Two indices inline: collapse groups are almost always pairs.
pub type Groups = Vec<SmallVec<[usize; 2]>>;

/// Compute which input dimensions each output dimension of a collapsing
/// reshape consumes.
///
/// Standard reshape factorization: walk the output shape and greedily consume
/// input dimensions while their running product divides into the target
/// output dimension. E.g. `[32, 32, 32] -> [1024, 32]` groups as
/// `[[0, 1], [2]]`.
///
/// The caller replays the grouping against a *different* (logical) shape with
/// [`apply_groups`]; that is the whole point - the grouping is computed on
/// physical extents but reused on logical ones.
pub fn collapse_groups(physical_in: &[usize], physical_out: &[usize]) -> Groups {
    let mut groups = Groups::with_capacity(physical_out.len());
    let mut input_index = 0;

    for &out_dim in physical_out {
        let mut group = SmallVec::new();
        let mut remaining = out_dim;

        while input_index < physical_in.len() && remaining >= physical_in[input_index] {
            let in_dim = physical_in[input_index];
            if in_dim != 0 && remaining % in_dim != 0 {
                break;
            }
            group.push(input_index);
            if in_dim != 0 {
                remaining /= in_dim;
            }
            input_index += 1;
            if remaining == 1 {
                break;
            }
        }
        groups.push(group);
    }

    groups
}

/// Replay a collapse grouping against a logical shape.
///
/// Each output dimension is the product of the grouped logical dimensions
/// (so padded flags propagate through the multiplication). An empty group
/// yields 1, matching a size-1 output dimension that consumed no input.
pub fn apply_groups(logical: &Shape, groups: &Groups) -> Shape {
    groups
        .iter()
        .map(|group| group.iter().fold(Dim::new(1), |acc, &idx| acc * logical[idx]))
        .collect()
}
