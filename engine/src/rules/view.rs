//! View/reshape inference.
//!
//! The hard case of the whole engine: the kernel reshapes *physical* extents,
//! and the rule must work out what the same reshape would have done to the
//! logical extents. Three regimes by rank change:
//!
//! - equal rank: the requested shape is the logical shape, verbatim
//! - collapsing: replay the physical collapse grouping against the logical
//!   shape
//! - expanding: strip the matching physical prefix or suffix and graft the
//!   remainder onto the logical shape, resolving a `-1` wildcard against the
//!   logical element count
//!
//! When the expanding case cannot reconcile element counts it degrades to an
//! all-unresolved shape instead of failing: the miss only matters if the
//! value is ever materialized, and that is where the error surfaces.

use smallvec::SmallVec;
use snafu::ensure;

use tessel_shape::{Dim, Shape, algebra, dim};

use crate::call::{Kwargs, Value};
use crate::error::{MalformedArgumentSnafu, Result};
use crate::rules::{ShapeRule, first_input, int_list_arg, tensor_arg};

pub struct View;

impl ShapeRule for View {
    fn infer(&self, inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let logical_in = first_input("view", inputs)?;
        let physical_in = tensor_arg("view", args, 0)?.physical_sizes();
        let requested = int_list_arg("view", args, 1)?;

        // Resolve a physical -1 wildcard against the physical element count
        let physical_out = resolve_physical(&physical_in, requested)?;

        let out = match physical_out.len().cmp(&physical_in.len()) {
            std::cmp::Ordering::Equal => physical_out.iter().map(|&s| Dim::new(s)).collect(),
            std::cmp::Ordering::Less => {
                let groups = algebra::collapse_groups(&physical_in, &physical_out);
                algebra::apply_groups(logical_in, &groups)
            }
            std::cmp::Ordering::Greater => infer_expanding(logical_in, &physical_in, requested)?,
        };

        Ok(vec![out])
    }
}

/// Substitute a single `-1` in the requested shape with the quotient of the
/// physical element count; other entries pass through.
fn resolve_physical(physical_in: &[usize], requested: &[i64]) -> Result<SmallVec<[usize; 4]>> {
    let wildcards = requested.iter().filter(|&&s| s == -1).count();
    ensure!(
        wildcards <= 1,
        MalformedArgumentSnafu { op: "view", reason: "more than one -1 dimension".to_string() }
    );

    let total: usize = physical_in.iter().product();
    let known: usize = requested.iter().filter(|&&s| s != -1).map(|&s| s as usize).product();

    requested
        .iter()
        .map(|&s| {
            if s == -1 {
                ensure!(
                    known != 0 && total % known == 0,
                    MalformedArgumentSnafu { op: "view", reason: format!("cannot infer -1 for {requested:?}") }
                );
                Ok(total / known)
            } else {
                ensure!(s >= 0, MalformedArgumentSnafu { op: "view", reason: format!("negative dimension {s}") });
                Ok(s as usize)
            }
        })
        .collect()
}

/// Rank-increasing case: exactly one end of the physical shapes must match.
fn infer_expanding(logical_in: &Shape, physical_in: &[usize], requested: &[i64]) -> Result<Shape> {
    let prefix_equal = matches!((physical_in.first(), requested.first()), (Some(&a), Some(&b)) if a as i64 == b);
    let suffix_equal = matches!((physical_in.last(), requested.last()), (Some(&a), Some(&b)) if a as i64 == b);
    ensure!(
        prefix_equal || suffix_equal,
        MalformedArgumentSnafu { op: "view", reason: "expanding view shares neither prefix nor suffix".to_string() }
    );

    let phys_in_shape = dim::from_sizes(physical_in);
    let req_shape: Shape = requested.iter().map(|&s| if s == -1 { Dim::Unresolved } else { Dim::new(s as usize) }).collect();

    // When both ends match the suffix strip wins: grafting new trailing
    // dimensions onto a stable leading batch is the common layout.
    let mut candidate: Shape = if suffix_equal {
        let (prefix_in, prefix_out) = algebra::strip_common_suffix(&phys_in_shape, &req_shape);
        let offset = prefix_in.len();
        prefix_out.iter().chain(&logical_in[offset.min(logical_in.len())..]).copied().collect()
    } else {
        let (suffix_in, suffix_out) = algebra::strip_common_prefix(&phys_in_shape, &req_shape);
        let offset = logical_in.len().saturating_sub(suffix_in.len());
        logical_in[..offset].iter().chain(&suffix_out).copied().collect()
    };

    // Resolve the wildcard against the *logical* element count
    let logical_total = dim::numel(logical_in);
    let had_wildcard = candidate.iter().any(Dim::is_unresolved);
    if had_wildcard && let Some(total) = logical_total {
        let known = candidate.iter().filter_map(Dim::size).product::<usize>();
        if known != 0 && total % known == 0 {
            for d in candidate.iter_mut() {
                if d.is_unresolved() {
                    *d = Dim::new(total / known);
                    break;
                }
            }
        }
    }

    if counts_agree(logical_in, &candidate) {
        return Ok(candidate);
    }

    // Fallback: the requested shape may only have inserted literal size-1
    // dimensions; replay those insertions against the logical shape
    if let Some(inserted) = insert_unit_dims(logical_in, requested)
        && counts_agree(logical_in, &inserted)
    {
        return Ok(inserted);
    }

    // Give up without failing: the miss surfaces at materialize time
    Ok(dim::unresolved(requested.len()))
}

/// Element counts agree, or cannot be compared (either side unresolved).
fn counts_agree(logical_in: &Shape, candidate: &Shape) -> bool {
    match (dim::numel(logical_in), dim::numel(candidate)) {
        (Some(a), Some(b)) => a == b,
        // An unresolved input shape validates anything; the value was
        // already marked tainted upstream
        (None, _) => true,
        (_, None) => false,
    }
}

/// Treat every `1` in the requested shape as a literal insertion and fill
/// the remaining positions from the logical shape in order.
fn insert_unit_dims(logical_in: &Shape, requested: &[i64]) -> Option<Shape> {
    if !requested.contains(&1) {
        return None;
    }

    let mut out = Shape::with_capacity(requested.len());
    let mut next = 0;
    for &size in requested {
        if size == 1 {
            out.push(Dim::new(1));
        } else {
            out.push(*logical_in.get(next)?);
            next += 1;
        }
    }
    Some(out)
}
