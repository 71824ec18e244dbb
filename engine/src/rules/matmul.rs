//! Matmul-family rules.

use snafu::ensure;

use tessel_shape::Shape;

use crate::call::{Kwargs, Value};
use crate::error::{IncompatibleContractionSnafu, RankMismatchSnafu, Result};
use crate::rules::{ShapeRule, tensor_arg};

#[derive(Debug, Clone, Copy)]
pub enum MatmulKind {
    Mm,
    /// `addmm(bias, mat1, mat2)`: the bias only broadcasts; the contraction
    /// is between the two matrix operands.
    Addmm,
    Bmm,
}

pub struct Matmul {
    pub kind: MatmulKind,
}

impl ShapeRule for Matmul {
    fn infer(&self, _inputs: &[Shape], args: &[Value], _kwargs: &Kwargs) -> Result<Vec<Shape>> {
        let (lhs_idx, rhs_idx) = match self.kind {
            MatmulKind::Mm | MatmulKind::Bmm => (0, 1),
            MatmulKind::Addmm => (1, 2),
        };
        let lhs = tensor_arg(self.op_name(), args, lhs_idx)?.logical().clone();
        let rhs = tensor_arg(self.op_name(), args, rhs_idx)?.logical().clone();

        match self.kind {
            MatmulKind::Mm | MatmulKind::Addmm => {
                ensure!(lhs.len() == 2, RankMismatchSnafu { expected: 2usize, got: lhs.len() });
                ensure!(rhs.len() == 2, RankMismatchSnafu { expected: 2usize, got: rhs.len() });
                ensure_dims_match(&lhs, &rhs, &[(1, 0)])?;

                Ok(vec![[lhs[0], rhs[1]].into_iter().collect()])
            }
            MatmulKind::Bmm => {
                ensure!(lhs.len() == 3, RankMismatchSnafu { expected: 3usize, got: lhs.len() });
                ensure!(rhs.len() == 3, RankMismatchSnafu { expected: 3usize, got: rhs.len() });
                ensure_dims_match(&lhs, &rhs, &[(0, 0), (2, 1)])?;

                Ok(vec![[lhs[0], lhs[1], rhs[2]].into_iter().collect()])
            }
        }
    }
}

impl Matmul {
    fn op_name(&self) -> &'static str {
        match self.kind {
            MatmulKind::Mm => "mm",
            MatmulKind::Addmm => "addmm",
            MatmulKind::Bmm => "bmm",
        }
    }
}

/// Check contraction/batch dimension pairs; unresolved dimensions are
/// conservatively accepted (the taint already blocks materialization).
fn ensure_dims_match(lhs: &Shape, rhs: &Shape, pairs: &[(usize, usize)]) -> Result<()> {
    for &(l, r) in pairs {
        if let (Some(a), Some(b)) = (lhs[l].size(), rhs[r].size()) {
            ensure!(
                a == b,
                IncompatibleContractionSnafu { lhs: Box::new(lhs.clone()), rhs: Box::new(rhs.clone()) }
            );
        }
    }
    Ok(())
}
