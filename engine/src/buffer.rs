//! Physical buffer handle with pad/slice mechanics.
//!
//! A [`Buffer`] is a cheaply clonable handle to a dense row-major array;
//! clones share storage. Sharing is what makes the aliasing contract of
//! in-place kernels observable: a mutating kernel hands back the same
//! storage, and [`Buffer::ptr_eq`] can tell. The engine itself never
//! interprets buffer contents - the only data movement here is appending
//! neutral fill (padding) and truncating it away again (unpadding).

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use ndarray::{ArrayD, IxDyn, Slice};
use smallvec::SmallVec;
use snafu::ensure;

use crate::error::{InvalidSliceRangeSnafu, RankMismatchSnafu, Result};

/// Shared handle to a dense f32 array (single-threaded model).
#[derive(Clone)]
pub struct Buffer(Rc<RefCell<ArrayD<f32>>>);

impl Buffer {
    pub fn new(data: ArrayD<f32>) -> Self {
        Self(Rc::new(RefCell::new(data)))
    }

    /// Build a buffer from a flat slice and a shape.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` does not match the product of `sizes`; this
    /// is a construction helper, not a dispatch path.
    pub fn from_values(sizes: &[usize], values: &[f32]) -> Self {
        let array = ArrayD::from_shape_vec(IxDyn(sizes), values.to_vec()).expect("shape/value length mismatch");
        Self::new(array)
    }

    /// Current physical extents.
    pub fn sizes(&self) -> SmallVec<[usize; 4]> {
        self.0.borrow().shape().iter().copied().collect()
    }

    pub fn ndim(&self) -> usize {
        self.0.borrow().ndim()
    }

    /// Storage identity: true when both handles alias the same array.
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Immutable view of the underlying array.
    pub fn array(&self) -> Ref<'_, ArrayD<f32>> {
        self.0.borrow()
    }

    /// Copy out the underlying array.
    pub fn to_array(&self) -> ArrayD<f32> {
        self.0.borrow().clone()
    }

    /// Overwrite the underlying array in place, preserving storage identity.
    ///
    /// Used by mutating kernels (`copy_`, `index_put_`) so the result is
    /// indistinguishable from the mutated input.
    pub fn assign(&self, data: ArrayD<f32>) {
        *self.0.borrow_mut() = data;
    }

    /// Return a new buffer grown to `sizes[d] + widths[d].1` per dimension,
    /// original values at the low offsets and `neutral` in the padding.
    ///
    /// When every width is zero this is a no-op returning a handle to the
    /// same storage. Low-end widths are always zero by construction
    /// (padding is appended, never prepended).
    ///
    /// # Errors
    ///
    /// [`RankMismatch`](crate::Error::RankMismatch) when `widths` does not
    /// cover every dimension.
    pub fn apply_padding(&self, widths: &[(usize, usize)], neutral: f32) -> Result<Buffer> {
        let src = self.0.borrow();
        ensure!(widths.len() == src.ndim(), RankMismatchSnafu { expected: src.ndim(), got: widths.len() });

        if widths.iter().all(|&(lo, hi)| lo == 0 && hi == 0) {
            drop(src);
            return Ok(self.clone());
        }

        let padded: Vec<usize> = src.shape().iter().zip(widths).map(|(&n, &(lo, hi))| lo + n + hi).collect();

        let mut out = ArrayD::from_elem(IxDyn(&padded), neutral);
        out.slice_each_axis_mut(|ax| Slice::from(0..src.shape()[ax.axis.index()])).assign(&src);

        Ok(Buffer::new(out))
    }

    /// Truncating multi-dimensional slice: keep `0..sizes[d]` of every
    /// dimension. This is the unpad primitive - padding lives at the high
    /// end, so a plain truncation recovers the logical region.
    ///
    /// Returns a handle to the same storage when nothing is truncated.
    ///
    /// # Errors
    ///
    /// - [`RankMismatch`](crate::Error::RankMismatch) when `sizes` does not
    ///   cover every dimension
    /// - [`InvalidSliceRange`](crate::Error::InvalidSliceRange) when a
    ///   truncated dimension would be empty or exceed the physical extent
    pub fn slice_to(&self, sizes: &[usize]) -> Result<Buffer> {
        let src = self.0.borrow();
        ensure!(sizes.len() == src.ndim(), RankMismatchSnafu { expected: src.ndim(), got: sizes.len() });

        if sizes == src.shape() {
            drop(src);
            return Ok(self.clone());
        }

        for (dim, (&end, &extent)) in sizes.iter().zip(src.shape()).enumerate() {
            if end == extent {
                continue;
            }
            ensure!(end <= extent && end > 0, InvalidSliceRangeSnafu { dim, end, extent });
        }

        let view = src.slice_each_axis(|ax| Slice::from(0..sizes[ax.axis.index()]));
        Ok(Buffer::new(view.to_owned()))
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Buffer(shape: {:?})", self.0.borrow().shape())
    }
}
