//! The padded value: a physical buffer plus the logical shape it stands for.

use bon::bon;
use smallvec::SmallVec;
use snafu::{ResultExt, ensure};

use tessel_shape::{Dim, Shape, dim, pad};

use crate::buffer::Buffer;
use crate::error::{AlgebraSnafu, Result, UnresolvedShapeSnafu};

/// A physical buffer wrapped with logical-shape metadata.
///
/// The physical extents are the smallest multiples of the alignment
/// multipliers covering the logical extents at construction time. After
/// construction the logical shape is tracked independently - inference rules
/// update it per operation while kernels keep producing padded buffers, and
/// the numeric divergence between the two *is* the padding being tracked.
#[derive(Debug, Clone)]
pub struct PaddedValue {
    buffer: Buffer,
    logical: Shape,
    multipliers: SmallVec<[usize; 4]>,
    neutral: f32,
}

#[bon]
impl PaddedValue {
    /// Wrap a buffer, padding it up to the alignment multipliers.
    ///
    /// The logical shape defaults to the buffer's pre-padding extents, with
    /// per-dimension padded flags set wherever the multiplier is not 1.
    /// `neutral` (default 0.0) fills the padding; callers pick e.g. negative
    /// infinity when the padding must lose against a max-reduction.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let v = PaddedValue::wrap()
    ///     .buffer(Buffer::from_values(&[5, 3], &data))
    ///     .multipliers(vec![8, 1])
    ///     .call()?;
    /// assert_eq!(v.physical_sizes().as_slice(), &[8, 3]);
    /// ```
    ///
    /// # Errors
    ///
    /// Fails on a zero multiplier.
    #[builder]
    pub fn wrap(
        buffer: Buffer,
        multipliers: Vec<usize>,
        logical: Option<Shape>,
        #[builder(default = 0.0)] neutral: f32,
    ) -> Result<Self> {
        let sizes = buffer.sizes();
        let padded = pad::padded_sizes(&sizes, &multipliers).context(AlgebraSnafu)?;

        let buffer = if padded != sizes {
            let widths = pad::pad_widths(&sizes, &multipliers).context(AlgebraSnafu)?;
            buffer.apply_padding(&widths, neutral)?
        } else {
            buffer
        };

        let logical = logical.unwrap_or_else(|| {
            sizes
                .iter()
                .enumerate()
                .map(|(d, &s)| Dim::with_padding(s, multipliers.get(d).is_some_and(|&m| m != 1)))
                .collect()
        });

        Ok(Self { buffer, logical, multipliers: multipliers.into_iter().collect(), neutral })
    }
}

impl PaddedValue {
    /// Wrap an already-physical buffer with multiplier 1 everywhere
    /// ("no padding"). Used when a raw tensor first joins a dispatched
    /// computation.
    pub fn from_buffer(buffer: Buffer) -> Self {
        let logical = buffer.sizes().iter().map(|&s| Dim::new(s)).collect();
        let multipliers = std::iter::repeat_n(1, buffer.ndim()).collect();
        Self { buffer, logical, multipliers, neutral: 0.0 }
    }

    /// Wrap a kernel output with an inferred logical shape. No further
    /// physical padding is applied - padding already present in the inputs
    /// has propagated through the kernel.
    pub fn from_inferred(buffer: Buffer, logical: Shape) -> Self {
        let multipliers = std::iter::repeat_n(1, buffer.ndim()).collect();
        Self { buffer, logical, multipliers, neutral: 0.0 }
    }

    /// The physical buffer, as-is (still padded).
    pub fn unwrap(&self) -> Buffer {
        self.buffer.clone()
    }

    /// The buffer truncated to the logical extents.
    ///
    /// # Errors
    ///
    /// - [`UnresolvedShape`](crate::Error::UnresolvedShape) when a view
    ///   inference gave up on this value's shape
    /// - [`InvalidSliceRange`](crate::Error::InvalidSliceRange) when the
    ///   logical extents do not fit the physical buffer (a rule predicted a
    ///   shape the kernel did not produce)
    pub fn materialize(&self) -> Result<Buffer> {
        ensure!(dim::is_resolved(&self.logical), UnresolvedShapeSnafu);
        let sizes = dim::sizes(&self.logical).expect("resolved shape has sizes");
        self.buffer.slice_to(&sizes)
    }

    pub fn logical(&self) -> &Shape {
        &self.logical
    }

    pub fn physical_sizes(&self) -> SmallVec<[usize; 4]> {
        self.buffer.sizes()
    }

    pub fn multipliers(&self) -> &[usize] {
        &self.multipliers
    }

    pub fn neutral(&self) -> f32 {
        self.neutral
    }
}
