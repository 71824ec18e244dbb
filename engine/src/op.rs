//! Stable operation identifiers.
//!
//! One variant per entry of the underlying kernel catalog; the wire names
//! (`Display` / `from_name`) follow the host runtime's spelling so registry
//! keys stay stable across the dispatch boundary.

/// Operation identifier understood by the rule table and the kernel backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpId {
    // Shape-preserving
    Clone,
    Detach,
    OnesLike,
    Polar,
    Where,
    Tril,
    Sin,
    Rsqrt,
    Silu,

    // Pass-through family
    Unbind,
    ToCopy,
    CopyInPlace,
    T,
    IndexPutInPlace,

    // Reductions and narrowing (real semantics, see the reduce/movement rules)
    Sum,
    Mean,
    Slice,

    // Elementwise binary
    Add,
    Sub,
    Mul,
    Div,
    Pow,

    // Movement
    Unsqueeze,
    Transpose,
    Expand,
    Select,
    SplitWithSizes,
    Stack,

    // View family
    View,
    UnsafeView,
    ViewAsReal,

    // Matmul family
    Mm,
    Addmm,
    Bmm,

    // Attention
    FlashAttention,
    EfficientAttention,

    // Lookup / composition
    Index,
    Embedding,
    Linear,
}

impl OpId {
    /// Wire name matching the kernel catalog.
    pub fn name(self) -> &'static str {
        match self {
            OpId::Clone => "clone",
            OpId::Detach => "detach",
            OpId::OnesLike => "ones_like",
            OpId::Polar => "polar",
            OpId::Where => "where",
            OpId::Tril => "tril",
            OpId::Sin => "sin",
            OpId::Rsqrt => "rsqrt",
            OpId::Silu => "silu",
            OpId::Unbind => "unbind",
            OpId::ToCopy => "_to_copy",
            OpId::CopyInPlace => "copy_",
            OpId::T => "t",
            OpId::IndexPutInPlace => "index_put_",
            OpId::Sum => "sum",
            OpId::Mean => "mean",
            OpId::Slice => "slice",
            OpId::Add => "add",
            OpId::Sub => "sub",
            OpId::Mul => "mul",
            OpId::Div => "div",
            OpId::Pow => "pow",
            OpId::Unsqueeze => "unsqueeze",
            OpId::Transpose => "transpose",
            OpId::Expand => "expand",
            OpId::Select => "select",
            OpId::SplitWithSizes => "split_with_sizes",
            OpId::Stack => "stack",
            OpId::View => "view",
            OpId::UnsafeView => "_unsafe_view",
            OpId::ViewAsReal => "view_as_real",
            OpId::Mm => "mm",
            OpId::Addmm => "addmm",
            OpId::Bmm => "bmm",
            OpId::FlashAttention => "_scaled_dot_product_flash_attention",
            OpId::EfficientAttention => "_scaled_dot_product_efficient_attention",
            OpId::Index => "index",
            OpId::Embedding => "embedding",
            OpId::Linear => "linear",
        }
    }

    /// Resolve a wire name back to an identifier.
    pub fn from_name(name: &str) -> Option<OpId> {
        ALL.iter().copied().find(|op| op.name() == name)
    }

    /// In-place ops follow the host's trailing-underscore convention; their
    /// results must alias the mutated input.
    pub fn is_in_place(self) -> bool {
        self.name().ends_with('_')
    }
}

impl std::fmt::Display for OpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const ALL: &[OpId] = &[
    OpId::Clone,
    OpId::Detach,
    OpId::OnesLike,
    OpId::Polar,
    OpId::Where,
    OpId::Tril,
    OpId::Sin,
    OpId::Rsqrt,
    OpId::Silu,
    OpId::Unbind,
    OpId::ToCopy,
    OpId::CopyInPlace,
    OpId::T,
    OpId::IndexPutInPlace,
    OpId::Sum,
    OpId::Mean,
    OpId::Slice,
    OpId::Add,
    OpId::Sub,
    OpId::Mul,
    OpId::Div,
    OpId::Pow,
    OpId::Unsqueeze,
    OpId::Transpose,
    OpId::Expand,
    OpId::Select,
    OpId::SplitWithSizes,
    OpId::Stack,
    OpId::View,
    OpId::UnsafeView,
    OpId::ViewAsReal,
    OpId::Mm,
    OpId::Addmm,
    OpId::Bmm,
    OpId::FlashAttention,
    OpId::EfficientAttention,
    OpId::Index,
    OpId::Embedding,
    OpId::Linear,
];
