use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Alignment multipliers must be positive; 1 means "no padding".
    #[snafu(display("alignment multiplier for dimension {dim} must be positive"))]
    ZeroMultiplier { dim: usize },
}
