use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire optimization crate.
pub type Result<T> = std::result::Result<T, OptErr>;

/// The optimization crate's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum OptErr {
    /// A constructor argument is outside of its valid domain.
    InvalidArgument(String),
    /// An inner loop operation was called before the first `set_outparam`.
    NotInitialized,
    /// A parameter that must carry a gradient doesn't have one.
    MissingGradient { group: usize, param: usize },
    /// Two parallel parameter sets don't have the same layout.
    ///
    /// `param` is `None` when the mismatch is in the amount of parameters of a group, and
    /// `group` is `None` when it's in the amount of groups of the set.
    ShapeMismatch {
        what: &'static str,
        group: Option<usize>,
        param: Option<usize>,
        got: Vec<usize>,
        expected: Vec<usize>,
    },
}

impl Display for OptErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptErr::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            OptErr::NotInitialized => write!(
                f,
                "the optimizer has no snapshot point, `set_outparam` must be called first"
            ),
            OptErr::MissingGradient { group, param } => write!(
                f,
                "parameter {param} of group {group} has no gradient and one is required"
            ),
            OptErr::ShapeMismatch {
                what,
                group,
                param,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}")?;

                if let Some(group) = group {
                    write!(f, " at group {group}")?;
                }

                if let Some(param) = param {
                    write!(f, ", parameter {param}")?;
                }

                write!(f, ": got {got:?}, expected {expected:?}")
            }
        }
    }
}

impl Error for OptErr {}
