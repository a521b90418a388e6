use crate::error::Result;

/// Validate the preconditions of a configuration or entity before use.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
