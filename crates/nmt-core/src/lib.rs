pub mod config;
pub mod error;
pub mod highlight;
pub mod id;
pub mod input;
pub mod tolerance;
pub mod traits;

pub use config::{ArrangeConfig, ConnectionConfig};
pub use error::{NmtError, Result};
pub use highlight::Highlight;
pub use id::{NodeId, SegmentId};
pub use input::Modifiers;
pub use tolerance::Tolerance;
pub use traits::Validate;
