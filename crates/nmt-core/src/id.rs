//! Opaque identifiers handed out by the host network.
//!
//! The core never allocates these; it only carries them back to the
//! collaborator that owns the node/segment graph.

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub fn value(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

opaque_id!(
    /// A network node (junction or road end).
    NodeId,
    "node"
);

opaque_id!(
    /// A network segment (link between two nodes).
    SegmentId,
    "segment"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(NodeId::new(7).to_string(), "node#7");
        assert_eq!(SegmentId::from(12).to_string(), "segment#12");
    }

    #[test]
    fn test_value_roundtrip() {
        let id = NodeId::from(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id, NodeId::new(42));
    }
}
