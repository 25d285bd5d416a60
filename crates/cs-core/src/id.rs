use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// One interner shared by every id kind.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Declares an interned identifier newtype.
/// A `Spur` index: 4 bytes, `Copy`, constant-time `Eq` and `Hash`.
macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a string as an id, or return the existing one.
            pub fn intern(s: &str) -> Self {
                $name(INTERNER.get_or_intern(s))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok($name::intern(&s))
            }
        }
    };
}

interned_id!(
    /// Identity of a card on the canvas.
    CardId
);
interned_id!(
    /// Identity of a connection between two cards.
    ConnectionId
);
interned_id!(
    /// Identity of a shared connection style/label.
    ConnectionTypeId
);
interned_id!(
    /// Identity of a user, supplied by the identity collaborator.
    UserId
);

/// Source of collision-free string ids.
pub trait IdSource {
    /// Produce a fresh id. `prefix` names the entity kind (`card`, `connection`, ...).
    fn new_id(&mut self, prefix: &str) -> String;
}

/// Default id source: `{prefix}_{n}` from a process-wide counter, so two
/// stores in the same process never hand out the same id.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialIds;

impl IdSource for SequentialIds {
    fn new_id(&mut self, prefix: &str) -> String {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}_{n}")
    }
}
