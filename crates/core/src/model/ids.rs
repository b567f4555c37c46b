use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Declares an opaque string identifier.
///
/// Ids are caller-supplied strings on the wire; `generate()` produces a
/// random v4 UUID so locally created records never collide.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a caller-supplied id without validation.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generates a fresh random id.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a Subject
    SubjectId
);

string_id!(
    /// Unique identifier for a Milestone
    MilestoneId
);

string_id!(
    /// Unique identifier for an exam countdown
    ExamId
);

string_id!(
    /// Unique identifier for a progress entry
    ProgressEntryId
);

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_id_display() {
        let id = SubjectId::new("42");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_debug_includes_type_name() {
        let id = MilestoneId::new("m-1");
        assert_eq!(format!("{id:?}"), "MilestoneId(m-1)");
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids: std::collections::HashSet<ExamId> = (0..256).map(|_| ExamId::generate()).collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ProgressEntryId::new("1700000000000");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"1700000000000\"");
        let back: ProgressEntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
