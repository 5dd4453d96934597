//! Owned Rust mirrors of the engine's interned string types.

use std::fmt;
use std::ops::Deref;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:?})"), self.0)
            }
        }
    };
}

string_newtype!(
    /// Interned engine identifier (method, signal, group names).
    StringName
);

string_newtype!(
    /// Path to a node relative to another node, e.g. `"../Camera3D"`.
    NodePath
);

impl NodePath {
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with('/')
    }

    /// Names separated by `/`, ignoring a leading slash and any subname.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let path = self.0.split(':').next().unwrap_or_default();
        path.split('/').filter(|segment| !segment.is_empty())
    }
}
