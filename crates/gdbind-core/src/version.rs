use std::fmt;

/// Engine version reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GodotVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GodotVersion {
    /// Oldest engine whose extension interface gdbind can drive.
    pub const MINIMUM: GodotVersion = GodotVersion::new(4, 2, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// True when `self` is at least `other`, ignoring patch releases.
    pub fn at_least_minor(self, other: GodotVersion) -> bool {
        (self.major, self.minor) >= (other.major, other.minor)
    }
}

impl fmt::Display for GodotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_lexicographic() {
        assert!(GodotVersion::new(4, 3, 0) > GodotVersion::new(4, 2, 9));
        assert!(GodotVersion::new(4, 2, 1) > GodotVersion::MINIMUM);
    }

    #[test]
    fn minor_comparison_ignores_patch() {
        let v = GodotVersion::new(4, 2, 0);
        assert!(v.at_least_minor(GodotVersion::new(4, 2, 3)));
        assert!(!v.at_least_minor(GodotVersion::new(4, 3, 0)));
    }

    #[test]
    fn display() {
        assert_eq!(GodotVersion::new(4, 3, 1).to_string(), "4.3.1");
    }
}
