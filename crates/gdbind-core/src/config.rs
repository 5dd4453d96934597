//! Binding configuration.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::GodotVersion;

/// Engine initialization stage, in the order the engine runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum InitLevel {
    Core = 0,
    Servers = 1,
    Scene = 2,
    Editor = 3,
}

impl InitLevel {
    pub const ALL: [InitLevel; 4] = [
        InitLevel::Core,
        InitLevel::Servers,
        InitLevel::Scene,
        InitLevel::Editor,
    ];
}

/// Method binds that cannot be resolved at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindPolicy {
    /// Loading fails with `BindError::MissingMethodBind`.
    Strict,
    /// A warning is logged; calling the method later panics.
    #[default]
    Lenient,
}

/// Settings applied when the engine is loaded.
///
/// # Example
///
/// ```
/// use gdbind_core::{BindingConfig, BindPolicy, GodotVersion, InitLevel};
///
/// let config = BindingConfig::default()
///     .with_init_level(InitLevel::Scene)
///     .with_bind_policy(BindPolicy::Strict)
///     .with_minimum_version(GodotVersion::new(4, 3, 0));
/// assert!(config.is_strict());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingConfig {
    pub minimum_version: GodotVersion,
    pub init_level: InitLevel,
    pub bind_policy: BindPolicy,
    /// Check a borrowed handle's instance id before every call through it.
    pub assert_instance_ids: bool,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            minimum_version: GodotVersion::MINIMUM,
            init_level: InitLevel::Scene,
            bind_policy: BindPolicy::Lenient,
            assert_instance_ids: true,
        }
    }
}

impl BindingConfig {
    pub fn with_minimum_version(mut self, version: GodotVersion) -> Self {
        self.minimum_version = version;
        self
    }

    pub fn with_init_level(mut self, level: InitLevel) -> Self {
        self.init_level = level;
        self
    }

    pub fn with_bind_policy(mut self, policy: BindPolicy) -> Self {
        self.bind_policy = policy;
        self
    }

    pub fn with_instance_id_checks(mut self, enabled: bool) -> Self {
        self.assert_instance_ids = enabled;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.bind_policy == BindPolicy::Strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BindingConfig::default();
        assert_eq!(config.init_level, InitLevel::Scene);
        assert!(!config.is_strict());
        assert!(config.assert_instance_ids);
        assert_eq!(config.minimum_version, GodotVersion::MINIMUM);
    }

    #[test]
    fn init_levels_are_ordered() {
        assert!(InitLevel::Core < InitLevel::Scene);
        assert_eq!(InitLevel::try_from(3).ok(), Some(InitLevel::Editor));
        assert_eq!(u32::from(InitLevel::Servers), 1);
    }
}
