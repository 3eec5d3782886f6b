use crate::config::{ConfigOverrides, EffectiveConfig, ProfileConfig, FALLBACK_PROFILE_NAME};
use crate::domain::ports::ProfileStore;
use crate::utils::error::Result;

/// Result of merging the three configuration layers, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedProfile {
    pub name: String,
    /// Whether a stored record was found under `name`.
    pub from_store: bool,
    pub config: ProfileConfig,
}

/// Resolves the effective settings from defaults, a stored profile and
/// explicit overrides, in that order.
pub struct ConfigResolver;

impl ConfigResolver {
    /// Explicit name, else the store's default, else `"default"`.
    pub fn select_profile_name<S: ProfileStore>(store: &S, overrides: &ConfigOverrides) -> String {
        overrides
            .profile
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| store.default_profile_name())
            .unwrap_or(FALLBACK_PROFILE_NAME)
            .to_string()
    }

    pub fn merge<S: ProfileStore>(store: &S, overrides: &ConfigOverrides) -> MergedProfile {
        let name = Self::select_profile_name(store, overrides);

        let stored = store.profile(&name);
        let mut config = stored.cloned().unwrap_or_default();
        overrides.apply_to(&mut config);

        MergedProfile {
            from_store: stored.is_some(),
            name,
            config,
        }
    }

    pub fn validate(merged: &MergedProfile) -> Result<EffectiveConfig> {
        EffectiveConfig::from_profile(&merged.name, &merged.config)
    }

    pub fn resolve<S: ProfileStore>(
        store: &S,
        overrides: &ConfigOverrides,
    ) -> Result<EffectiveConfig> {
        Self::validate(&Self::merge(store, overrides))
    }
}
