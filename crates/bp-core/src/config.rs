use std::sync::OnceLock;

/// Separator between a generated bean name and its uniqueness suffix.
pub const GENERATED_BEAN_NAME_SEPARATOR: &str = "#";

/// Prefix of names generated for anonymous inner blueprints.
pub const INNER_BEAN_PREFIX: &str = "(inner)";

fn env_true(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|val| {
        let trimmed = val.trim();
        !trimmed.is_empty() && !matches!(trimmed, "0" | "false" | "FALSE" | "False")
    })
}

fn bool_from_env(key: &str) -> bool {
    env_true(key).unwrap_or(false)
}

/// Whether every resolved value should be written to the trace log.
pub fn trace_values() -> bool {
    static TRACE_VALUES: OnceLock<bool> = OnceLock::new();
    *TRACE_VALUES.get_or_init(|| bool_from_env("BEANPHASE_TRACE_VALUES"))
}

/// Naming settings used while resolving values of one bean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub generated_name_separator: String,
    pub inner_bean_prefix: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            generated_name_separator: GENERATED_BEAN_NAME_SEPARATOR.to_string(),
            inner_bean_prefix: INNER_BEAN_PREFIX.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Name for an anonymous inner blueprint identified by `token`.
    pub fn inner_bean_name(&self, token: impl std::fmt::Display) -> String {
        format!(
            "{}{}{}",
            self.inner_bean_prefix, self.generated_name_separator, token
        )
    }

    /// Candidate name number `counter` derived from `base`.
    pub fn numbered_name(&self, base: &str, counter: usize) -> String {
        format!("{}{}{}", base, self.generated_name_separator, counter)
    }
}
