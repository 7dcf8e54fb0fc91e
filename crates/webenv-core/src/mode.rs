use crate::env::EnvSnapshot;
use crate::options::WebEnv;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bundler mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
    None,
}

impl Mode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "none" => Ok(Self::None),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// Resolve the effective mode of a build.
///
/// Priority: the `production` flag, the `development` flag, an explicit
/// `mode`, a valid `NODE_ENV`, then development.
#[must_use]
pub fn get_mode(env: &WebEnv, snapshot: &EnvSnapshot) -> Mode {
    if env.production {
        return Mode::Production;
    }
    if env.development {
        return Mode::Development;
    }
    if let Some(mode) = env.mode {
        return mode;
    }
    snapshot
        .node_env
        .as_deref()
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::NODE_ENV;

    fn web_env() -> WebEnv {
        WebEnv::new("/srv/app")
    }

    #[test]
    fn test_defaults_to_development() {
        assert_eq!(get_mode(&web_env(), &EnvSnapshot::default()), Mode::Development);
    }

    #[test]
    fn test_flags_take_priority() {
        let mut env = web_env();
        env.mode = Some(Mode::None);
        env.production = true;
        env.development = true;
        assert_eq!(get_mode(&env, &EnvSnapshot::default()), Mode::Production);

        env.production = false;
        assert_eq!(get_mode(&env, &EnvSnapshot::default()), Mode::Development);
    }

    #[test]
    fn test_explicit_mode_beats_node_env() {
        let mut env = web_env();
        env.mode = Some(Mode::None);
        let snapshot = EnvSnapshot::from_vars([(NODE_ENV, "production")]);
        assert_eq!(get_mode(&env, &snapshot), Mode::None);
    }

    #[test]
    fn test_node_env_fallback() {
        let snapshot = EnvSnapshot::from_vars([(NODE_ENV, "production")]);
        assert_eq!(get_mode(&web_env(), &snapshot), Mode::Production);

        let snapshot = EnvSnapshot::from_vars([(NODE_ENV, "staging")]);
        assert_eq!(get_mode(&web_env(), &snapshot), Mode::Development);
    }
}
