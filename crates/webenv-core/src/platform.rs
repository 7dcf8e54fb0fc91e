use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target platform of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Web,
    Ios,
    Android,
    Electron,
}

impl Platform {
    pub const ALL: [Platform; 4] = [Self::Web, Self::Ios, Self::Android, Self::Electron];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Electron => "electron",
        }
    }

    /// Native platforms load `.bundle` files and have no browser dev tooling.
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }

    /// Extension suffixes probed when looking for platform-specific files.
    ///
    /// `ios` and `android` fall back to the shared `native` suffix.
    #[must_use]
    pub fn extensions(&self) -> Vec<&'static str> {
        if self.is_native() {
            vec![self.as_str(), "native"]
        } else {
            vec![self.as_str()]
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(Self::Web),
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "electron" => Ok(Self::Electron),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}
