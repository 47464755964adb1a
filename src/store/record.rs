//! In-memory model of pages and index entries.

use crate::error::{PageError, Result};
use std::fmt;
use std::str::FromStr;

/// Platform a page is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    /// Commands that behave the same everywhere
    Common,
    Linux,
    Osx,
    Windows,
}

impl Platform {
    /// Every platform, in the order used after `common` and the host
    pub const ALL: [Platform; 4] = [
        Platform::Common,
        Platform::Linux,
        Platform::Osx,
        Platform::Windows,
    ];

    /// Name used in the store header and in the corpus directory layout
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Linux => "linux",
            Self::Osx => "osx",
            Self::Windows => "windows",
        }
    }

    /// Parse a platform name, accepting the usual aliases
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(Self::Common),
            "linux" | "unix" => Ok(Self::Linux),
            "osx" | "macos" | "darwin" => Ok(Self::Osx),
            "windows" | "win" => Ok(Self::Windows),
            _ => Err(PageError::UnknownPlatform {
                name: name.to_string(),
            }),
        }
    }

    /// Platform of the machine this binary was built for
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            Self::Osx
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    /// Write order for a store build: `common`, then `host`, then the rest.
    pub fn priority_order(host: Platform) -> Vec<Platform> {
        let mut order = vec![Platform::Common];
        if host != Platform::Common {
            order.push(host);
        }
        order.extend(
            Self::ALL
                .iter()
                .copied()
                .filter(|p| *p != Platform::Common && *p != host),
        );
        order
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// One help page as delivered by a page source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Lower-cased command name without the `.md` extension
    pub name: String,
    pub platform: Platform,
    /// Raw Markdown text of the page
    pub body: String,
}

impl PageRecord {
    pub fn new(name: impl AsRef<str>, platform: Platform, body: impl Into<String>) -> Self {
        Self {
            name: name.as_ref().to_lowercase(),
            platform,
            body: body.into(),
        }
    }

    /// Reject names that would break the header's space/comma delimiters
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(PageError::invalid_record("page name is empty"));
        }
        if self.name.contains(|c: char| c == ',' || c.is_whitespace()) {
            return Err(PageError::invalid_record(format!(
                "page name '{}' contains a delimiter",
                self.name
            )));
        }
        Ok(())
    }
}

/// Header entry locating one body in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub platform: Platform,
    /// Number of bodies written before this one
    pub skip: u32,
}

impl IndexEntry {
    /// Whether this entry is visible under an optional platform filter.
    ///
    /// A concrete platform filter also admits `common` pages; filtering on
    /// `common` admits only `common`.
    pub fn visible_under(&self, filter: Option<Platform>) -> bool {
        match filter {
            None => true,
            Some(platform) => self.platform == platform || self.platform == Platform::Common,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_aliases() {
        assert_eq!(Platform::parse("macos").unwrap(), Platform::Osx);
        assert_eq!(Platform::parse("OSX").unwrap(), Platform::Osx);
        assert_eq!(Platform::parse("win").unwrap(), Platform::Windows);
        assert_eq!(Platform::parse("unix").unwrap(), Platform::Linux);
        assert_eq!(Platform::parse("common").unwrap(), Platform::Common);
        assert!(matches!(
            Platform::parse("plan9"),
            Err(PageError::UnknownPlatform { .. })
        ));
    }

    #[test]
    fn test_priority_order_puts_common_then_host_first() {
        assert_eq!(
            Platform::priority_order(Platform::Osx),
            vec![
                Platform::Common,
                Platform::Osx,
                Platform::Linux,
                Platform::Windows
            ]
        );
        assert_eq!(
            Platform::priority_order(Platform::Common),
            Platform::ALL.to_vec()
        );
    }

    #[test]
    fn test_record_name_is_lowercased_and_validated() {
        let record = PageRecord::new("Git-Commit", Platform::Common, "# git commit");
        assert_eq!(record.name, "git-commit");
        assert!(record.validate().is_ok());

        assert!(PageRecord::new("a b", Platform::Linux, "").validate().is_err());
        assert!(PageRecord::new("a,b", Platform::Linux, "").validate().is_err());
        assert!(PageRecord::new("", Platform::Linux, "").validate().is_err());
    }

    #[test]
    fn test_visibility_under_filter() {
        let common = IndexEntry {
            name: "tar".into(),
            platform: Platform::Common,
            skip: 0,
        };
        let linux = IndexEntry {
            name: "apt".into(),
            platform: Platform::Linux,
            skip: 1,
        };

        assert!(common.visible_under(None));
        assert!(common.visible_under(Some(Platform::Osx)));
        assert!(linux.visible_under(Some(Platform::Linux)));
        assert!(!linux.visible_under(Some(Platform::Osx)));
        assert!(!linux.visible_under(Some(Platform::Common)));
    }
}
