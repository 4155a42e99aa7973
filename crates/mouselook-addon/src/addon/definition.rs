//! Metadata the host reads before loading the addon.

use std::fmt;

/// Unique identifier of this addon among all addons the host knows.
pub const SIGNATURE: i32 = 0x0987_2345;

pub const NAME: &str = "MouseLookHandler";
pub const AUTHOR: &str = "Raidcore";
pub const DESCRIPTION: &str = "Automatically toggles action cam while moving.";
pub const UPDATE_LINK: &str = "https://github.com/RaidcoreGG/GW2-MouseLookHandler";

/// Where the host looks for newer releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateProvider {
    None,
    Raidcore,
    GitHub,
    Direct,
}

/// Four-part version as the host displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AddonVersion {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub revision: u16,
}

impl AddonVersion {
    /// The crate's own `major.minor.patch`, with revision 0.
    pub fn from_package() -> Self {
        let part = |s: &str| s.parse().unwrap_or(0);
        Self {
            major: part(env!("CARGO_PKG_VERSION_MAJOR")),
            minor: part(env!("CARGO_PKG_VERSION_MINOR")),
            build: part(env!("CARGO_PKG_VERSION_PATCH")),
            revision: 0,
        }
    }
}

impl fmt::Display for AddonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonDefinition {
    pub signature: i32,
    pub name: &'static str,
    pub version: AddonVersion,
    pub author: &'static str,
    pub description: &'static str,
    pub provider: UpdateProvider,
    pub update_link: &'static str,
}

pub fn definition() -> AddonDefinition {
    AddonDefinition {
        signature: SIGNATURE,
        name: NAME,
        version: AddonVersion::from_package(),
        author: AUTHOR,
        description: DESCRIPTION,
        provider: UpdateProvider::GitHub,
        update_link: UPDATE_LINK,
    }
}
