//! Installed Package Records
//!
//! `conda list --json` reports each linked package as a dist string of the
//! form `[channel::]name-version-build`; newer releases report full objects
//! instead. Both shapes parse into [`Package`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One installed package in an environment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Package name.
    pub name: String,

    /// Version string (not semver; conda versions are free-form).
    pub version: String,

    /// Build string (e.g. "py311_0").
    pub build: String,

    /// Originating channel, when conda reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl Package {
    /// Parses a dist string of the form `[channel::]name-version-build`.
    ///
    /// The name itself may contain hyphens, so the version and build are
    /// taken from the *last* two hyphen-separated fields.
    ///
    /// Returns `None` when fewer than three fields are present.
    pub fn parse_dist(dist: &str) -> Option<Self> {
        let (channel, rest) = match dist.split_once("::") {
            Some((channel, rest)) => (Some(channel.to_string()), rest),
            None => (None, dist),
        };

        // Strip a trailing ".tar.bz2" in case a full filename leaks through.
        let rest = rest.strip_suffix(".tar.bz2").unwrap_or(rest);

        let (front, build) = rest.rsplit_once('-')?;
        let (name, version) = front.rsplit_once('-')?;

        if name.is_empty() || version.is_empty() || build.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            version: version.to_string(),
            build: build.to_string(),
            channel,
        })
    }

    /// Parses one element of `conda list --json` output, either shape.
    pub fn from_list_entry(entry: &Value) -> Option<Self> {
        match entry {
            Value::String(dist) => Self::parse_dist(dist),
            Value::Object(map) => Some(Self {
                name: map.get("name")?.as_str()?.to_string(),
                version: map.get("version")?.as_str()?.to_string(),
                build: map
                    .get("build_string")
                    .or_else(|| map.get("build"))?
                    .as_str()?
                    .to_string(),
                channel: map
                    .get("channel")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            _ => None,
        }
    }

    /// The dist string for this package, without the channel prefix.
    pub fn dist(&self) -> String {
        format!("{}-{}-{}", self.name, self.version, self.build)
    }
}

/// One entry of an environment's revision history.
///
/// Reported by `conda list --revisions --json`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Revision {
    /// Revision number, monotonically increasing from 0.
    pub rev: u64,

    /// Timestamp string as conda reports it.
    #[serde(default)]
    pub date: String,

    /// Dist strings installed in this revision.
    #[serde(default)]
    pub install: Vec<String>,

    /// Dist strings removed in this revision.
    #[serde(default)]
    pub remove: Vec<String>,

    /// Dist strings upgraded in this revision.
    #[serde(default)]
    pub upgrade: Vec<String>,

    /// Dist strings downgraded in this revision.
    #[serde(default)]
    pub downgrade: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_dist_basic() {
        let pkg = Package::parse_dist("python-3.11.4-h955ad1f_0").unwrap();
        assert_eq!(pkg.name, "python");
        assert_eq!(pkg.version, "3.11.4");
        assert_eq!(pkg.build, "h955ad1f_0");
        assert_eq!(pkg.channel, None);
    }

    #[test]
    fn test_parse_dist_hyphenated_name() {
        let pkg = Package::parse_dist("python-dateutil-2.8.2-py311_0").unwrap();
        assert_eq!(pkg.name, "python-dateutil");
        assert_eq!(pkg.version, "2.8.2");
        assert_eq!(pkg.build, "py311_0");
    }

    #[test]
    fn test_parse_dist_with_channel() {
        let pkg = Package::parse_dist("conda-forge::numpy-1.26.0-py311h64a7726_0").unwrap();
        assert_eq!(pkg.channel.as_deref(), Some("conda-forge"));
        assert_eq!(pkg.name, "numpy");
        assert_eq!(pkg.version, "1.26.0");
    }

    #[test]
    fn test_parse_dist_filename_suffix() {
        let pkg = Package::parse_dist("zlib-1.2.13-0.tar.bz2").unwrap();
        assert_eq!(pkg.name, "zlib");
        assert_eq!(pkg.build, "0");
    }

    #[test]
    fn test_parse_dist_too_few_fields() {
        assert!(Package::parse_dist("python").is_none());
        assert!(Package::parse_dist("python-3.11").is_none());
        assert!(Package::parse_dist("").is_none());
    }

    #[test]
    fn test_from_list_entry_string() {
        let pkg = Package::from_list_entry(&json!("readline-8.2-h5eee18b_0")).unwrap();
        assert_eq!(pkg.name, "readline");
    }

    #[test]
    fn test_from_list_entry_object() {
        let pkg = Package::from_list_entry(&json!({
            "name": "numpy",
            "version": "1.26.0",
            "build_string": "py311h64a7726_0",
            "channel": "defaults"
        }))
        .unwrap();
        assert_eq!(pkg.name, "numpy");
        assert_eq!(pkg.build, "py311h64a7726_0");
        assert_eq!(pkg.channel.as_deref(), Some("defaults"));
    }

    #[test]
    fn test_from_list_entry_rejects_other_shapes() {
        assert!(Package::from_list_entry(&json!(42)).is_none());
        assert!(Package::from_list_entry(&json!(null)).is_none());
    }

    #[test]
    fn test_dist_roundtrip() {
        let pkg = Package::parse_dist("python-3.11.4-h955ad1f_0").unwrap();
        assert_eq!(pkg.dist(), "python-3.11.4-h955ad1f_0");
    }

    #[test]
    fn test_revision_deserialize() {
        let rev: Revision = serde_json::from_value(json!({
            "rev": 1,
            "date": "2024-01-15 10:32:01",
            "install": ["numpy-1.26.0-py311h64a7726_0"]
        }))
        .unwrap();
        assert_eq!(rev.rev, 1);
        assert_eq!(rev.install.len(), 1);
        assert!(rev.remove.is_empty());
        assert!(rev.upgrade.is_empty());
    }
}
