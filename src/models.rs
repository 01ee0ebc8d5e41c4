use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expression::SpdxExpression;

/// The stable key of a project or package: `type:namespace:name:version`.
///
/// Ordering is lexicographic over the tuple, in field order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    pub r#type: String,
    pub namespace: String,
    pub name: String,
    pub version: String,
}

impl Identifier {
    pub fn new(
        r#type: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            r#type: r#type.into(),
            namespace: namespace.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.r#type, self.namespace, self.name, self.version
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identifier '{0}' must have the form 'type:namespace:name:version'")]
pub struct InvalidIdentifier(pub String);

impl FromStr for Identifier {
    type Err = InvalidIdentifier;

    /// Parse `type:namespace:name:version`. The version is everything after
    /// the third colon, so versions containing colons survive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(4, ':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(t), Some(ns), Some(name), Some(version)) if !t.is_empty() && !name.is_empty() => {
                Ok(Identifier::new(t, ns, name, version))
            }
            _ => Err(InvalidIdentifier(s.to_string())),
        }
    }
}

impl TryFrom<String> for Identifier {
    type Error = InvalidIdentifier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.to_string()
    }
}

/// A line range inside one file. Lines are 1-based and inclusive.
///
/// Fields are private so every value has `start_line <= end_line`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTextLocation")]
pub struct TextLocation {
    path: String,
    start_line: u32,
    end_line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("text location {path}:{start_line}-{end_line} ends before it starts")]
pub struct InvalidTextLocation {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
}

impl TextLocation {
    pub fn new(
        path: impl Into<String>,
        start_line: u32,
        end_line: u32,
    ) -> Result<Self, InvalidTextLocation> {
        let path = path.into();
        if start_line > end_line {
            return Err(InvalidTextLocation {
                path,
                start_line,
                end_line,
            });
        }
        Ok(Self {
            path,
            start_line,
            end_line,
        })
    }

    /// A location spanning exactly one line.
    pub fn line(path: impl Into<String>, line: u32) -> Self {
        Self {
            path: path.into(),
            start_line: line,
            end_line: line,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn start_line(&self) -> u32 {
        self.start_line
    }

    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    pub fn width(&self) -> u32 {
        self.end_line - self.start_line
    }

    pub fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.path, self.start_line, self.end_line)
    }
}

#[derive(Deserialize)]
struct RawTextLocation {
    path: String,
    start_line: u32,
    end_line: u32,
}

impl TryFrom<RawTextLocation> for TextLocation {
    type Error = InvalidTextLocation;

    fn try_from(raw: RawTextLocation) -> Result<Self, Self::Error> {
        TextLocation::new(raw.path, raw.start_line, raw.end_line)
    }
}

/// A license detected by a scanner at a location in a source tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LicenseFinding {
    pub license: SpdxExpression,
    pub location: TextLocation,
}

impl LicenseFinding {
    pub fn new(license: SpdxExpression, location: TextLocation) -> Self {
        Self { license, location }
    }
}

/// A copyright statement detected by a scanner at a location in a source tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CopyrightFinding {
    pub statement: String,
    pub location: TextLocation,
}

impl CopyrightFinding {
    pub fn new(statement: impl Into<String>, location: TextLocation) -> Self {
        Self {
            statement: statement.into(),
            location,
        }
    }
}

/// Where a scanned file tree came from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// A checkout of a version control repository.
    Vcs {
        url: String,
        revision: String,
        #[serde(default)]
        path: String,
    },
    /// A downloaded source artifact.
    Artifact { url: String },
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Vcs { url, revision, path } if path.is_empty() => {
                write!(f, "{}@{}", url, revision)
            }
            Provenance::Vcs { url, revision, path } => write!(f, "{}@{}/{}", url, revision, path),
            Provenance::Artifact { url } => write!(f, "{}", url),
        }
    }
}

/// Where a resolved license was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LicenseSource {
    Concluded,
    Declared,
    Detected,
}

impl fmt::Display for LicenseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseSource::Concluded => write!(f, "concluded"),
            LicenseSource::Declared => write!(f, "declared"),
            LicenseSource::Detected => write!(f, "detected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hint,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Hint => write!(f, "hint"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic attached to a package or graph node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Issue {
    pub source: String,
    pub message: String,
    #[serde(default = "default_severity")]
    pub severity: Severity,
}

fn default_severity() -> Severity {
    Severity::Error
}

impl Issue {
    pub fn new(source: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.source, self.message)
    }
}
