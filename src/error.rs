use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Classification of a single validation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The raw value cannot be coerced to the declared type.
    Type,
    /// A required field is absent.
    Missing,
    /// The mapping carries a key the schema does not declare.
    UnknownField,
    /// A discriminator names a tag outside its registry.
    Discriminator,
    /// The payload does not fit the schema selected by its discriminator.
    DependentPayload,
    /// A collection that must be non-empty is empty.
    Cardinality,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Type => "type",
            ErrorKind::Missing => "missing",
            ErrorKind::UnknownField => "unknown_field",
            ErrorKind::Discriminator => "discriminator",
            ErrorKind::DependentPayload => "dependent_payload",
            ErrorKind::Cardinality => "cardinality",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violated constraint, located by its dotted field path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    /// The path as shown to users; the document root renders as `<root>`.
    pub fn display_path(&self) -> &str {
        if self.path.is_empty() {
            "<root>"
        } else {
            &self.path
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.display_path(), self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Every error found while validating a single document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub errors: Vec<ValidationError>,
}

impl ValidationFailure {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Errors of the given kind, in discovery order.
    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    /// The first error recorded at exactly `path`.
    pub fn at(&self, path: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.path == path)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.errors.len() == 1 { "" } else { "s" };
        write!(f, "{} validation error{} for TestPlan", self.errors.len(), plural)?;
        for e in &self.errors {
            write!(f, "\n{}\n  {} ({})", e.display_path(), e.message, e.kind)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Error kind for parse failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    Syntax,
    Empty,
    MultiDocument,
}

/// Produced when document text cannot be turned into a value tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Combined error type for the text and file entry points.
#[derive(Debug)]
pub enum TestPlanError {
    Io { path: PathBuf, source: io::Error },
    Parse(ParseError),
    Validation(ValidationFailure),
}

impl TestPlanError {
    /// True when the plan file itself does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TestPlanError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    /// The structured failure, when the document was read but did not validate.
    pub fn validation(&self) -> Option<&ValidationFailure> {
        match self {
            TestPlanError::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}

impl fmt::Display for TestPlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestPlanError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            TestPlanError::Parse(e) => write!(f, "Parse error: {}", e),
            TestPlanError::Validation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TestPlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TestPlanError::Io { source, .. } => Some(source),
            TestPlanError::Parse(e) => Some(e),
            TestPlanError::Validation(e) => Some(e),
        }
    }
}

impl From<ParseError> for TestPlanError {
    fn from(e: ParseError) -> Self {
        TestPlanError::Parse(e)
    }
}

impl From<ValidationFailure> for TestPlanError {
    fn from(e: ValidationFailure) -> Self {
        TestPlanError::Validation(e)
    }
}

/// A string rejected by [`crate::hostname::Hostname`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidHostname {
    pub value: String,
    pub reason: String,
}

impl fmt::Display for InvalidHostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid hostname: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidHostname {}

/// A string rejected by [`crate::hostname::HostPattern`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidHostPattern {
    pub pattern: String,
    pub reason: String,
}

impl fmt::Display for InvalidHostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid host pattern: {}", self.pattern, self.reason)
    }
}

impl std::error::Error for InvalidHostPattern {}

/// Raised while expanding a machine target into concrete hosts.
///
/// These describe the caller's environment rather than the document, so they
/// are never folded into a [`ValidationFailure`].
#[derive(Debug)]
pub enum TargetResolutionError {
    /// A host file is missing, unreadable, or not a regular file.
    HostFile { path: PathBuf, source: io::Error },
    /// A produced entry is not a valid hostname. `origin` names the file line
    /// or pattern it came from.
    InvalidHost { origin: String, source: InvalidHostname },
}

impl fmt::Display for TargetResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetResolutionError::HostFile { path, source } => {
                write!(f, "cannot read host file {}: {}", path.display(), source)
            }
            TargetResolutionError::InvalidHost { origin, source } => {
                write!(f, "{}: {}", origin, source)
            }
        }
    }
}

impl std::error::Error for TargetResolutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TargetResolutionError::HostFile { source, .. } => Some(source),
            TargetResolutionError::InvalidHost { source, .. } => Some(source),
        }
    }
}
