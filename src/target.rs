//! Target definitions and host resolution.

use crate::error::{ErrorKind, TargetResolutionError, ValidationError};
use crate::hostname::{HostPattern, Hostname};
use crate::registry::Variant;
use crate::schema::{FieldSpec, Record, Schema, coerce};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

// ─── Registry ───────────────────────────────────────────────────────────────

/// Kind of target the agents run against. Serialized as `self` or `machine`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// The machine running the toolkit registers itself as the target.
    SelfTarget,
    /// Virtual machines or bare-metal hosts, selected by name.
    Machine,
}

impl Variant for TargetType {
    type Payload = TargetDefinition;

    const REGISTRY: &'static str = "target type";
    const VARIANTS: &'static [Self] = &[TargetType::SelfTarget, TargetType::Machine];

    fn tag(self) -> &'static str {
        match self {
            TargetType::SelfTarget => "self",
            TargetType::Machine => "machine",
        }
    }

    fn resolve(
        self,
        value: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) -> Option<TargetDefinition> {
        match self {
            TargetType::SelfTarget => {
                SelfTargetDefinition::validate(value, path, errors).map(TargetDefinition::SelfTarget)
            }
            TargetType::Machine => {
                MachineTargetDefinition::validate(value, path, errors).map(TargetDefinition::Machine)
            }
        }
    }
}

/// A resolved `target_config`.
#[derive(Clone, Debug, PartialEq)]
pub enum TargetDefinition {
    SelfTarget(SelfTargetDefinition),
    Machine(MachineTargetDefinition),
}

impl TargetDefinition {
    pub fn target_type(&self) -> TargetType {
        match self {
            TargetDefinition::SelfTarget(_) => TargetType::SelfTarget,
            TargetDefinition::Machine(_) => TargetType::Machine,
        }
    }

    pub fn as_machine(&self) -> Option<&MachineTargetDefinition> {
        match self {
            TargetDefinition::Machine(m) => Some(m),
            TargetDefinition::SelfTarget(_) => None,
        }
    }
}

// ─── Self ───────────────────────────────────────────────────────────────────

/// Run every agent on the invoking machine. Takes no configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelfTargetDefinition;

impl Schema for SelfTargetDefinition {
    const NAME: &'static str = "SelfTargetDefinition";
    const DESCRIPTION: &'static str =
        "Runs all agents on the machine where the tool is invoked. Selected by `target_type: self`.";
    const FIELDS: &'static [FieldSpec] = &[];

    fn from_record(_record: &mut Record<'_>) -> Option<Self> {
        Some(SelfTargetDefinition)
    }
}

// ─── Machine ────────────────────────────────────────────────────────────────

/// Virtual machines or bare-metal hosts selected by name, pattern, or file.
///
/// The effective host set is `(hostnames ∪ hostpatterns ∪ hostfiles) − exclude`.
/// Host files are only checked for existence during validation; their
/// contents are read and validated when the hosts are resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct MachineTargetDefinition {
    /// Percentage of the resolved hosts to attack. Values outside `[0, 100]`
    /// are accepted and clamped by [`MachineTargetDefinition::attack_count`].
    pub blast_radius: f64,
    pub hostnames: Vec<Hostname>,
    pub hostpatterns: Vec<HostPattern>,
    pub hostfiles: Vec<PathBuf>,
    pub exclude: Vec<Hostname>,
}

impl Schema for MachineTargetDefinition {
    const NAME: &'static str = "MachineTargetDefinition";
    const DESCRIPTION: &'static str =
        "Virtual machines or bare-metal hosts as targets. Selected by `target_type: machine`.";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("blast_radius", "The percentage of targets to be attacked")
            .examples(&["100", "25.5"]),
        FieldSpec::optional(
            "hostnames",
            "[]",
            "List of hosts as targets to run the agents on. These should be valid FQDNs.",
        )
        .examples(&["[myhost01.yahoo.com, mockhost.web.fe.yahoo.com]"]),
        FieldSpec::optional(
            "hostpatterns",
            "[]",
            "List of host patterns with a single number range within the pattern",
        )
        .examples(&["[myhost[12-34].yahoo.com, hostpattern[00-10].mock.yahoo.com]"]),
        FieldSpec::optional(
            "hostfiles",
            "[]",
            "List of files containing hostnames separated by a newline. Relative paths resolve \
             against the invoking directory. File contents are validated when hosts are resolved.",
        )
        .examples(&["[/home/awesomeuser/hostlist.txt]"]),
        FieldSpec::optional(
            "exclude",
            "[]",
            "List of hosts to be always excluded from the attack, whichever source listed them. \
             Matching ignores case and a trailing dot",
        ),
    ];

    fn from_record(record: &mut Record<'_>) -> Option<Self> {
        let blast_radius = record.required::<f64>("blast_radius");
        let hostnames = record.list::<Hostname>("hostnames");
        let hostpatterns = record.list::<HostPattern>("hostpatterns");
        let hostfiles = record.list_with("hostfiles", false, validate_hostfile);
        let exclude = record.list::<Hostname>("exclude");

        Some(MachineTargetDefinition {
            blast_radius: blast_radius?,
            hostnames: hostnames?,
            hostpatterns: hostpatterns?,
            hostfiles: hostfiles?,
            exclude: exclude?,
        })
    }
}

fn validate_hostfile(
    value: &Value,
    path: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<PathBuf> {
    let file: PathBuf = coerce(value, path, errors)?;
    let message = match fs::metadata(&file) {
        Ok(meta) if meta.is_file() => return Some(file),
        Ok(_) => format!("path \"{}\" does not point to a file", file.display()),
        Err(_) => format!("file or directory at path \"{}\" does not exist", file.display()),
    };
    errors.push(ValidationError::new(ErrorKind::Type, path, message));
    None
}

impl MachineTargetDefinition {
    /// Explicitly listed hosts, unchanged.
    pub fn iter_hostnames(&self) -> impl Iterator<Item = &Hostname> {
        self.hostnames.iter()
    }

    /// Hosts produced by every pattern, in declaration order.
    pub fn iter_hostpatterns(
        &self,
    ) -> impl Iterator<Item = Result<Hostname, TargetResolutionError>> + '_ {
        self.hostpatterns.iter().flat_map(|pattern| {
            pattern.iter().map(move |host| {
                host.map_err(|source| TargetResolutionError::InvalidHost {
                    origin: format!("host pattern '{}'", pattern),
                    source,
                })
            })
        })
    }

    /// Hosts listed in every host file, in declaration order.
    ///
    /// Each file is read in full when the iterator reaches it. Lines are
    /// trimmed and blank lines skipped. A file that cannot be read yields a
    /// single [`TargetResolutionError::HostFile`].
    pub fn iter_hostfiles(
        &self,
    ) -> impl Iterator<Item = Result<Hostname, TargetResolutionError>> + '_ {
        self.hostfiles.iter().flat_map(|file| {
            let (lines, failure) = match read_hostfile(file) {
                Ok(lines) => (lines, None),
                Err(e) => (Vec::new(), Some(e)),
            };
            failure.map(Err).into_iter().chain(lines.into_iter().map(move |(line_no, line)| {
                Hostname::new(line).map_err(|source| TargetResolutionError::InvalidHost {
                    origin: format!("{}:{}", file.display(), line_no),
                    source,
                })
            }))
        })
    }

    pub fn expand_hostpatterns(&self) -> Result<Vec<Hostname>, TargetResolutionError> {
        self.iter_hostpatterns().collect()
    }

    pub fn expand_hostfiles(&self) -> Result<Vec<Hostname>, TargetResolutionError> {
        self.iter_hostfiles().collect()
    }

    /// The effective host set, ordered by first appearance.
    ///
    /// Sources are consulted as hostnames, then patterns, then files. Names
    /// are compared by [`Hostname::dns_key`], so case and a trailing dot do
    /// not matter. Duplicates collapse to their first spelling and excluded
    /// hosts are dropped whichever source produced them.
    pub fn resolve_hosts(&self) -> Result<Vec<Hostname>, TargetResolutionError> {
        let excluded: HashSet<String> = self.exclude.iter().map(Hostname::dns_key).collect();
        let mut seen = HashSet::new();
        let mut hosts = Vec::new();

        let candidates = self
            .iter_hostnames()
            .cloned()
            .map(Ok)
            .chain(self.iter_hostpatterns())
            .chain(self.iter_hostfiles());
        for host in candidates {
            let host = host?;
            let key = host.dns_key();
            if !excluded.contains(&key) && seen.insert(key) {
                hosts.push(host);
            }
        }

        debug!(
            hostnames = self.hostnames.len(),
            hostpatterns = self.hostpatterns.len(),
            hostfiles = self.hostfiles.len(),
            excluded = self.exclude.len(),
            resolved = hosts.len(),
            "resolved machine target hosts"
        );
        Ok(hosts)
    }

    /// How many of `resolved` hosts the blast radius selects, rounded up and
    /// clamped to `[0, resolved]`.
    pub fn attack_count(&self, resolved: usize) -> usize {
        let count = (resolved as f64 * self.blast_radius / 100.0).ceil().max(0.0) as usize;
        count.min(resolved)
    }
}

fn read_hostfile(file: &Path) -> Result<Vec<(usize, String)>, TargetResolutionError> {
    let text = fs::read_to_string(file).map_err(|source| TargetResolutionError::HostFile {
        path: file.to_path_buf(),
        source,
    })?;
    Ok(text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_no, line)| (line_no, line.to_string()))
        .collect())
}
