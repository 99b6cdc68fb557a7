//! Fault-injection agent types and their configuration schemas.
//!
//! Only configuration is modelled here; running an agent is out of scope.

use crate::error::ValidationError;
use crate::hostname::Hostname;
use crate::registry::Variant;
use crate::schema::{FieldSpec, Record, Schema};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentType {
    NoOp,
    CpuBurn,
    PingDisable,
    TrafficBlock,
}

impl Variant for AgentType {
    type Payload = AgentConfig;

    const REGISTRY: &'static str = "agent type";
    const VARIANTS: &'static [Self] = &[
        AgentType::NoOp,
        AgentType::CpuBurn,
        AgentType::PingDisable,
        AgentType::TrafficBlock,
    ];

    fn tag(self) -> &'static str {
        match self {
            AgentType::NoOp => "no_op",
            AgentType::CpuBurn => "cpu_burn",
            AgentType::PingDisable => "ping_disable",
            AgentType::TrafficBlock => "traffic_block",
        }
    }

    fn resolve(
        self,
        value: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) -> Option<AgentConfig> {
        match self {
            AgentType::NoOp => NoOpConfig::validate(value, path, errors).map(AgentConfig::NoOp),
            AgentType::CpuBurn => {
                CpuBurnConfig::validate(value, path, errors).map(AgentConfig::CpuBurn)
            }
            AgentType::PingDisable => {
                PingDisableConfig::validate(value, path, errors).map(AgentConfig::PingDisable)
            }
            AgentType::TrafficBlock => {
                TrafficBlockConfig::validate(value, path, errors).map(AgentConfig::TrafficBlock)
            }
        }
    }
}

/// A resolved agent `config` payload.
#[derive(Clone, Debug, PartialEq)]
pub enum AgentConfig {
    NoOp(NoOpConfig),
    CpuBurn(CpuBurnConfig),
    PingDisable(PingDisableConfig),
    TrafficBlock(TrafficBlockConfig),
}

impl AgentConfig {
    pub fn agent_type(&self) -> AgentType {
        match self {
            AgentConfig::NoOp(_) => AgentType::NoOp,
            AgentConfig::CpuBurn(_) => AgentType::CpuBurn,
            AgentConfig::PingDisable(_) => AgentType::PingDisable,
            AgentConfig::TrafficBlock(_) => AgentType::TrafficBlock,
        }
    }

    pub fn common(&self) -> &AgentCommon {
        match self {
            AgentConfig::NoOp(c) => &c.common,
            AgentConfig::CpuBurn(c) => &c.common,
            AgentConfig::PingDisable(c) => &c.common,
            AgentConfig::TrafficBlock(c) => &c.common,
        }
    }
}

// ─── Shared fields ──────────────────────────────────────────────────────────

/// Fields accepted by every agent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentCommon {
    pub name: Option<String>,
    pub description: String,
    /// Seconds to wait before the agent starts.
    pub start_delay: u64,
}

const NAME_FIELD: FieldSpec = FieldSpec::optional("name", "null", "Name of this agent instance");
const DESCRIPTION_FIELD: FieldSpec =
    FieldSpec::optional("description", "\"\"", "Free-form description of the agent");
const START_DELAY_FIELD: FieldSpec =
    FieldSpec::optional("start_delay", "0", "Seconds to wait before starting the agent");

const DEFAULT_DURATION: f64 = 300.0;

impl AgentCommon {
    fn read(record: &mut Record<'_>) -> Option<Self> {
        let name = record.optional::<Option<String>>("name", None);
        let description = record.optional("description", String::new());
        let start_delay = record.optional::<u64>("start_delay", 0);
        Some(AgentCommon {
            name: name?,
            description: description?,
            start_delay: start_delay?,
        })
    }
}

fn read_duration(record: &mut Record<'_>, default: Option<f64>) -> Option<f64> {
    let duration = match default {
        Some(default) => record.optional::<f64>("duration", default),
        None => record.required::<f64>("duration"),
    };
    record.check("duration", duration, |d| *d > 0.0, "duration must be greater than 0")
}

// ─── no_op ──────────────────────────────────────────────────────────────────

/// An agent that does nothing; useful for dry runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoOpConfig {
    pub common: AgentCommon,
}

impl Schema for NoOpConfig {
    const NAME: &'static str = "NoOpConfig";
    const DESCRIPTION: &'static str = "Configuration of the `no_op` agent.";
    const FIELDS: &'static [FieldSpec] = &[NAME_FIELD, DESCRIPTION_FIELD, START_DELAY_FIELD];

    fn from_record(record: &mut Record<'_>) -> Option<Self> {
        Some(NoOpConfig {
            common: AgentCommon::read(record)?,
        })
    }
}

// ─── cpu_burn ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct CpuBurnConfig {
    pub common: AgentCommon,
    /// Seconds to keep the CPU busy.
    pub duration: f64,
    /// Percentage of cores to burn, in `(0, 100]`.
    pub cores_pct: f64,
}

impl Schema for CpuBurnConfig {
    const NAME: &'static str = "CpuBurnConfig";
    const DESCRIPTION: &'static str = "Configuration of the `cpu_burn` agent.";
    const FIELDS: &'static [FieldSpec] = &[
        NAME_FIELD,
        DESCRIPTION_FIELD,
        START_DELAY_FIELD,
        FieldSpec::required("duration", "Seconds to run the CPU burn").examples(&["300"]),
        FieldSpec::optional("cores_pct", "100", "Percentage of CPU cores to burn")
            .examples(&["50", "100"]),
    ];

    fn from_record(record: &mut Record<'_>) -> Option<Self> {
        let common = AgentCommon::read(record);
        let duration = read_duration(record, None);
        let cores_pct = record.optional::<f64>("cores_pct", 100.0);
        let cores_pct = record.check(
            "cores_pct",
            cores_pct,
            |p| *p > 0.0 && *p <= 100.0,
            "cores_pct must be greater than 0 and at most 100",
        );
        Some(CpuBurnConfig {
            common: common?,
            duration: duration?,
            cores_pct: cores_pct?,
        })
    }
}

// ─── ping_disable ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct PingDisableConfig {
    pub common: AgentCommon,
    pub duration: f64,
}

impl Schema for PingDisableConfig {
    const NAME: &'static str = "PingDisableConfig";
    const DESCRIPTION: &'static str = "Configuration of the `ping_disable` agent.";
    const FIELDS: &'static [FieldSpec] = &[
        NAME_FIELD,
        DESCRIPTION_FIELD,
        START_DELAY_FIELD,
        FieldSpec::optional("duration", "300", "Seconds to keep ICMP echo disabled"),
    ];

    fn from_record(record: &mut Record<'_>) -> Option<Self> {
        let common = AgentCommon::read(record);
        let duration = read_duration(record, Some(DEFAULT_DURATION));
        Some(PingDisableConfig {
            common: common?,
            duration: duration?,
        })
    }
}

// ─── traffic_block ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct TrafficBlockConfig {
    pub common: AgentCommon,
    pub duration: f64,
    /// Hosts whose traffic is blocked. Never empty.
    pub hosts: Vec<Hostname>,
    pub ports: Vec<u16>,
}

impl Schema for TrafficBlockConfig {
    const NAME: &'static str = "TrafficBlockConfig";
    const DESCRIPTION: &'static str = "Configuration of the `traffic_block` agent.";
    const FIELDS: &'static [FieldSpec] = &[
        NAME_FIELD,
        DESCRIPTION_FIELD,
        START_DELAY_FIELD,
        FieldSpec::optional("duration", "300", "Seconds to keep traffic blocked"),
        FieldSpec::required("hosts", "Hosts to block traffic to and from")
            .examples(&["[db01.example.com]"]),
        FieldSpec::optional("ports", "[]", "Ports to block; empty blocks every port")
            .examples(&["[443, 8080]"]),
    ];

    fn from_record(record: &mut Record<'_>) -> Option<Self> {
        let common = AgentCommon::read(record);
        let duration = read_duration(record, Some(DEFAULT_DURATION));
        let hosts = record.list_with("hosts", true, crate::schema::coerce::<Hostname>);
        let hosts = record.min_items("hosts", hosts, 1);
        let ports = record.list::<u16>("ports");
        let ports = record.check(
            "ports",
            ports,
            |ports| !ports.contains(&0),
            "ports must be between 1 and 65535",
        );
        Some(TrafficBlockConfig {
            common: common?,
            duration: duration?,
            hosts: hosts?,
            ports: ports?,
        })
    }
}
