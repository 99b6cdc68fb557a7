//! Execution configs: discriminator fields followed by their dependent payloads.
//!
//! Both schemas validate the discriminator (`type`, `target_type`) first and
//! only then validate the payload (`config`, `target_config`) against the
//! schema the discriminator selects. A missing or unknown discriminator skips
//! the payload entirely.

use crate::agents::{AgentConfig, AgentType};
use crate::registry::Variant;
use crate::schema::{FieldSpec, Record, Schema};
use crate::target::{TargetDefinition, TargetType};

/// One agent to execute against the target.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentExecutionConfig {
    pub agent_type: AgentType,
    pub config: AgentConfig,
}

impl Schema for AgentExecutionConfig {
    const NAME: &'static str = "AgentExecutionConfig";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required(
            "type",
            "Defines the agent type to be executed on the target. \
             The configuration of the agent is determined by this attribute",
        )
        .examples(&["cpu_burn", "no_op", "ping_disable", "traffic_block"]),
        FieldSpec::optional(
            "config",
            "{}",
            "The agent configuration for the selected agent type",
        ),
    ];

    fn from_record(record: &mut Record<'_>) -> Option<Self> {
        let agent_type = record.discriminator::<AgentType>("type")?;
        let config = record.dependent(agent_type, "config")?;
        Some(AgentExecutionConfig { agent_type, config })
    }
}

impl AgentExecutionConfig {
    pub fn tag(&self) -> &'static str {
        self.agent_type.tag()
    }
}

/// The attack section of a test plan: where to run, and what.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackConfig {
    pub target_type: TargetType,
    pub target_config: TargetDefinition,
    /// Agents to execute, in order. Never empty.
    pub agents: Vec<AgentExecutionConfig>,
}

impl Schema for AttackConfig {
    const NAME: &'static str = "AttackConfig";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required(
            "target_type",
            "Defines the target type used for the execution of agents. \
             The target_config schema is determined by this attribute",
        )
        .examples(&["self", "machine"]),
        FieldSpec::optional(
            "target_config",
            "{}",
            "Defines the targets for running the agents. May be null when target_type is self",
        ),
        FieldSpec::required(
            "agents",
            "List of agents to be executed on the target. Must contain at least one entry",
        ),
    ];

    fn from_record(record: &mut Record<'_>) -> Option<Self> {
        let target_type = record.discriminator::<TargetType>("target_type");
        let target_config = target_type.and_then(|t| record.dependent(t, "target_config"));
        let agents = record.schema_list::<AgentExecutionConfig>("agents", true);
        let agents = record.min_items("agents", agents, 1);

        Some(AttackConfig {
            target_type: target_type?,
            target_config: target_config?,
            agents: agents?,
        })
    }
}

impl AttackConfig {
    /// The machine target, when `target_type` is `machine`.
    pub fn machine_target(&self) -> Option<&crate::target::MachineTargetDefinition> {
        self.target_config.as_machine()
    }
}
