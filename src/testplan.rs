use crate::agents::{CpuBurnConfig, NoOpConfig, PingDisableConfig, TrafficBlockConfig};
use crate::attack::{AgentExecutionConfig, AttackConfig};
use crate::schema::{FieldSpec, Record, Schema, describe};
use crate::target::{MachineTargetDefinition, SelfTargetDefinition};

/// The top-level test plan document.
#[derive(Clone, Debug, PartialEq)]
pub struct TestPlan {
    pub description: String,
    pub attack: AttackConfig,
}

impl Schema for TestPlan {
    const NAME: &'static str = "TestPlan";
    const DESCRIPTION: &'static str =
        "A chaos experiment: the targets to attack and the agents to run against them.";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("description", "\"\"", "Description of the test plan"),
        FieldSpec::required("attack", "The attack configuration"),
    ];

    fn from_record(record: &mut Record<'_>) -> Option<Self> {
        let description = record.optional("description", String::new());
        let attack = record.schema::<AttackConfig>("attack");
        Some(TestPlan {
            description: description?,
            attack: attack?,
        })
    }
}

/// Markdown field reference for every schema reachable from [`TestPlan`].
pub fn schema_reference() -> String {
    [
        describe::<TestPlan>(),
        describe::<AttackConfig>(),
        describe::<AgentExecutionConfig>(),
        describe::<SelfTargetDefinition>(),
        describe::<MachineTargetDefinition>(),
        describe::<NoOpConfig>(),
        describe::<CpuBurnConfig>(),
        describe::<PingDisableConfig>(),
        describe::<TrafficBlockConfig>(),
    ]
    .join("\n")
}
