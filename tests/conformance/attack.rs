use super::common::*;
use serde_json::json;
use ychaos::agents::{AgentConfig, AgentType};
use ychaos::attack::AgentExecutionConfig;
use ychaos::registry::Variant;
use ychaos::schema::Schema;
use ychaos::target::TargetType;
use ychaos::{ErrorKind, validate_data};

// ─── Registries ─────────────────────────────────────────────────────────────

#[test]
fn registry_tags_are_unique_and_round_trip() {
    fn check<V: Variant>() {
        let tags = V::tags();
        let mut deduped = tags.clone();
        deduped.dedup();
        assert_eq!(tags, deduped, "duplicate tag in {} registry", V::REGISTRY);
        for variant in V::VARIANTS {
            assert_eq!(V::from_tag(variant.tag()), Ok(*variant));
        }
    }
    check::<TargetType>();
    check::<AgentType>();
}

#[test]
fn unknown_tag_lists_legal_tags() {
    let err = TargetType::from_tag("container").unwrap_err();
    assert_eq!(err.registry, "target type");
    assert_eq!(err.tag, "container");
    assert_eq!(err.expected, vec!["machine", "self"]);
    assert_eq!(
        err.to_string(),
        "unrecognized target type 'container'; expected one of: machine, self"
    );
}

// ─── AgentExecutionConfig ───────────────────────────────────────────────────

#[test]
fn agent_payload_is_resolved_by_type() {
    let plan = validate_data(&self_plan(json!([
        { "type": "cpu_burn", "config": { "duration": 60 } },
        { "type": "no_op" },
        { "type": "ping_disable", "config": null },
        { "type": "traffic_block", "config": { "hosts": ["db01.example.com"], "ports": [443] } }
    ])))
    .unwrap();

    let agents = &plan.attack.agents;
    assert_eq!(agents.len(), 4);
    match &agents[0].config {
        AgentConfig::CpuBurn(c) => {
            assert_eq!(c.duration, 60.0);
            assert_eq!(c.cores_pct, 100.0);
            assert_eq!(c.common.start_delay, 0);
        }
        other => panic!("expected cpu_burn config, got {:?}", other),
    }
    assert_eq!(agents[1].config.agent_type(), AgentType::NoOp);
    match &agents[2].config {
        AgentConfig::PingDisable(c) => assert_eq!(c.duration, 300.0),
        other => panic!("expected ping_disable config, got {:?}", other),
    }
    match &agents[3].config {
        AgentConfig::TrafficBlock(c) => {
            assert_eq!(c.hosts[0].as_str(), "db01.example.com");
            assert_eq!(c.ports, vec![443]);
        }
        other => panic!("expected traffic_block config, got {:?}", other),
    }
    for agent in agents {
        assert_eq!(agent.agent_type, agent.config.agent_type());
        assert_eq!(agent.tag(), agent.agent_type.tag());
    }
}

#[test]
fn common_agent_fields_are_shared() {
    let plan = validate_data(&self_plan(json!([{
        "type": "no_op",
        "config": { "name": "warmup", "description": "does nothing", "start_delay": 5 }
    }])))
    .unwrap();
    let common = plan.attack.agents[0].config.common();
    assert_eq!(common.name.as_deref(), Some("warmup"));
    assert_eq!(common.description, "does nothing");
    assert_eq!(common.start_delay, 5);
}

#[test]
fn missing_payload_field_is_dependent_payload_error() {
    let failure = failure_of(&self_plan(json!([
        { "type": "cpu_burn", "config": { "cores_pct": 50 } }
    ])));
    assert_eq!(failure.len(), 1);
    let error = &failure.errors[0];
    assert_eq!(error.kind, ErrorKind::DependentPayload);
    assert_eq!(error.path, "attack.agents[0].config.duration");
    assert_eq!(error.message, "agent type 'cpu_burn': field required");
}

#[test]
fn unknown_agent_type_skips_payload_validation() {
    let failure = failure_of(&self_plan(json!([
        { "type": "disk_fill", "config": { "whatever": [1, 2, 3], "duration": "soon" } }
    ])));
    assert_eq!(failure.len(), 1, "only the discriminator should fail: {:?}", failure.errors);
    assert_has_error(&failure, ErrorKind::Discriminator, "attack.agents[0].type");
    assert!(
        failure.errors[0]
            .message
            .contains("expected one of: cpu_burn, no_op, ping_disable, traffic_block")
    );
}

#[test]
fn missing_agent_type_skips_payload_validation() {
    let failure = failure_of(&self_plan(json!([{ "config": { "bogus": true } }])));
    assert_eq!(failure.len(), 1);
    assert_has_error(&failure, ErrorKind::Missing, "attack.agents[0].type");
}

#[test]
fn non_string_agent_type_is_type_error() {
    let failure = failure_of(&self_plan(json!([{ "type": 7 }])));
    assert_has_error(&failure, ErrorKind::Type, "attack.agents[0].type");
    assert!(failure.of_kind(ErrorKind::DependentPayload).next().is_none());
}

#[test]
fn payload_errors_are_all_reported() {
    let failure = failure_of(&self_plan(json!([
        { "type": "cpu_burn", "config": { "duration": -1, "cores_pct": 0, "extra": 1 } }
    ])));
    let paths: Vec<&str> = failure.errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "attack.agents[0].config.extra",
            "attack.agents[0].config.duration",
            "attack.agents[0].config.cores_pct",
        ]
    );
    assert_eq!(failure.of_kind(ErrorKind::DependentPayload).count(), 3);
}

#[test]
fn traffic_block_requires_hosts() {
    let failure = failure_of(&self_plan(json!([
        { "type": "traffic_block", "config": { "hosts": [] } },
        { "type": "traffic_block", "config": { "hosts": ["ok.example.com"], "ports": [0] } }
    ])));
    assert_has_error(&failure, ErrorKind::DependentPayload, "attack.agents[0].config.hosts");
    assert_has_error(&failure, ErrorKind::DependentPayload, "attack.agents[1].config.ports");
}

#[test]
fn execution_config_validates_standalone() {
    let mut errors = Vec::new();
    let config = AgentExecutionConfig::validate(
        &json!({ "type": "cpu_burn", "config": {} }),
        "",
        &mut errors,
    );
    assert!(config.is_none());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "config.duration");
    assert_eq!(errors[0].kind, ErrorKind::DependentPayload);
}

// ─── AttackConfig ───────────────────────────────────────────────────────────

#[test]
fn empty_agents_is_cardinality_error() {
    let failure = failure_of(&machine_plan_with_agents(json!([])));
    assert_eq!(failure.len(), 1);
    assert_has_error(&failure, ErrorKind::Cardinality, "attack.agents");
}

#[test]
fn missing_agents_is_reported() {
    let failure = failure_of(&json!({ "attack": { "target_type": "self" } }));
    assert_has_error(&failure, ErrorKind::Missing, "attack.agents");
}

#[test]
fn unknown_target_type_skips_target_config() {
    let failure = failure_of(&json!({
        "attack": {
            "target_type": "container",
            "target_config": 42,
            "agents": []
        }
    }));
    let kinds: Vec<ErrorKind> = failure.errors.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ErrorKind::Discriminator, ErrorKind::Cardinality]);
    assert_has_error(&failure, ErrorKind::Discriminator, "attack.target_type");
}

#[test]
fn missing_target_type_is_reported() {
    let failure = failure_of(&json!({
        "attack": { "target_config": { "blast_radius": 10 }, "agents": [{ "type": "no_op" }] }
    }));
    assert_eq!(failure.len(), 1);
    assert_has_error(&failure, ErrorKind::Missing, "attack.target_type");
}

#[test]
fn target_config_shape_depends_on_target_type() {
    let failure = failure_of(&json!({
        "attack": {
            "target_type": "machine",
            "target_config": "everything",
            "agents": [{ "type": "no_op" }]
        }
    }));
    assert_eq!(failure.len(), 1);
    assert_has_error(&failure, ErrorKind::DependentPayload, "attack.target_config");
    assert!(failure.errors[0].message.contains("expected a mapping, got a string"));
}

fn machine_plan_with_agents(agents: serde_json::Value) -> serde_json::Value {
    json!({
        "attack": {
            "target_type": "machine",
            "target_config": { "blast_radius": 10, "hostnames": ["a.example.com"] },
            "agents": agents
        }
    })
}
