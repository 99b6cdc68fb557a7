//! Schema validation for YChaos test plans.
//!
//! A test plan is a YAML or JSON document describing a chaos experiment: the
//! machines to target, how many of them to hit, and the fault-injection agents
//! to run. This crate validates plans and resolves their host selections:
//!
//! ```text
//! text → parse_document → Value → validate_data → TestPlan
//!                                                    └─ MachineTargetDefinition::resolve_hosts → Vec<Hostname>
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! let yaml = r#"
//! description: Burn CPU on the web tier
//! attack:
//!   target_type: machine
//!   target_config:
//!     blast_radius: 50
//!     hostpatterns:
//!       - web[01-04].example.com
//!     exclude:
//!       - web03.example.com
//!   agents:
//!     - type: cpu_burn
//!       config:
//!         duration: 60
//! "#;
//!
//! let plan = ychaos::validate_str(yaml).expect("valid test plan");
//! let target = plan.attack.machine_target().expect("machine target");
//! let hosts = target.resolve_hosts().expect("hosts resolve");
//! assert_eq!(hosts.len(), 3);
//! assert_eq!(target.attack_count(hosts.len()), 2);
//! ```
//!
//! Invalid plans report every problem at once:
//!
//! ```rust
//! use serde_json::json;
//!
//! let failure = ychaos::validate_data(&json!({
//!     "attack": { "target_type": "self", "agents": [] }
//! }))
//! .unwrap_err();
//! assert_eq!(failure.errors[0].path, "attack.agents");
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | yes     | Builds the `ychaos` binary (`testplan validate`, `testplan schema`). |

pub mod agents;
pub mod attack;
pub mod batch;
pub mod error;
pub mod hostname;
pub mod parse;
pub mod registry;
pub mod schema;
pub mod target;
pub mod testplan;
pub mod validate;

pub use error::*;
pub use hostname::{HostPattern, Hostname};
pub use testplan::TestPlan;

// Re-export entry-point functions at the crate root for convenience.
pub use batch::validate_paths;
pub use parse::parse_document;
pub use validate::{validate_data, validate_file, validate_str};
