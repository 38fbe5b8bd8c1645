//! Scenario files and the replay loop.
//!
//! A scenario is a JSON document listing transactions in ledger order:
//!
//! ```json
//! {
//!   "name": "htla",
//!   "vars": { "secret": "HTLA-SDK-DEMO" },
//!   "steps": [
//!     { "at": 1000, "caller": "creator", "contract": "htla",
//!       "function": "GenerateHash", "args": ["${secret}", "SHA256"],
//!       "save_as": "hash" },
//!     { "at": 1000, "caller": "creator", "contract": "htla",
//!       "function": "CreateProposal",
//!       "args": ["10", "60", "${hash}", "SHA256", "relay"],
//!       "save_as": "proposal" },
//!     { "at": 1030, "caller": "relay", "contract": "htla",
//!       "function": "ConfirmProposal", "args": ["${proposal}", "wrong"],
//!       "expect": "PreimageMismatch" }
//!   ]
//! }
//! ```
//!
//! `expect` is `"ok"` (the default), a [`ContractError`] variant name, or an
//! [`ErrorKind`](pact_state::ErrorKind) such as `"not_found"`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use pact_core::Identity;
use pact_state::{
    apply_raw, ContractError, ContractParams, Event, EventLog, MemoryLedger, Response, TxContext,
};

/// Errors that stop a replay. Contract rejections are results, not errors.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("step {step}: unknown variable `{name}`")]
    UnknownVariable { step: usize, name: String },

    #[error("step {step}: unterminated `${{` in argument")]
    UnterminatedVariable { step: usize },

    #[error("step {step}: time goes backwards ({at} < {previous})")]
    TimeWentBackwards { step: usize, at: u64, previous: u64 },

    #[error("step {step}: response has no id or hash to save as `{name}`")]
    NothingToSave { step: usize, name: String },
}

/// What a step is expected to produce.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Expectation {
    /// The transaction is accepted.
    #[default]
    Ok,
    /// The transaction is rejected with this error name or kind.
    Rejected(String),
}

impl From<String> for Expectation {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("ok") {
            Expectation::Ok
        } else {
            Expectation::Rejected(s)
        }
    }
}

impl From<Expectation> for String {
    fn from(e: Expectation) -> Self {
        match e {
            Expectation::Ok => "ok".to_string(),
            Expectation::Rejected(s) => s,
        }
    }
}

impl Expectation {
    /// Whether `result` meets this expectation.
    pub fn matches(&self, result: &Result<Response, ContractError>) -> bool {
        match (self, result) {
            (Expectation::Ok, Ok(_)) => true,
            (Expectation::Rejected(want), Err(e)) => {
                want == e.name() || want == e.kind().as_str()
            }
            _ => false,
        }
    }
}

/// One scripted transaction.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Logical ledger time of the transaction.
    pub at: u64,
    /// Caller name; its bytes are the caller identity.
    pub caller: String,
    pub contract: String,
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub expect: Expectation,
    /// Variable receiving the returned id or hash.
    #[serde(default)]
    pub save_as: Option<String>,
}

/// A scripted run.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub devnet: bool,
    #[serde(default)]
    pub players_per_game: Option<u8>,
    #[serde(default)]
    pub stall_window: Option<u64>,
    /// Initial variables.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load a scenario from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// A notification as shown in reports.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventView {
    pub topic: String,
    pub payload: serde_json::Value,
}

impl From<&Event> for EventView {
    fn from(event: &Event) -> Self {
        let payload = serde_json::from_slice(&event.payload)
            .unwrap_or_else(|_| serde_json::Value::String(event.payload_str()));
        Self {
            topic: event.topic.clone(),
            payload,
        }
    }
}

/// How the ledger answered a step.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepOutcome {
    Accepted { response: Response },
    Rejected { error: String, kind: String, message: String },
}

impl From<&Result<Response, ContractError>> for StepOutcome {
    fn from(result: &Result<Response, ContractError>) -> Self {
        match result {
            Ok(response) => StepOutcome::Accepted {
                response: response.clone(),
            },
            Err(e) => StepOutcome::Rejected {
                error: e.name().to_string(),
                kind: e.kind().as_str().to_string(),
                message: e.to_string(),
            },
        }
    }
}

/// Result of one replayed step.
#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    /// One-based step number.
    pub index: usize,
    pub at: u64,
    pub caller: String,
    pub contract: String,
    pub function: String,
    /// Arguments after variable substitution.
    pub args: Vec<String>,
    pub outcome: StepOutcome,
    pub events: Vec<EventView>,
    pub expected: Expectation,
    pub passed: bool,
}

/// Result of a whole replay.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub steps: Vec<StepReport>,
    /// Records left in the ledger.
    pub records: usize,
    /// Variables at the end of the run.
    pub vars: BTreeMap<String, String>,
}

impl ScenarioReport {
    /// Whether every step met its expectation.
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|s| s.passed)
    }

    /// Steps that missed their expectation.
    pub fn failures(&self) -> Vec<&StepReport> {
        self.steps.iter().filter(|s| !s.passed).collect()
    }
}

/// A single-process replica driven one transaction at a time.
pub struct Simulator {
    ledger: MemoryLedger,
    events: EventLog,
    params: ContractParams,
    vars: BTreeMap<String, String>,
    clock: u64,
}

impl Simulator {
    /// Create a simulator with an empty ledger.
    pub fn new(params: ContractParams) -> Self {
        Self {
            ledger: MemoryLedger::new(),
            events: EventLog::new(),
            params,
            vars: BTreeMap::new(),
            clock: 0,
        }
    }

    /// Seed the variable table.
    pub fn with_vars(mut self, vars: BTreeMap<String, String>) -> Self {
        self.vars.extend(vars);
        self
    }

    /// The ledger.
    pub fn ledger(&self) -> &MemoryLedger {
        &self.ledger
    }

    /// Current variables.
    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    /// Replay one step; `index` is one-based.
    pub fn step(&mut self, index: usize, step: &Step) -> Result<StepReport, ScenarioError> {
        if step.at < self.clock {
            return Err(ScenarioError::TimeWentBackwards {
                step: index,
                at: step.at,
                previous: self.clock,
            });
        }
        self.clock = step.at;

        let args = step
            .args
            .iter()
            .map(|arg| substitute(arg, &self.vars, index))
            .collect::<Result<Vec<_>, _>>()?;

        let caller = Identity::from_bytes(step.caller.as_bytes());
        let ctx = TxContext::sequenced(step.at, caller, index as u64).with_params(self.params);
        let result = apply_raw(
            &mut self.ledger,
            &mut self.events,
            &ctx,
            &step.contract,
            &step.function,
            &args,
        );
        let events: Vec<EventView> = self.events.drain().iter().map(EventView::from).collect();

        if let (Some(name), Ok(response)) = (&step.save_as, &result) {
            let value = match response {
                Response::Id(v) | Response::Hash(v) => v.clone(),
                _ => {
                    return Err(ScenarioError::NothingToSave {
                        step: index,
                        name: name.clone(),
                    })
                }
            };
            self.vars.insert(name.clone(), value);
        }

        let passed = step.expect.matches(&result);
        debug!(
            step = index,
            function = %step.function,
            passed,
            "replayed step"
        );

        Ok(StepReport {
            index,
            at: step.at,
            caller: step.caller.clone(),
            contract: step.contract.clone(),
            function: step.function.clone(),
            args,
            outcome: StepOutcome::from(&result),
            events,
            expected: step.expect.clone(),
            passed,
        })
    }
}

/// Replay every step of `scenario` on a fresh ledger.
pub fn run_scenario(
    scenario: &Scenario,
    params: ContractParams,
) -> Result<ScenarioReport, ScenarioError> {
    info!(scenario = %scenario.name, steps = scenario.steps.len(), "replaying scenario");

    let mut sim = Simulator::new(params).with_vars(scenario.vars.clone());
    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (i, step) in scenario.steps.iter().enumerate() {
        steps.push(sim.step(i + 1, step)?);
    }

    Ok(ScenarioReport {
        name: scenario.name.clone(),
        steps,
        records: sim.ledger().len(),
        vars: sim.vars,
    })
}

/// Expand `${name}` references.
fn substitute(
    arg: &str,
    vars: &BTreeMap<String, String>,
    step: usize,
) -> Result<String, ScenarioError> {
    let mut out = String::with_capacity(arg.len());
    let mut rest = arg;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        let end = tail
            .find('}')
            .ok_or(ScenarioError::UnterminatedVariable { step })?;
        let name = &tail[..end];
        let value = vars.get(name).ok_or_else(|| ScenarioError::UnknownVariable {
            step,
            name: name.to_string(),
        })?;
        out.push_str(value);
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn step(json: &str) -> Step {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_substitute() {
        let v = vars(&[("id", "abc"), ("n", "7")]);
        assert_eq!(substitute("plain", &v, 1).unwrap(), "plain");
        assert_eq!(substitute("${id}", &v, 1).unwrap(), "abc");
        assert_eq!(substitute("x-${id}-${n}", &v, 1).unwrap(), "x-abc-7");
        assert!(matches!(
            substitute("${missing}", &v, 3),
            Err(ScenarioError::UnknownVariable { step: 3, .. })
        ));
        assert!(matches!(
            substitute("${id", &v, 2),
            Err(ScenarioError::UnterminatedVariable { step: 2 })
        ));
    }

    #[test]
    fn test_expectation_parsing() {
        let s = step(r#"{"at": 1, "caller": "a", "contract": "rps", "function": "InitLedger"}"#);
        assert_eq!(s.expect, Expectation::Ok);
        assert!(s.args.is_empty());

        let s = step(
            r#"{"at": 1, "caller": "a", "contract": "rps", "function": "GetGame",
                "args": ["g"], "expect": "not_found"}"#,
        );
        assert_eq!(s.expect, Expectation::Rejected("not_found".into()));
    }

    #[test]
    fn test_expectation_matches_name_or_kind() {
        let err: Result<Response, ContractError> =
            Err(ContractError::GameNotFound("g".into()));
        assert!(Expectation::Rejected("GameNotFound".into()).matches(&err));
        assert!(Expectation::Rejected("not_found".into()).matches(&err));
        assert!(!Expectation::Rejected("validation".into()).matches(&err));
        assert!(!Expectation::Ok.matches(&err));
        assert!(Expectation::Ok.matches(&Ok(Response::Unit)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Step, _> = serde_json::from_str(
            r#"{"at": 1, "caller": "a", "contract": "rps", "function": "X", "when": 3}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_simulator_saves_ids() {
        let mut sim = Simulator::new(ContractParams::default());
        let create = step(
            r#"{"at": 10, "caller": "seller", "contract": "auction",
                "function": "InitLedger", "args": ["20"], "save_as": "auction"}"#,
        );
        let report = sim.step(1, &create).unwrap();
        assert!(report.passed);
        let id = sim.vars()["auction"].clone();

        let bid = step(
            r#"{"at": 11, "caller": "alice", "contract": "auction",
                "function": "SubmitBid", "args": ["${auction}", "5"]}"#,
        );
        let report = sim.step(2, &bid).unwrap();
        assert!(report.passed);
        assert_eq!(report.args, vec![id, "5".to_string()]);
    }

    #[test]
    fn test_time_goes_backwards() {
        let mut sim = Simulator::new(ContractParams::default());
        let later = step(r#"{"at": 10, "caller": "a", "contract": "rps", "function": "InitLedger"}"#);
        let earlier = step(r#"{"at": 9, "caller": "a", "contract": "rps", "function": "InitLedger"}"#);
        sim.step(1, &later).unwrap();
        assert!(matches!(
            sim.step(2, &earlier),
            Err(ScenarioError::TimeWentBackwards { at: 9, previous: 10, .. })
        ));
    }

    #[test]
    fn test_nothing_to_save() {
        let mut sim = Simulator::new(ContractParams::default());
        let s = step(
            r#"{"at": 1, "caller": "a", "contract": "rps", "function": "InitLedger",
                "save_as": "game"}"#,
        );
        sim.step(1, &s).unwrap();
        let join = step(
            r#"{"at": 2, "caller": "a", "contract": "rps", "function": "JoinGame",
                "args": ["${game}"], "save_as": "nothing"}"#,
        );
        assert!(matches!(
            sim.step(2, &join),
            Err(ScenarioError::NothingToSave { step: 2, .. })
        ));
    }

    #[test]
    fn test_rejection_recorded() {
        let mut sim = Simulator::new(ContractParams::default());
        let s = step(
            r#"{"at": 1, "caller": "a", "contract": "htla", "function": "GenerateHash",
                "args": ["x", "MD5"], "expect": "UnsupportedAlgorithm"}"#,
        );
        let report = sim.step(1, &s).unwrap();
        assert!(report.passed);
        match report.outcome {
            StepOutcome::Rejected { error, kind, .. } => {
                assert_eq!(error, "UnsupportedAlgorithm");
                assert_eq!(kind, "unsupported_input");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
