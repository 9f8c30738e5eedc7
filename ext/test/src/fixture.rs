//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the destructure engine.
//!
//! Every case gets a fresh binding set (seeded from `prebound`), builds the
//! schema against it, and matches the case's data. After a failed match the
//! binding set must hold exactly the pre-bound names again.

use crate::config::SchemaConfig;
use crate::decode;
use destructure::{match_data, BindingSet, Error, Value};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub schema: SchemaConfig,
    /// Names bound before each case runs.
    #[serde(default)]
    pub prebound: BTreeMap<String, Value>,
    pub cases: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub data: Value,
    pub expect: Expect,
    /// Full binding set expected after a successful match.
    #[serde(default)]
    pub bindings: Option<BTreeMap<String, Value>>,
    /// Substring the error message must contain.
    #[serde(default)]
    pub error: Option<String>,
}

/// Expected outcome of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expect {
    Match,
    Mismatch,
    SchemaError,
    BindError,
}

impl Expect {
    fn of(result: &Result<Value, Error>) -> Self {
        match result {
            Ok(_) => Self::Match,
            Err(Error::Match(_) | Error::Guard(_)) => Self::Mismatch,
            Err(Error::Schema(_)) => Self::SchemaError,
            Err(Error::Bind(_)) => Self::BindError,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub detail: String,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    fn bindings(&self) -> BindingSet {
        self.prebound
            .iter()
            .fold(BindingSet::new(), |set, (k, v)| set.with(k.as_str(), decode(v.clone())))
    }

    fn run_case(&self, case: &TestCase) -> CaseResult {
        let bindings = self.bindings();
        let schema = self.schema.build(&bindings);
        let data = decode(case.data.clone());
        let result = match_data(&schema, &data);

        let actual = Expect::of(&result);
        let mut problems = Vec::new();
        if actual != case.expect {
            problems.push(format!("expected {:?}, got {result:?}", case.expect));
        }

        match &result {
            Ok(matched) if *matched != data => {
                problems.push(format!("result {matched:?} differs from data {data:?}"));
            }
            Ok(_) => {}
            Err(e) => {
                if let Some(needle) = &case.error {
                    let message = e.to_string();
                    if !message.contains(needle.as_str()) {
                        problems.push(format!("error {message:?} does not mention {needle:?}"));
                    }
                }
            }
        }

        let snapshot = bindings.snapshot();
        let expected = match (&result, &case.bindings) {
            (Ok(_), Some(expected)) => Some(decode_all(expected)),
            (Ok(_), None) => None,
            (Err(_), _) => Some(decode_all(&self.prebound)),
        };
        if let Some(expected) = expected {
            if snapshot != expected {
                problems.push(format!("bindings {snapshot:?}, expected {expected:?}"));
            }
        }

        CaseResult {
            case_name: case.name.clone(),
            passed: problems.is_empty(),
            detail: problems.join("; "),
        }
    }

    /// Run all test cases and return results
    pub fn run(&self) -> Vec<CaseResult> {
        self.cases.iter().map(|case| self.run_case(case)).collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: {}",
                self.name, result.case_name, result.detail
            );
        }
    }
}

fn decode_all(values: &BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    values
        .iter()
        .map(|(k, v)| (k.clone(), decode(v.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r"
name: pair
schema:
  type: seq
  items: [{type: bind, name: a}, {type: literal, value: 2}]
cases:
  - name: hit
    data: [1, 2]
    expect: match
    bindings: {a: 1}
  - name: miss
    data: [1, 3]
    expect: mismatch
    error: literal
";

    #[test]
    fn test_fixture_runs() {
        let fixture = Fixture::from_yaml(FIXTURE).unwrap();
        let results = fixture.run();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }

    #[test]
    fn test_wrong_expectation_is_reported() {
        let yaml = FIXTURE.replace("expect: mismatch", "expect: match");
        let fixture = Fixture::from_yaml(&yaml).unwrap();
        let results = fixture.run();
        assert!(results[0].passed);
        assert!(!results[1].passed);
        assert!(results[1].detail.contains("expected Match"));
    }

    #[test]
    fn test_multi_document() {
        let yaml = format!("{FIXTURE}---\n{FIXTURE}");
        assert_eq!(Fixture::from_yaml_multi(&yaml).unwrap().len(), 2);
    }
}
