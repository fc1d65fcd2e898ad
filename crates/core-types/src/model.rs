//! Test-execution data model: the declarative shape a test case, its
//! actions, and its results take on the wire and inside the interpreter.
//!
//! Gated behind the `serde-full` feature (see `lib.rs`) since every field
//! here is meaningful only with `serde_json::Value` and friends in scope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A test case: a starting URL and an ordered list of actions.
///
/// Read-only to the core: fetched once per request/test and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// One of the fixed action kinds, or a named keyboard key to press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionType {
    SystemNavigate,
    Navigate,
    MouseDown,
    Change,
    Hover,
    Scroll,
    FileSelect,
    DragStart,
    DragEnd,
    Key(KeyName),
    /// Anything not in the known set; the interpreter fails these with
    /// "Unsupported action type: X".
    Unknown(String),
}

impl ActionType {
    fn as_wire_str(&self) -> &str {
        match self {
            ActionType::SystemNavigate => "System_Navigate",
            ActionType::Navigate => "navigate",
            ActionType::MouseDown => "mousedown",
            ActionType::Change => "change",
            ActionType::Hover => "hover",
            ActionType::Scroll => "scroll",
            ActionType::FileSelect => "fileSelect",
            ActionType::DragStart => "dragstart",
            ActionType::DragEnd => "dragend",
            ActionType::Key(k) => k.as_str(),
            ActionType::Unknown(s) => s.as_str(),
        }
    }

    fn from_wire_str(s: &str) -> Self {
        match s {
            "System_Navigate" => ActionType::SystemNavigate,
            "navigate" => ActionType::Navigate,
            "mousedown" => ActionType::MouseDown,
            "change" => ActionType::Change,
            "hover" => ActionType::Hover,
            "scroll" => ActionType::Scroll,
            "fileSelect" => ActionType::FileSelect,
            "dragstart" => ActionType::DragStart,
            "dragend" => ActionType::DragEnd,
            other => match KeyName::from_str(other) {
                Some(key) => ActionType::Key(key),
                None => ActionType::Unknown(other.to_string()),
            },
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

impl Serialize for ActionType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_wire_str())
    }
}

impl<'de> Deserialize<'de> for ActionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(ActionType::from_wire_str(&raw))
    }
}

/// A keyboard key name the interpreter can press on the top-page keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyName {
    Enter,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
}

impl KeyName {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyName::Enter => "Enter",
            KeyName::Tab => "Tab",
            KeyName::ArrowUp => "ArrowUp",
            KeyName::ArrowDown => "ArrowDown",
            KeyName::ArrowLeft => "ArrowLeft",
            KeyName::ArrowRight => "ArrowRight",
            KeyName::Escape => "Escape",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "Enter" => KeyName::Enter,
            "Tab" => KeyName::Tab,
            "ArrowUp" => KeyName::ArrowUp,
            "ArrowDown" => KeyName::ArrowDown,
            "ArrowLeft" => KeyName::ArrowLeft,
            "ArrowRight" => KeyName::ArrowRight,
            "Escape" => KeyName::Escape,
            _ => return None,
        })
    }
}

/// `{ src }` — identifies an iframe by the URL it was recorded with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IframeIdentifier {
    pub src: String,
}

/// `xpath` is either a single string or an ordered list; normalized to a
/// list internally (§9 Design Notes: "xpath is normalized to a list").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XPathSpec {
    Single(String),
    List(Vec<String>),
}

impl XPathSpec {
    pub fn into_list(self) -> Vec<String> {
        match self {
            XPathSpec::Single(s) => vec![s],
            XPathSpec::List(list) => list,
        }
    }

    pub fn as_list(&self) -> Vec<&str> {
        match self {
            XPathSpec::Single(s) => vec![s.as_str()],
            XPathSpec::List(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

/// A bundle of selectors and snapshot values identifying a DOM element
/// across runs.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementDescriptor {
    pub unique_selector: Option<String>,
    pub xpath: Option<XPathSpec>,
    pub is_alert: Option<bool>,
    pub value: Option<String>,
    pub text_content: Option<String>,
}

impl ElementDescriptor {
    pub fn is_alert(&self) -> bool {
        self.is_alert.unwrap_or(false)
    }

    pub fn xpath_list(&self) -> Vec<String> {
        self.xpath
            .clone()
            .map(XPathSpec::into_list)
            .unwrap_or_default()
    }
}

/// Built-in generator or stored-value request attached to a `change` action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDescriptor {
    pub name: String,
    #[serde(default)]
    pub length: Option<usize>,
}

/// `fileSelect`'s `storageData`: a file name, MIME type, and a data URL
/// whose payload is base64 after the first comma.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageData {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub content: String,
}

impl StorageData {
    /// The base64 payload, i.e. everything after the data URL's first comma.
    pub fn base64_payload(&self) -> &str {
        match self.content.find(',') {
            Some(idx) => &self.content[idx + 1..],
            None => self.content.as_str(),
        }
    }
}

/// `{ value }` attached to an assertion kind in an action's assertion map.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssertionSpec {
    #[serde(default)]
    pub value: String,
}

/// One declarative step in a test case.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionTypeField,
    pub sequence: Option<u32>,
    pub description: Option<String>,
    pub element: Option<ElementDescriptor>,
    pub is_top_frame: Option<bool>,
    pub iframe_identifier: Option<IframeIdentifier>,
    pub url: Option<String>,
    pub value: Option<String>,
    pub variable: Option<VariableDescriptor>,
    pub scroll_x: Option<f64>,
    pub scroll_y: Option<f64>,
    pub container_x_path: Option<String>,
    pub storage_data: Option<StorageData>,
    pub drop_target: Option<ElementDescriptor>,
    pub wait: Option<f64>,
    #[serde(deserialize_with = "deserialize_assertions")]
    #[serde(serialize_with = "serialize_assertions")]
    pub assertions: Vec<(String, AssertionSpec)>,
}

/// Wrapper so `Action` can `#[derive(Default)]` while `ActionType` has no
/// natural default; defaults to `Unknown("")`, which the interpreter
/// rejects the same way it rejects any other unrecognized type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionTypeField(pub ActionType);

impl Default for ActionTypeField {
    fn default() -> Self {
        ActionTypeField(ActionType::Unknown(String::new()))
    }
}

impl std::ops::Deref for ActionTypeField {
    type Target = ActionType;
    fn deref(&self) -> &ActionType {
        &self.0
    }
}

impl Serialize for ActionTypeField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ActionTypeField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(ActionTypeField(ActionType::deserialize(deserializer)?))
    }
}

impl Action {
    /// `sequence`, falling back to the 1-based list index.
    pub fn sequence_or(&self, index: usize) -> u32 {
        self.sequence.unwrap_or(index as u32 + 1)
    }

    /// `description`, falling back to the action's type name.
    pub fn description_or_type(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| self.action_type.0.to_string())
    }

    pub fn is_top_frame(&self) -> bool {
        self.is_top_frame.unwrap_or(true)
    }

    /// Inter-step delay in seconds; defaults to 1.
    pub fn wait_seconds(&self) -> f64 {
        self.wait.unwrap_or(1.0)
    }
}

fn deserialize_assertions<'de, D>(deserializer: D) -> Result<Vec<(String, AssertionSpec)>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    // serde_json's `preserve_order` feature keeps a `Map` in source key
    // order, so iterating it reproduces the declared assertion order that
    // the evaluator must respect (§4.5: "Iterate assertions in declared
    // order; stop at first failure").
    let raw: Option<serde_json::Map<String, Value>> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let mut out = Vec::with_capacity(raw.len());
    for (kind, value) in raw {
        let spec: AssertionSpec = serde_json::from_value(value).map_err(serde::de::Error::custom)?;
        out.push((kind, spec));
    }
    Ok(out)
}

fn serialize_assertions<S>(
    assertions: &[(String, AssertionSpec)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;
    let mut map = serializer.serialize_map(Some(assertions.len()))?;
    for (kind, spec) in assertions {
        map.serialize_entry(kind, spec)?;
    }
    map.end()
}

/// `pass` | `fail`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pass,
    Fail,
}

impl StepStatus {
    pub fn from_bool(success: bool) -> Self {
        if success {
            StepStatus::Pass
        } else {
            StepStatus::Fail
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, StepStatus::Pass)
    }
}

/// `{ type, message, success }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub success: bool,
}

/// `{ sequence, description, status, message, assertions }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub sequence: u32,
    pub description: String,
    pub status: StepStatus,
    pub message: String,
    pub assertions: Vec<AssertionResult>,
}

/// Per-test-case summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub test_case_id: String,
    pub test_case_name: String,
    pub status: StepStatus,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
    pub results: Vec<StepResult>,
}

impl TestReport {
    /// Builds the summary counters from `results`, per invariants I1–I3:
    /// a `StepResult` exists for every executed step and nothing beyond;
    /// `skipped` is always 0 in the current policy.
    pub fn summarize(
        test_case_id: String,
        test_case_name: String,
        results: Vec<StepResult>,
    ) -> Self {
        let passed = results.iter().filter(|r| r.status.is_pass()).count() as u32;
        let failed = results.len() as u32 - passed;
        let total = results.len() as u32;
        let status = if failed == 0 {
            StepStatus::Pass
        } else {
            StepStatus::Fail
        };
        TestReport {
            test_case_id,
            test_case_name,
            status,
            passed,
            failed,
            skipped: 0,
            total,
            results,
        }
    }
}

/// Aggregation over a batch run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallReport {
    pub status: StepStatus,
    pub total_test_cases: u32,
    pub passed: u32,
    pub failed: u32,
    pub test_cases: Vec<TestReport>,
}

impl OverallReport {
    pub fn from_reports(reports: Vec<TestReport>) -> Self {
        let passed = reports.iter().filter(|r| r.status.is_pass()).count() as u32;
        let total = reports.len() as u32;
        let failed = total - passed;
        let status = if failed == 0 {
            StepStatus::Pass
        } else {
            StepStatus::Fail
        };
        OverallReport {
            status,
            total_test_cases: total,
            passed,
            failed,
            test_cases: reports,
        }
    }
}

/// `'social'` | `'otp'`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMode {
    Social,
    Otp,
}

/// `'localStorage'` | `'sessionStorage'` | `'cookies'`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OtpStorageType {
    LocalStorage,
    SessionStorage,
    Cookies,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAuthSpec {
    pub auth_test_case_id: String,
}

/// `object` is a JSON string or an already-parsed object; normalized to a
/// `serde_json::Value` and re-parsed from string form on demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpSpec {
    pub storage_type: OtpStorageType,
    #[serde(default = "default_otp_object")]
    pub object: Value,
}

fn default_otp_object() -> Value {
    Value::Object(Default::default())
}

impl OtpSpec {
    /// `object` parsed as a flat string->string map, accepting either a
    /// JSON object or a JSON-encoded string of one (§4.7.2).
    pub fn object_as_map(&self) -> Vec<(String, String)> {
        let value = match &self.object {
            Value::String(s) => serde_json::from_str::<Value>(s).unwrap_or(Value::Null),
            other => other.clone(),
        };
        match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| {
                    let s = match v {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (k, s)
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// `'chromium'` | `'firefox'` | `'webkit'`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserName {
    Chromium,
    Firefox,
    Webkit,
}

impl Default for BrowserName {
    fn default() -> Self {
        BrowserName::Chromium
    }
}

/// The request body accepted by `POST /api/run-automation`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunRequest {
    pub test_case_id: Option<String>,
    pub module_ids: Option<Vec<String>>,
    pub login_required: Option<bool>,
    pub login_mode: Option<LoginMode>,
    pub social_auth: Option<SocialAuthSpec>,
    pub otp: Option<OtpSpec>,
    pub browser_name: Option<BrowserName>,
    pub headless: Option<bool>,
    pub user_id: Option<String>,
    pub project_id: Option<String>,
}

impl RunRequest {
    /// Rejects payloads that are neither `testCaseId` nor a non-empty
    /// `moduleIds` (§4.7.1).
    pub fn is_valid(&self) -> bool {
        let has_test_case = self.test_case_id.as_deref().is_some_and(|s| !s.is_empty());
        let has_modules = self
            .module_ids
            .as_ref()
            .is_some_and(|ids| !ids.is_empty());
        has_test_case || has_modules
    }

    pub fn browser_name(&self) -> BrowserName {
        self.browser_name.unwrap_or_default()
    }
}
