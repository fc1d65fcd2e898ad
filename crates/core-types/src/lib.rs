#[cfg(feature = "serde-full")]
pub mod model;

#[cfg(feature = "serde-full")]
pub use model::{
    Action, ActionType, ActionTypeField, AssertionResult, AssertionSpec, BrowserName,
    ElementDescriptor, IframeIdentifier, KeyName, LoginMode, OtpSpec, OtpStorageType,
    OverallReport, RunRequest, SocialAuthSpec, StepResult, StepStatus, StorageData, TestCase,
    TestReport, VariableDescriptor, XPathSpec,
};
