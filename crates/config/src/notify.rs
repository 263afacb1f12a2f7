//! Notification hooks

use crate::tools::ToolCommand;
use serde::{Deserialize, Serialize};
use taskwright_core::Result;

/// The `notify` section of `taskwright.json`
///
/// The failure hook runs once, after the first failing task has stopped the
/// run. It sees the run's environment plus `TASKWRIGHT_FAILED_TASK` and
/// `TASKWRIGHT_ERROR`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NotifyConfig {
    pub on_failure: Option<ToolCommand>,
}

impl NotifyConfig {
    /// The failure hook, if one is configured and enabled
    pub fn failure_hook(&self) -> Option<&ToolCommand> {
        self.on_failure.as_ref().filter(|hook| hook.enabled)
    }

    pub fn validate(&self) -> Result<()> {
        match &self.on_failure {
            Some(hook) => hook.validate("notify.onFailure"),
            None => Ok(()),
        }
    }
}
