//! Crate-level test doubles and behaviour tests.

use crate::descriptor::PluginDescriptor;
use crate::error::PluginError;
use crate::protocol::{ValidationError, ValidationRequest, ValidationResult};
use crate::runner::PluginExecutor;


/// Accepts every request.
pub(crate) struct AcceptingExecutor;

impl PluginExecutor for AcceptingExecutor {
    fn validate(
        &self,
        _descriptor: &PluginDescriptor,
        _request: &ValidationRequest,
    ) -> Result<ValidationResult, PluginError> {
        Ok(ValidationResult::success())
    }
}

/// Reports an error unless the request carries a non-blank `key`.
pub(crate) struct RequiredKeyExecutor {
    key: String,
}

impl RequiredKeyExecutor {
    pub(crate) fn new(key: &str) -> Self {
        Self {
            key: key.to_owned(),
        }
    }
}

impl PluginExecutor for RequiredKeyExecutor {
    fn validate(
        &self,
        _descriptor: &PluginDescriptor,
        request: &ValidationRequest,
    ) -> Result<ValidationResult, PluginError> {
        let present = request
            .properties()
            .get(&self.key)
            .is_some_and(|value| !value.trim().is_empty());
        if present {
            return Ok(ValidationResult::success());
        }
        Ok(ValidationResult::with_errors(vec![ValidationError::new(
            self.key.as_str(),
            format!("{} must not be blank.", self.key),
        )]))
    }
}

/// Fails every request as if the plugin crashed.
pub(crate) struct FailingExecutor;

impl PluginExecutor for FailingExecutor {
    fn validate(
        &self,
        descriptor: &PluginDescriptor,
        _request: &ValidationRequest,
    ) -> Result<ValidationResult, PluginError> {
        Err(PluginError::Invocation {
            plugin_id: descriptor.id().to_owned(),
            operation: String::from("validate"),
            message: String::from("plugin process exited"),
        })
    }
}
