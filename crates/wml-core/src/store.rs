//! Variable store
//!
//! Owns the variables tree of a running scenario and offers the operations a
//! scripting engine performs on it. Name errors are logged and swallowed:
//! a script that addresses a malformed path gets a blank value or a no-op,
//! never a crash.

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeValue;
use crate::config::Config;
use crate::error::VariableResult;
use crate::limits::Limits;
use crate::variable::{
    Policy, ReadAccess, SetMode, Strict, StrictAccess, VariableInfo, WriteAccess, parse_path,
};

const LOG_TARGET: &str = "wml::variables";

/// Scenario variables plus the limits used to resolve their names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableStore {
    variables: Config,
    #[serde(default)]
    limits: Limits,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            variables: Config::new(),
            limits,
        }
    }

    pub fn from_config(variables: Config, limits: Limits) -> Self {
        Self { variables, limits }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn set_limits(&mut self, limits: Limits) {
        self.limits = limits;
    }

    pub fn variables(&self) -> &Config {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Config {
        &mut self.variables
    }

    pub fn into_variables(self) -> Config {
        self.variables
    }

    // =========================================================================
    // Raw access
    // =========================================================================

    pub fn get_variable_access_read(&self, name: &str) -> VariableResult<ReadAccess<'_>> {
        VariableInfo::with_limits(name, &self.variables, &self.limits)
    }

    pub fn get_variable_access_write(&mut self, name: &str) -> VariableResult<WriteAccess<'_>> {
        VariableInfo::with_limits(name, &mut self.variables, &self.limits)
    }

    /// Access that fails instead of creating missing children
    pub fn get_variable_access_strict(&mut self, name: &str) -> VariableResult<StrictAccess<'_>> {
        VariableInfo::with_limits(name, &mut self.variables, &self.limits)
    }

    // =========================================================================
    // Scripting operations
    // =========================================================================

    /// Scalar value of `name`; blank when unset or when the name is invalid
    pub fn get_variable(&self, name: &str) -> AttributeValue {
        match self
            .get_variable_access_read(name)
            .and_then(|info| info.as_scalar().cloned())
        {
            Ok(value) => value,
            Err(err) => {
                log_invalid::<crate::variable::ReadOnly>(&err.to_string(), "read");
                AttributeValue::Blank
            }
        }
    }

    /// Copy of the container `name`; empty when missing or invalid
    pub fn get_variable_cfg(&self, name: &str) -> Config {
        match self
            .get_variable_access_read(name)
            .and_then(|info| info.as_container().cloned())
        {
            Ok(cfg) => cfg,
            Err(err) => {
                log_invalid::<crate::variable::ReadOnly>(&err.to_string(), "read container");
                Config::new()
            }
        }
    }

    /// Whether `name` is a set attribute or a computed value
    pub fn has_variable(&self, name: &str) -> bool {
        self.get_variable_access_read(name)
            .map(|info| info.exists_as_attribute())
            .unwrap_or(false)
    }

    /// Whether `name` designates at least one existing child
    pub fn has_variable_cfg(&self, name: &str) -> bool {
        self.get_variable_access_read(name)
            .map(|info| info.exists_as_container())
            .unwrap_or(false)
    }

    /// Store a scalar, creating intermediate children as needed
    pub fn set_variable(&mut self, name: &str, value: impl Into<AttributeValue>) {
        let value = value.into();
        let result = self.get_variable_access_write(name).and_then(|mut info| {
            *info.as_scalar_mut()? = value;
            Ok(())
        });
        if let Err(err) = result {
            log_invalid::<crate::variable::Create>(&err.to_string(), "write");
        }
    }

    /// Append `cfg` to the group `name`
    pub fn add_variable_cfg(&mut self, name: &str, cfg: Config) {
        self.set_variable_range(name, vec![cfg], SetMode::Append);
    }

    pub fn set_variable_range(&mut self, name: &str, data: Vec<Config>, mode: SetMode) {
        let result = self
            .get_variable_access_write(name)
            .and_then(|mut info| info.set_range(data, mode));
        match result {
            Ok(()) => tracing::debug!(target: LOG_TARGET, name, %mode, "range updated"),
            Err(err) => log_invalid::<crate::variable::Create>(&err.to_string(), "set range"),
        }
    }

    /// Remove the attribute and every child called `name`
    pub fn clear_variable(&mut self, name: &str) {
        self.clear(name, false);
    }

    /// Remove the children called `name`, leaving any attribute in place
    pub fn clear_variable_cfg(&mut self, name: &str) {
        self.clear(name, true);
    }

    fn clear(&mut self, name: &str, only_tables: bool) {
        match self.try_clear(name, only_tables) {
            Ok(true) => {}
            Ok(false) => tracing::debug!(target: LOG_TARGET, name, only_tables, "nothing to clear"),
            Err(err) => log_invalid::<Strict>(&err.to_string(), "clear"),
        }
    }

    /// `Ok(false)` when the path is well formed but leads nowhere
    fn try_clear(&mut self, name: &str, only_tables: bool) -> VariableResult<bool> {
        parse_path(name, &self.limits)?;
        // Strict: clearing something that does not exist must not create it
        let Ok(mut info) = self.get_variable_access_strict(name) else {
            return Ok(false);
        };
        info.clear(only_tables)?;
        Ok(true)
    }
}

fn log_invalid<P: Policy>(message: &str, operation: &str) {
    tracing::error!(
        target: LOG_TARGET,
        policy = %P::KIND,
        operation,
        "{message}"
    );
}
