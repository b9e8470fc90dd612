//! Credential and configuration environment variables

use std::collections::HashMap;

const SUBSCRIPTION_ID_VAR: &str = "ARM_SUBSCRIPTION_ID";
const CLIENT_ID_VAR: &str = "ARM_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "ARM_CLIENT_SECRET";
const TENANT_ID_VAR: &str = "ARM_TENANT_ID";

/// Environment variables handed to every Terraform invocation
///
/// Typed accessors cover the Azure service-principal variables; `set_var`
/// accepts anything else. The client reads the map as an immutable snapshot
/// at launch time and never mutates it.
#[derive(Debug, Clone, Default)]
pub struct TerraformOptions {
    env_vars: HashMap<String, String>,
}

impl TerraformOptions {
    /// Create an empty options map
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the ARM subscription id, if set
    pub fn arm_subscription_id(&self) -> Option<&str> {
        self.var(SUBSCRIPTION_ID_VAR)
    }

    /// Set the ARM subscription id
    pub fn set_arm_subscription_id(&mut self, value: impl Into<String>) {
        self.set_var(SUBSCRIPTION_ID_VAR, value);
    }

    /// Get the ARM client id, if set
    pub fn arm_client_id(&self) -> Option<&str> {
        self.var(CLIENT_ID_VAR)
    }

    /// Set the ARM client id
    pub fn set_arm_client_id(&mut self, value: impl Into<String>) {
        self.set_var(CLIENT_ID_VAR, value);
    }

    /// Get the ARM client secret, if set
    pub fn arm_client_secret(&self) -> Option<&str> {
        self.var(CLIENT_SECRET_VAR)
    }

    /// Set the ARM client secret
    pub fn set_arm_client_secret(&mut self, value: impl Into<String>) {
        self.set_var(CLIENT_SECRET_VAR, value);
    }

    /// Get the ARM tenant id, if set
    pub fn arm_tenant_id(&self) -> Option<&str> {
        self.var(TENANT_ID_VAR)
    }

    /// Set the ARM tenant id
    pub fn set_arm_tenant_id(&mut self, value: impl Into<String>) {
        self.set_var(TENANT_ID_VAR, value);
    }

    /// Get an arbitrary variable, if set
    pub fn var(&self, name: &str) -> Option<&str> {
        self.env_vars.get(name).map(String::as_str)
    }

    /// Set an arbitrary variable; a later write for the same name wins
    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.env_vars.insert(name.into(), value.into());
    }

    /// All variables, for merging into an invocation's environment overlay
    pub fn env_vars(&self) -> &HashMap<String, String> {
        &self.env_vars
    }
}
