//! Plan manifests: a TOML list of named steps with capability requirements.
//!
//! ```toml
//! [resolver]
//! warn-on-missing-dependencies = false
//!
//! [[step]]
//! name = "schema"
//!
//! [[step]]
//! name = "backfill"
//! requires = ["schema"]
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use ordo_util::errors::{OrdoError, OrdoResult};
use serde::{Deserialize, Serialize};

use crate::config::ResolverConfig;
use crate::source::{Dependency, HookError, Source};

/// A parsed plan manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// One unit of work in a plan.
///
/// A step always provides its own name, plus anything listed in `provides`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,

    #[serde(default)]
    pub provides: Vec<String>,

    #[serde(default)]
    pub requires: Vec<String>,

    /// Names of the steps this one was resolved to depend on.
    #[serde(skip)]
    pub depends_on: Vec<String>,

    /// Requirements nothing in the plan provided.
    #[serde(skip)]
    pub missing: Vec<String>,
}

impl Step {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provides: Vec::new(),
            requires: Vec::new(),
            depends_on: Vec::new(),
            missing: Vec::new(),
        }
    }

    pub fn providing(mut self, capability: impl Into<String>) -> Self {
        self.provides.push(capability.into());
        self
    }

    pub fn requiring(mut self, capability: impl Into<String>) -> Self {
        self.requires.push(capability.into());
        self
    }

    /// Whether this step offers `capability`.
    pub fn provides_capability(&self, capability: &str) -> bool {
        self.name == capability || self.provides.iter().any(|p| p == capability)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A step's need for some capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    pub capability: String,
}

impl Requirement {
    pub fn new(capability: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "requires \"{}\"", self.capability)
    }
}

impl Dependency<Step> for Requirement {
    fn satisfied_by(&self, candidate: &Step) -> bool {
        candidate.provides_capability(&self.capability)
    }
}

impl Source for Step {
    type Dep = Requirement;

    fn dependencies(&self) -> Vec<Requirement> {
        self.requires.iter().map(Requirement::new).collect()
    }

    fn set_depends_on(&mut self, providers: &[&Step]) -> Result<(), HookError> {
        self.depends_on = providers.iter().map(|p| p.name.clone()).collect();
        Ok(())
    }

    fn set_unresolved_dependencies(&mut self, missing: &[Requirement]) -> Result<(), HookError> {
        self.missing = missing.iter().map(|r| r.capability.clone()).collect();
        Ok(())
    }
}

impl Plan {
    /// Parse and validate a plan from TOML text.
    pub fn from_toml_str(content: &str) -> OrdoResult<Self> {
        let plan: Plan = toml::from_str(content).map_err(|e| OrdoError::Plan {
            message: format!("Failed to parse plan: {e}"),
            help: Some("Check the plan for TOML syntax errors".to_string()),
        })?;
        plan.validate()?;
        Ok(plan)
    }

    /// Read, parse and validate the plan at `path`.
    pub fn from_path(path: &Path) -> OrdoResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| OrdoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded plan from {}", path.display());
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), OrdoError> {
        if self.steps.is_empty() {
            return Err(OrdoError::Plan {
                message: "plan declares no steps".to_string(),
                help: Some("Add at least one [[step]] table".to_string()),
            });
        }
        let mut seen = HashSet::new();
        for (i, step) in self.steps.iter().enumerate() {
            if step.name.trim().is_empty() {
                return Err(OrdoError::Plan {
                    message: format!("step #{} has an empty name", i + 1),
                    help: Some("Give every [[step]] a non-empty `name`".to_string()),
                });
            }
            if !seen.insert(step.name.as_str()) {
                return Err(OrdoError::Plan {
                    message: format!("duplicate step `{}`", step.name),
                    help: Some("Step names must be unique within a plan".to_string()),
                });
            }
        }
        Ok(())
    }
}
