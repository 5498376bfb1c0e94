// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Equipment capability catalog
//!
//! The catalog is a static schema: each resource lists the actions it
//! accepts and the parameters each action takes. The validator consults it
//! read-only.

use labq_core::{ArgKind, ArgProblem, ArgValue, ResourceId};
use std::collections::HashMap;

/// Relative tolerance for step alignment of floating point values
const STEP_EPSILON: f64 = 1e-9;

/// Allowed values of a parameter beyond its type
#[derive(Debug, Clone, PartialEq)]
pub enum ParamRange {
    /// Inclusive bounds, optionally quantized to `min + k * step`
    Numeric {
        min: f64,
        max: f64,
        step: Option<f64>,
    },
    /// Categorical choices
    Options(Vec<ArgValue>),
}

/// Declared shape of one action parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    /// Accepted value kinds; empty accepts any kind
    pub types: Vec<ArgKind>,
    pub range: Option<ParamRange>,
    pub required: bool,
}

impl ParamSpec {
    /// A required parameter accepting any value
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            range: None,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::new(name)
        }
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = ArgKind>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    pub fn with_range(mut self, min: f64, max: f64, step: Option<f64>) -> Self {
        self.range = Some(ParamRange::Numeric { min, max, step });
        self
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = ArgValue>) -> Self {
        self.range = Some(ParamRange::Options(options.into_iter().collect()));
        self
    }

    /// Whether a value of `kind` satisfies the declared types.
    ///
    /// Integers are accepted where floats are declared.
    pub fn accepts(&self, kind: ArgKind) -> bool {
        self.types.is_empty()
            || self.types.contains(&kind)
            || (kind == ArgKind::Int && self.types.contains(&ArgKind::Float))
    }

    /// Check a supplied value against type and range
    pub fn check(&self, value: &ArgValue) -> Result<(), ArgProblem> {
        if !self.accepts(value.kind()) {
            return Err(ArgProblem::WrongType {
                expected: self.types.clone(),
                found: value.kind(),
            });
        }

        match &self.range {
            None => Ok(()),
            Some(ParamRange::Numeric { min, max, step }) => {
                let x = value.as_f64().ok_or_else(|| ArgProblem::WrongType {
                    expected: vec![ArgKind::Int, ArgKind::Float],
                    found: value.kind(),
                })?;
                if x < *min || x > *max {
                    return Err(ArgProblem::OutOfRange {
                        value: x,
                        min: *min,
                        max: *max,
                    });
                }
                match step {
                    Some(step) if *step > 0.0 && !on_step(x, *min, *step) => {
                        Err(ArgProblem::OffStep {
                            value: x,
                            min: *min,
                            step: *step,
                        })
                    }
                    _ => Ok(()),
                }
            }
            Some(ParamRange::Options(options)) => {
                if options.iter().any(|option| same_value(option, value)) {
                    Ok(())
                } else {
                    Err(ArgProblem::NotAnOption {
                        value: value.clone(),
                        options: options.clone(),
                    })
                }
            }
        }
    }
}

fn on_step(x: f64, min: f64, step: f64) -> bool {
    let steps = (x - min) / step;
    (steps - steps.round()).abs() <= STEP_EPSILON * steps.abs().max(1.0)
}

// Numbers compare by value so `2` matches an option written `2.0`
fn same_value(a: &ArgValue, b: &ArgValue) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// An action a resource accepts, with its parameter list
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSpec {
    pub name: String,
    pub params: Vec<ParamSpec>,
}

impl ActionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn required_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.required)
    }
}

/// Everything one resource can do
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capability {
    actions: HashMap<String, ActionSpec>,
}

impl Capability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, action: ActionSpec) -> Self {
        self.insert(action);
        self
    }

    pub fn insert(&mut self, action: ActionSpec) {
        self.actions.insert(action.name.clone(), action);
    }

    pub fn action(&self, name: &str) -> Option<&ActionSpec> {
        self.actions.get(name)
    }

    /// Action names, sorted
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Read-only map of resources to their capabilities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    resources: HashMap<ResourceId, Capability>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, id: impl Into<ResourceId>, capability: Capability) -> Self {
        self.insert(id, capability);
        self
    }

    pub fn insert(&mut self, id: impl Into<ResourceId>, capability: Capability) {
        self.resources.insert(id.into(), capability);
    }

    pub fn resource(&self, id: &str) -> Option<&Capability> {
        self.resources.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.resources.contains_key(id)
    }

    /// Resource ids, sorted
    pub fn resource_ids(&self) -> Vec<&ResourceId> {
        let mut ids: Vec<&ResourceId> = self.resources.keys().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
