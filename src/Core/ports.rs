//! Ports: named bundles of references to state-block variables, exposed by
//! unit models for connecting them in a flowsheet. A port owns no data; its
//! entries point at variables living in the enclosing model.

use super::model::{Model, ModelError};
use RustedSciThe::symbolic::symbolic_engine::Expr;

/// One entry of a port: a stable lookup key, a human-readable label for the
/// stream table, and the model variable it refers to.
#[derive(Debug, Clone)]
pub struct PortVar {
    pub key: String,
    pub label: String,
    pub var: String,
}

#[derive(Debug, Clone)]
pub struct Port {
    pub name: String,
    pub vars: Vec<PortVar>,
}

impl Port {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vars: Vec::new(),
        }
    }

    pub fn add(&mut self, key: &str, label: &str, var: &str) {
        self.vars.push(PortVar {
            key: key.to_string(),
            label: label.to_string(),
            var: var.to_string(),
        });
    }

    /// Model variable behind a key like "conc_mol_comp[NaOH]".
    pub fn var(&self, key: &str) -> Result<&str, ModelError> {
        self.vars
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.var.as_str())
            .ok_or_else(|| ModelError::UnknownVariable(format!("{}:{}", self.name, key)))
    }

    pub fn keys(&self) -> Vec<&str> {
        self.vars.iter().map(|v| v.key.as_str()).collect()
    }
}

/// Connects an upstream outlet port to a downstream inlet port by adding one
/// equality constraint per matching key. Both ports must expose the same
/// variable set: streams with different component sets cannot be joined.
pub fn connect(model: &mut Model, from: &Port, to: &Port) -> Result<(), ModelError> {
    if from.keys() != to.keys() {
        return Err(ModelError::PortMismatch(
            from.name.clone(),
            to.name.clone(),
        ));
    }
    for (src, dst) in from.vars.iter().zip(to.vars.iter()) {
        // connecting a port to itself (shared state block) needs no equation
        if src.var == dst.var {
            continue;
        }
        model.add_constraint(
            &format!("arc[{}->{}]:{}", from.name, to.name, src.key),
            Expr::Var(dst.var.clone()) - Expr::Var(src.var.clone()),
        );
    }
    Ok(())
}
