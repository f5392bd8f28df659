//! Capability contracts for property and reaction packages.
//!
//! A property package is a state-block factory: it declares the component set
//! and registers the state variables (flow, composition and, when the package
//! carries them, temperature and pressure) of one stream in a model. A
//! reaction package supplies stoichiometry and rate expressions evaluated at a
//! given state block. Unit models consume both through these traits only.

use crate::Core::model::{Model, ModelError};
use crate::Core::ports::Port;
use RustedSciThe::symbolic::symbolic_engine::Expr;

/// State variables of one stream at one time point. Created by a property
/// package at model-build time; holds variable names, not values. The values
/// live in the model and are mutated only by the solver.
#[derive(Debug, Clone)]
pub struct StateBlock {
    pub tag: String,
    pub flow_vol: String,
    /// (component, variable name), in component-list order.
    pub conc: Vec<(String, String)>,
    pub temperature: Option<String>,
    pub pressure: Option<String>,
}

impl StateBlock {
    pub fn flow_expr(&self) -> Expr {
        Expr::Var(self.flow_vol.clone())
    }

    pub fn conc_var(&self, component: &str) -> Result<&str, ModelError> {
        self.conc
            .iter()
            .find(|(c, _)| c == component)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| {
                ModelError::UnknownVariable(format!("{}: component {}", self.tag, component))
            })
    }

    pub fn conc_expr(&self, component: &str) -> Result<Expr, ModelError> {
        Ok(Expr::Var(self.conc_var(component)?.to_string()))
    }

    pub fn temperature_expr(&self) -> Result<Expr, ModelError> {
        self.temperature
            .as_ref()
            .map(|v| Expr::Var(v.clone()))
            .ok_or_else(|| {
                ModelError::InvalidConfiguration(format!(
                    "state block '{}' carries no temperature",
                    self.tag
                ))
            })
    }

    pub fn pressure_expr(&self) -> Result<Expr, ModelError> {
        self.pressure
            .as_ref()
            .map(|v| Expr::Var(v.clone()))
            .ok_or_else(|| {
                ModelError::InvalidConfiguration(format!(
                    "state block '{}' carries no pressure",
                    self.tag
                ))
            })
    }

    /// All variable names of this state, in declaration order.
    pub fn variable_names(&self) -> Vec<String> {
        let mut names = vec![self.flow_vol.clone()];
        names.extend(self.conc.iter().map(|(_, v)| v.clone()));
        if let Some(t) = &self.temperature {
            names.push(t.clone());
        }
        if let Some(p) = &self.pressure {
            names.push(p.clone());
        }
        names
    }
}

pub trait PropertyPackage {
    fn component_list(&self) -> Vec<String>;

    /// Registers the state variables of one stream under the given tag and
    /// returns the state block referencing them.
    fn build_state(&self, model: &mut Model, tag: &str) -> Result<StateBlock, ModelError>;

    /// Sensible enthalpy flow [W] of a state, relative to the package's
    /// reference temperature. Packages without an energy holdup return an
    /// InvalidConfiguration error and cannot take part in energy balances.
    fn enthalpy_flow(&self, state: &StateBlock) -> Result<Expr, ModelError>;

    /// A port over the full state variable set, with the labels this package
    /// uses in stream tables.
    fn build_port(&self, name: &str, state: &StateBlock) -> Port;
}

pub trait ReactionPackage {
    fn reaction_list(&self) -> Vec<String>;

    /// Signed stoichiometric coefficient of a component in a reaction,
    /// negative for consumption.
    fn stoichiometric_coefficient(&self, reaction: &str, component: &str) -> f64;

    /// Volumetric reaction rate [mol/m^3/s] evaluated at the given state.
    fn rate_expression(&self, state: &StateBlock, reaction: &str) -> Result<Expr, ModelError>;

    /// Molar heat of reaction [J/mol], negative for exothermic reactions.
    fn heat_of_reaction(&self, reaction: &str) -> f64;

    fn has_equilibrium_reactions(&self) -> bool {
        false
    }

    /// Additional equilibrium constraints at a state, (name, residual) pairs.
    fn equilibrium_constraints(
        &self,
        _state: &StateBlock,
    ) -> Result<Vec<(String, Expr)>, ModelError> {
        Ok(Vec::new())
    }
}
