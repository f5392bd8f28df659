//! Reaction package for the saponification of ethyl acetate:
//! NaOH + EthylAcetate -> SodiumAcetate + Ethanol,
//! second order with an Arrhenius rate constant,
//! r = A * exp(-Ea / (R T)) * C_NaOH * C_EthylAcetate.

use crate::Core::model::ModelError;
use crate::Properties::package::{ReactionPackage, StateBlock};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use serde::{Deserialize, Serialize};

/// universal gas constant [J/mol/K]
pub const GAS_CONSTANT: f64 = 8.314462618;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaponificationReactions {
    /// pre-exponential factor [m^3/mol/s]
    pub arrhenius: f64,
    /// activation energy [J/mol]
    pub energy_activation: f64,
    /// heat of reaction [J/mol], exothermic
    pub dh_rxn: f64,
}

impl Default for SaponificationReactions {
    fn default() -> Self {
        Self {
            arrhenius: 3.132e6,
            energy_activation: 43000.0,
            dh_rxn: -49000.0,
        }
    }
}

impl SaponificationReactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrhenius rate constant at a symbolic temperature.
    fn rate_constant(&self, temperature: Expr) -> Expr {
        Expr::Const(self.arrhenius)
            * (Expr::Const(-self.energy_activation) / (Expr::Const(GAS_CONSTANT) * temperature))
                .exp()
    }
}

impl ReactionPackage for SaponificationReactions {
    fn reaction_list(&self) -> Vec<String> {
        vec!["R1".to_string()]
    }

    fn stoichiometric_coefficient(&self, reaction: &str, component: &str) -> f64 {
        if reaction != "R1" {
            return 0.0;
        }
        match component {
            "NaOH" | "EthylAcetate" => -1.0,
            "SodiumAcetate" | "Ethanol" => 1.0,
            _ => 0.0,
        }
    }

    fn rate_expression(&self, state: &StateBlock, reaction: &str) -> Result<Expr, ModelError> {
        if reaction != "R1" {
            return Err(ModelError::UnknownVariable(format!(
                "unknown reaction: {}",
                reaction
            )));
        }
        let k = self.rate_constant(state.temperature_expr()?);
        Ok(k * state.conc_expr("NaOH")? * state.conc_expr("EthylAcetate")?)
    }

    fn heat_of_reaction(&self, _reaction: &str) -> f64 {
        self.dh_rxn
    }
}
