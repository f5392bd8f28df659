//! Control volume: owns one inlet and one outlet state block (and optionally
//! a reaction block), and asserts the steady-state conservation equations
//! relating them. Which equation sets exist is decided at build time from an
//! explicit configuration struct; invalid combinations are build errors.

use super::model::{Model, ModelError};
use crate::Properties::package::{PropertyPackage, ReactionPackage, StateBlock};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaterialBalanceType {
    #[default]
    UseDefault,
    ComponentTotal,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnergyBalanceType {
    #[default]
    UseDefault,
    EnthalpyTotal,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MomentumBalanceType {
    #[default]
    PressureTotal,
    None,
}

/// Build-time selection of the equation sets a control volume instantiates.
/// Heat-of-reaction and equilibrium-reaction handling are deliberately
/// independent switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlVolumeConfig {
    pub material_balance: MaterialBalanceType,
    pub energy_balance: EnergyBalanceType,
    pub momentum_balance: MomentumBalanceType,
    pub has_heat_transfer: bool,
    pub has_pressure_change: bool,
    pub has_equilibrium_reactions: bool,
    pub has_heat_of_reaction: bool,
}

impl ControlVolumeConfig {
    fn validate(&self, with_reactions: bool) -> Result<(), ModelError> {
        if self.has_heat_transfer && self.energy_balance == EnergyBalanceType::None {
            return Err(ModelError::InvalidConfiguration(
                "heat transfer requires an energy balance".to_string(),
            ));
        }
        if self.has_heat_of_reaction && self.energy_balance == EnergyBalanceType::None {
            return Err(ModelError::InvalidConfiguration(
                "heat of reaction requires an energy balance".to_string(),
            ));
        }
        if self.has_pressure_change && self.momentum_balance == MomentumBalanceType::None {
            return Err(ModelError::InvalidConfiguration(
                "pressure change requires a momentum balance".to_string(),
            ));
        }
        if (self.has_heat_of_reaction || self.has_equilibrium_reactions) && !with_reactions {
            return Err(ModelError::InvalidConfiguration(
                "reaction terms requested without a reaction package".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reaction block derived from the outlet state: rate expressions and extents
/// per reaction, parameterized by the reaction package's stoichiometry.
pub struct ReactionBlock {
    pub reactions: Vec<String>,
    /// extent variable [mol/s] per reaction, same order as `reactions`.
    pub extent: Vec<String>,
    /// rate expression [mol/m^3/s] per reaction at the outlet state.
    pub rate: Vec<Expr>,
    pub dh_rxn: Vec<f64>,
}

pub struct ControlVolume {
    pub tag: String,
    pub inlet: StateBlock,
    pub outlet: StateBlock,
    pub reactions: Option<ReactionBlock>,
    pub volume: String,
    pub heat_duty: Option<String>,
    pub deltap: Option<String>,
    pub heat_of_reaction: Option<String>,
}

impl ControlVolume {
    /// Builds the holdup variables, both state blocks and the configured
    /// balance equations. The inlet and outlet share the property package, so
    /// both states carry the same component set by construction.
    pub fn new(
        model: &mut Model,
        tag: &str,
        properties: &dyn PropertyPackage,
        reaction_package: Option<&dyn ReactionPackage>,
        config: &ControlVolumeConfig,
    ) -> Result<Self, ModelError> {
        config.validate(reaction_package.is_some())?;

        let inlet = properties.build_state(model, &format!("{}_inlet", tag))?;
        let outlet = properties.build_state(model, &format!("{}_outlet", tag))?;

        let volume = format!("{}_volume", tag);
        model.add_var(&volume, 1.0, "m^3")?;

        let heat_duty = if config.has_heat_transfer {
            let name = format!("{}_heat_duty", tag);
            model.add_var(&name, 0.0, "W")?;
            Some(name)
        } else {
            None
        };
        let deltap = if config.has_pressure_change {
            let name = format!("{}_deltaP", tag);
            model.add_var(&name, 0.0, "Pa")?;
            Some(name)
        } else {
            None
        };

        let reactions = match reaction_package {
            Some(package) => Some(Self::build_reaction_block(model, tag, package, &outlet)?),
            None => None,
        };

        let mut cv = Self {
            tag: tag.to_string(),
            inlet,
            outlet,
            reactions,
            volume,
            heat_duty,
            deltap,
            heat_of_reaction: None,
        };
        cv.add_material_balances(model, properties, reaction_package, config)?;
        cv.add_energy_balance(model, properties, config)?;
        cv.add_momentum_balance(model, config)?;
        cv.add_equilibrium_constraints(model, reaction_package, config)?;
        Ok(cv)
    }

    fn build_reaction_block(
        model: &mut Model,
        tag: &str,
        package: &dyn ReactionPackage,
        outlet: &StateBlock,
    ) -> Result<ReactionBlock, ModelError> {
        let reactions = package.reaction_list();
        let mut extent = Vec::with_capacity(reactions.len());
        let mut rate = Vec::with_capacity(reactions.len());
        let mut dh_rxn = Vec::with_capacity(reactions.len());
        for r in &reactions {
            let name = format!("{}_rate_reaction_extent_{}", tag, r);
            model.add_var(&name, 0.0, "mol/s")?;
            extent.push(name);
            rate.push(package.rate_expression(outlet, r)?);
            dh_rxn.push(package.heat_of_reaction(r));
        }
        Ok(ReactionBlock {
            reactions,
            extent,
            rate,
            dh_rxn,
        })
    }

    /// Per-component steady-state balance:
    /// F_in*C_in_j - F_out*C_out_j + SUM_r(nu_rj * extent_r) = 0,
    /// plus total continuity F_in - F_out = 0.
    fn add_material_balances(
        &self,
        model: &mut Model,
        properties: &dyn PropertyPackage,
        reaction_package: Option<&dyn ReactionPackage>,
        config: &ControlVolumeConfig,
    ) -> Result<(), ModelError> {
        let kind = match config.material_balance {
            MaterialBalanceType::UseDefault => MaterialBalanceType::ComponentTotal,
            other => other,
        };
        if kind == MaterialBalanceType::None {
            return Ok(());
        }
        model.add_constraint(
            &format!("{}_flow_balance", self.tag),
            self.inlet.flow_expr() - self.outlet.flow_expr(),
        );
        for component in properties.component_list() {
            let mut residual = self.inlet.flow_expr() * self.inlet.conc_expr(&component)?
                - self.outlet.flow_expr() * self.outlet.conc_expr(&component)?;
            if let (Some(rxns), Some(package)) = (&self.reactions, reaction_package) {
                for (i, r) in rxns.reactions.iter().enumerate() {
                    let nu = package.stoichiometric_coefficient(r, &component);
                    if nu != 0.0 {
                        residual =
                            residual + Expr::Const(nu) * Expr::Var(rxns.extent[i].clone());
                    }
                }
            }
            model.add_constraint(
                &format!("{}_material_balance_{}", self.tag, component),
                residual,
            );
        }
        Ok(())
    }

    /// F_in*h_in - F_out*h_out + Q + Q_rxn = 0, with the Q term present only
    /// with heat transfer enabled and the Q_rxn term only with heat of
    /// reaction enabled. Disabling heat of reaction with reactions present is
    /// a supported decoupling, not an error.
    fn add_energy_balance(
        &mut self,
        model: &mut Model,
        properties: &dyn PropertyPackage,
        config: &ControlVolumeConfig,
    ) -> Result<(), ModelError> {
        let kind = match config.energy_balance {
            EnergyBalanceType::UseDefault => EnergyBalanceType::EnthalpyTotal,
            other => other,
        };
        if kind == EnergyBalanceType::None {
            return Ok(());
        }
        let mut residual =
            properties.enthalpy_flow(&self.inlet)? - properties.enthalpy_flow(&self.outlet)?;
        if let Some(q) = &self.heat_duty {
            residual = residual + Expr::Var(q.clone());
        }
        if config.has_heat_of_reaction {
            let rxns = self.reactions.as_ref().ok_or_else(|| {
                ModelError::InvalidConfiguration(
                    "heat of reaction requires a reaction block".to_string(),
                )
            })?;
            let name = format!("{}_heat_of_reaction", self.tag);
            let q_rxn = model.add_var(&name, 0.0, "W")?;
            // Q_rxn = SUM_r(-dh_rxn_r * extent_r)
            let mut dh_sum = Expr::Const(0.0);
            for (i, dh) in rxns.dh_rxn.iter().enumerate() {
                dh_sum = dh_sum + Expr::Const(-dh) * Expr::Var(rxns.extent[i].clone());
            }
            model.add_constraint(
                &format!("{}_heat_of_reaction_eqn", self.tag),
                q_rxn.clone() - dh_sum,
            );
            residual = residual + q_rxn;
            self.heat_of_reaction = Some(name);
        }
        model.add_constraint(&format!("{}_enthalpy_balance", self.tag), residual);
        Ok(())
    }

    /// P_out = P_in + deltaP, the deltaP term present only when pressure
    /// change is enabled.
    fn add_momentum_balance(
        &self,
        model: &mut Model,
        config: &ControlVolumeConfig,
    ) -> Result<(), ModelError> {
        if config.momentum_balance == MomentumBalanceType::None {
            return Ok(());
        }
        let mut residual = self.inlet.pressure_expr()? - self.outlet.pressure_expr()?;
        if let Some(dp) = &self.deltap {
            residual = residual + Expr::Var(dp.clone());
        }
        model.add_constraint(&format!("{}_pressure_balance", self.tag), residual);
        Ok(())
    }

    fn add_equilibrium_constraints(
        &self,
        model: &mut Model,
        reaction_package: Option<&dyn ReactionPackage>,
        config: &ControlVolumeConfig,
    ) -> Result<(), ModelError> {
        if !config.has_equilibrium_reactions {
            return Ok(());
        }
        let package = reaction_package.ok_or_else(|| {
            ModelError::InvalidConfiguration(
                "equilibrium reactions requested without a reaction package".to_string(),
            )
        })?;
        if !package.has_equilibrium_reactions() {
            warn!(
                "control volume '{}': equilibrium handling enabled but the reaction package \
                 declares no equilibrium reactions",
                self.tag
            );
        }
        for (name, residual) in package.equilibrium_constraints(&self.outlet)? {
            model.add_constraint(&format!("{}_{}", self.tag, name), residual);
        }
        Ok(())
    }
}
