//! # CSTR Module
//!
//! ## Purpose
//! Steady-state continuously stirred tank reactor. The tank is perfectly
//! mixed, so the contents are at outlet conditions and the performance
//! equation evaluates the reaction rate at the **outlet** state:
//!
//!   extent_r = V * rate_r(outlet)        for every reaction r
//!
//! Evaluating the rate at inlet conditions instead would be a plug-flow-like
//! approximation; the outlet-state rate is what makes this unit a CSTR.
//!
//! ## Composition
//! The conservation equations come from a control volume configured by
//! [`ControlVolumeConfig`]; this module only adds the performance equation,
//! the inlet/outlet ports and the reporting surface. Degrees of freedom are
//! zero once the inlet state, the holdup volume and any heat-duty /
//! pressure-change variables are fixed.

use crate::Core::control_volume::{ControlVolume, ControlVolumeConfig};
use crate::Core::initializers::{HierarchicalInitializer, InitializerStrategy};
use crate::Core::model::{Model, ModelError};
use crate::Core::ports::Port;
use crate::Core::unit_model::UnitModel;
use crate::Properties::package::{PropertyPackage, ReactionPackage};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::info;

pub struct Cstr {
    pub unit: String,
    pub config: ControlVolumeConfig,
    pub control_volume: ControlVolume,
    pub inlet: Port,
    pub outlet: Port,
}

impl Cstr {
    /// Builds the control volume, the per-reaction performance equations and
    /// the ports into the given model.
    pub fn build(
        model: &mut Model,
        name: &str,
        properties: &dyn PropertyPackage,
        reactions: &dyn ReactionPackage,
        config: ControlVolumeConfig,
    ) -> Result<Self, ModelError> {
        let control_volume =
            ControlVolume::new(model, name, properties, Some(reactions), &config)?;

        let rxns = control_volume.reactions.as_ref().ok_or_else(|| {
            ModelError::InvalidConfiguration("CSTR requires a reaction block".to_string())
        })?;
        for (i, reaction) in rxns.reactions.iter().enumerate() {
            model.add_constraint(
                &format!("{}_cstr_performance_eqn_{}", name, reaction),
                Expr::Var(rxns.extent[i].clone())
                    - Expr::Var(control_volume.volume.clone()) * rxns.rate[i].clone(),
            );
        }

        let inlet = properties.build_port(&format!("{}.inlet", name), &control_volume.inlet);
        let outlet = properties.build_port(&format!("{}.outlet", name), &control_volume.outlet);
        info!(
            "built CSTR '{}' with {} reactions and {} constraints so far",
            name,
            rxns.reactions.len(),
            model.constraints.len()
        );
        Ok(Self {
            unit: name.to_string(),
            config,
            control_volume,
            inlet,
            outlet,
        })
    }

    pub fn default_initializer() -> InitializerStrategy {
        InitializerStrategy::Hierarchical(HierarchicalInitializer::default())
    }

    pub fn volume_var(&self) -> &str {
        &self.control_volume.volume
    }

    pub fn heat_duty_var(&self) -> Option<&str> {
        self.control_volume.heat_duty.as_deref()
    }

    pub fn deltap_var(&self) -> Option<&str> {
        self.control_volume.deltap.as_deref()
    }

    pub fn heat_of_reaction_var(&self) -> Option<&str> {
        self.control_volume.heat_of_reaction.as_deref()
    }
}

impl UnitModel for Cstr {
    fn unit_name(&self) -> &str {
        &self.unit
    }

    fn inlet_port(&self) -> &Port {
        &self.inlet
    }

    fn outlet_port(&self) -> &Port {
        &self.outlet
    }

    fn performance_contents(&self) -> Vec<(String, String)> {
        let mut contents = vec![("Volume".to_string(), self.control_volume.volume.clone())];
        if let Some(q) = &self.control_volume.heat_duty {
            contents.push(("Heat Duty".to_string(), q.clone()));
        }
        if let Some(dp) = &self.control_volume.deltap {
            contents.push(("Pressure Change".to_string(), dp.clone()));
        }
        contents
    }
}
