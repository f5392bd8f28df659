//! Property package for the aqueous saponification system
//! NaOH + ethyl acetate -> sodium acetate + ethanol.
//!
//! States are described by volumetric flow, molar concentrations, temperature
//! and pressure. Density and heat capacity are constants of the dilute
//! aqueous solution, so the sensible enthalpy flow is
//! F * dens_mol * cp_mol * (T - T_ref).

use crate::Core::model::{Model, ModelError};
use crate::Core::ports::Port;
use crate::Properties::package::{PropertyPackage, StateBlock};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use serde::{Deserialize, Serialize};

pub const SAPONIFICATION_COMPONENTS: [&str; 5] =
    ["H2O", "NaOH", "EthylAcetate", "SodiumAcetate", "Ethanol"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaponificationParameters {
    /// molar heat capacity [J/mol/K]
    pub cp_mol: f64,
    /// molar density [mol/m^3]
    pub dens_mol: f64,
    /// thermodynamic reference temperature [K]
    pub temperature_ref: f64,
}

impl Default for SaponificationParameters {
    fn default() -> Self {
        Self {
            cp_mol: 75.327,
            dens_mol: 55388.0,
            temperature_ref: 298.15,
        }
    }
}

impl SaponificationParameters {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PropertyPackage for SaponificationParameters {
    fn component_list(&self) -> Vec<String> {
        SAPONIFICATION_COMPONENTS
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn build_state(&self, model: &mut Model, tag: &str) -> Result<StateBlock, ModelError> {
        let flow_vol = format!("{}_flow_vol", tag);
        model.add_var(&flow_vol, 1.0, "m^3/s")?;
        let mut conc = Vec::with_capacity(SAPONIFICATION_COMPONENTS.len());
        for component in SAPONIFICATION_COMPONENTS {
            let name = format!("{}_conc_mol_comp_{}", tag, component);
            let initial = if component == "H2O" { self.dens_mol } else { 100.0 };
            model.add_var(&name, initial, "mol/m^3")?;
            conc.push((component.to_string(), name));
        }
        let temperature = format!("{}_temperature", tag);
        model.add_var(&temperature, self.temperature_ref, "K")?;
        let pressure = format!("{}_pressure", tag);
        model.add_var(&pressure, 101325.0, "Pa")?;
        Ok(StateBlock {
            tag: tag.to_string(),
            flow_vol,
            conc,
            temperature: Some(temperature),
            pressure: Some(pressure),
        })
    }

    fn enthalpy_flow(&self, state: &StateBlock) -> Result<Expr, ModelError> {
        Ok(state.flow_expr()
            * Expr::Const(self.dens_mol)
            * Expr::Const(self.cp_mol)
            * (state.temperature_expr()? - Expr::Const(self.temperature_ref)))
    }

    fn build_port(&self, name: &str, state: &StateBlock) -> Port {
        let mut port = Port::new(name);
        port.add("flow_vol", "Volumetric Flowrate", &state.flow_vol);
        for (component, var) in &state.conc {
            port.add(
                &format!("conc_mol_comp[{}]", component),
                &format!("Molar Concentration {}", component),
                var,
            );
        }
        if let Some(t) = &state.temperature {
            port.add("temperature", "Temperature", t);
        }
        if let Some(p) = &state.pressure {
            port.add("pressure", "Pressure", p);
        }
        port
    }
}
