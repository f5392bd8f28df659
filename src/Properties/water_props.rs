//! Minimal water property package for zero-order units: volumetric flow plus
//! mass concentration per solute from a caller-supplied solute list. No
//! temperature or pressure and no energy holdup.

use crate::Core::model::{Model, ModelError};
use crate::Core::ports::Port;
use crate::Properties::package::{PropertyPackage, StateBlock};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterParameterBlock {
    pub solute_list: Vec<String>,
}

impl WaterParameterBlock {
    pub fn new(solute_list: &[&str]) -> Self {
        Self {
            solute_list: solute_list.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PropertyPackage for WaterParameterBlock {
    fn component_list(&self) -> Vec<String> {
        self.solute_list.clone()
    }

    fn build_state(&self, model: &mut Model, tag: &str) -> Result<StateBlock, ModelError> {
        let flow_vol = format!("{}_flow_vol", tag);
        model.add_var(&flow_vol, 1.0, "m^3/hr")?;
        let mut conc = Vec::with_capacity(self.solute_list.len());
        for solute in &self.solute_list {
            let name = format!("{}_conc_mass_comp_{}", tag, solute);
            model.add_var(&name, 1.0, "kg/m^3")?;
            conc.push((solute.clone(), name));
        }
        Ok(StateBlock {
            tag: tag.to_string(),
            flow_vol,
            conc,
            temperature: None,
            pressure: None,
        })
    }

    fn enthalpy_flow(&self, state: &StateBlock) -> Result<Expr, ModelError> {
        Err(ModelError::InvalidConfiguration(format!(
            "water property package carries no energy holdup (state '{}')",
            state.tag
        )))
    }

    fn build_port(&self, name: &str, state: &StateBlock) -> Port {
        let mut port = Port::new(name);
        port.add("flow_vol", "Volumetric Flowrate", &state.flow_vol);
        for (solute, var) in &state.conc {
            port.add(
                &format!("conc_mass_comp[{}]", solute),
                &format!("Mass Concentration {}", solute),
                var,
            );
        }
        port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_has_no_temperature_or_pressure() {
        let props = WaterParameterBlock::new(&["A", "B", "C"]);
        let mut m = Model::new("fs");
        let state = props.build_state(&mut m, "w").unwrap();
        assert_eq!(state.variable_names().len(), 4);
        assert!(state.temperature.is_none());
        assert!(state.pressure.is_none());
        assert!(state.temperature_expr().is_err());
        assert!(props.enthalpy_flow(&state).is_err());
    }
}
