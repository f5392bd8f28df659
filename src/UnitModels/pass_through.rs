//! Zero-order pass-through unit: an identity map used as a placeholder or
//! connector in larger flowsheets. A single state block is referenced by both
//! the inlet and the outlet port, so the outlet equals the inlet exactly, no
//! constraints are added, and there is nothing to initialize or scale.

use crate::Core::model::{Model, ModelError};
use crate::Core::ports::Port;
use crate::Core::unit_model::UnitModel;
use crate::Properties::package::{PropertyPackage, StateBlock};

pub struct PassThrough {
    pub unit: String,
    pub properties: StateBlock,
    pub inlet: Port,
    pub outlet: Port,
}

impl PassThrough {
    pub fn build(
        model: &mut Model,
        name: &str,
        properties: &dyn PropertyPackage,
    ) -> Result<Self, ModelError> {
        let state = properties.build_state(model, &format!("{}_properties", name))?;
        let inlet = properties.build_port(&format!("{}.inlet", name), &state);
        let outlet = properties.build_port(&format!("{}.outlet", name), &state);
        Ok(Self {
            unit: name.to_string(),
            properties: state,
            inlet,
            outlet,
        })
    }
}

impl UnitModel for PassThrough {
    fn unit_name(&self) -> &str {
        &self.unit
    }

    fn inlet_port(&self) -> &Port {
        &self.inlet
    }

    fn outlet_port(&self) -> &Port {
        &self.outlet
    }
}
