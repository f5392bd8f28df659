//! Capital costing for stirred tanks. The correlation maps the design volume
//! to an installed capital cost through a volume-proportional direct cost and
//! a total-installed-cost multiplier:
//!
//!   capital_cost = tic_factor * cost_per_volume * V
//!
//! The costing block participates in the equation system like any other
//! constraint, so the capital cost can also drive an outer optimization.

use crate::Core::model::{Model, ModelError};
use crate::UnitModels::cstr::Cstr;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostingParams {
    /// total installed cost multiplier on the direct capital cost
    pub tic_factor: f64,
    /// direct capital cost per unit reactor volume [USD/m^3]
    pub cstr_cost_per_volume: f64,
}

impl Default for CostingParams {
    fn default() -> Self {
        Self {
            tic_factor: 2.0,
            cstr_cost_per_volume: 526.45 / 1000.0,
        }
    }
}

/// Handle to the costing variables added for one unit.
pub struct UnitCostingBlock {
    pub capital_cost: String,
}

/// Adds the capital-cost variable and correlation constraint for a CSTR.
pub fn cost_cstr(
    model: &mut Model,
    unit: &Cstr,
    params: &CostingParams,
) -> Result<UnitCostingBlock, ModelError> {
    let name = format!("{}_costing_capital_cost", unit.unit);
    let capital = model.add_var(&name, 0.0, "USD")?;
    model.add_constraint(
        &format!("{}_costing_capital_cost_eqn", unit.unit),
        capital
            - Expr::Const(params.tic_factor * params.cstr_cost_per_volume)
                * Expr::Var(unit.volume_var().to_string()),
    );
    Ok(UnitCostingBlock { capital_cost: name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Core::control_volume::ControlVolumeConfig;
    use crate::Core::initializers::{
        BlockTriangularizationInitializer, InitializationStatus, UnitInitializer,
    };
    use crate::Core::unit_model::UnitModel;
    use crate::Properties::saponification_reactions::SaponificationReactions;
    use crate::Properties::saponification_thermo::SaponificationParameters;
    use approx::assert_relative_eq;

    #[test]
    fn test_capital_cost_correlation() {
        let props = SaponificationParameters::new();
        let rxns = SaponificationReactions::new();
        let mut m = Model::new("fs");
        let unit = Cstr::build(
            &mut m,
            "unit",
            &props,
            &rxns,
            ControlVolumeConfig::default(),
        )
        .unwrap();
        let costing = cost_cstr(&mut m, &unit, &CostingParams::default()).unwrap();
        assert_eq!(m.units_of(&costing.capital_cost).unwrap(), "USD");

        // inert inlet, a large fixed tank: the costing equation is the point here
        m.set_value(unit.inlet.var("conc_mol_comp[NaOH]").unwrap(), 0.0)
            .unwrap();
        m.set_value(unit.inlet.var("conc_mol_comp[EthylAcetate]").unwrap(), 0.0)
            .unwrap();
        for key in unit.inlet.keys() {
            let var = unit.inlet.var(key).unwrap().to_string();
            let value = m.value(&var).unwrap();
            m.fix(&var, value).unwrap();
        }
        m.fix(unit.volume_var(), 1000.0).unwrap();
        assert_eq!(m.degrees_of_freedom(), 0);

        let initializer = BlockTriangularizationInitializer::default();
        let status = initializer.initialize(&mut m, &unit).unwrap();
        assert_eq!(status, InitializationStatus::Ok);
        assert_relative_eq!(
            m.value(&costing.capital_cost).unwrap(),
            2.0 * 526.45,
            max_relative = 1e-8
        );
    }
}
