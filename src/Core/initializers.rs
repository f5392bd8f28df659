//! # Initializers Module
//!
//! ## Purpose
//! Two alternative strategies for bringing a freshly built unit model to a
//! converged starting point before (or instead of) the final solve:
//!
//! - **Hierarchical**: initialize the state sub-blocks first by propagating
//!   the inlet state into the outlet, then solve the whole unit in one shot.
//! - **Block triangularization**: order the combined system into triangular
//!   blocks, solving 1x1 blocks by direct Newton iteration as long as some
//!   constraint depends on a single remaining unknown, then hand whatever is
//!   left to the solver as one simultaneous block.
//!
//! Both hold the unit's inlet state temporarily fixed while they work and
//! restore the original fixed flags afterwards, so a driver can initialize a
//! model whose boundary conditions are set but not yet fixed. Both verify the
//! constraint residuals against a configurable tolerance and report a status
//! per unit; the driver is expected to check it. There is no automatic retry.

use super::model::{Model, ModelError, SolverSettings, TerminationStatus};
use super::unit_model::UnitModel;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use enum_dispatch::enum_dispatch;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitializationStatus {
    Ok,
    Failed,
}

#[enum_dispatch]
pub trait UnitInitializer {
    fn initialize(
        &self,
        model: &mut Model,
        unit: &dyn UnitModel,
    ) -> Result<InitializationStatus, ModelError>;
}

#[enum_dispatch(UnitInitializer)]
pub enum InitializerStrategy {
    Hierarchical(HierarchicalInitializer),
    BlockTriangularization(BlockTriangularizationInitializer),
}

fn fix_inlet_state(model: &mut Model, unit: &dyn UnitModel) -> Result<(), ModelError> {
    for port_var in &unit.inlet_port().vars.clone() {
        let value = model.value(&port_var.var)?;
        model.fix(&port_var.var, value)?;
    }
    Ok(())
}

fn status_from_residuals(
    model: &Model,
    constraint_tolerance: f64,
) -> Result<InitializationStatus, ModelError> {
    let norm = model.residual_norm()?;
    if norm.is_finite() && norm <= constraint_tolerance {
        Ok(InitializationStatus::Ok)
    } else {
        Ok(InitializationStatus::Failed)
    }
}

/// Sequential hierarchical initializer: state sub-blocks first, then the unit.
pub struct HierarchicalInitializer {
    pub settings: SolverSettings,
    pub constraint_tolerance: f64,
}

impl Default for HierarchicalInitializer {
    fn default() -> Self {
        Self {
            settings: SolverSettings::default(),
            constraint_tolerance: 1e-5,
        }
    }
}

impl UnitInitializer for HierarchicalInitializer {
    fn initialize(
        &self,
        model: &mut Model,
        unit: &dyn UnitModel,
    ) -> Result<InitializationStatus, ModelError> {
        info!("hierarchical initialization of unit '{}'", unit.unit_name());
        let snapshot = model.fixed_snapshot();
        let result = fix_inlet_state(model, unit)
            .and_then(|_| unit.propagate_state(model))
            .and_then(|_| model.solve(&self.settings));
        model.restore_fixed(&snapshot);
        let report = result?;
        if report.status != TerminationStatus::Optimal {
            return Ok(InitializationStatus::Failed);
        }
        status_from_residuals(model, self.constraint_tolerance)
    }
}

/// Solver-assisted block-triangularization initializer.
pub struct BlockTriangularizationInitializer {
    pub settings: SolverSettings,
    pub constraint_tolerance: f64,
}

impl Default for BlockTriangularizationInitializer {
    fn default() -> Self {
        Self {
            settings: SolverSettings::default(),
            constraint_tolerance: 1e-5,
        }
    }
}

impl BlockTriangularizationInitializer {
    pub fn with_constraint_tolerance(constraint_tolerance: f64) -> Self {
        Self {
            constraint_tolerance,
            ..Self::default()
        }
    }

    /// Substitutes every argument except the ones listed in `keep` by its
    /// current model value.
    fn reduce(model: &Model, expr: &Expr, keep: &[String]) -> Result<Expr, ModelError> {
        let mut reduced = expr.clone();
        for arg in expr.all_arguments_are_variables() {
            if !keep.contains(&arg) {
                reduced = reduced.set_variable(&arg, model.value(&arg)?);
            }
        }
        Ok(reduced.symplify())
    }

    fn run(&self, model: &mut Model) -> Result<bool, ModelError> {
        let mut pending = model.free_variables();
        let mut remaining: Vec<Expr> = model
            .constraints
            .iter()
            .map(|c| model.substituted_residual(c))
            .collect();
        if pending.len() != remaining.len() {
            return Err(ModelError::NotSquare {
                free: pending.len(),
                constraints: remaining.len(),
            });
        }
        // peel off 1x1 blocks while some constraint has a single unknown left
        loop {
            let mut solved_one = false;
            let mut index = 0;
            while index < remaining.len() {
                let unknowns: Vec<String> = remaining[index]
                    .all_arguments_are_variables()
                    .into_iter()
                    .filter(|a| pending.contains(a))
                    .collect();
                if unknowns.len() == 1 {
                    let unknown = unknowns[0].clone();
                    let scalar = Self::reduce(model, &remaining[index], &unknowns)?;
                    if !model.newton_solve(vec![scalar], vec![unknown.clone()], &self.settings)? {
                        return Ok(false);
                    }
                    pending.retain(|p| *p != unknown);
                    remaining.remove(index);
                    solved_one = true;
                } else {
                    index += 1;
                }
            }
            if !solved_one {
                break;
            }
        }
        if remaining.is_empty() {
            return Ok(true);
        }
        // simultaneous fallback block for the coupled remainder
        info!(
            "block triangularization: solving coupled block of {} equations",
            remaining.len()
        );
        let mut block = Vec::with_capacity(remaining.len());
        for expr in &remaining {
            block.push(Self::reduce(model, expr, &pending)?);
        }
        model.newton_solve(block, pending, &self.settings)
    }
}

impl UnitInitializer for BlockTriangularizationInitializer {
    fn initialize(
        &self,
        model: &mut Model,
        unit: &dyn UnitModel,
    ) -> Result<InitializationStatus, ModelError> {
        info!(
            "block-triangularization initialization of unit '{}'",
            unit.unit_name()
        );
        let snapshot = model.fixed_snapshot();
        let result = fix_inlet_state(model, unit)
            .and_then(|_| unit.propagate_state(model))
            .and_then(|_| self.run(model));
        model.restore_fixed(&snapshot);
        if !result? {
            return Ok(InitializationStatus::Failed);
        }
        status_from_residuals(model, self.constraint_tolerance)
    }
}
