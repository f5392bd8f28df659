//! # Model Module
//!
//! ## Purpose
//! Equation-oriented model container: an ordered registry of scalar variables
//! (with values, fixed flags and declared units) plus a list of named algebraic
//! constraints written as symbolic residuals. A model is built once by the unit
//! models, its boundary variables are fixed by the driver, and the remaining
//! square system is handed to the external damped Newton-Raphson solver.
//!
//! ## Key Features
//! - **Degrees of freedom**: free variables minus constraints, must be zero
//!   for a well-posed solve
//! - **Fixing/unfixing**: boundary conditions are ordinary variables with the
//!   fixed flag raised; fixed variables are substituted into the residuals
//!   before the solve so the solver only ever sees the free unknowns
//! - **Termination status**: solver output is verified against the residuals
//!   of the model itself, non-convergence is reported, never panicked on

use RustedSciThe::numerical::Nonlinear_systems::NR::NR;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("unknown variable: {0}")]
    UnknownVariable(String),
    #[error("variable already declared: {0}")]
    DuplicateVariable(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("system is not square: {free} free variables, {constraints} constraints")]
    NotSquare { free: usize, constraints: usize },
    #[error("solver failure: {0}")]
    SolverFailure(String),
    #[error("ports '{0}' and '{1}' expose different variable sets")]
    PortMismatch(String, String),
}

/// A scalar model variable. Fixed variables act as boundary conditions and are
/// substituted into the residuals before solving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Var {
    pub name: String,
    pub value: f64,
    pub fixed: bool,
    /// Declared units string, e.g. "m^3/s". Carried for reporting and checked
    /// by the caller; full dimensional analysis lives outside this crate.
    pub units: String,
}

/// A named algebraic constraint, residual == 0 at a feasible solution.
pub struct Constraint {
    pub name: String,
    pub residual: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationStatus {
    Optimal,
    NonOptimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    pub status: TerminationStatus,
    /// Max-norm of the constraint residuals evaluated at the returned point.
    pub residual_norm: f64,
    pub unknowns: usize,
}

/// Settings forwarded to the external Newton-Raphson solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSettings {
    pub tolerance: f64,
    pub max_iterations: usize,
    pub damping_factor: Option<f64>,
    pub bounds: Option<HashMap<String, (f64, f64)>>,
    pub log_level: Option<String>,
    /// Residuals above this after the solve demote the status to NonOptimal.
    pub residual_tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 100,
            damping_factor: Some(1.0),
            bounds: None,
            log_level: Some("warn".to_string()),
            residual_tolerance: 1e-6,
        }
    }
}

pub struct Model {
    pub name: String,
    order: Vec<String>,
    vars: HashMap<String, Var>,
    pub constraints: Vec<Constraint>,
}

impl Model {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            order: Vec::new(),
            vars: HashMap::new(),
            constraints: Vec::new(),
        }
    }

    /// Declares a variable and returns its symbolic handle for use in residuals.
    pub fn add_var(&mut self, name: &str, value: f64, units: &str) -> Result<Expr, ModelError> {
        if self.vars.contains_key(name) {
            return Err(ModelError::DuplicateVariable(name.to_string()));
        }
        self.order.push(name.to_string());
        self.vars.insert(
            name.to_string(),
            Var {
                name: name.to_string(),
                value,
                fixed: false,
                units: units.to_string(),
            },
        );
        Ok(Expr::Var(name.to_string()))
    }

    pub fn add_constraint(&mut self, name: &str, residual: Expr) {
        self.constraints.push(Constraint {
            name: name.to_string(),
            residual,
        });
    }

    pub fn var(&self, name: &str) -> Result<&Var, ModelError> {
        self.vars
            .get(name)
            .ok_or_else(|| ModelError::UnknownVariable(name.to_string()))
    }

    fn var_mut(&mut self, name: &str) -> Result<&mut Var, ModelError> {
        self.vars
            .get_mut(name)
            .ok_or_else(|| ModelError::UnknownVariable(name.to_string()))
    }

    pub fn value(&self, name: &str) -> Result<f64, ModelError> {
        Ok(self.var(name)?.value)
    }

    pub fn set_value(&mut self, name: &str, value: f64) -> Result<(), ModelError> {
        self.var_mut(name)?.value = value;
        Ok(())
    }

    /// Fixes a variable at the given value, turning it into a boundary condition.
    pub fn fix(&mut self, name: &str, value: f64) -> Result<(), ModelError> {
        let var = self.var_mut(name)?;
        var.value = value;
        var.fixed = true;
        Ok(())
    }

    pub fn unfix(&mut self, name: &str) -> Result<(), ModelError> {
        self.var_mut(name)?.fixed = false;
        Ok(())
    }

    pub fn is_fixed(&self, name: &str) -> Result<bool, ModelError> {
        Ok(self.var(name)?.fixed)
    }

    pub fn units_of(&self, name: &str) -> Result<String, ModelError> {
        Ok(self.var(name)?.units.clone())
    }

    pub fn variable_names(&self) -> &[String] {
        &self.order
    }

    pub fn free_variables(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|n| !self.vars[*n].fixed)
            .cloned()
            .collect()
    }

    /// Free variables minus constraints. Zero for a square, well-posed system.
    pub fn degrees_of_freedom(&self) -> i64 {
        self.free_variables().len() as i64 - self.constraints.len() as i64
    }

    /// Residual of one constraint with every fixed variable substituted by its
    /// value, so the expression depends on free variables only.
    pub fn substituted_residual(&self, constraint: &Constraint) -> Expr {
        let mut expr = constraint.residual.clone();
        for arg in constraint.residual.all_arguments_are_variables() {
            if let Some(var) = self.vars.get(&arg) {
                if var.fixed {
                    expr = expr.set_variable(&arg, var.value);
                }
            }
        }
        expr.symplify()
    }

    /// Evaluates an expression at the current variable values.
    pub fn evaluate(&self, expr: &Expr) -> Result<f64, ModelError> {
        let args = expr.all_arguments_are_variables();
        let mut point = Vec::with_capacity(args.len());
        for arg in &args {
            point.push(self.value(arg)?);
        }
        let fun = expr.clone().lambdify_owned(args.iter().map(|s| s.as_str()).collect());
        Ok(fun(point))
    }

    /// Max-norm of all constraint residuals at the current point.
    pub fn residual_norm(&self) -> Result<f64, ModelError> {
        let mut norm: f64 = 0.0;
        for constraint in &self.constraints {
            norm = norm.max(self.evaluate(&constraint.residual)?.abs());
        }
        Ok(norm)
    }

    /// Map of every variable to its current value.
    pub fn solution_map(&self) -> HashMap<String, f64> {
        self.vars.iter().map(|(k, v)| (k.clone(), v.value)).collect()
    }

    pub fn solution_json(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(&self.solution_map())
            .map_err(|e| ModelError::SolverFailure(e.to_string()))
    }

    /// Snapshot of the fixed flags, restored by the initializers after they
    /// are done holding boundary states in place.
    pub fn fixed_snapshot(&self) -> HashMap<String, bool> {
        self.vars.iter().map(|(k, v)| (k.clone(), v.fixed)).collect()
    }

    pub fn restore_fixed(&mut self, snapshot: &HashMap<String, bool>) {
        for (name, fixed) in snapshot {
            if let Some(var) = self.vars.get_mut(name) {
                var.fixed = *fixed;
            }
        }
    }

    /// Variables that appear in at least one constraint residual.
    pub fn used_variables(&self) -> HashSet<String> {
        let mut used = HashSet::new();
        for constraint in &self.constraints {
            for arg in constraint.residual.all_arguments_are_variables() {
                used.insert(arg);
            }
        }
        used
    }

    /// Solves the given equation subset for the given unknowns with the
    /// external Newton-Raphson solver, writing the solution back into the
    /// model on success. Residuals must already be substituted.
    pub fn newton_solve(
        &mut self,
        equations: Vec<Expr>,
        unknowns: Vec<String>,
        settings: &SolverSettings,
    ) -> Result<bool, ModelError> {
        if equations.len() != unknowns.len() {
            return Err(ModelError::NotSquare {
                free: unknowns.len(),
                constraints: equations.len(),
            });
        }
        if unknowns.is_empty() {
            return Ok(true);
        }
        let mut initial_guess = Vec::with_capacity(unknowns.len());
        for name in &unknowns {
            initial_guess.push(self.value(name)?);
        }
        let mut solver = NR::new();
        solver.set_equation_system(
            equations,
            Some(unknowns.clone()),
            initial_guess,
            settings.tolerance,
            settings.max_iterations,
        );
        solver.set_solver_params(
            settings.log_level.clone(),
            None,
            settings.damping_factor,
            settings.bounds.clone(),
            None,
            None,
        );
        solver.eq_generate();
        solver.solve();
        match solver.get_result() {
            Some(solution) => {
                let solution: Vec<f64> = solution.data.into();
                for (name, value) in unknowns.iter().zip(solution.iter()) {
                    self.set_value(name, *value)?;
                }
                Ok(true)
            }
            None => {
                warn!("Newton-Raphson solver returned no solution");
                Ok(false)
            }
        }
    }

    /// Blocking solve of the whole model. The system must be square; the
    /// returned status reflects both solver convergence and the residual
    /// check performed on the model's own constraints.
    pub fn solve(&mut self, settings: &SolverSettings) -> Result<SolveReport, ModelError> {
        let unknowns = self.free_variables();
        if unknowns.len() != self.constraints.len() {
            return Err(ModelError::NotSquare {
                free: unknowns.len(),
                constraints: self.constraints.len(),
            });
        }
        info!(
            "solving model '{}': {} unknowns, {} constraints",
            self.name,
            unknowns.len(),
            self.constraints.len()
        );
        let equations: Vec<Expr> = self
            .constraints
            .iter()
            .map(|c| self.substituted_residual(c))
            .collect();
        let converged = self.newton_solve(equations, unknowns.clone(), settings)?;
        let residual_norm = self.residual_norm()?;
        let status = if converged
            && residual_norm.is_finite()
            && residual_norm <= settings.residual_tolerance
        {
            TerminationStatus::Optimal
        } else {
            warn!(
                "model '{}' did not converge, residual norm {:.3e}",
                self.name, residual_norm
            );
            TerminationStatus::NonOptimal
        };
        Ok(SolveReport {
            status,
            residual_norm,
            unknowns: unknowns.len(),
        })
    }
}
