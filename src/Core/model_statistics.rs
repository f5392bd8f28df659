//! Structural diagnostics over a built model: variable and constraint counts
//! and the degree-of-freedom check drivers run before handing a system to the
//! solver. Infeasible fixings are diagnosed here, never enforced internally.

use super::model::Model;

pub fn number_variables(model: &Model) -> usize {
    model.variable_names().len()
}

pub fn number_total_constraints(model: &Model) -> usize {
    model.constraints.len()
}

/// Free variables minus constraints; zero for a square, well-posed system.
pub fn degrees_of_freedom(model: &Model) -> i64 {
    model.degrees_of_freedom()
}

/// Variables that appear in no constraint residual.
pub fn number_unused_variables(model: &Model) -> usize {
    let used = model.used_variables();
    model
        .variable_names()
        .iter()
        .filter(|name| !used.contains(*name))
        .count()
}
