/// equation-oriented model container, solver bridge and error taxonomy
pub mod model;
/// named variable bundles for flowsheet connection
pub mod ports;
/// conservation-law assembly between an inlet and an outlet state
pub mod control_volume;
/// hierarchical and block-triangularization initialization strategies
pub mod initializers;
/// variable/constraint counts and degree-of-freedom diagnostics
pub mod model_statistics;
/// common unit-model surface: ports, performance contents, report
pub mod unit_model;
