/// steady-state continuously stirred tank reactor
pub mod cstr;
mod cstr_tests;
/// zero-order pass-through (identity) unit
pub mod pass_through;
