#[allow(non_snake_case)]
pub mod Core;
#[allow(non_snake_case)]
pub mod Costing;
#[allow(non_snake_case)]
pub mod Properties;
#[allow(non_snake_case)]
pub mod UnitModels;
#[allow(non_snake_case)]
pub mod Utils;
