/// property/reaction capability traits and the state block they build
pub mod package;
/// saponification thermo package: constant-density aqueous NaOH/ethyl acetate
pub mod saponification_thermo;
/// saponification kinetics: single second-order Arrhenius reaction
pub mod saponification_reactions;
/// minimal flow + mass-concentration package for zero-order units
pub mod water_props;
