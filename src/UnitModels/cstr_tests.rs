#[cfg(test)]
mod tests {
    use crate::Core::control_volume::{
        ControlVolumeConfig, EnergyBalanceType, MaterialBalanceType, MomentumBalanceType,
    };
    use crate::Core::initializers::{
        BlockTriangularizationInitializer, HierarchicalInitializer, InitializationStatus,
        InitializerStrategy, UnitInitializer,
    };
    use crate::Core::model::{Model, ModelError, SolverSettings, TerminationStatus};
    use crate::Core::model_statistics::{
        degrees_of_freedom, number_total_constraints, number_unused_variables, number_variables,
    };
    use crate::Core::unit_model::UnitModel;
    use crate::Costing::{CostingParams, cost_cstr};
    use crate::Properties::saponification_reactions::SaponificationReactions;
    use crate::Properties::saponification_thermo::SaponificationParameters;
    use crate::UnitModels::cstr::Cstr;
    use crate::Utils::logger::init_console_logger;
    use approx::assert_relative_eq;
    use simplelog::LevelFilter;

    fn full_config() -> ControlVolumeConfig {
        ControlVolumeConfig {
            has_heat_transfer: true,
            has_heat_of_reaction: true,
            has_pressure_change: true,
            ..Default::default()
        }
    }

    /// Saponification CSTR with the documented boundary conditions fixed.
    fn sapon() -> (Model, Cstr) {
        let (mut m, unit) = sapon_loose();
        for key in unit.inlet.keys() {
            let var = unit.inlet.var(key).unwrap().to_string();
            let value = m.value(&var).unwrap();
            m.fix(&var, value).unwrap();
        }
        (m, unit)
    }

    /// Same boundary values, but the inlet state only set, not fixed,
    /// the way a unit sits inside a larger flowsheet before initialization.
    fn sapon_loose() -> (Model, Cstr) {
        let props = SaponificationParameters::new();
        let rxns = SaponificationReactions::new();
        let mut m = Model::new("fs");
        let unit = Cstr::build(&mut m, "unit", &props, &rxns, full_config()).unwrap();

        let set = |m: &mut Model, key: &str, value: f64| {
            let var = unit.inlet.var(key).unwrap().to_string();
            m.set_value(&var, value).unwrap();
        };
        set(&mut m, "flow_vol", 1.0e-3);
        set(&mut m, "conc_mol_comp[H2O]", 55388.0);
        set(&mut m, "conc_mol_comp[NaOH]", 100.0);
        set(&mut m, "conc_mol_comp[EthylAcetate]", 100.0);
        set(&mut m, "conc_mol_comp[SodiumAcetate]", 0.0);
        set(&mut m, "conc_mol_comp[Ethanol]", 0.0);
        set(&mut m, "temperature", 303.15);
        set(&mut m, "pressure", 101325.0);

        m.fix(unit.volume_var(), 1.5e-3).unwrap();
        m.fix(unit.heat_duty_var().unwrap(), 0.0).unwrap();
        m.fix(unit.deltap_var().unwrap(), 0.0).unwrap();
        (m, unit)
    }

    #[test]
    fn test_config_defaults() {
        let config = ControlVolumeConfig::default();
        assert_eq!(config.material_balance, MaterialBalanceType::UseDefault);
        assert_eq!(config.energy_balance, EnergyBalanceType::UseDefault);
        assert_eq!(config.momentum_balance, MomentumBalanceType::PressureTotal);
        assert!(!config.has_heat_transfer);
        assert!(!config.has_pressure_change);
        assert!(!config.has_equilibrium_reactions);
        assert!(!config.has_heat_of_reaction);
        assert!(matches!(
            Cstr::default_initializer(),
            InitializerStrategy::Hierarchical(_)
        ));
    }

    #[test]
    fn test_invalid_configurations_rejected_at_build() {
        let props = SaponificationParameters::new();
        let rxns = SaponificationReactions::new();
        let cases = [
            ControlVolumeConfig {
                has_heat_transfer: true,
                energy_balance: EnergyBalanceType::None,
                ..Default::default()
            },
            ControlVolumeConfig {
                has_heat_of_reaction: true,
                energy_balance: EnergyBalanceType::None,
                ..Default::default()
            },
            ControlVolumeConfig {
                has_pressure_change: true,
                momentum_balance: MomentumBalanceType::None,
                ..Default::default()
            },
        ];
        for config in cases {
            let mut m = Model::new("fs");
            assert!(matches!(
                Cstr::build(&mut m, "unit", &props, &rxns, config),
                Err(ModelError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_build() {
        let (m, unit) = sapon();

        assert_eq!(unit.inlet.vars.len(), 8);
        assert!(unit.inlet.var("flow_vol").is_ok());
        assert!(unit.inlet.var("conc_mol_comp[NaOH]").is_ok());
        assert!(unit.inlet.var("temperature").is_ok());
        assert!(unit.inlet.var("pressure").is_ok());

        assert_eq!(unit.outlet.vars.len(), 8);
        assert!(unit.outlet.var("flow_vol").is_ok());
        assert!(unit.outlet.var("conc_mol_comp[EthylAcetate]").is_ok());
        assert!(unit.outlet.var("temperature").is_ok());
        assert!(unit.outlet.var("pressure").is_ok());

        assert!(
            m.constraints
                .iter()
                .any(|c| c.name == "unit_cstr_performance_eqn_R1")
        );
        assert!(unit.heat_duty_var().is_some());
        assert!(unit.deltap_var().is_some());
        assert!(unit.heat_of_reaction_var().is_some());

        assert_eq!(number_variables(&m), 21);
        assert_eq!(number_total_constraints(&m), 10);
        assert_eq!(number_unused_variables(&m), 0);
    }

    #[test]
    fn test_units() {
        let (m, unit) = sapon();
        assert_eq!(m.units_of(unit.volume_var()).unwrap(), "m^3");
        assert_eq!(m.units_of(unit.heat_duty_var().unwrap()).unwrap(), "W");
        assert_eq!(m.units_of(unit.deltap_var().unwrap()).unwrap(), "Pa");
    }

    #[test]
    fn test_degrees_of_freedom() {
        let (m, _unit) = sapon();
        assert_eq!(degrees_of_freedom(&m), 0);
    }

    #[test]
    fn test_solve_and_solution() {
        init_console_logger(LevelFilter::Warn);
        let (mut m, unit) = sapon();
        let initializer = Cstr::default_initializer();
        assert_eq!(
            initializer.initialize(&mut m, &unit).unwrap(),
            InitializationStatus::Ok
        );
        let report = m.solve(&SolverSettings::default()).unwrap();
        assert_eq!(report.status, TerminationStatus::Optimal);

        let outlet = |key: &str| m.value(unit.outlet.var(key).unwrap()).unwrap();
        assert_relative_eq!(outlet("pressure"), 101325.0, epsilon = 1e-2);
        assert_relative_eq!(outlet("temperature"), 304.09, epsilon = 1e-2);
        assert_relative_eq!(outlet("conc_mol_comp[EthylAcetate]"), 20.32, epsilon = 1e-2);
    }

    #[test]
    fn test_conservation() {
        let (mut m, unit) = sapon();
        let initializer = Cstr::default_initializer();
        assert_eq!(
            initializer.initialize(&mut m, &unit).unwrap(),
            InitializationStatus::Ok
        );
        let report = m.solve(&SolverSettings::default()).unwrap();
        assert_eq!(report.status, TerminationStatus::Optimal);

        let inlet = |key: &str| m.value(unit.inlet.var(key).unwrap()).unwrap();
        let outlet = |key: &str| m.value(unit.outlet.var(key).unwrap()).unwrap();
        let components = [
            "conc_mol_comp[H2O]",
            "conc_mol_comp[NaOH]",
            "conc_mol_comp[EthylAcetate]",
            "conc_mol_comp[SodiumAcetate]",
            "conc_mol_comp[Ethanol]",
        ];

        // volumetric and total molar flow conservation
        assert!((inlet("flow_vol") - outlet("flow_vol")).abs() <= 1e-6);
        let molar_in: f64 = components.iter().map(|c| inlet(c)).sum::<f64>() * inlet("flow_vol");
        let molar_out: f64 =
            components.iter().map(|c| outlet(c)).sum::<f64>() * outlet("flow_vol");
        assert!((molar_in - molar_out).abs() <= 1e-6);

        // heat of reaction and the sensible-enthalpy closure
        let q_rxn = m.value(unit.heat_of_reaction_var().unwrap()).unwrap();
        assert_relative_eq!(q_rxn, 3904.51, epsilon = 1e-2);
        let props = SaponificationParameters::new();
        let sensible = |flow: f64, t: f64| {
            flow * props.dens_mol * props.cp_mol * (t - props.temperature_ref)
        };
        let closure = sensible(inlet("flow_vol"), inlet("temperature"))
            - sensible(outlet("flow_vol"), outlet("temperature"))
            + q_rxn;
        assert!(closure.abs() <= 1e-3);
    }

    #[test]
    fn test_general_hierarchical_initializer() {
        let (mut m, unit) = sapon_loose();
        let initializer = HierarchicalInitializer::default();
        let status = initializer.initialize(&mut m, &unit).unwrap();
        assert_eq!(status, InitializationStatus::Ok);
        assert_initialized_solution(&m, &unit);
    }

    #[test]
    fn test_block_triangularization_initializer() {
        let (mut m, unit) = sapon_loose();
        let initializer = BlockTriangularizationInitializer::with_constraint_tolerance(2e-5);
        let status = initializer.initialize(&mut m, &unit).unwrap();
        assert_eq!(status, InitializationStatus::Ok);
        assert_initialized_solution(&m, &unit);
    }

    fn assert_initialized_solution(m: &Model, unit: &Cstr) {
        let outlet = |key: &str| m.value(unit.outlet.var(key).unwrap()).unwrap();
        assert_relative_eq!(outlet("flow_vol"), 1.0e-3, max_relative = 1e-5);
        assert_relative_eq!(outlet("conc_mol_comp[H2O]"), 55388.0, max_relative = 1e-5);
        assert_relative_eq!(outlet("conc_mol_comp[NaOH]"), 20.31609, max_relative = 1e-5);
        assert_relative_eq!(
            outlet("conc_mol_comp[EthylAcetate]"),
            20.31609,
            max_relative = 1e-5
        );
        assert_relative_eq!(
            outlet("conc_mol_comp[SodiumAcetate]"),
            79.68391,
            max_relative = 1e-5
        );
        assert_relative_eq!(outlet("conc_mol_comp[Ethanol]"), 79.68391, max_relative = 1e-5);
        assert_relative_eq!(outlet("temperature"), 304.0856, max_relative = 1e-5);
        assert_relative_eq!(outlet("pressure"), 101325.0, max_relative = 1e-5);

        // the initializer must hand the inlet back unfixed
        for key in unit.inlet.keys() {
            assert!(!m.is_fixed(unit.inlet.var(key).unwrap()).unwrap());
        }
    }

    #[test]
    fn test_both_initializers_agree() {
        let (mut m1, unit1) = sapon_loose();
        let (mut m2, unit2) = sapon_loose();
        let hierarchical = InitializerStrategy::Hierarchical(HierarchicalInitializer::default());
        let triangular = InitializerStrategy::BlockTriangularization(
            BlockTriangularizationInitializer::default(),
        );
        assert_eq!(
            hierarchical.initialize(&mut m1, &unit1).unwrap(),
            InitializationStatus::Ok
        );
        assert_eq!(
            triangular.initialize(&mut m2, &unit2).unwrap(),
            InitializationStatus::Ok
        );
        for key in unit1.outlet.keys() {
            let a = m1.value(unit1.outlet.var(key).unwrap()).unwrap();
            let b = m2.value(unit2.outlet.var(key).unwrap()).unwrap();
            assert_relative_eq!(a, b, max_relative = 1e-5, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_heat_of_reaction_decoupled_from_energy_balance() {
        // default config: reactions present, but the energy balance omits the
        // reaction enthalpy, so the outlet stays at the inlet temperature
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
        assert!(unit.heat_duty_var().is_none());
        assert!(unit.deltap_var().is_none());
        assert!(unit.heat_of_reaction_var().is_none());

        let set = |m: &mut Model, key: &str, value: f64| {
            let var = unit.inlet.var(key).unwrap().to_string();
            m.fix(&var, value).unwrap();
        };
        set(&mut m, "flow_vol", 1.0e-3);
        set(&mut m, "conc_mol_comp[H2O]", 55388.0);
        set(&mut m, "conc_mol_comp[NaOH]", 100.0);
        set(&mut m, "conc_mol_comp[EthylAcetate]", 100.0);
        set(&mut m, "conc_mol_comp[SodiumAcetate]", 0.0);
        set(&mut m, "conc_mol_comp[Ethanol]", 0.0);
        set(&mut m, "temperature", 303.15);
        set(&mut m, "pressure", 101325.0);
        m.fix(unit.volume_var(), 1.5e-3).unwrap();
        assert_eq!(degrees_of_freedom(&m), 0);

        let initializer = Cstr::default_initializer();
        assert_eq!(
            initializer.initialize(&mut m, &unit).unwrap(),
            InitializationStatus::Ok
        );
        let outlet = |key: &str| m.value(unit.outlet.var(key).unwrap()).unwrap();
        assert_relative_eq!(outlet("temperature"), 303.15, epsilon = 1e-8);
        assert_relative_eq!(outlet("pressure"), 101325.0, epsilon = 1e-8);
        // isothermal conversion: k(303.15 K) gives a higher outlet reactant level
        assert_relative_eq!(outlet("conc_mol_comp[EthylAcetate]"), 20.79, epsilon = 1e-2);
    }

    #[test]
    fn test_performance_contents() {
        let (m, unit) = sapon();
        let contents = unit.performance_contents();
        assert_eq!(
            contents,
            vec![
                ("Volume".to_string(), "unit_volume".to_string()),
                ("Heat Duty".to_string(), "unit_heat_duty".to_string()),
                ("Pressure Change".to_string(), "unit_deltaP".to_string()),
            ]
        );
        assert_eq!(m.value("unit_volume").unwrap(), 1.5e-3);
    }

    #[test]
    fn test_costing() {
        let (mut m, unit) = sapon();
        let costing = cost_cstr(&mut m, &unit, &CostingParams::default()).unwrap();
        assert_eq!(degrees_of_freedom(&m), 0);
        let initializer = Cstr::default_initializer();
        assert_eq!(
            initializer.initialize(&mut m, &unit).unwrap(),
            InitializationStatus::Ok
        );
        let report = m.solve(&SolverSettings::default()).unwrap();
        assert_eq!(report.status, TerminationStatus::Optimal);
        assert_relative_eq!(
            m.value(&costing.capital_cost).unwrap(),
            2.0 * 0.52645 * 1.5e-3,
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_report() {
        let (mut m, unit) = sapon();
        let initializer = Cstr::default_initializer();
        initializer.initialize(&mut m, &unit).unwrap();
        let report = unit.report(&m).unwrap();
        println!("{}", report);
        assert!(report.contains("Unit : fs.unit"));
        assert!(report.contains("Unit Performance"));
        assert!(report.contains("Volume"));
        assert!(report.contains("Heat Duty"));
        assert!(report.contains("Pressure Change"));
        assert!(report.contains("Stream Table"));
        assert!(report.contains("Volumetric Flowrate"));
        assert!(report.contains("Molar Concentration NaOH"));
    }

    #[test]
    fn test_solution_json_roundtrip() {
        let (mut m, unit) = sapon();
        let initializer = Cstr::default_initializer();
        initializer.initialize(&mut m, &unit).unwrap();
        let json = m.solution_json().unwrap();
        let map: std::collections::HashMap<String, f64> = serde_json::from_str(&json).unwrap();
        assert_relative_eq!(
            map[unit.outlet.var("temperature").unwrap()],
            304.0856,
            max_relative = 1e-5
        );
    }
}
