//! Common surface of a unit model: ports for flowsheet connection, the
//! performance-contents view consumed by reporting, and the fixed-format text
//! report with its stream table.

use super::model::{Model, ModelError};
use super::ports::Port;
use prettytable::{Table, row};

pub trait UnitModel {
    fn unit_name(&self) -> &str;

    fn inlet_port(&self) -> &Port;

    fn outlet_port(&self) -> &Port;

    /// Human-readable label -> model variable, for the performance section of
    /// the report. Empty for units with no performance variables.
    fn performance_contents(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Copies the current inlet values onto the outlet state, the standard
    /// pre-solve estimate for a unit with no better guess. Ports with shared
    /// state (pass-through) are naturally a no-op.
    fn propagate_state(&self, model: &mut Model) -> Result<(), ModelError> {
        for (src, dst) in self
            .inlet_port()
            .vars
            .iter()
            .zip(self.outlet_port().vars.iter())
        {
            let value = model.value(&src.var)?;
            model.set_value(&dst.var, value)?;
        }
        Ok(())
    }

    /// Stream table over the inlet and outlet ports.
    fn stream_table(&self, model: &Model) -> Result<Table, ModelError> {
        let mut table = Table::new();
        table.add_row(row!["", "Inlet", "Outlet"]);
        for (inlet, outlet) in self
            .inlet_port()
            .vars
            .iter()
            .zip(self.outlet_port().vars.iter())
        {
            table.add_row(row![
                inlet.label,
                format!("{:.5}", model.value(&inlet.var)?),
                format!("{:.5}", model.value(&outlet.var)?)
            ]);
        }
        Ok(table)
    }

    /// Fixed-format report: unit header, performance variables, stream table.
    fn report(&self, model: &Model) -> Result<String, ModelError> {
        let border = "=".repeat(84);
        let separator = "-".repeat(84);
        let mut out = String::new();
        out.push_str(&format!("{}\n", border));
        out.push_str(&format!(
            "Unit : {:<66}Time: 0.0\n",
            format!("{}.{}", model.name, self.unit_name())
        ));
        out.push_str(&format!("{}\n", separator));
        out.push_str("    Unit Performance\n\n");
        let contents = self.performance_contents();
        if !contents.is_empty() {
            out.push_str("    Variables:\n\n");
            let mut table = Table::new();
            table.add_row(row!["Key", "Value", "Units", "Fixed"]);
            for (label, var) in &contents {
                table.add_row(row![
                    label,
                    format!("{:.5e}", model.value(var)?),
                    model.units_of(var)?,
                    model.is_fixed(var)?
                ]);
            }
            out.push_str(&table.to_string());
        }
        out.push_str(&format!("{}\n", separator));
        out.push_str("    Stream Table\n\n");
        out.push_str(&self.stream_table(model)?.to_string());
        out.push_str(&format!("{}\n", border));
        Ok(out)
    }
}
