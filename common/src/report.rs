use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::workunit::WorkUnit;

/// Una fila de la tabla final, por unidad retirada.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    /// Id legible: M_0, R_1, G_2...
    pub unit: String,
    pub vm: Option<u32>,
    /// Fin crudo que reportó el sustrato.
    pub raw_finish: Option<f64>,
    /// Fin con el overhead multi-core aplicado.
    pub finish: Option<f64>,
}

impl ReportRow {
    pub fn from_unit(unit: &WorkUnit) -> Self {
        Self {
            unit: unit.full_id(),
            vm: unit.assigned_vm,
            raw_finish: unit.raw_finish,
            finish: unit.finish_time(),
        }
    }
}

/// Resumen de una corrida completa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
}

impl RunReport {
    pub fn new(units: &[WorkUnit]) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            rows: units.iter().map(ReportRow::from_unit).collect(),
        }
    }

    /// Escribe la tabla como CSV (una fila por unidad).
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("no se pudo crear el CSV en {}", path.display()))?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::Vm;
    use crate::workunit::{WorkKind, WorkUnit};
    use std::env;
    use std::fs;

    fn unidad_terminada(id: u32, kind: WorkKind, vm_pes: u32, raw: f64) -> WorkUnit {
        let mut unit = WorkUnit::new(id, kind, 1000, 1);
        unit.assign_to(&Vm::new(0, vm_pes, 1000.0));
        unit.raw_finish = Some(raw);
        unit
    }

    #[test]
    fn report_row_usa_full_id_y_overhead() {
        let unit = unidad_terminada(3, WorkKind::Reduce, 4, 10.0);
        let row = ReportRow::from_unit(&unit);
        assert_eq!(row.unit, "R_3");
        assert_eq!(row.vm, Some(0));
        assert_eq!(row.raw_finish, Some(10.0));
        assert!((row.finish.unwrap() - 12.8).abs() < 1e-9);
    }

    #[test]
    fn write_csv_genera_una_fila_por_unidad() {
        let units = vec![
            unidad_terminada(0, WorkKind::Map, 1, 5.0),
            unidad_terminada(0, WorkKind::Reduce, 1, 9.0),
        ];
        let report = RunReport::new(&units);

        let path = env::temp_dir().join(format!("report-{}.csv", report.run_id));
        report.write_csv(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        // encabezado + 2 filas
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("M_0,"));
        assert!(lines[2].starts_with("R_0,"));

        let _ = fs::remove_file(&path);
    }
}
