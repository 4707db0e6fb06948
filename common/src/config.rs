use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parámetros de tamaño de una unidad de trabajo del escenario.
/// Se usa tanto para los mappers iniciales como para los reducers sintetizados.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub length: u64,
    pub pes: u32,
    #[serde(default)]
    pub file_size_in: u64,
    #[serde(default)]
    pub file_size_out: u64,
}

impl Default for UnitTemplate {
    fn default() -> Self {
        Self {
            length: 1000,
            pes: 1,
            file_size_in: 300,
            file_size_out: 300,
        }
    }
}

/// Descripción de una VM del escenario (el sustrato las crea al arrancar).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmSpec {
    pub pes: u32,
    #[serde(default = "default_mips")]
    pub mips: f64,
}

fn default_mips() -> f64 {
    1000.0
}

/// Configuración del master, consumida en la construcción.
/// La validación corre antes de procesar cualquier evento: una config
/// malformada es el único error fatal de todo el sistema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Cada cuántos mappers terminados se genera un reducer.
    pub group_size: u32,
    /// Total de mappers esperados en la corrida (umbral de flush).
    pub total_maps: u32,
    /// false = round robin simple; true = matching por capacidad con
    /// fallback a round robin.
    #[serde(default)]
    pub capacity_matched: bool,
    /// Parámetros de los mappers iniciales del escenario.
    #[serde(default)]
    pub map_template: UnitTemplate,
    /// Parámetros de cada reducer sintetizado.
    #[serde(default)]
    pub reduce_template: UnitTemplate,
    /// VMs del escenario, en orden de creación.
    pub vms: Vec<VmSpec>,
}

impl MasterConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("no se pudo leer la config en {}", path.display()))?;
        let cfg: MasterConfig = serde_json::from_str(&raw)
            .with_context(|| format!("config inválida en {}", path.display()))?;
        Ok(cfg)
    }

    /// Chequeos que cortan la corrida antes de arrancar.
    pub fn validate(&self) -> Result<()> {
        if self.group_size == 0 {
            bail!("group_size debe ser positivo");
        }
        if self.total_maps == 0 {
            bail!("total_maps debe ser positivo");
        }
        if self.vms.is_empty() {
            bail!("hace falta al menos una VM en la config");
        }
        if let Some(i) = self.vms.iter().position(|v| v.pes == 0) {
            bail!("la VM {} tiene 0 PEs", i);
        }
        if self.map_template.pes == 0 {
            bail!("el template de map pide 0 PEs");
        }
        if self.reduce_template.pes == 0 {
            bail!("el template de reduce pide 0 PEs");
        }
        Ok(())
    }
}
