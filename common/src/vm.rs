use serde::{Deserialize, Serialize};

pub type VmId = u32;

/// Una máquina virtual del pool de cómputo.
/// La capacidad de paralelismo (`pes`) es fija durante toda la vida de la VM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vm {
    pub id: VmId,
    /// Cantidad de processing elements (capacidad de paralelismo).
    pub pes: u32,
    /// Velocidad de cada PE en MIPS. Sólo la usa el sustrato para calcular
    /// tiempos de ejecución; el planificador no la mira.
    pub mips: f64,
}

impl Vm {
    pub fn new(id: VmId, pes: u32, mips: f64) -> Self {
        Self { id, pes, mips }
    }
}

/// Contadores por VM que mantiene el master para la tabla final.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VmMetrics {
    /// Unidades despachadas a esta VM y todavía en ejecución.
    pub active_units: u32,
    pub units_started: u64,
    pub units_finished: u64,
}
