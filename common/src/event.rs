use serde::{Deserialize, Serialize};

use crate::vm::Vm;
use crate::workunit::WorkUnit;

/// Una notificación del sustrato de simulación, con su instante de entrega.
/// El sustrato garantiza la entrega en orden de timestamp no decreciente.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
}

/// Conjunto cerrado de tipos de evento que el master entiende.
/// Agregar una variante obliga a tocar todos los `match` (a propósito).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventKind {
    /// Arranque: pedido de características de los recursos disponibles.
    InventoryRequest,
    /// Respuesta con el inventario de VMs que el sustrato puede crear.
    InventoryAnswer(Vec<Vm>),
    /// Ack de creación de una VM: ya se le pueden despachar unidades.
    VmReady(Vm),
    /// Una unidad terminó; vuelve con su `raw_finish` puesto.
    UnitDone(WorkUnit),
    /// Fin de la corrida. Único evento terminal.
    EndOfRun,
    /// Tag desconocido; va al handler genérico.
    Other(u32),
}

impl Event {
    pub fn new(time: f64, kind: EventKind) -> Self {
        Self { time, kind }
    }
}
