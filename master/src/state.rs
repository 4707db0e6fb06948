// master/src/state.rs

use common::{Vm, VmId, VmMetrics, WorkUnit};
use std::collections::{HashMap, VecDeque};

/// Estado interno del master. Todo acá tiene un único escritor: el handler
/// de eventos corre de a uno y hasta el final, así que no hace falta ningún
/// lock (a diferencia de un master HTTP, esto es una simulación secuencial).
#[derive(Default)]
pub struct MasterState {
    /// Unidades esperando despacho (incluye los reducers recién generados).
    pub pending: VecDeque<WorkUnit>,
    /// Pool de VMs ya creadas, en orden de llegada del ack.
    pub vms: Vec<Vm>,
    /// Contadores por VM para la tabla final.
    pub vm_metrics: HashMap<VmId, VmMetrics>,
    /// Unidades terminadas, retiradas para el reporte.
    pub retired: Vec<WorkUnit>,
    /// Unidades despachadas y todavía en ejecución.
    pub in_flight: u32,
    /// Se levanta con el evento de fin de corrida.
    pub finished: bool,
}

impl MasterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vm_by_id(&self, id: VmId) -> Option<&Vm> {
        self.vms.iter().find(|vm| vm.id == id)
    }
}
