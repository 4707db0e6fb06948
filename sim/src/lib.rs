//! Sustrato de simulación de eventos discretos: reloj virtual, cola de
//! eventos futuros y un modelo de ejecución simple por VM. El master consume
//! esto a través de una interfaz angosta (ver `master::Substrate`); acá no
//! hay ninguna política de scheduling.

mod exec;
mod queue;

pub use exec::ExecModel;
pub use queue::EventQueue;

use std::collections::HashMap;

use common::{Event, EventKind, Vm, VmId, VmSpec, WorkUnit};
use tracing::warn;

/// Retardo fijo de la respuesta de inventario.
pub const INVENTORY_DELAY: f64 = 0.1;
/// Retardo fijo de arranque de cada VM.
pub const VM_BOOT_DELAY: f64 = 0.2;

/// El sustrato: dueño del reloj, del inventario de VMs del escenario y
/// de la cola de eventos futuros.
pub struct Simulation {
    clock: f64,
    queue: EventQueue,
    /// VMs que el escenario declara; se crean cuando el master las pide.
    inventory: Vec<Vm>,
    /// VMs ya arrancadas, por id.
    booted: HashMap<VmId, Vm>,
    exec: ExecModel,
    end_emitted: bool,
}

impl Simulation {
    pub fn new(inventory: Vec<Vm>) -> Self {
        Self {
            clock: 0.0,
            queue: EventQueue::new(),
            inventory,
            booted: HashMap::new(),
            exec: ExecModel::new(),
            end_emitted: false,
        }
    }

    /// Arma el inventario desde la config (ids consecutivos desde 0).
    pub fn from_specs(specs: &[VmSpec]) -> Self {
        let vms = specs
            .iter()
            .enumerate()
            .map(|(i, s)| Vm::new(i as VmId, s.pes, s.mips))
            .collect();
        Self::new(vms)
    }

    pub fn now(&self) -> f64 {
        self.clock
    }

    /// Siembra el evento de arranque. Llamar una vez, antes de bombear.
    pub fn start(&mut self) {
        self.queue.push(0.0, EventKind::InventoryRequest);
    }

    /// Entrega el próximo evento en orden de timestamp no decreciente.
    /// Cuando la cola se agota emite un único `EndOfRun` y después `None`.
    pub fn next_event(&mut self) -> Option<Event> {
        if let Some((time, kind)) = self.queue.pop() {
            self.clock = time;
            return Some(Event::new(time, kind));
        }
        if !self.end_emitted {
            self.end_emitted = true;
            return Some(Event::new(self.clock, EventKind::EndOfRun));
        }
        None
    }

    /* --------- Lado que consume el master --------- */

    /// Responde el pedido de inventario con las VMs del escenario.
    pub fn answer_inventory(&mut self) {
        self.queue.push(
            self.clock + INVENTORY_DELAY,
            EventKind::InventoryAnswer(self.inventory.clone()),
        );
    }

    /// Arranca las VMs pedidas; cada una contesta con su `VmReady`.
    pub fn boot_vms(&mut self, vms: &[Vm]) {
        for vm in vms {
            self.booted.insert(vm.id, vm.clone());
            self.queue
                .push(self.clock + VM_BOOT_DELAY, EventKind::VmReady(vm.clone()));
        }
    }

    /// Ejecuta una unidad ya asignada: calcula su fin crudo con el modelo
    /// space-shared y agenda el `UnitDone`.
    pub fn run_unit(&mut self, mut unit: WorkUnit) {
        let vm = match unit.assigned_vm.and_then(|id| self.booted.get(&id)) {
            Some(vm) => vm.clone(),
            None => {
                // el master sólo despacha a VMs del pool creado, así que
                // esto indica un bug del llamador; no tiramos la corrida
                warn!("unidad {} enviada a una VM inexistente", unit.full_id());
                return;
            }
        };
        let finish = self.exec.finish_for(self.clock, &unit, &vm);
        unit.raw_finish = Some(finish);
        self.queue.push(finish, EventKind::UnitDone(unit));
    }
}
