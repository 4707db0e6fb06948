use anyhow::Result;
use common::{Event, EventKind, MasterConfig, RunReport, Vm, WorkKind, WorkUnit};
use sim::Simulation;
use tracing::{debug, info, warn};

use crate::placement::VmPlacement;
use crate::reduce::ReduceGenerator;
use crate::state::MasterState;

/// Interfaz angosta que el master le exige al sustrato de simulación.
/// El master no hereda de nada del sustrato: sólo compone contra esto.
pub trait Substrate {
    /// Reloj virtual actual.
    fn now(&self) -> f64;
    /// Responder el pedido de inventario de recursos.
    fn answer_inventory(&mut self);
    /// Pedir la creación de las VMs del inventario.
    fn boot_vms(&mut self, vms: &[Vm]);
    /// Ejecutar una unidad ya asignada a una VM.
    fn run_unit(&mut self, unit: WorkUnit);
}

impl Substrate for Simulation {
    fn now(&self) -> f64 {
        Simulation::now(self)
    }

    fn answer_inventory(&mut self) {
        Simulation::answer_inventory(self)
    }

    fn boot_vms(&mut self, vms: &[Vm]) {
        Simulation::boot_vms(self, vms)
    }

    fn run_unit(&mut self, unit: WorkUnit) {
        Simulation::run_unit(self, unit)
    }
}

/// El nodo master: recibe los eventos del sustrato de a uno, genera los
/// reducers dinámicos a medida que terminan los mappers y despacha las
/// unidades pendientes a las VMs según la política configurada.
///
/// Todo corre en un solo hilo: cada handler muta el estado de forma
/// síncrona y corre hasta el final antes del evento siguiente. De esa
/// disciplina dependen el acumulador de mappers y los cursores.
pub struct Master {
    state: MasterState,
    placement: VmPlacement,
    reduce: ReduceGenerator,
}

impl Master {
    /// Construye el master validando la config. Una config malformada es
    /// el único error fatal: acá se corta antes de procesar nada.
    pub fn new(cfg: &MasterConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            state: MasterState::new(),
            placement: VmPlacement::new(cfg.capacity_matched),
            reduce: ReduceGenerator::new(
                cfg.group_size,
                cfg.total_maps,
                cfg.reduce_template.clone(),
            ),
        })
    }

    /// Encola las unidades iniciales del escenario (mappers y generales),
    /// antes de arrancar la corrida.
    pub fn submit_units(&mut self, units: impl IntoIterator<Item = WorkUnit>) {
        self.state.pending.extend(units);
    }

    /// Procesa una notificación del sustrato. No devuelve nada; los efectos
    /// salen por el propio sustrato (creación de VMs, ejecución de unidades).
    pub fn handle<S: Substrate>(&mut self, event: Event, sub: &mut S) {
        match event.kind {
            EventKind::InventoryRequest => {
                debug!("t={:.2}: pedido de inventario, pasa al sustrato", event.time);
                sub.answer_inventory();
            }
            EventKind::InventoryAnswer(vms) => {
                info!(
                    "t={:.2}: inventario con {} VMs, pidiendo su creación",
                    event.time,
                    vms.len()
                );
                sub.boot_vms(&vms);
                // disparo inicial: si ya había algo en cola y alguna VM
                // creada, sale ahora
                self.dispatch(sub);
            }
            EventKind::VmReady(vm) => {
                info!("t={:.2}: VM #{} lista ({} PEs)", event.time, vm.id, vm.pes);
                self.state.vm_metrics.entry(vm.id).or_default();
                self.state.vms.push(vm);
                self.dispatch(sub);
            }
            EventKind::UnitDone(unit) => {
                self.on_unit_done(event.time, unit, sub);
            }
            EventKind::EndOfRun => {
                self.shutdown(event.time);
            }
            EventKind::Other(tag) => {
                self.process_other(tag);
            }
        }
    }

    pub fn finished(&self) -> bool {
        self.state.finished
    }

    pub fn state(&self) -> &MasterState {
        &self.state
    }

    pub fn report(&self) -> RunReport {
        RunReport::new(&self.state.retired)
    }

    /* --------- handlers internos --------- */

    fn on_unit_done<S: Substrate>(&mut self, time: f64, unit: WorkUnit, sub: &mut S) {
        info!("t={:.2}: terminó la unidad {}", time, unit.full_id());

        // liberar el lugar en la contabilidad de la VM
        if let Some(vm_id) = unit.assigned_vm {
            if let Some(metrics) = self.state.vm_metrics.get_mut(&vm_id) {
                metrics.active_units = metrics.active_units.saturating_sub(1);
                metrics.units_finished += 1;
            }
        }
        self.state.in_flight = self.state.in_flight.saturating_sub(1);

        // cada group_size mappers terminados sale un reducer nuevo
        if unit.kind == WorkKind::Map {
            if let Some(reducer) = self.reduce.on_map_completed(unit.id) {
                info!(
                    "t={:.2}: {} mappers listos, generando el reducer {} para {:?}",
                    time,
                    self.reduce.done_maps(),
                    reducer.full_id(),
                    reducer.contributing_maps
                );
                self.state.pending.push_back(reducer);
            }
        }

        // la unidad queda inerte, sólo para el reporte
        self.state.retired.push(unit);
        self.dispatch(sub);
    }

    /// Una pasada de despacho sobre la cola de pendientes. Se vuelve a
    /// disparar con cada evento que toca la cola o el pool; lo que no se
    /// pudo colocar queda esperando la próxima pasada.
    fn dispatch<S: Substrate>(&mut self, sub: &mut S) {
        if self.state.vms.is_empty() {
            return;
        }

        // snapshot de la cola: intentamos cada unidad y re-encolamos las
        // que no salieron, nunca mutamos la cola mientras la recorremos
        let attempts: Vec<WorkUnit> = self.state.pending.drain(..).collect();

        for mut unit in attempts {
            let elegida: Option<Vm> = if unit.is_bound() {
                // binding explícito: va a esa VM o espera a que exista
                match unit.assigned_vm.and_then(|id| self.state.vm_by_id(id)) {
                    Some(vm) => Some(vm.clone()),
                    None => {
                        info!(
                            "t={:.2}: posponiendo la unidad {}: su VM ligada no está disponible",
                            sub.now(),
                            unit.full_id()
                        );
                        self.state.pending.push_back(unit);
                        continue;
                    }
                }
            } else {
                self.placement.select(&unit, &self.state.vms).cloned()
            };

            let Some(vm) = elegida else {
                self.state.pending.push_back(unit);
                continue;
            };

            info!(
                "t={:.2}: enviando la unidad {} a la VM #{}",
                sub.now(),
                unit.full_id(),
                vm.id
            );
            unit.assign_to(&vm);

            let metrics = self.state.vm_metrics.entry(vm.id).or_default();
            metrics.active_units += 1;
            metrics.units_started += 1;
            self.state.in_flight += 1;

            sub.run_unit(unit);
            // el cursor primario avanza con cada colocación exitosa,
            // sin importar qué modo eligió la VM
            self.placement.advance(self.state.vms.len());
        }
    }

    fn shutdown(&mut self, time: f64) {
        info!(
            "t={:.2}: fin de la corrida, {} unidades retiradas",
            time,
            self.state.retired.len()
        );
        self.state.pending.clear();
        self.state.vms.clear();
        self.state.finished = true;
    }

    /// Handler genérico para tags que el master no conoce. No corta nada.
    fn process_other(&mut self, tag: u32) {
        warn!("evento con tag desconocido {}, ignorado", tag);
    }
}
