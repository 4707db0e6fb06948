use serde::{Deserialize, Serialize};

use crate::vm::{Vm, VmId};

pub type WorkUnitId = u32;

/// Overhead por canal de comunicación entre cores en VMs multi-core,
/// en segundos de reloj simulado por PE.
pub const MULTI_CORE_OVERHEAD_PER_PE: f64 = 0.7;

/// Tipo de la unidad de trabajo: mapper, reducer o tarea genérica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkKind {
    Map,
    Reduce,
    General,
}

/// Una unidad de trabajo planificable (el "cloudlet" del dominio original).
///
/// Los requisitos de recursos (length, tamaños de archivo, pes) son inmutables
/// después de la creación. La asignación a VM se hace exactamente una vez en
/// el despacho, salvo que la unidad vuelva a la cola por un despacho fallido.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkUnit {
    pub id: WorkUnitId,
    pub kind: WorkKind,

    /// Longitud de la tarea en MI (millones de instrucciones).
    pub length: u64,
    /// Tamaño del archivo de entrada (bytes).
    pub file_size_in: u64,
    /// Tamaño del archivo de salida (bytes).
    pub file_size_out: u64,
    /// Cantidad de PEs que la unidad pide (demanda de paralelismo).
    pub pes: u32,

    /// VM asignada. `None` hasta el despacho; si viene `Some` desde la
    /// creación, la unidad está ligada a esa VM concreta (binding explícito).
    pub assigned_vm: Option<VmId>,
    /// Cantidad de PEs de la VM asignada, capturada en el despacho.
    /// Hace falta para el overhead multi-core sin volver a buscar la VM.
    pub vm_pes: Option<u32>,

    /// Ids de los mappers asociados, sólo para unidades Reduce.
    /// Congelada en la creación, en orden de llegada de los mappers.
    pub contributing_maps: Vec<WorkUnitId>,

    /// Instante de fin crudo que reporta el sustrato (reloj simulado).
    pub raw_finish: Option<f64>,
}

impl WorkUnit {
    /// Crea una unidad de colocación automática (sin binding de VM).
    pub fn new(id: WorkUnitId, kind: WorkKind, length: u64, pes: u32) -> Self {
        Self {
            id,
            kind,
            length,
            file_size_in: 0,
            file_size_out: 0,
            pes,
            assigned_vm: None,
            vm_pes: None,
            contributing_maps: Vec::new(),
            raw_finish: None,
        }
    }

    pub fn with_file_sizes(mut self, file_size_in: u64, file_size_out: u64) -> Self {
        self.file_size_in = file_size_in;
        self.file_size_out = file_size_out;
        self
    }

    /// Liga la unidad a una VM concreta desde la creación.
    /// El despacho la retendrá en cola hasta que esa VM esté disponible.
    pub fn bound_to(mut self, vm_id: VmId) -> Self {
        self.assigned_vm = Some(vm_id);
        self
    }

    /// Marca la unidad como asignada a `vm`. Captura los PEs de la VM
    /// para poder calcular el overhead multi-core después.
    pub fn assign_to(&mut self, vm: &Vm) {
        self.assigned_vm = Some(vm.id);
        self.vm_pes = Some(vm.pes);
    }

    pub fn is_bound(&self) -> bool {
        // binding explícito = asignada antes de pasar por el despacho
        self.assigned_vm.is_some() && self.vm_pes.is_none()
    }

    /// Id legible para la tabla final: letra del tipo + id numérico.
    pub fn full_id(&self) -> String {
        match self.kind {
            WorkKind::Map => format!("M_{}", self.id),
            WorkKind::Reduce => format!("R_{}", self.id),
            WorkKind::General => format!("G_{}", self.id),
        }
    }

    /// Instante de fin visto por el planificador: el fin crudo del sustrato
    /// más el overhead de los canales entre cores si la VM es multi-core.
    /// `None` si la unidad todavía no terminó o no tiene VM asignada.
    pub fn finish_time(&self) -> Option<f64> {
        let raw = self.raw_finish?;
        let vm_pes = self.vm_pes?;
        let overhead = if vm_pes > 1 {
            MULTI_CORE_OVERHEAD_PER_PE * vm_pes as f64
        } else {
            0.0
        };
        Some(raw + overhead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vm(id: VmId, pes: u32) -> Vm {
        Vm::new(id, pes, 1000.0)
    }

    #[test]
    fn full_id_usa_prefijo_por_tipo() {
        assert_eq!(WorkUnit::new(7, WorkKind::Map, 1000, 1).full_id(), "M_7");
        assert_eq!(WorkUnit::new(3, WorkKind::Reduce, 1000, 1).full_id(), "R_3");
        assert_eq!(WorkUnit::new(0, WorkKind::General, 1000, 1).full_id(), "G_0");
    }

    #[test]
    fn finish_time_es_none_sin_asignar_o_sin_terminar() {
        let mut unit = WorkUnit::new(0, WorkKind::Map, 1000, 1);
        assert_eq!(unit.finish_time(), None);

        // asignada pero sin terminar
        unit.assign_to(&vm(0, 1));
        assert_eq!(unit.finish_time(), None);

        // terminada pero sin asignar (no debería pasar, pero el contrato
        // sigue siendo el centinela)
        let mut sin_vm = WorkUnit::new(1, WorkKind::Map, 1000, 1);
        sin_vm.raw_finish = Some(10.0);
        assert_eq!(sin_vm.finish_time(), None);
    }

    #[test]
    fn finish_time_sin_overhead_en_vm_de_un_pe() {
        let mut unit = WorkUnit::new(0, WorkKind::Map, 1000, 1);
        unit.assign_to(&vm(0, 1));
        unit.raw_finish = Some(12.5);
        assert_eq!(unit.finish_time(), Some(12.5));
    }

    #[test]
    fn finish_time_suma_overhead_multi_core() {
        let mut unit = WorkUnit::new(0, WorkKind::Map, 1000, 4);
        unit.assign_to(&vm(0, 4));
        unit.raw_finish = Some(10.0);
        // 0.7 * 4 = 2.8 de overhead
        let ft = unit.finish_time().unwrap();
        assert!((ft - 12.8).abs() < 1e-9);
    }

    #[test]
    fn bound_to_marca_binding_explicito() {
        let unit = WorkUnit::new(5, WorkKind::General, 1000, 1).bound_to(2);
        assert!(unit.is_bound());
        assert_eq!(unit.assigned_vm, Some(2));

        let mut auto = WorkUnit::new(6, WorkKind::Map, 1000, 1);
        assert!(!auto.is_bound());
        auto.assign_to(&vm(2, 1));
        // después del despacho ya no cuenta como binding explícito
        assert!(!auto.is_bound());
    }
}
