use std::collections::HashMap;

use common::{Vm, VmId, WorkUnit};

/// Modelo de ejecución space-shared: cada VM corre una unidad a la vez;
/// si llega otra mientras está ocupada, espera a que la VM se libere.
pub struct ExecModel {
    busy_until: HashMap<VmId, f64>,
}

impl ExecModel {
    pub fn new() -> Self {
        Self {
            busy_until: HashMap::new(),
        }
    }

    /// Tiempo de cómputo puro de la unidad en esta VM.
    pub fn exec_time(unit: &WorkUnit, vm: &Vm) -> f64 {
        unit.length as f64 / vm.mips
    }

    /// Reserva la VM para la unidad y devuelve el instante de fin crudo.
    pub fn finish_for(&mut self, now: f64, unit: &WorkUnit, vm: &Vm) -> f64 {
        let free_at = self.busy_until.get(&vm.id).copied().unwrap_or(0.0);
        let start = if free_at > now { free_at } else { now };
        let finish = start + Self::exec_time(unit, vm);
        self.busy_until.insert(vm.id, finish);
        finish
    }
}

impl Default for ExecModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::WorkKind;

    fn unit(length: u64) -> WorkUnit {
        WorkUnit::new(0, WorkKind::Map, length, 1)
    }

    #[test]
    fn exec_time_es_length_sobre_mips() {
        let vm = Vm::new(0, 1, 1000.0);
        assert_eq!(ExecModel::exec_time(&unit(2000), &vm), 2.0);
    }

    #[test]
    fn vm_ocupada_encola_la_siguiente_unidad() {
        let vm = Vm::new(0, 1, 1000.0);
        let mut exec = ExecModel::new();

        // primera unidad arranca ya
        let f1 = exec.finish_for(0.0, &unit(1000), &vm);
        assert_eq!(f1, 1.0);

        // la segunda llega a t=0.5 pero la VM está ocupada hasta t=1
        let f2 = exec.finish_for(0.5, &unit(1000), &vm);
        assert_eq!(f2, 2.0);

        // en otra VM no hay espera
        let otra = Vm::new(1, 1, 1000.0);
        let f3 = exec.finish_for(0.5, &unit(1000), &otra);
        assert_eq!(f3, 1.5);
    }
}
