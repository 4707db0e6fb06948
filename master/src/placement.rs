use common::{Vm, WorkUnit};

/// Política de selección de VM para unidades de colocación automática.
///
/// Round robin simple por defecto. Con `capacity_matched` se busca, desde un
/// cursor secundario, una VM cuya cantidad de PEs no supere la demanda de la
/// unidad: así las VMs multi-core quedan reservadas para las unidades que de
/// verdad piden varios PEs y se les ahorra el overhead de los canales entre
/// cores a las que no. Si una vuelta completa no encuentra candidata, cae a
/// la VM del cursor primario.
pub struct VmPlacement {
    capacity_matched: bool,
    /// Cursor primario del round robin. Avanza uno por cada colocación
    /// exitosa, elija quien elija la VM.
    cursor: usize,
    /// Cursor secundario del matching por capacidad. Se inicializa recién
    /// en el primer despacho, en cursor + 1 (mod n).
    second_cursor: Option<usize>,
}

impl VmPlacement {
    pub fn new(capacity_matched: bool) -> Self {
        Self {
            capacity_matched,
            cursor: 0,
            second_cursor: None,
        }
    }

    /// Elige una VM del pool para `unit`. No avanza el cursor primario:
    /// eso lo hace `advance` cuando la colocación realmente salió bien.
    pub fn select<'a>(&mut self, unit: &WorkUnit, vms: &'a [Vm]) -> Option<&'a Vm> {
        if vms.is_empty() {
            return None;
        }
        let n = vms.len();
        // el cursor secundario nace recién en el primer despacho
        let mut second = match self.second_cursor {
            Some(s) => s % n,
            None => (self.cursor + 1) % n,
        };

        let mut vm = &vms[self.cursor];
        if self.capacity_matched {
            let mut probes = 0;
            while vm.pes > unit.pes && probes < n {
                vm = &vms[second];
                second = (second + 1) % n;
                probes += 1;
                if probes == n {
                    // vuelta completa sin match: fallback al cursor primario
                    vm = &vms[self.cursor];
                }
            }
        }
        self.second_cursor = Some(second);
        Some(vm)
    }

    /// Avanza el cursor primario después de una colocación exitosa.
    pub fn advance(&mut self, pool_len: usize) {
        if pool_len > 0 {
            self.cursor = (self.cursor + 1) % pool_len;
        }
    }
}
