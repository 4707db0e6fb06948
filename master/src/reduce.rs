use common::{UnitTemplate, WorkKind, WorkUnit, WorkUnitId};

/// Generación dinámica de reducers: cada `group_size` mappers terminados se
/// sintetiza un reducer con los ids de esos mappers. Cuando termina el último
/// mapper esperado se hace flush del resto, así ningún mapper queda sin
/// reducer que lo consuma. No hace falta saber de antemano cuántos reducers
/// va a necesitar la corrida.
pub struct ReduceGenerator {
    group_size: u32,
    total_maps: u32,
    template: UnitTemplate,

    /// Mappers terminados en toda la corrida.
    done_maps: u32,
    /// Secuencia de ids de los reducers generados.
    reducers: u32,
    /// Ids de mappers acumulados desde el último reducer emitido,
    /// en orden de llegada.
    pending_maps: Vec<WorkUnitId>,
}

impl ReduceGenerator {
    pub fn new(group_size: u32, total_maps: u32, template: UnitTemplate) -> Self {
        Self {
            group_size,
            total_maps,
            template,
            done_maps: 0,
            reducers: 0,
            pending_maps: Vec::new(),
        }
    }

    /// Registra un mapper terminado. Devuelve el reducer nuevo si este
    /// mapper completó un grupo (o disparó el flush final).
    pub fn on_map_completed(&mut self, map_id: WorkUnitId) -> Option<WorkUnit> {
        self.pending_maps.push(map_id);
        self.done_maps += 1;

        // Un solo if: si el total es múltiplo del grupo, el último mapper
        // cumple las dos condiciones a la vez pero emite un único reducer
        // (el acumulador se vacía una sola vez).
        if self.done_maps % self.group_size == 0 || self.done_maps == self.total_maps {
            let mut reducer = WorkUnit::new(
                self.reducers,
                WorkKind::Reduce,
                self.template.length,
                self.template.pes,
            )
            .with_file_sizes(self.template.file_size_in, self.template.file_size_out);
            reducer.contributing_maps = std::mem::take(&mut self.pending_maps);
            self.reducers += 1;
            Some(reducer)
        } else {
            None
        }
    }

    pub fn done_maps(&self) -> u32 {
        self.done_maps
    }

    pub fn reducers_emitted(&self) -> u32 {
        self.reducers
    }
}
