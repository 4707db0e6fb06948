//! El master MapReduce de la simulación: loop de eventos, generación
//! dinámica de reducers y políticas de colocación sobre el pool de VMs.

pub mod placement;
pub mod reduce;
pub mod scheduler;
pub mod state;

pub use placement::VmPlacement;
pub use reduce::ReduceGenerator;
pub use scheduler::{Master, Substrate};
pub use state::MasterState;
