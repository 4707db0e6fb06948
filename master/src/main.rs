use anyhow::Result;
use clap::Parser;
use common::{MasterConfig, RunReport, UnitTemplate, VmSpec, WorkKind, WorkUnit};
use master::{Master, MasterState};
use sim::Simulation;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "master")]
#[command(about = "Simulador del master MapReduce sobre un pool de VMs")]
struct Cli {
    /// Config JSON del escenario; sin esto corre el escenario demo
    #[arg(long, value_name = "ARCHIVO")]
    config: Option<PathBuf>,

    /// Fuerza el matching por capacidad aunque la config diga otra cosa
    #[arg(long)]
    capacity_matched: bool,

    /// Escribe la tabla final como CSV en esta ruta
    #[arg(long, value_name = "ARCHIVO")]
    csv: Option<PathBuf>,

    /// Imprime el reporte como JSON en vez de la tabla
    #[arg(long)]
    json: bool,
}

/// Escenario demo: 7 mappers, reducers cada 3, VMs de 1/4/1/8 PEs.
fn demo_config() -> MasterConfig {
    MasterConfig {
        group_size: 3,
        total_maps: 7,
        capacity_matched: false,
        map_template: UnitTemplate::default(),
        reduce_template: UnitTemplate::default(),
        vms: vec![
            VmSpec { pes: 1, mips: 1000.0 },
            VmSpec { pes: 4, mips: 1000.0 },
            VmSpec { pes: 1, mips: 1000.0 },
            VmSpec { pes: 8, mips: 1000.0 },
        ],
    }
}

/// Los mappers iniciales del escenario, con ids 0..total_maps.
fn initial_maps(cfg: &MasterConfig) -> Vec<WorkUnit> {
    (0..cfg.total_maps)
        .map(|id| {
            WorkUnit::new(
                id,
                WorkKind::Map,
                cfg.map_template.length,
                cfg.map_template.pes,
            )
            .with_file_sizes(cfg.map_template.file_size_in, cfg.map_template.file_size_out)
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "master=info,sim=info".to_string()),
        )
        .init();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => MasterConfig::from_file(path)?,
        None => demo_config(),
    };
    if cli.capacity_matched {
        cfg.capacity_matched = true;
    }

    // la validación corre acá adentro: config mala = no arranca nada
    let mut master = Master::new(&cfg)?;
    master.submit_units(initial_maps(&cfg));

    // bombear los eventos del sustrato hasta el fin de la corrida
    let mut sim = Simulation::from_specs(&cfg.vms);
    sim.start();
    while let Some(event) = sim.next_event() {
        master.handle(event, &mut sim);
    }

    let report = master.report();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
        print_vm_totals(master.state());
    }

    if let Some(path) = &cli.csv {
        report.write_csv(path)?;
        info!("tabla escrita en {}", path.display());
    }

    Ok(())
}

fn print_table(report: &RunReport) {
    println!("========== RESULTADO ==========");
    println!("{:<8} {:>4} {:>12} {:>12}", "Unidad", "VM", "Fin crudo", "Fin");
    for row in &report.rows {
        let vm = row
            .vm
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let crudo = row
            .raw_finish
            .map(|t| format!("{:.2}", t))
            .unwrap_or_else(|| "-".to_string());
        let fin = row
            .finish
            .map(|t| format!("{:.2}", t))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<8} {:>4} {:>12} {:>12}", row.unit, vm, crudo, fin);
    }
}

fn print_vm_totals(state: &MasterState) {
    println!("---------- por VM ----------");
    let mut ids: Vec<_> = state.vm_metrics.keys().copied().collect();
    ids.sort_unstable();
    for id in ids {
        let m = &state.vm_metrics[&id];
        println!(
            "VM #{}: {} despachadas, {} terminadas",
            id, m.units_started, m.units_finished
        );
    }
}
