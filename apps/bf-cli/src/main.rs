mod error;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bf_components::PipeModel;
use bf_core::units::{bara, celsius, to_bara, to_celsius};
use bf_fluids::{CsvFluidTable, CsvPhaseEnvelope, IdealGasCo2, PropertyModel, TabulatedProperties};
use bf_graph::{ElementKind, Network};
use bf_solver::{Simulator, SplitStrategy};
use error::{CliError, CliResult};

#[derive(Parser)]
#[command(name = "bf-cli")]
#[command(about = "BranchFlow CLI - steady-state CO2 injection network simulation", long_about = None)]
struct Cli {
    /// Log solver iterations (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a network file and check that it builds
    Validate {
        /// Path to the network YAML file
        network_path: PathBuf,
    },
    /// Convert OLGA genkey pipeline geometry into a network YAML file
    Import {
        /// Path to the .genkey file
        genkey_path: PathBuf,
        /// Output YAML path (defaults to the input with a .yaml extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Search the inlet pressure that satisfies every reservoir
    Simulate {
        /// Path to the network YAML file
        network_path: PathBuf,
        #[command(flatten)]
        tables: TableArgs,
        /// Use the ideal-gas model instead of property tables
        #[arg(long)]
        ideal_gas: bool,
        /// Use the legacy pipe friction model (no elevation term)
        #[arg(long)]
        legacy_pipe_model: bool,
        /// Splitter branch search: bisection or accelerated
        #[arg(long, value_parser = parse_strategy)]
        split_strategy: Option<SplitStrategy>,
    },
    /// Print the phase and interpolated properties at one point
    Properties {
        #[command(flatten)]
        tables: TableArgs,
        /// Pressure [bara]
        #[arg(long)]
        pressure: f64,
        /// Temperature [°C]
        #[arg(long)]
        temperature: f64,
    },
}

#[derive(clap::Args)]
struct TableArgs {
    /// Fluid property table CSV
    #[arg(long)]
    fluid_table: Option<PathBuf>,
    /// Phase envelope CSV
    #[arg(long)]
    phase_envelope: Option<PathBuf>,
}

fn parse_strategy(s: &str) -> Result<SplitStrategy, String> {
    s.parse().map_err(|e: bf_solver::SolverError| e.to_string())
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate { network_path } => cmd_validate(&network_path),
        Commands::Import {
            genkey_path,
            output,
        } => cmd_import(&genkey_path, output),
        Commands::Simulate {
            network_path,
            tables,
            ideal_gas,
            legacy_pipe_model,
            split_strategy,
        } => cmd_simulate(
            &network_path,
            &tables,
            ideal_gas,
            legacy_pipe_model,
            split_strategy,
        ),
        Commands::Properties {
            tables,
            pressure,
            temperature,
        } => cmd_properties(&tables, pressure, temperature),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "bf_solver=debug,info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn load_tables(tables: &TableArgs) -> CliResult<TabulatedProperties> {
    match (&tables.fluid_table, &tables.phase_envelope) {
        (Some(table), Some(envelope)) => {
            let model = TabulatedProperties::load(
                &CsvPhaseEnvelope::new(envelope),
                &CsvFluidTable::new(table),
            )?;
            info!(table = %table.display(), envelope = %envelope.display(), "loaded property tables");
            Ok(model)
        }
        _ => Err(CliError::Usage {
            what: "both --fluid-table and --phase-envelope are required".to_string(),
        }),
    }
}

fn cmd_validate(network_path: &Path) -> CliResult<()> {
    println!("Validating network: {}", network_path.display());
    let file = bf_project::load_yaml(network_path)?;
    let built = bf_project::build_network(&file)?;
    println!(
        "✓ Network '{}' is valid ({} elements, {} key points)",
        file.name,
        built.network.len(),
        built.key_points.len()
    );
    Ok(())
}

fn cmd_import(genkey_path: &Path, output: Option<PathBuf>) -> CliResult<()> {
    let file = bf_project::load_genkey(genkey_path)?;
    let output = output.unwrap_or_else(|| genkey_path.with_extension("yaml"));
    bf_project::save_yaml(&output, &file)?;
    info!(input = %genkey_path.display(), output = %output.display(), "imported genkey geometry");
    println!(
        "✓ Imported '{}' ({} instructions) to {}",
        file.name,
        file.instructions.len(),
        output.display()
    );
    println!("  Add the downstream elements and a setfluid before simulating.");
    Ok(())
}

fn cmd_simulate(
    network_path: &Path,
    tables: &TableArgs,
    ideal_gas: bool,
    legacy_pipe_model: bool,
    split_strategy: Option<SplitStrategy>,
) -> CliResult<()> {
    let file = bf_project::load_yaml(network_path)?;
    let mut built = bf_project::build_network(&file)?;
    let fluid = built.fluid.ok_or_else(|| CliError::Usage {
        what: format!("network '{}' has no setfluid instruction", file.name),
    })?;

    let mut config = built.settings.clone();
    if legacy_pipe_model {
        config.pipe_model = PipeModel::Legacy;
    }
    if let Some(strategy) = split_strategy {
        config.splitter.strategy = strategy;
    }

    let model: Box<dyn PropertyModel> = if ideal_gas {
        Box::new(IdealGasCo2::new())
    } else {
        Box::new(load_tables(tables)?)
    };
    println!(
        "Simulating '{}' with the {} model",
        file.name,
        model.name()
    );

    let sim = Simulator::new(model.as_ref(), config)?;
    let net = &mut built.network;
    let inlet = net.root()?;
    sim.apply_inlet_properties(net, inlet, fluid.pressure, fluid.temperature, fluid.flowrate, true)?;
    let search = sim.search_inlet_pressure(net)?;

    println!(
        "Inlet pressure: {:.3} bara ({}, {} iterations)",
        to_bara(search.pressure),
        search.pressure_solution,
        search.iterations
    );
    print_key_points(net, &built.key_points)
}

fn print_key_points(net: &Network, key_points: &[bf_core::ElementId]) -> CliResult<()> {
    println!(
        "{:<28} {:<14} {:>12} {:>10} {:>12}",
        "Element", "Kind", "P [bara]", "T [°C]", "w [kg/s]"
    );
    for &id in key_points {
        let element = net.element(id)?;
        match element.last_fluid() {
            Some(fluid) => println!(
                "{:<28} {:<14} {:>12.3} {:>10.2} {:>12.3}",
                element.name,
                element.kind.name(),
                to_bara(fluid.pressure()),
                to_celsius(fluid.temperature()),
                fluid.flowrate().value
            ),
            None => println!(
                "{:<28} {:<14} {:>12} {:>10} {:>12}",
                element.name,
                element.kind.name(),
                "-",
                "-",
                "-"
            ),
        }
        if matches!(element.kind, ElementKind::Splitter) && !element.allocation().is_empty() {
            let flows: Vec<String> = element
                .allocation()
                .iter()
                .map(|w| format!("{:.3}", w.value))
                .collect();
            println!("{:<28} branch flows [kg/s]: {}", "", flows.join(", "));
        }
    }
    Ok(())
}

fn cmd_properties(tables: &TableArgs, pressure_bara: f64, temperature_c: f64) -> CliResult<()> {
    let model = load_tables(tables)?;
    let (p, t) = (bara(pressure_bara), celsius(temperature_c));

    println!("P = {pressure_bara} bara, T = {temperature_c} °C");
    println!("  phase:     {}", model.phase(p, t)?);
    println!("  density:   {:.4} kg/m³", model.density(p, t)?.value);
    println!("  viscosity: {:.4e} Pa·s", model.viscosity(p, t)?.value);
    println!("  enthalpy:  {:.2} J/kg", model.enthalpy(p, t)?);
    if model.has_entropy() {
        println!("  entropy:   {:.2} J/(kg·K)", model.entropy(p, t)?);
    }
    Ok(())
}
