use clap::{Parser, Subcommand};
use dosecalc_core::*;
use std::io;
use std::path::PathBuf;

mod interactive;

#[derive(Parser)]
#[command(name = "dosecalc")]
#[command(about = "Medication dose calculator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session: search, pick, enter weight, repeat (default)
    Interactive,

    /// List medications whose name contains the query (case-insensitive)
    Search {
        /// Text to look for; omit to list the whole catalog
        query: Option<String>,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single medication by its exact name
    Show {
        name: String,
    },

    /// Calculate total dose and volume
    Calc {
        /// Patient weight (kg)
        #[arg(long, allow_hyphen_values = true)]
        weight: String,

        /// Medication to pre-fill dose and concentration from (exact name)
        #[arg(short, long)]
        medication: Option<String>,

        /// Dose (mg/kg), overrides the medication's value
        #[arg(long, allow_hyphen_values = true)]
        dose: Option<String>,

        /// Concentration (mg/ml), overrides the medication's value
        #[arg(long, allow_hyphen_values = true)]
        concentration: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version and credits
    About,

    /// Write the default config file for editing
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        dosecalc_core::logging::init_with_level("debug");
    } else {
        dosecalc_core::logging::init();
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Writing a fresh config must not depend on the current one parsing
    if let Some(Commands::InitConfig { force }) = cli.command {
        return cmd_init_config(cli.config, force);
    }

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let catalog = config.build_catalog()?;

    match cli.command {
        Some(Commands::Search { query, json }) => {
            cmd_search(&catalog, query.as_deref().unwrap_or(""), json)
        }
        Some(Commands::Show { name }) => cmd_show(&catalog, &name),
        Some(Commands::Calc {
            weight,
            medication,
            dose,
            concentration,
            json,
        }) => cmd_calc(
            &catalog,
            &config,
            weight,
            medication,
            dose,
            concentration,
            json,
        ),
        Some(Commands::About) => {
            cmd_about();
            Ok(())
        }
        Some(Commands::InitConfig { force }) => cmd_init_config(cli.config.clone(), force),
        Some(Commands::Interactive) | None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            interactive::Session::new(&catalog, config.display.decimals, stdin.lock(), stdout.lock())
                .run()
        }
    }
}

fn cmd_search(catalog: &Catalog, query: &str, json: bool) -> Result<()> {
    let matches = catalog.filter(query);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No medications match '{}'", query.trim());
        return Ok(());
    }

    for record in matches {
        display_record(record);
    }
    Ok(())
}

fn cmd_show(catalog: &Catalog, name: &str) -> Result<()> {
    let record = lookup(catalog, name)?;

    println!("{}", record.name);
    println!("  Dose:          {} mg/kg", record.dose_per_kg);
    println!("  Concentration: {} mg/ml", record.concentration);
    println!("  Interval:      {}", record.interval);
    Ok(())
}

fn cmd_calc(
    catalog: &Catalog,
    config: &Config,
    weight: String,
    medication: Option<String>,
    dose: Option<String>,
    concentration: Option<String>,
    json: bool,
) -> Result<()> {
    let mut input = DoseInput::default();
    input.set(DoseField::Weight, weight);

    // An unknown name leaves the fields empty; the interval will be blank
    let name = medication.unwrap_or_default();
    if !name.is_empty() {
        match catalog.find_by_name(&name) {
            Some(record) => input.prefill(record),
            None => {
                eprintln!("Unknown medication: {}", name);
                suggest(catalog, &name);
            }
        }
    }

    if let Some(dose) = dose {
        input.set(DoseField::DosePerKg, dose);
    }
    if let Some(concentration) = concentration {
        input.set(DoseField::Concentration, concentration);
    }

    let query = parse_input(&input)?;
    let result = compute_for_medication(catalog, &name, &query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for warning in &result.warnings {
        eprintln!("Warning: {}", warning);
    }
    println!("{}", result.render(config.display.decimals));
    Ok(())
}

fn cmd_init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::default_config_path()?,
    };

    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    Config::default().save_to(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_about() {
    println!("Medication Dose Calculator");
    println!("Version {}", env!("CARGO_PKG_VERSION"));
    println!("© 2024 Clementine");
}

fn lookup<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a MedicationRecord> {
    match catalog.find_by_name(name) {
        Some(record) => Ok(record),
        None => {
            suggest(catalog, name);
            Err(Error::Other(format!("No medication named '{}'", name)))
        }
    }
}

fn suggest(catalog: &Catalog, name: &str) {
    let candidates = catalog.filter(name);
    if !candidates.is_empty() {
        eprintln!("Did you mean:");
        for record in candidates {
            eprintln!("  - {}", record.name);
        }
    }
}

fn display_record(record: &MedicationRecord) {
    println!(
        "  {:<28} {:>6} mg/kg  {:>6} mg/ml  {}",
        record.name, record.dose_per_kg, record.concentration, record.interval
    );
}
