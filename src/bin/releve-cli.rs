#![forbid(unsafe_code)]
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use releve::{
    io,
    model::Override,
    render::{render_load, CsvRenderer, JsonRenderer, TextRenderer, TimelineRenderer},
    scheduler::{SchedError, Scheduler},
    storage::OutputFile,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Chronologie d'astreinte : rotation + overrides sur une fenêtre
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(clap::Args, Debug)]
struct Inputs {
    /// Fichier JSON du planning
    #[arg(long)]
    schedule: String,
    /// Fichier JSON des overrides (aucun si absent)
    #[arg(long)]
    overrides: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Format {
    Json,
    Csv,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculer la chronologie résolue sur [from, until)
    Render {
        #[command(flatten)]
        inputs: Inputs,
        /// RFC3339 UTC (inclus)
        #[arg(long)]
        from: String,
        /// RFC3339 UTC (exclu)
        #[arg(long)]
        until: String,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Fichier de sortie (stdout si absent)
        #[arg(long)]
        out: Option<String>,
    },

    /// Afficher qui est d'astreinte à un instant donné
    Who {
        #[command(flatten)]
        inputs: Inputs,
        /// RFC3339 UTC
        #[arg(long)]
        at: String,
    },

    /// Nombre de shifts et heures d'astreinte par personne
    Summary {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long)]
        from: String,
        #[arg(long)]
        until: String,
    },
}

fn main() {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let code = match run(cli.cmd) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err:#}");
            // Code 2 = entrée invalide (planning, fenêtre, override)
            if err.downcast_ref::<SchedError>().is_some() {
                2
            } else {
                1
            }
        }
    };

    std::process::exit(code);
}

fn load(inputs: &Inputs) -> Result<Scheduler> {
    let spec = io::load_schedule(&inputs.schedule)?;
    let overrides: Vec<Override> = match &inputs.overrides {
        Some(path) => io::load_overrides(path)?,
        None => Vec::new(),
    };
    Ok(Scheduler::new(spec)?.with_overrides(overrides))
}

fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Render {
            inputs,
            from,
            until,
            format,
            out,
        } => {
            let scheduler = load(&inputs)?;
            let window = io::parse_window(&from, &until)?;
            let timeline = scheduler.timeline(&window)?;
            let renderer: &dyn TimelineRenderer = match format {
                Format::Json => &JsonRenderer,
                Format::Csv => &CsvRenderer,
                Format::Text => &TextRenderer,
            };
            let rendered = renderer.render(&timeline)?;
            match out {
                Some(path) => OutputFile::new(path).write(rendered.as_bytes())?,
                None => print!("{rendered}"),
            }
        }
        Commands::Who { inputs, at } => {
            let scheduler = load(&inputs)?;
            let at = io::parse_point(&at)?;
            let shift = scheduler.on_call_at(at)?;
            println!(
                "{} ({} → {})",
                shift.user,
                io::format_point(shift.start()),
                io::format_point(shift.end())
            );
        }
        Commands::Summary {
            inputs,
            from,
            until,
        } => {
            let scheduler = load(&inputs)?;
            let window = io::parse_window(&from, &until)?;
            let timeline = scheduler.timeline(&window)?;
            print!("{}", render_load(&timeline.load_by_user()));
        }
    }
    Ok(())
}
