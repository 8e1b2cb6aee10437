//! wmlvar: inspect and edit saved WML variable stores
//!
//! ```text
//! wmlvar vars.json init
//! wmlvar vars.json set 'side[1].gold' 100
//! wmlvar vars.json get side.length
//! wmlvar vars.json push side gold=20 name=Li --mode insert
//! wmlvar vars.json show side[1]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use wml_core::{AttributeValue, Config, Limits, SetMode, VariableStore};
use wml_save::{load_store, save_exists, save_store};

/// Inspect and edit saved WML variable stores
#[derive(Parser, Debug)]
#[command(name = "wmlvar")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Save file holding the variables
    file: PathBuf,

    /// Largest explicit index a path may use
    #[arg(long = "max-index")]
    max_index: Option<i32>,

    /// Label recorded in the save header
    #[arg(short = 'l', long = "label", default_value = "variables")]
    label: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty store
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
    /// Print a scalar
    Get { path: String },
    /// Print a container as WML (the whole store when no path is given)
    Show {
        #[arg(default_value = "")]
        path: String,
    },
    /// Number of children in a group
    Length { path: String },
    /// Assign a scalar; yes/no and canonical numbers are typed
    Set { path: String, value: String },
    /// Remove an attribute and its children, or one indexed child
    Clear {
        path: String,
        /// Keep the attribute, only remove children
        #[arg(long = "tables")]
        tables: bool,
    },
    /// Add a child built from KEY=VALUE pairs
    Push {
        path: String,
        attributes: Vec<String>,
        #[arg(short = 'm', long = "mode", default_value_t = SetMode::Append)]
        mode: SetMode,
    },
}

fn main() -> ExitCode {
    if let Ok(env_filter) = tracing_subscriber::EnvFilter::try_from_default_env() {
        tracing_subscriber::fmt()
            .compact()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .compact()
            .with_writer(std::io::stderr)
            .init();
    }

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wmlvar: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    if let Command::Init { force } = args.command {
        if save_exists(&args.file) && !force {
            bail!("{} already exists (use --force)", args.file.display());
        }
        let limits = args.max_index.map(Limits::with_max_loop).unwrap_or_default();
        let store = VariableStore::with_limits(limits);
        save_store(&store, &args.label, &args.file)
            .with_context(|| format!("cannot write {}", args.file.display()))?;
        tracing::info!(path = %args.file.display(), "created empty store");
        return Ok(());
    }

    let mut store = load_store(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    if let Some(max_index) = args.max_index {
        store.set_limits(Limits::with_max_loop(max_index));
    }

    let modified = match args.command {
        Command::Init { .. } => false,
        Command::Get { path } => {
            let info = store.get_variable_access_read(&path)?;
            println!("{}", info.as_scalar()?);
            false
        }
        Command::Show { path } => {
            let info = store.get_variable_access_read(&path)?;
            print!("{}", info.as_container()?);
            false
        }
        Command::Length { path } => {
            if store.get_variable_access_read(&path)?.explicit_index() {
                bail!("'{path}' names a single child, not a group");
            }
            let info = store.get_variable_access_read(&format!("{path}.length"))?;
            println!("{}", info.as_scalar()?);
            false
        }
        Command::Set { path, value } => {
            let mut info = store.get_variable_access_write(&path)?;
            *info.as_scalar_mut()? = AttributeValue::parse(&value);
            true
        }
        Command::Clear { path, tables } => {
            let mut info = store.get_variable_access_strict(&path)?;
            info.clear(tables)?;
            true
        }
        Command::Push {
            path,
            attributes,
            mode,
        } => {
            let child = build_child(&attributes)?;
            let mut info = store.get_variable_access_write(&path)?;
            info.set_range(vec![child], mode)?;
            true
        }
    };

    if modified {
        save_store(&store, &args.label, &args.file)
            .with_context(|| format!("cannot write {}", args.file.display()))?;
    }
    Ok(())
}

/// Build a child config from `key=value` arguments
fn build_child(pairs: &[String]) -> Result<Config> {
    let mut child = Config::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("expected KEY=VALUE, got '{pair}'");
        };
        if !wml_core::valid_key(key) {
            bail!("invalid attribute name '{key}'");
        }
        child.set(key, AttributeValue::parse(value));
    }
    Ok(child)
}
