//! Overscope - overridden-member queries over class hierarchy fixtures
//!
//! # Usage
//!
//! ```bash
//! # Everything Child.run overrides, transitively
//! overscope overridden hierarchy.toml Child.run
//!
//! # Only the direct overrides of a property, as JSON
//! overscope overridden hierarchy.toml Child.size --property --direct --json
//!
//! # Names visible in a class scope
//! overscope names hierarchy.toml Child
//! ```

use clap::{Parser, Subcommand};
use compiler::hierarchy::Hierarchy;
use compiler::logging;
use compiler::tast::{CallableSymbol, ContainingNamesAwareScope, SymbolId, TypeScopeExt};
use log::{debug, LevelFilter};
use serde::Serialize;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "overscope")]
#[command(version = "0.1.0")]
#[command(about = "Overscope - overridden-member queries for class hierarchies", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the members a function or property overrides
    Overridden {
        /// Path to the hierarchy fixture (TOML)
        fixture: PathBuf,

        /// Member reference: `Class.member` or `Class.super.member`
        member: String,

        /// Treat the member as a property instead of a function
        #[arg(long)]
        property: bool,

        /// Only list directly overridden members
        #[arg(long)]
        direct: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List callable and classifier names visible in a class
    Names {
        /// Path to the hierarchy fixture (TOML)
        fixture: PathBuf,

        /// Class name
        class: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct OverriddenMember {
    name: String,
    origin: String,
}

#[derive(Serialize)]
struct OverriddenReport {
    member: String,
    kind: &'static str,
    direct: bool,
    overridden: Vec<OverriddenMember>,
}

#[derive(Serialize)]
struct NamesReport {
    class: String,
    callables: Vec<String>,
    classifiers: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        logging::init_with_level(LevelFilter::Debug);
    } else {
        logging::init();
    }

    let result = match cli.command {
        Commands::Overridden {
            fixture,
            member,
            property,
            direct,
            json,
        } => list_overridden(fixture, member, property, direct, json),
        Commands::Names {
            fixture,
            class,
            json,
        } => list_names(fixture, class, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn list_overridden(
    fixture: PathBuf,
    member: String,
    property: bool,
    direct: bool,
    json: bool,
) -> Result<(), String> {
    let hierarchy = Hierarchy::load(&fixture).map_err(|e| e.to_string())?;

    // Queried on the scope that declares the member
    let ids: Vec<SymbolId> = if property {
        let (symbol, scope) = hierarchy.resolve_property(&member).map_err(|e| e.to_string())?;
        let found = if direct {
            scope.directly_overridden_properties(symbol)
        } else {
            scope.overridden_properties(symbol)
        };
        found.into_iter().map(|s| s.id()).collect()
    } else {
        let (symbol, scope) = hierarchy.resolve_function(&member).map_err(|e| e.to_string())?;
        let found = if direct {
            scope.directly_overridden_functions(symbol)
        } else {
            scope.overridden_functions(symbol)
        };
        found.into_iter().map(|s| s.id()).collect()
    };
    debug!("{} overrides {} member(s)", member, ids.len());

    let overridden = ids
        .into_iter()
        .filter_map(|id| {
            let info = hierarchy.symbols().get(id)?;
            Some(OverriddenMember {
                name: hierarchy.qualified_name(id)?,
                origin: info.origin.to_string(),
            })
        })
        .collect();
    let report = OverriddenReport {
        member,
        kind: if property { "property" } else { "function" },
        direct,
        overridden,
    };

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{}", text);
    } else if report.overridden.is_empty() {
        println!("{} overrides nothing", report.member);
    } else {
        for entry in &report.overridden {
            println!("{} ({})", entry.name, entry.origin);
        }
    }
    Ok(())
}

fn list_names(fixture: PathBuf, class: String, json: bool) -> Result<(), String> {
    let hierarchy = Hierarchy::load(&fixture).map_err(|e| e.to_string())?;
    let scope = hierarchy
        .class_scope(&class)
        .ok_or_else(|| format!("unknown class '{}'", class))?;
    let interner = hierarchy.interner();

    let mut callables: Vec<String> = scope
        .callable_names()
        .into_iter()
        .map(|name| interner.resolve(name).to_string())
        .collect();
    callables.sort_unstable();
    let mut classifiers: Vec<String> = scope
        .classifier_names()
        .into_iter()
        .map(|name| interner.resolve(name).to_string())
        .collect();
    classifiers.sort_unstable();

    let report = NamesReport {
        class,
        callables,
        classifiers,
    };

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{}", text);
    } else {
        println!("callables: {}", report.callables.join(", "));
        println!("classifiers: {}", report.classifiers.join(", "));
    }
    Ok(())
}
