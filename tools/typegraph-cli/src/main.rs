// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typegraph CLI
//!
//! Maps types from a YAML catalog into a JSON model graph.
//!
//! # Usage
//!
//! ```bash
//! # Map two roots with a settings file
//! typegraph map --catalog types.yaml --config mapper.toml App.Person App.IService
//!
//! # Generate example settings
//! typegraph gen-config --output mapper.toml
//!
//! # Check settings against a catalog
//! typegraph validate --config mapper.toml --catalog types.yaml
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use typegraph::{MapperConfig, MapperSettings, MappingArtifact, ModelMapper, TypeCatalog};

#[derive(Parser, Debug)]
#[command(name = "typegraph")]
#[command(about = "Reflection-driven type model mapper")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Map root types and print the resulting graph as JSON
    Map {
        /// YAML type catalog
        #[arg(long)]
        catalog: PathBuf,

        /// TOML mapper settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fully-qualified names of the root types
        #[arg(required = true)]
        roots: Vec<String>,
    },

    /// Validate a settings file
    Validate {
        /// TOML mapper settings
        #[arg(short, long)]
        config: PathBuf,

        /// Also check every named type against this catalog
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Generate an example settings file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "mapper.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Map {
            catalog,
            config,
            output,
            roots,
        } => cmd_map(&catalog, config.as_deref(), output.as_deref(), &roots),
        Commands::Validate { config, catalog } => cmd_validate(&config, catalog.as_deref()),
        Commands::GenConfig { output } => cmd_gen_config(&output),
    }
}

fn load_catalog(path: &Path) -> Result<TypeCatalog> {
    let catalog = TypeCatalog::from_file(path)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    tracing::info!("Loaded {} types from {}", catalog.len(), path.display());
    Ok(catalog)
}

fn load_config(path: Option<&Path>, catalog: &TypeCatalog) -> Result<MapperConfig> {
    let Some(path) = path else {
        return Ok(MapperConfig::new());
    };
    let settings = MapperSettings::from_file(path)
        .with_context(|| format!("failed to load settings {}", path.display()))?;
    settings
        .resolve(catalog)
        .with_context(|| format!("settings {} do not match the catalog", path.display()))
}

fn map_roots(catalog: &TypeCatalog, config: MapperConfig, roots: &[String]) -> Result<MappingArtifact> {
    let mut mapper = ModelMapper::new(catalog, Arc::new(config)).with_implementations(catalog);
    for name in roots {
        let Some(ty) = catalog.lookup(name) else {
            bail!("unknown root type '{}'", name);
        };
        let reference = mapper
            .map(ty)
            .with_context(|| format!("failed to map '{}'", name))?;
        tracing::debug!("{} -> {}", name, reference);
    }
    let artifact = mapper.artifact().context("failed to collect models")?;
    tracing::info!(
        "Mapped {} roots into {} models",
        artifact.roots.len(),
        artifact.models.len()
    );
    Ok(artifact)
}

fn cmd_map(
    catalog_path: &Path,
    config_path: Option<&Path>,
    output: Option<&Path>,
    roots: &[String],
) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let config = load_config(config_path, &catalog)?;
    let artifact = map_roots(&catalog, config, roots)?;
    let json = artifact.to_json_pretty()?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_validate(config_path: &Path, catalog_path: Option<&Path>) -> Result<()> {
    let settings = MapperSettings::from_file(config_path)
        .with_context(|| format!("settings {} are invalid", config_path.display()))?;
    println!("Settings valid!");
    println!();
    println!("Base types:   {}", settings.base_types.len());
    println!("Ignore rules: {}", settings.ignore.len());
    println!("Exclude rules: {}", settings.exclude.len());
    println!("Includes:     {}", settings.include.len());

    if let Some(path) = catalog_path {
        let catalog = load_catalog(path)?;
        settings
            .resolve(&catalog)
            .with_context(|| format!("settings do not match catalog {}", path.display()))?;
        println!("All named types exist in {}", path.display());
    }
    Ok(())
}

fn cmd_gen_config(output: &Path) -> Result<()> {
    let toml_str = MapperSettings::example().to_toml_string()?;

    let content = format!(
        r#"# Typegraph Mapper Settings
# Generated by typegraph gen-config

{}
"#,
        toml_str
    );

    std::fs::write(output, content)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Generated settings file: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
types:
  - { name: Int32, namespace: System, kind: value }
  - name: Person
    namespace: App
    fields:
      - { name: id, type: Int32 }
      - { name: boss, type: "Person?" }
"#;

    const SETTINGS: &str = r#"
[base_types]
"System.Int32" = "number"
"#;

    #[test]
    fn map_roots_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("types.yaml");
        let config_path = dir.path().join("mapper.toml");
        std::fs::write(&catalog_path, CATALOG).unwrap();
        std::fs::write(&config_path, SETTINGS).unwrap();

        let catalog = load_catalog(&catalog_path).unwrap();
        let config = load_config(Some(&config_path), &catalog).unwrap();
        let artifact = map_roots(&catalog, config, &["App.Person".to_string()]).unwrap();

        assert_eq!(artifact.roots.len(), 1);
        assert_eq!(artifact.models.len(), 1);
        let json = artifact.to_json_pretty().unwrap();
        assert!(json.contains("number"));
    }

    #[test]
    fn unknown_root_is_reported() {
        let catalog = TypeCatalog::from_yaml_str(CATALOG).unwrap();
        let err = map_roots(&catalog, MapperConfig::new(), &["App.Nobody".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("App.Nobody"));
    }

    #[test]
    fn generated_config_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapper.toml");
        cmd_gen_config(&path).unwrap();
        assert!(MapperSettings::from_file(&path).is_ok());
    }
}
