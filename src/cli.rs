use crate::config::constants::DEFAULT_BUILD_FILE;
use crate::config::{BuildFile, BuildVariables, ConfigOverrides, PipelineConfig};
use crate::error::PipelineResult;
use crate::pipeline::{RunReport, run};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Subcommand)]
pub enum Commands {
    /// Optimize a stylesheet as described by a build file and/or flags
    Optimize {
        /// Build file (defaults to ./optimise-css.build.js when present)
        build_file: Option<PathBuf>,
        /// Source stylesheet, overrides `cssIn`
        #[clap(long = "css-in")]
        css_in: Option<String>,
        /// Destination stylesheet, overrides `out`
        #[clap(short = 'o', long)]
        out: Option<String>,
        /// Optimization mode, overrides `optimizeCss`
        #[clap(short = 'm', long)]
        mode: Option<String>,
        #[command(flatten)]
        vars: VariableArgs,
        /// Print the run report as JSON on stdout
        #[clap(long)]
        json: bool,
    },

    /// Validate a build file without touching any stylesheet
    Check {
        /// Build file
        build_file: PathBuf,
        #[command(flatten)]
        vars: VariableArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct VariableArgs {
    /// Build variable used for `${name}` placeholders
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE")]
    pub defines: Vec<String>,
}

impl VariableArgs {
    pub fn build_variables(&self) -> PipelineResult<BuildVariables> {
        BuildVariables::from_definitions(&self.defines)
    }
}

/// cssopt Command
#[derive(Parser)]
#[command(name = "cssopt", version, about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
    /// Log debug output to the console
    #[clap(short, long, global = true)]
    pub verbose: bool,
    /// Also write a debug log to this file
    #[clap(long, global = true)]
    pub log_file: Option<PathBuf>,
}

/// Load the build file (if any) and merge command line overrides into a config
pub fn load_config(
    build_file: Option<&Path>,
    overrides: &ConfigOverrides,
    vars: &BuildVariables,
) -> PipelineResult<PipelineConfig> {
    let build_file = match build_file {
        Some(path) => BuildFile::load(path)?,
        None => {
            let default = Path::new(DEFAULT_BUILD_FILE);
            if overrides.css_in.is_none() && default.is_file() {
                debug!("Using default build file {:?}", default);
                BuildFile::load(default)?
            } else {
                BuildFile::default()
            }
        }
    };
    build_file.resolve(overrides, vars)
}

pub fn optimize_command(
    build_file: Option<PathBuf>,
    overrides: ConfigOverrides,
    vars: BuildVariables,
    json: bool,
) -> PipelineResult<RunReport> {
    debug!("Starting optimize command");
    debug!("Build file: {:?}", build_file);
    debug!("Overrides: {:?}", overrides);
    if !vars.is_empty() {
        debug!("Variables: {:?}", vars);
    }

    let config = load_config(build_file.as_deref(), &overrides, &vars)?;
    let report = run(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(report)
}

pub fn check_command(build_file: &Path, vars: BuildVariables) -> PipelineResult<PipelineConfig> {
    debug!("Checking build file {:?}", build_file);

    let config = BuildFile::load(build_file)?.resolve(&ConfigOverrides::default(), &vars)?;
    info!("Build file OK");
    info!("  cssIn: {}", config.source_path().display());
    info!("  out: {}", config.output_path().display());
    info!("  optimizeCss: {}", config.mode());
    if !config.import_ignore().is_empty() {
        info!("  cssImportIgnore: {:?}", config.import_ignore());
    }
    Ok(config)
}

/// Dispatch a parsed command line
pub fn dispatch(cli: Cli) -> PipelineResult<()> {
    match cli.cmd {
        Commands::Optimize {
            build_file,
            css_in,
            out,
            mode,
            vars,
            json,
        } => {
            let overrides = ConfigOverrides {
                css_in,
                out,
                optimize_css: mode,
            };
            optimize_command(build_file, overrides, vars.build_variables()?, json)?;
        }
        Commands::Check { build_file, vars } => {
            check_command(&build_file, vars.build_variables()?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_optimize_flags() {
        let cli = Cli::try_parse_from([
            "cssopt",
            "optimize",
            "build.js",
            "--mode",
            "none",
            "-D",
            "project.basedir=/p",
            "--json",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.cmd {
            Commands::Optimize {
                build_file,
                mode,
                vars,
                json,
                ..
            } => {
                assert_eq!(build_file, Some(PathBuf::from("build.js")));
                assert_eq!(mode.as_deref(), Some("none"));
                assert!(json);
                let vars = vars.build_variables().unwrap();
                assert!(!vars.is_empty());
                assert_eq!(vars.get("project.basedir"), Some("/p"));
            }
            _ => panic!("expected optimize"),
        }
    }

    #[test]
    fn test_load_config_without_build_file_needs_paths() {
        let err = load_config(
            None,
            &ConfigOverrides {
                css_in: Some("a.css".to_string()),
                out: None,
                optimize_css: None,
            },
            &BuildVariables::new(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(ref m) if m.contains("'out'")));
    }
}
