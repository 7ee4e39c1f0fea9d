//! inline-svg - inline svg references into generated HTML pages.

use anyhow::{Result, bail};
use clap::{ColorChoice, Parser};
use inline_svg::{
    cli::{self, Cli, Commands, common::plural_count},
    config::InlineConfig,
    logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let mut config = InlineConfig::load(&cli.config)?;
    config.apply_build_args(cli.root(), cli.output());
    config.validate()?;

    match &cli.command {
        Commands::Build { paths, .. } => {
            cli::build::build_pages(&config, paths).await?;
        }
        Commands::Check { paths, .. } => {
            let report = cli::check::check_pages(&config, paths)?;
            if report.has_problems() {
                bail!("{} missing or malformed", plural_count(report.problem_count(), "reference"));
            }
        }
    }
    Ok(())
}
