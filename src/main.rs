use clap::Parser;
use blockform::cli::commands::{cmd_check_files, cmd_pattern, cmd_submit, cmd_test_mail};
use blockform::cli::config::{Cli, Commands, load_config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(cli.config.as_deref());

    let success = match cli.command {
        Commands::Submit {
            settings,
            form,
            files,
            trace,
            dry_run,
        } => cmd_submit(&settings, &form, &files, trace.as_deref(), dry_run, &config).await?,
        Commands::TestMail { settings, values } => {
            cmd_test_mail(&settings, &values, &config).await?
        }
        Commands::Pattern { regex } => {
            cmd_pattern(&regex)?;
            true
        }
        Commands::CheckFiles { paths } => cmd_check_files(&paths)?,
    };

    if !success {
        std::process::exit(1);
    }

    Ok(())
}
