use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = taskdeck::cli::Cli::parse();
    let config = taskdeck::config::from_cli(&cli)?;

    match cli.command.clone() {
        Some(taskdeck::cli::CliCommand::Tui(args)) => {
            taskdeck::tui::run(config, args.query)?;
        }
        None => {
            taskdeck::tui::run(config, None)?;
        }
        Some(command) => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            taskdeck::commands::execute(&config, command, &mut handle)?;
        }
    }

    Ok(())
}
