use std::path::PathBuf;
use clap::Parser;

use liberty_checks::commands;

#[derive(clap::Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    FindResources(FindResourcesCommand),
    CorrelateResources(CorrelateResourcesCommand),
    ListEnterpriseBeans(ListEnterpriseBeansCommand),
}

/// Find the declared resource references of an exploded web application
/// archive and print them as an XML report.
#[derive(clap::Args)]
struct FindResourcesCommand {
    /// Exploded web application archive directory
    war_dir: PathBuf,

    /// Directories holding server configuration files
    config_dirs: Vec<PathBuf>,

    #[clap(short, long)]
    json: bool,
}

/// Correlate the declared resource references against a server configuration
/// file and print the correlation report.
#[derive(clap::Args)]
struct CorrelateResourcesCommand {
    /// Exploded web application archive directory
    war_dir: PathBuf,

    #[clap(short, long)]
    server_xml: PathBuf,
}

/// List the enterprise beans declared in an EJB deployment descriptor.
#[derive(clap::Args)]
struct ListEnterpriseBeansCommand {
    #[clap(short, long)]
    ejb_jar: PathBuf,
}

fn setup_logging() -> anyhow::Result<()> {
    let spec = flexi_logger::LogSpecification::parse("warn,liberty_checks=debug")?;
    flexi_logger::Logger::with(spec)
        .log_to_file(
            flexi_logger::FileSpec::default()
                .directory("logs")
                .basename("liberty-checks")
                .use_timestamp(false),
        )
        .duplicate_to_stdout(flexi_logger::Duplicate::Warn)
        .format_for_files(flexi_logger::detailed_format)
        .format_for_stdout(flexi_logger::colored_detailed_format)
        .set_palette("b1;3;2;4;6".to_string())
        .start()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    setup_logging()?;
    log::info!("Starting liberty-checks!");

    let cli = Cli::parse();

    match cli.command {
        Command::FindResources(find) => {
            commands::find_resources::find_resources(find.war_dir, find.config_dirs, find.json)?;
        }
        Command::CorrelateResources(correlate) => {
            commands::correlate_resources::correlate_resources(
                correlate.war_dir,
                correlate.server_xml,
            )?;
        }
        Command::ListEnterpriseBeans(list) => {
            commands::list_enterprise_beans::list_enterprise_beans(list.ejb_jar)?;
        }
    }

    Ok(())
}
