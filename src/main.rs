use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clusterkit::{AppError, InstallOptions, ServiceOptions, ValidateOptions};

#[derive(Parser)]
#[command(name = "clusterkit")]
#[command(version)]
#[command(
    about = "Configure and deploy database replication clusters",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect the cluster configuration and deploy it to every host
    Install {
        /// Validate stored values instead of prompting
        #[arg(short, long)]
        batch: bool,
        /// Ask the tuning prompts instead of taking their defaults
        #[arg(short, long, conflicts_with = "batch")]
        advanced: bool,
        /// Configuration file to seed from and save to
        #[arg(short, long, default_value = "clusterkit.cfg")]
        config: PathBuf,
        /// Show debug output
        #[arg(short = 'V', long)]
        verbose: bool,
        /// Only print warnings and errors
        #[arg(short, long, conflicts_with = "verbose")]
        quiet: bool,
        /// Continue to deployment even when host checks report errors
        #[arg(short, long)]
        force: bool,
        /// Stop after validating the configuration and hosts
        #[arg(long)]
        validate_only: bool,
        /// Collect and validate, but do not touch the hosts
        #[arg(long)]
        no_deploy: bool,
    },
    /// Create, update or delete one replication service
    Service {
        /// Add a new replication service
        #[arg(short = 'C', long)]
        create: bool,
        /// Remove a replication service
        #[arg(short = 'D', long)]
        delete: bool,
        /// Modify an existing replication service
        #[arg(short = 'U', long)]
        update: bool,
        /// Name of the replication service
        service_name: String,
        #[arg(short, long, default_value = "clusterkit.cfg")]
        config: PathBuf,
        /// Validate supplied values instead of prompting for the rest
        #[arg(short, long)]
        batch: bool,
        /// Replication role (master|slave)
        #[arg(long)]
        role: Option<String>,
        /// Master host this service replicates from
        #[arg(long)]
        master_host: Option<String>,
        /// Master THL port
        #[arg(long)]
        master_port: Option<String>,
        /// Datasource backing this service
        #[arg(long)]
        datasource: Option<String>,
        /// Block commit size (1-100)
        #[arg(long)]
        buffer_size: Option<String>,
        /// Number of replication channels
        #[arg(long)]
        channels: Option<String>,
        /// Port to serve THL on
        #[arg(long)]
        thl_port: Option<String>,
        /// Auto-enable the service after start-up (true|false)
        #[arg(long)]
        auto_enable: Option<String>,
        #[arg(short = 'V', long)]
        verbose: bool,
        #[arg(short, long, conflicts_with = "verbose")]
        quiet: bool,
    },
    /// Validate a saved configuration and its target hosts
    Validate {
        #[arg(short, long, default_value = "clusterkit.cfg")]
        config: PathBuf,
        #[arg(short = 'V', long)]
        verbose: bool,
        #[arg(short, long, conflicts_with = "verbose")]
        quiet: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), AppError> = match cli.command {
        Commands::Install { batch, advanced, config, verbose, quiet, force, validate_only, no_deploy } => {
            let options = InstallOptions { batch, advanced, config, force, validate_only, no_deploy };
            clusterkit::install(&options, verbose, quiet)
        }
        Commands::Service {
            create,
            delete,
            update,
            service_name,
            config,
            batch,
            role,
            master_host,
            master_port,
            datasource,
            buffer_size,
            channels,
            thl_port,
            auto_enable,
            verbose,
            quiet,
        } => {
            let options = ServiceOptions {
                create,
                delete,
                update,
                service_name,
                config,
                batch,
                role,
                master_host,
                master_port,
                datasource,
                buffer_size,
                channels,
                thl_port,
                auto_enable,
            };
            clusterkit::service(&options, verbose, quiet)
        }
        Commands::Validate { config, verbose, quiet } => {
            clusterkit::validate(&ValidateOptions { config }, verbose, quiet)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
