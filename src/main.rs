use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use win_unc::{
    DiskDrive, ShellRunner, UncDirectory, UncDirectoryConnection, UncDirectoryMount, columns,
    current_net_use_table,
};

#[derive(Parser)]
#[command(name = "win_unc", version)]
#[command(about = "Connect, disconnect and inspect Windows UNC paths")]
struct Cli {
    /// Log every command issued (passwords are masked)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the connections NET USE currently reports
    List,
    /// Report whether a UNC path is connected
    Status {
        /// UNC path, optionally as user[:pass]@\\host\share
        unc: String,
        /// Only count the connection if it is mapped to this drive
        #[arg(short, long)]
        drive: Option<String>,
    },
    /// Connect a UNC path, optionally mapping it to a drive letter
    Connect {
        /// UNC path, optionally as user[:pass]@\\host\share
        unc: String,
        /// Drive letter to map, e.g. Z:
        #[arg(short, long)]
        drive: Option<String>,
        /// Restore the mapping at next login
        #[arg(long)]
        persistent: bool,
    },
    /// Map a UNC path to a drive letter, picking a free one when none is given
    Mount {
        /// UNC path, optionally as user[:pass]@\\host\share
        unc: String,
        /// Drive letter to map, e.g. Z:
        #[arg(short, long)]
        drive: Option<String>,
        /// Restore the mapping at next login
        #[arg(long)]
        persistent: bool,
    },
    /// Disconnect a UNC path, or the drive it is mapped to
    Disconnect {
        /// UNC path of the connection
        unc: String,
        /// Drive letter the path is mapped to
        #[arg(short, long)]
        drive: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::List => {
            let table = current_net_use_table(ShellRunner)?;
            for row in table.rows() {
                println!(
                    "{:<12} {:<4} {}",
                    row.get(columns::STATUS).unwrap_or_default(),
                    row.get(columns::LOCAL).unwrap_or_default(),
                    row.get(columns::REMOTE).unwrap_or_default(),
                );
            }
        }
        Commands::Status { unc, drive } => {
            let conn = connection(&unc, drive.as_deref())?;
            println!("{:?}", conn.state()?);
        }
        Commands::Connect { unc, drive, persistent } => {
            connection(&unc, drive.as_deref())?.persistent(persistent).connect()?;
        }
        Commands::Mount { unc, drive, persistent } => {
            let drive = drive.as_deref().map(DiskDrive::new).transpose()?;
            let mount = UncDirectoryMount::new(unc.parse()?, drive, ShellRunner)?.persistent(persistent);
            mount.mount()?;
            println!("{}", mount.disk_drive());
        }
        Commands::Disconnect { unc, drive } => {
            connection(&unc, drive.as_deref())?.disconnect()?;
        }
    }

    Ok(())
}

fn connection(
    unc: &str,
    drive: Option<&str>,
) -> Result<UncDirectoryConnection<ShellRunner>, win_unc::UncError> {
    let unc: UncDirectory = unc.parse()?;
    let conn = UncDirectoryConnection::new(unc, ShellRunner);
    Ok(match drive {
        Some(drive) => conn.with_disk_drive(DiskDrive::new(drive)?),
        None => conn,
    })
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "win_unc=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
