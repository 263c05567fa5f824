//! wifi command - wireless card management.

mod commands;

use std::time::Duration;

use clap::{Parser, Subcommand};
use nlwifi::netlink::genl::nl80211::Nl80211Connection;
use nlwifi::netlink::{SocketConfig, SocketMode};
use nlwifi::output::{OutputFormat, OutputOptions};

#[derive(Parser)]
#[command(name = "wifi", version, about = "Wireless card management tool")]
struct Cli {
    /// Output JSON.
    #[arg(short = 'j', long, global = true)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long, global = true)]
    pretty: bool,

    /// Show details.
    #[arg(short = 'd', long, global = true)]
    details: bool,

    /// Open a fresh netlink socket for every request.
    #[arg(long, global = true)]
    oneshot: bool,

    /// Netlink receive timeout in milliseconds (0 waits forever).
    #[arg(long, global = true, default_value_t = 5000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage wireless interfaces.
    Dev(commands::dev::DevCmd),

    /// Show and configure physical devices.
    Phy(commands::phy::PhyCmd),

    /// Scan for networks.
    Scan(commands::scan::ScanCmd),

    /// Show or set the regulatory domain.
    Reg(commands::reg::RegCmd),

    /// Soft block or unblock radios.
    Rfkill(commands::rfkill::RfkillCmd),

    /// Manage link state and addresses through ioctl.
    #[command(visible_alias = "l")]
    Link(commands::link::LinkCmd),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let opts = OutputOptions {
        details: cli.details,
        pretty: cli.pretty,
    };

    let config = SocketConfig::new()
        .mode(if cli.oneshot {
            SocketMode::OneShot
        } else {
            SocketMode::Persistent
        })
        .recv_timeout((cli.timeout_ms > 0).then(|| Duration::from_millis(cli.timeout_ms)));

    // Only the nl80211 commands need the netlink connection.
    let open = || Nl80211Connection::with_config(config.clone());

    let result = match cli.command {
        Command::Dev(cmd) => open().and_then(|mut nl| cmd.run(&mut nl, format, &opts)),
        Command::Phy(cmd) => open().and_then(|mut nl| cmd.run(&mut nl, format, &opts)),
        Command::Scan(cmd) => open().and_then(|mut nl| cmd.run(&mut nl, format, &opts)),
        Command::Reg(cmd) => open().and_then(|mut nl| cmd.run(&mut nl, format, &opts)),
        Command::Rfkill(cmd) => cmd.run(format, &opts),
        Command::Link(cmd) => cmd.run(format, &opts),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
