//! wifi link command implementation.

use clap::{Args, Subcommand};
use nlwifi::Result;
use nlwifi::ioctl::{Ipv4Config, IoctlSocket};
use nlwifi::output::{OutputFormat, OutputOptions, Printable};
use nlwifi::util::MacAddr;
use std::io::{self, Write};
use std::net::Ipv4Addr;

#[derive(Args)]
pub struct LinkCmd {
    #[command(subcommand)]
    action: LinkAction,
}

#[derive(Subcommand)]
enum LinkAction {
    /// Show link state, hardware address and IPv4 configuration.
    Show {
        /// Interface name.
        dev: String,
    },

    /// Bring the interface up.
    Up {
        /// Interface name.
        dev: String,
    },

    /// Bring the interface down.
    Down {
        /// Interface name.
        dev: String,
    },

    /// Set the hardware address (interface must be down).
    Mac {
        /// Interface name.
        dev: String,

        /// New address, xx:xx:xx:xx:xx:xx.
        address: MacAddr,
    },

    /// Set the IPv4 address.
    Addr {
        /// Interface name.
        dev: String,

        /// IPv4 address.
        address: Ipv4Addr,

        /// Netmask.
        #[arg(long, default_value = "255.255.255.0")]
        netmask: Ipv4Addr,

        /// Broadcast address.
        #[arg(long)]
        broadcast: Option<Ipv4Addr>,
    },
}

/// Ioctl-visible state of one interface.
struct LinkState {
    dev: String,
    up: bool,
    mac: MacAddr,
    ipv4: Ipv4Config,
}

impl Printable for LinkState {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> io::Result<()> {
        let state = if self.up { "UP" } else { "DOWN" };
        writeln!(w, "{}: state {state}", self.dev)?;
        writeln!(w, "    link/ether {}", self.mac)?;
        self.ipv4.print_text(w, opts)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ifname": self.dev,
            "up": self.up,
            "address": self.mac.to_string(),
            "ipv4": self.ipv4.to_json(),
        })
    }
}

impl LinkCmd {
    pub fn run(self, format: OutputFormat, opts: &OutputOptions) -> Result<()> {
        let sock = IoctlSocket::new()?;

        match self.action {
            LinkAction::Show { dev } => {
                let state = LinkState {
                    up: sock.is_up(&dev)?,
                    mac: sock.hw_addr(&dev)?,
                    ipv4: sock.ipv4(&dev)?,
                    dev,
                };
                state.print(&mut io::stdout().lock(), format, opts)?;
            }
            LinkAction::Up { dev } => sock.set_up(&dev, true)?,
            LinkAction::Down { dev } => sock.set_up(&dev, false)?,
            LinkAction::Mac { dev, address } => sock.set_hw_addr(&dev, address)?,
            LinkAction::Addr {
                dev,
                address,
                netmask,
                broadcast,
            } => {
                let mut config = Ipv4Config::new(address, netmask);
                if let Some(brd) = broadcast {
                    config = config.with_broadcast(brd);
                }
                sock.set_ipv4(&dev, &config)?;
            }
        }

        Ok(())
    }
}
