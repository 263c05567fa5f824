//! wifi dev command implementation.

use clap::{Args, Subcommand, ValueEnum};
use nlwifi::Result;
use nlwifi::netlink::genl::nl80211::{ChannelType, InterfaceMode, MonitorFlag, Nl80211Connection};
use nlwifi::output::{OutputFormat, OutputOptions, Printable};
use std::io;

use super::resolve_card;

#[derive(Args)]
pub struct DevCmd {
    #[command(subcommand)]
    action: Option<DevAction>,
}

#[derive(Subcommand)]
enum DevAction {
    /// List wireless interfaces.
    #[command(visible_alias = "ls")]
    List,

    /// Show one interface.
    Info {
        /// Interface name, ifindex or phyN.
        dev: String,
    },

    /// Change the interface mode.
    SetMode {
        /// Interface name, ifindex or phyN.
        dev: String,

        /// managed, monitor, ap, ibss, mesh, ...
        mode: InterfaceMode,
    },

    /// Tune the interface to a channel.
    SetChannel {
        /// Interface name, ifindex or phyN.
        dev: String,

        /// Center frequency in MHz.
        freq: u32,

        /// NOHT, HT20, HT40- or HT40+.
        #[arg(default_value = "NOHT")]
        channel_type: ChannelType,
    },

    /// Add a virtual interface on the card's phy.
    Add {
        /// Existing interface name, ifindex or phyN.
        dev: String,

        /// Name of the new interface.
        name: String,

        /// Mode of the new interface.
        #[arg(long = "type", default_value = "managed")]
        mode: InterfaceMode,

        /// Monitor flags (monitor mode only).
        #[arg(long = "flag", value_enum)]
        flags: Vec<MonitorFlagArg>,
    },

    /// Delete a virtual interface.
    Del {
        /// Interface name, ifindex or phyN.
        dev: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MonitorFlagArg {
    Fcsfail,
    Plcpfail,
    Control,
    Otherbss,
    Cook,
    Active,
}

impl From<MonitorFlagArg> for MonitorFlag {
    fn from(arg: MonitorFlagArg) -> Self {
        match arg {
            MonitorFlagArg::Fcsfail => MonitorFlag::FcsFail,
            MonitorFlagArg::Plcpfail => MonitorFlag::PlcpFail,
            MonitorFlagArg::Control => MonitorFlag::Control,
            MonitorFlagArg::Otherbss => MonitorFlag::OtherBss,
            MonitorFlagArg::Cook => MonitorFlag::CookFrames,
            MonitorFlagArg::Active => MonitorFlag::Active,
        }
    }
}

impl DevCmd {
    pub fn run(
        self,
        nl: &mut Nl80211Connection,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> Result<()> {
        let mut stdout = io::stdout().lock();

        match self.action.unwrap_or(DevAction::List) {
            DevAction::List => {
                nl.interfaces()?.print(&mut stdout, format, opts)?;
            }
            DevAction::Info { dev } => {
                let card = resolve_card(nl, &dev)?;
                nl.interface(card.ifindex())?
                    .print(&mut stdout, format, opts)?;
            }
            DevAction::SetMode { dev, mode } => {
                let card = resolve_card(nl, &dev)?;
                nl.set_mode(&card, mode)?;
            }
            DevAction::SetChannel {
                dev,
                freq,
                channel_type,
            } => {
                let card = resolve_card(nl, &dev)?;
                nl.set_channel(&card, freq, channel_type)?;
            }
            DevAction::Add {
                dev,
                name,
                mode,
                flags,
            } => {
                let card = resolve_card(nl, &dev)?;
                let flags: Vec<MonitorFlag> = flags.into_iter().map(Into::into).collect();
                let new = nl.add_interface(&card, &name, mode, &flags)?;
                new.print(&mut stdout, format, opts)?;
            }
            DevAction::Del { dev } => {
                let card = resolve_card(nl, &dev)?;
                nl.delete_interface(&card)?;
            }
        }

        Ok(())
    }
}
