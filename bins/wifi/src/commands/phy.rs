//! wifi phy command implementation.

use clap::{Args, Subcommand};
use nlwifi::netlink::Card;
use nlwifi::netlink::genl::nl80211::{
    InterfaceMode, Nl80211Connection, RetryKind, Standard, Threshold,
};
use nlwifi::output::{OutputFormat, OutputOptions, Printable};
use nlwifi::{Error, Result};
use std::io::{self, Write};

use super::{parse_phy_arg, resolve_card};

#[derive(Args)]
pub struct PhyCmd {
    #[command(subcommand)]
    action: Option<PhyAction>,
}

#[derive(Subcommand)]
enum PhyAction {
    /// Show physical devices.
    Show {
        /// phyN or phy number (all phys if omitted).
        phy: Option<String>,
    },

    /// Show what a card supports.
    Caps {
        /// Interface name, ifindex or phyN.
        dev: String,
    },

    /// Set phy parameters through one of its interfaces.
    Set {
        /// Interface name, ifindex or phyN.
        dev: String,

        /// RTS threshold in octets, or "off".
        #[arg(long, value_parser = parse_threshold)]
        rts: Option<Threshold>,

        /// Fragmentation threshold in octets, or "off".
        #[arg(long, value_parser = parse_threshold)]
        frag: Option<Threshold>,

        /// Short retry limit.
        #[arg(long)]
        retry_short: Option<u8>,

        /// Long retry limit.
        #[arg(long)]
        retry_long: Option<u8>,

        /// Coverage class (0-255, 3 us of air propagation each).
        #[arg(long)]
        coverage: Option<u8>,
    },
}

/// Capabilities of one card.
struct Caps {
    card: Card,
    standards: Vec<Standard>,
    modes: Vec<InterfaceMode>,
    commands: Vec<String>,
}

fn names<T: ToString>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

impl Printable for Caps {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> io::Result<()> {
        writeln!(w, "{}", self.card)?;
        writeln!(w, "\tstandards: {}", names(&self.standards).join(" "))?;
        writeln!(w, "\tmodes: {}", names(&self.modes).join(" "))?;
        writeln!(w, "\tcommands:")?;
        for name in &self.commands {
            writeln!(w, "\t\t* {name}")?;
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ifname": self.card.dev(),
            "wiphy": self.card.phy(),
            "standards": names(&self.standards),
            "modes": names(&self.modes),
            "commands": self.commands,
        })
    }
}

fn parse_threshold(s: &str) -> Result<Threshold> {
    if s.eq_ignore_ascii_case("off") {
        return Ok(Threshold::Off);
    }
    s.parse()
        .map(Threshold::Value)
        .map_err(|_| Error::InvalidArgument(format!("invalid threshold: {s}")))
}

impl PhyCmd {
    pub fn run(
        self,
        nl: &mut Nl80211Connection,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> Result<()> {
        let mut stdout = io::stdout().lock();

        match self.action.unwrap_or(PhyAction::Show { phy: None }) {
            PhyAction::Show { phy: None } => {
                nl.phys()?.print(&mut stdout, format, opts)?;
            }
            PhyAction::Show { phy: Some(phy) } => {
                nl.phy_info(parse_phy_arg(&phy)?)?
                    .print(&mut stdout, format, opts)?;
            }
            PhyAction::Caps { dev } => {
                let card = resolve_card(nl, &dev)?;
                let caps = Caps {
                    standards: nl.supported_standards(&card)?,
                    modes: nl.supported_modes(&card)?,
                    commands: nl.supported_commands(&card)?,
                    card,
                };
                caps.print(&mut stdout, format, opts)?;
            }
            PhyAction::Set {
                dev,
                rts,
                frag,
                retry_short,
                retry_long,
                coverage,
            } => {
                let card = resolve_card(nl, &dev)?;
                if let Some(rts) = rts {
                    nl.set_rts_threshold(&card, rts)?;
                }
                if let Some(frag) = frag {
                    nl.set_frag_threshold(&card, frag)?;
                }
                if let Some(limit) = retry_short {
                    nl.set_retry_limit(&card, RetryKind::Short, limit)?;
                }
                if let Some(limit) = retry_long {
                    nl.set_retry_limit(&card, RetryKind::Long, limit)?;
                }
                if let Some(class) = coverage {
                    nl.set_coverage_class(&card, class)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("off").unwrap(), Threshold::Off);
        assert_eq!(parse_threshold("OFF").unwrap(), Threshold::Off);
        assert_eq!(parse_threshold("500").unwrap(), Threshold::Value(500));
        assert!(parse_threshold("-1").is_err());
    }
}
