//! wifi reg command implementation.

use clap::{Args, Subcommand};
use nlwifi::Result;
use nlwifi::netlink::genl::nl80211::Nl80211Connection;
use nlwifi::output::{OutputFormat, OutputOptions, Printable};
use std::io;

#[derive(Args)]
pub struct RegCmd {
    #[command(subcommand)]
    action: Option<RegAction>,
}

#[derive(Subcommand)]
enum RegAction {
    /// Show the current regulatory domain.
    Get,

    /// Ask the kernel to apply a country's rules.
    Set {
        /// ISO 3166-1 alpha2 country code.
        alpha2: String,
    },
}

impl RegCmd {
    pub fn run(
        self,
        nl: &mut Nl80211Connection,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> Result<()> {
        match self.action.unwrap_or(RegAction::Get) {
            RegAction::Get => {
                nl.regulatory_domain()?
                    .print(&mut io::stdout().lock(), format, opts)?;
            }
            RegAction::Set { alpha2 } => nl.set_regulatory_domain(&alpha2)?,
        }
        Ok(())
    }
}
