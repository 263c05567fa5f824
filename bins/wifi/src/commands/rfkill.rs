//! wifi rfkill command implementation.

use clap::{Args, Subcommand};
use nlwifi::Result;
use nlwifi::output::{OutputFormat, OutputOptions, Printable};
use nlwifi::rfkill::{Rfkill, RfkillType};
use std::io;

use super::parse_phy;

#[derive(Args)]
pub struct RfkillCmd {
    #[command(subcommand)]
    action: Option<RfkillAction>,
}

#[derive(Subcommand)]
enum RfkillAction {
    /// List rfkill switches.
    #[command(visible_alias = "ls")]
    List,

    /// Soft block a switch.
    Block {
        /// Index, phyN, a type (wlan, bluetooth, ...) or "all".
        target: String,
    },

    /// Remove a soft block.
    Unblock {
        /// Index, phyN, a type (wlan, bluetooth, ...) or "all".
        target: String,
    },
}

/// What a block/unblock applies to.
#[derive(Debug, PartialEq, Eq)]
enum Target {
    Index(u32),
    Kind(RfkillType),
}

fn parse_target(s: &str) -> Result<Target> {
    if let Ok(index) = s.parse() {
        return Ok(Target::Index(index));
    }
    if let Some(phy) = parse_phy(s) {
        return Rfkill::index_for_phy(phy).map(Target::Index);
    }
    s.parse().map(Target::Kind)
}

impl RfkillCmd {
    pub fn run(self, format: OutputFormat, opts: &OutputOptions) -> Result<()> {
        let rfkill = Rfkill::new();

        match self.action.unwrap_or(RfkillAction::List) {
            RfkillAction::List => {
                rfkill
                    .list()?
                    .print(&mut io::stdout().lock(), format, opts)?;
            }
            RfkillAction::Block { target } => apply(&rfkill, &target, true)?,
            RfkillAction::Unblock { target } => apply(&rfkill, &target, false)?,
        }
        Ok(())
    }
}

fn apply(rfkill: &Rfkill, target: &str, blocked: bool) -> Result<()> {
    match parse_target(target)? {
        Target::Index(index) => rfkill.set_blocked(index, blocked),
        Target::Kind(kind) => rfkill.block_all(kind, blocked),
    }
}
