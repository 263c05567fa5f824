//! wifi scan command implementation.

use clap::Args;
use nlwifi::Result;
use nlwifi::netlink::genl::nl80211::Nl80211Connection;
use nlwifi::output::{OutputFormat, OutputOptions, Printable};
use std::io;
use std::thread;
use std::time::Duration;

use super::resolve_card;

#[derive(Args)]
pub struct ScanCmd {
    /// Interface name, ifindex or phyN.
    dev: String,

    /// Probe for this SSID (repeatable, wildcard if omitted).
    #[arg(long)]
    ssid: Vec<String>,

    /// Only print the kernel's cached results.
    #[arg(long)]
    dump: bool,

    /// How long to let the scan run before reading results.
    #[arg(long, default_value_t = 3000)]
    wait_ms: u64,
}

impl ScanCmd {
    pub fn run(
        self,
        nl: &mut Nl80211Connection,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> Result<()> {
        let card = resolve_card(nl, &self.dev)?;

        if !self.dump {
            let ssids: Vec<&[u8]> = self.ssid.iter().map(|s| s.as_bytes()).collect();
            nl.trigger_scan(&card, &ssids)?;
            tracing::debug!(dev = card.dev(), wait_ms = self.wait_ms, "scan triggered");
            thread::sleep(Duration::from_millis(self.wait_ms));
        }

        let results = nl.scan_results(&card)?;
        results.print(&mut io::stdout().lock(), format, opts)?;
        Ok(())
    }
}
