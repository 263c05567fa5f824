//! Printable implementation for Ipv4Config.

use std::io::Write;

use crate::ioctl::Ipv4Config;
use crate::output::{OutputOptions, Printable};

impl Printable for Ipv4Config {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        let Some(address) = self.address else {
            return writeln!(w, "    inet none");
        };

        write!(w, "    inet {address}")?;
        match (self.prefix_len(), self.netmask) {
            (Some(prefix), _) => write!(w, "/{prefix}")?,
            (None, Some(mask)) => write!(w, " netmask {mask}")?,
            (None, None) => {}
        }
        if let Some(brd) = self.broadcast {
            write!(w, " brd {brd}")?;
        }
        writeln!(w)
    }

    fn to_json(&self) -> serde_json::Value {
        let text = |addr: Option<std::net::Ipv4Addr>| addr.map(|a| a.to_string());
        serde_json::json!({
            "address": text(self.address),
            "netmask": text(self.netmask),
            "broadcast": text(self.broadcast),
            "prefixlen": self.prefix_len(),
        })
    }
}
