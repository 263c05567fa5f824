//! Printable implementation for Bss.

use std::io::Write;

use crate::netlink::genl::nl80211::Bss;
use crate::output::formatting::{format_mbm, format_ssid};
use crate::output::{OutputOptions, Printable};

impl Printable for Bss {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        write!(w, "BSS {}", self.bssid)?;
        if let Some(status) = self.status {
            write!(w, " -- {status}")?;
        }
        writeln!(w)?;

        writeln!(w, "\tfreq: {}", self.frequency)?;
        if let Some(interval) = self.beacon_interval {
            writeln!(w, "\tbeacon interval: {interval} TUs")?;
        }
        if let Some(mbm) = self.signal_mbm {
            writeln!(w, "\tsignal: {}", format_mbm(mbm))?;
        }
        if let Some(ago) = self.seen_ms_ago {
            writeln!(w, "\tlast seen: {ago} ms ago")?;
        }
        match self.ssid {
            Some(ref ssid) => writeln!(w, "\tSSID: {}", format_ssid(ssid))?,
            None => writeln!(w, "\tSSID: (hidden)")?,
        }

        if opts.details {
            if let Some(capa) = self.capability {
                writeln!(w, "\tcapability: 0x{capa:04x}")?;
            }
            if let Some(tsf) = self.tsf {
                writeln!(w, "\tTSF: {tsf} usec")?;
            }
        }

        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "bssid": self.bssid.to_string(),
            "freq": self.frequency,
        });

        if let Some(ref ssid) = self.ssid {
            obj["ssid"] = serde_json::json!(format_ssid(ssid));
        }
        if let Some(mbm) = self.signal_mbm {
            obj["signal_dbm"] = serde_json::json!(mbm as f64 / 100.0);
        }
        if let Some(status) = self.status {
            obj["status"] = serde_json::json!(status.to_string());
        }
        if let Some(interval) = self.beacon_interval {
            obj["beacon_interval"] = serde_json::json!(interval);
        }
        if let Some(capa) = self.capability {
            obj["capability"] = serde_json::json!(capa);
        }
        if let Some(ago) = self.seen_ms_ago {
            obj["last_seen_ms"] = serde_json::json!(ago);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::genl::nl80211::BssStatus;
    use crate::util::MacAddr;

    #[test]
    fn test_bss_output() {
        let bss = Bss {
            bssid: MacAddr([2, 0, 0, 0, 0, 1]),
            frequency: 5180,
            tsf: None,
            beacon_interval: Some(100),
            capability: None,
            signal_mbm: Some(-6100),
            status: Some(BssStatus::Associated),
            seen_ms_ago: None,
            ssid: None,
        };

        let mut out = Vec::new();
        bss.print_text(&mut out, &OutputOptions::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "BSS 02:00:00:00:00:01 -- associated\n\tfreq: 5180\n\tbeacon interval: 100 TUs\n\
             \tsignal: -61.00 dBm\n\tSSID: (hidden)\n"
        );
        assert_eq!(bss.to_json()["signal_dbm"], -61.0);
    }
}
