//! Printable implementation for Interface and Card.

use std::io::Write;

use crate::netlink::Card;
use crate::netlink::genl::nl80211::Interface;
use crate::output::formatting::{format_mbm, format_ssid};
use crate::output::{OutputOptions, Printable};

impl Printable for Interface {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        writeln!(w, "Interface {}", self.name)?;
        writeln!(w, "\tifindex {}", self.ifindex)?;
        if let Some(wdev) = self.wdev {
            writeln!(w, "\twdev 0x{wdev:x}")?;
        }
        if let Some(mac) = self.mac {
            writeln!(w, "\taddr {mac}")?;
        }
        if let Some(ref ssid) = self.ssid {
            writeln!(w, "\tssid {}", format_ssid(ssid))?;
        }
        writeln!(w, "\ttype {}", self.mode)?;
        writeln!(w, "\twiphy {}", self.phy)?;

        if let Some(freq) = self.frequency {
            write!(w, "\tchannel freq {freq} MHz")?;
            if let Some(width) = self.channel_width {
                write!(w, ", width: {width}")?;
            } else if let Some(channel_type) = self.channel_type {
                write!(w, " {channel_type}")?;
            }
            if let Some(center) = self.center_freq1 {
                write!(w, ", center1: {center} MHz")?;
            }
            writeln!(w)?;
        }

        if let Some(mbm) = self.tx_power_mbm {
            writeln!(w, "\ttxpower {}", format_mbm(mbm))?;
        }

        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "ifindex": self.ifindex,
            "ifname": self.name,
            "wiphy": self.phy,
            "type": self.mode.to_string(),
        });

        if let Some(wdev) = self.wdev {
            obj["wdev"] = serde_json::json!(wdev);
        }
        if let Some(mac) = self.mac {
            obj["addr"] = serde_json::json!(mac.to_string());
        }
        if let Some(ref ssid) = self.ssid {
            obj["ssid"] = serde_json::json!(format_ssid(ssid));
        }
        if let Some(freq) = self.frequency {
            obj["freq"] = serde_json::json!(freq);
        }
        if let Some(channel_type) = self.channel_type {
            obj["channel_type"] = serde_json::json!(channel_type.name());
        }
        if let Some(width) = self.channel_width.and_then(|w| w.mhz()) {
            obj["width"] = serde_json::json!(width);
        }
        if let Some(center) = self.center_freq1 {
            obj["center_freq1"] = serde_json::json!(center);
        }
        if let Some(mbm) = self.tx_power_mbm {
            obj["txpower_dbm"] = serde_json::json!(mbm as f64 / 100.0);
        }

        obj
    }
}

impl Printable for Card {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        writeln!(w, "{self}")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ifname": self.dev(),
            "wiphy": self.phy(),
            "ifindex": self.ifindex(),
        })
    }
}
