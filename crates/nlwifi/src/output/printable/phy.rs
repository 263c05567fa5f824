//! Printable implementation for PhyInfo and RegDomain.

use std::io::Write;

use crate::netlink::genl::nl80211::{Band, PhyInfo, RegDomain};
use crate::output::formatting::{cipher_name, dfs_region_name, format_mbm};
use crate::output::{OutputOptions, Printable};

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_band<W: Write>(w: &mut W, band: &Band) -> std::io::Result<()> {
    writeln!(w, "\tBand {}:", band.name())?;
    if let Some(capa) = band.ht_capa {
        writeln!(w, "\t\tHT capabilities: 0x{capa:04x}")?;
    }
    if let Some(capa) = band.vht_capa {
        writeln!(w, "\t\tVHT capabilities: 0x{capa:08x}")?;
    }
    writeln!(w, "\t\tBitrates (non-HT):")?;
    for rate in &band.bitrates {
        writeln!(w, "\t\t\t* {:.1} Mbps", rate.mbps())?;
    }
    writeln!(w, "\t\tFrequencies:")?;
    for freq in &band.frequencies {
        write!(w, "\t\t\t* {} MHz", freq.mhz)?;
        if freq.disabled {
            writeln!(w, " (disabled)")?;
            continue;
        }
        if let Some(power) = freq.max_tx_power_mbm {
            write!(w, " ({})", format_mbm(power as i32))?;
        }
        if freq.no_ir {
            write!(w, " (no IR)")?;
        }
        if freq.radar {
            write!(w, " (radar detection)")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

impl Printable for PhyInfo {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        writeln!(w, "Wiphy {}", self.name)?;
        writeln!(w, "\tstandards: {}", join(&self.standards()))?;
        writeln!(w, "\tsupported interface modes: {}", join(&self.modes))?;
        if let Some(limits) = self.retry_limits() {
            writeln!(w, "\tretry short {} long {}", limits.short, limits.long)?;
        }
        if let Some(rts) = self.rts_threshold {
            writeln!(w, "\tRTS threshold: {rts}")?;
        }
        if let Some(frag) = self.frag_threshold {
            writeln!(w, "\tFragmentation threshold: {frag}")?;
        }
        if let Some(class) = self.coverage_class {
            writeln!(w, "\tCoverage class: {class} (up to {}m)", 450 * class as u32)?;
        }
        if let Some(n) = self.max_scan_ssids {
            writeln!(w, "\tmax # scan SSIDs: {n}")?;
        }

        if opts.details {
            if !self.cipher_suites.is_empty() {
                writeln!(w, "\tSupported Ciphers:")?;
                for suite in &self.cipher_suites {
                    writeln!(w, "\t\t* {}", cipher_name(*suite))?;
                }
            }
            for band in &self.bands {
                print_band(w, band)?;
            }
            writeln!(w, "\tSupported commands:")?;
            for name in self.command_names() {
                writeln!(w, "\t\t * {name}")?;
            }
        }

        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        let bands: Vec<_> = self
            .bands
            .iter()
            .map(|band| {
                serde_json::json!({
                    "band": band.name(),
                    "ht": band.ht_capa.is_some(),
                    "vht": band.vht_capa.is_some(),
                    "bitrates": band.bitrates.iter().map(|r| r.mbps()).collect::<Vec<_>>(),
                    "frequencies": band.frequencies.iter().map(|f| serde_json::json!({
                        "freq": f.mhz,
                        "disabled": f.disabled,
                        "no_ir": f.no_ir,
                        "radar": f.radar,
                        "max_tx_power_mbm": f.max_tx_power_mbm,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        let mut obj = serde_json::json!({
            "wiphy": self.phy,
            "name": self.name,
            "standards": self.standards().iter().map(ToString::to_string).collect::<Vec<_>>(),
            "modes": self.modes.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "commands": self.command_names(),
            "ciphers": self.cipher_suites.iter().map(|c| cipher_name(*c)).collect::<Vec<_>>(),
            "bands": bands,
        });

        if let Some(limits) = self.retry_limits() {
            obj["retry_short"] = serde_json::json!(limits.short);
            obj["retry_long"] = serde_json::json!(limits.long);
        }
        if let Some(rts) = self.rts_threshold {
            obj["rts_threshold"] = serde_json::json!(rts.to_string());
        }
        if let Some(frag) = self.frag_threshold {
            obj["frag_threshold"] = serde_json::json!(frag.to_string());
        }
        if let Some(class) = self.coverage_class {
            obj["coverage_class"] = serde_json::json!(class);
        }

        obj
    }
}

impl Printable for RegDomain {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        write!(w, "country {}:", self.alpha2)?;
        if let Some(region) = self.dfs_region {
            write!(w, " {}", dfs_region_name(region))?;
        }
        writeln!(w)?;

        for rule in &self.rules {
            write!(
                w,
                "\t({} - {} @ {}), (",
                rule.start_khz / 1000,
                rule.end_khz / 1000,
                rule.max_bandwidth_khz / 1000
            )?;
            if rule.max_antenna_gain_mbi == 0 {
                write!(w, "N/A")?;
            } else {
                write!(w, "{:.2}", rule.max_antenna_gain_mbi as f64 / 100.0)?;
            }
            writeln!(w, ", {:.2})", rule.max_eirp_mbm as f64 / 100.0)?;
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "country": self.alpha2,
            "dfs_region": self.dfs_region.map(dfs_region_name),
            "rules": self.rules.iter().map(|r| serde_json::json!({
                "start_khz": r.start_khz,
                "end_khz": r.end_khz,
                "max_bandwidth_khz": r.max_bandwidth_khz,
                "max_antenna_gain_mbi": r.max_antenna_gain_mbi,
                "max_eirp_mbm": r.max_eirp_mbm,
                "flags": r.flags,
            })).collect::<Vec<_>>(),
        })
    }
}
