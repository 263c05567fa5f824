//! Text formatting for wireless values.
//!
//! # Example
//!
//! ```
//! use nlwifi::output::formatting::{format_mbm, format_ssid};
//!
//! assert_eq!(format_ssid(b"home net"), "home net");
//! assert_eq!(format_ssid(b" lab\\"), "\\x20lab\\x5c");
//! assert_eq!(format_mbm(-4250), "-42.50 dBm");
//! ```

use std::fmt::Write;

/// Render an SSID the way `iw` does.
///
/// Printable ASCII is kept; backslashes, non-printable bytes and leading or
/// trailing spaces are written as `\xNN`.
pub fn format_ssid(ssid: &[u8]) -> String {
    let mut out = String::with_capacity(ssid.len());
    let last = ssid.len().saturating_sub(1);
    for (i, &b) in ssid.iter().enumerate() {
        let inner_space = b == b' ' && i != 0 && i != last;
        if (b.is_ascii_graphic() && b != b'\\') || inner_space {
            out.push(b as char);
        } else {
            let _ = write!(out, "\\x{b:02x}");
        }
    }
    out
}

/// Format a power level given in mBm (1/100 dBm).
pub fn format_mbm(mbm: i32) -> String {
    format!("{:.2} dBm", mbm as f64 / 100.0)
}

/// Name of an 802.11 cipher suite selector.
///
/// # Example
///
/// ```
/// use nlwifi::output::formatting::cipher_name;
///
/// assert_eq!(cipher_name(0x000f_ac04), "CCMP-128");
/// assert_eq!(cipher_name(0x0050_f201), "00-50-f2:1");
/// ```
pub fn cipher_name(suite: u32) -> String {
    let name = match suite {
        0x000f_ac01 => "WEP40",
        0x000f_ac02 => "TKIP",
        0x000f_ac04 => "CCMP-128",
        0x000f_ac05 => "WEP104",
        0x000f_ac06 => "CMAC",
        0x000f_ac08 => "GCMP-128",
        0x000f_ac09 => "GCMP-256",
        0x000f_ac0a => "CCMP-256",
        0x000f_ac0b => "GMAC-128",
        0x000f_ac0c => "GMAC-256",
        0x000f_ac0d => "CMAC-256",
        _ => {
            return format!(
                "{:02x}-{:02x}-{:02x}:{}",
                suite >> 24,
                (suite >> 16) & 0xff,
                (suite >> 8) & 0xff,
                suite & 0xff
            );
        }
    };
    name.to_string()
}

/// Name of a regulatory DFS region.
pub fn dfs_region_name(region: u8) -> &'static str {
    match region {
        0 => "DFS-UNSET",
        1 => "DFS-FCC",
        2 => "DFS-ETSI",
        3 => "DFS-JP",
        _ => "DFS-invalid",
    }
}

/// `yes`/`no`.
pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ssid() {
        assert_eq!(format_ssid(b""), "");
        assert_eq!(format_ssid(b"a b"), "a b");
        assert_eq!(format_ssid(b"ab "), "ab\\x20");
        assert_eq!(format_ssid(&[0xff, b'x']), "\\xffx");
    }

    #[test]
    fn test_cipher_name() {
        assert_eq!(cipher_name(0x000f_ac02), "TKIP");
        assert_eq!(cipher_name(0x000f_ac63), "00-0f-ac:99");
    }

    #[test]
    fn test_misc() {
        assert_eq!(format_mbm(2000), "20.00 dBm");
        assert_eq!(dfs_region_name(2), "DFS-ETSI");
        assert_eq!(yes_no(false), "no");
    }
}
