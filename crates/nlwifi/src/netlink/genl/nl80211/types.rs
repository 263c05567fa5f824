//! nl80211 domain records and their parsers.

use std::fmt;
use std::str::FromStr;

use super::{
    BAND_2GHZ, BAND_5GHZ, BAND_6GHZ, BAND_60GHZ, BandAttr, BitrateAttr, BssAttr, FrequencyAttr,
    Nl80211Attr, Nl80211Cmd, RegRuleAttr,
};
use crate::error::{Error, Result};
use crate::netlink::attr::{self, get};
use crate::netlink::genl::GenlMessage;
use crate::util::MacAddr;

/// Interface operating mode (`enum nl80211_iftype`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterfaceMode {
    #[default]
    Unspecified,
    /// Independent BSS (ad-hoc).
    Adhoc,
    /// Managed (station).
    Station,
    /// Access point.
    Ap,
    /// VLAN interface of an access point.
    ApVlan,
    Wds,
    Monitor,
    MeshPoint,
    P2pClient,
    P2pGo,
    P2pDevice,
    /// Outside the context of a BSS.
    Ocb,
    Nan,
    /// A value this crate does not name.
    Unknown(u32),
}

impl InterfaceMode {
    /// Map a kernel value.
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::Unspecified,
            1 => Self::Adhoc,
            2 => Self::Station,
            3 => Self::Ap,
            4 => Self::ApVlan,
            5 => Self::Wds,
            6 => Self::Monitor,
            7 => Self::MeshPoint,
            8 => Self::P2pClient,
            9 => Self::P2pGo,
            10 => Self::P2pDevice,
            11 => Self::Ocb,
            12 => Self::Nan,
            other => Self::Unknown(other),
        }
    }

    /// Kernel value.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Unspecified => 0,
            Self::Adhoc => 1,
            Self::Station => 2,
            Self::Ap => 3,
            Self::ApVlan => 4,
            Self::Wds => 5,
            Self::Monitor => 6,
            Self::MeshPoint => 7,
            Self::P2pClient => 8,
            Self::P2pGo => 9,
            Self::P2pDevice => 10,
            Self::Ocb => 11,
            Self::Nan => 12,
            Self::Unknown(value) => value,
        }
    }

    /// Short name, accepted back by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::Adhoc => "ibss",
            Self::Station => "managed",
            Self::Ap => "ap",
            Self::ApVlan => "ap_vlan",
            Self::Wds => "wds",
            Self::Monitor => "monitor",
            Self::MeshPoint => "mesh",
            Self::P2pClient => "p2p_client",
            Self::P2pGo => "p2p_go",
            Self::P2pDevice => "p2p_device",
            Self::Ocb => "ocb",
            Self::Nan => "nan",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(value) => write!(f, "unknown({value})"),
            mode => f.write_str(mode.name()),
        }
    }
}

impl FromStr for InterfaceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "ibss" | "adhoc" => Self::Adhoc,
            "managed" | "station" | "sta" => Self::Station,
            "ap" | "master" => Self::Ap,
            "ap_vlan" => Self::ApVlan,
            "wds" => Self::Wds,
            "monitor" => Self::Monitor,
            "mesh" | "mesh_point" | "mp" => Self::MeshPoint,
            "p2p_client" => Self::P2pClient,
            "p2p_go" => Self::P2pGo,
            "p2p_device" => Self::P2pDevice,
            "ocb" => Self::Ocb,
            "nan" => Self::Nan,
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "unknown interface mode: {s}"
                )));
            }
        })
    }
}

/// Legacy channel type (`enum nl80211_channel_type`).
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelType {
    #[default]
    NoHt = 0,
    Ht20 = 1,
    Ht40Minus = 2,
    Ht40Plus = 3,
}

impl ChannelType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::NoHt),
            1 => Some(Self::Ht20),
            2 => Some(Self::Ht40Minus),
            3 => Some(Self::Ht40Plus),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NoHt => "NOHT",
            Self::Ht20 => "HT20",
            Self::Ht40Minus => "HT40-",
            Self::Ht40Plus => "HT40+",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "NOHT" => Ok(Self::NoHt),
            "HT20" => Ok(Self::Ht20),
            "HT40-" => Ok(Self::Ht40Minus),
            "HT40+" => Ok(Self::Ht40Plus),
            _ => Err(Error::InvalidArgument(format!("unknown channel type: {s}"))),
        }
    }
}

/// Channel width (`enum nl80211_chan_width`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelWidth {
    Width20NoHt,
    Width20,
    Width40,
    Width80,
    Width80P80,
    Width160,
    Width5,
    Width10,
    Other(u32),
}

impl ChannelWidth {
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::Width20NoHt,
            1 => Self::Width20,
            2 => Self::Width40,
            3 => Self::Width80,
            4 => Self::Width80P80,
            5 => Self::Width160,
            6 => Self::Width5,
            7 => Self::Width10,
            other => Self::Other(other),
        }
    }

    /// Occupied bandwidth in MHz, where one is defined.
    pub fn mhz(self) -> Option<u32> {
        match self {
            Self::Width20NoHt | Self::Width20 => Some(20),
            Self::Width40 => Some(40),
            Self::Width80 | Self::Width80P80 => Some(80),
            Self::Width160 => Some(160),
            Self::Width5 => Some(5),
            Self::Width10 => Some(10),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for ChannelWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width20NoHt => f.write_str("20 MHz (no HT)"),
            Self::Width80P80 => f.write_str("80+80 MHz"),
            Self::Other(value) => write!(f, "unknown({value})"),
            width => write!(f, "{} MHz", width.mhz().unwrap_or_default()),
        }
    }
}

/// Monitor interface flags (`enum nl80211_mntr_flags`).
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorFlag {
    FcsFail = 1,
    PlcpFail = 2,
    Control = 3,
    OtherBss = 4,
    CookFrames = 5,
    Active = 6,
}

/// RTS or fragmentation threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Threshold {
    /// Threshold disabled (kernel value `u32::MAX`).
    Off,
    /// Threshold in bytes.
    Value(u32),
}

impl Threshold {
    pub fn from_kernel(value: u32) -> Self {
        if value == u32::MAX {
            Self::Off
        } else {
            Self::Value(value)
        }
    }

    pub fn to_kernel(self) -> u32 {
        match self {
            Self::Off => u32::MAX,
            Self::Value(value) => value,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

/// Which retry limit to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryKind {
    Short,
    Long,
}

/// Short and long frame retry limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryLimits {
    pub short: u8,
    pub long: u8,
}

/// 802.11 amendment a device can operate under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Standard {
    A,
    B,
    G,
    N,
    Ac,
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::A => "a",
            Self::B => "b",
            Self::G => "g",
            Self::N => "n",
            Self::Ac => "ac",
        })
    }
}

/// A wireless network interface as reported by `GET_INTERFACE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    pub ifindex: u32,
    pub name: String,
    pub phy: u32,
    /// Wireless device identifier.
    pub wdev: Option<u64>,
    pub mode: InterfaceMode,
    pub mac: Option<MacAddr>,
    /// Operating frequency in MHz.
    pub frequency: Option<u32>,
    pub channel_type: Option<ChannelType>,
    pub channel_width: Option<ChannelWidth>,
    /// Center frequency of the first segment in MHz.
    pub center_freq1: Option<u32>,
    /// Transmit power in mBm (dBm * 100).
    pub tx_power_mbm: Option<i32>,
    /// Raw SSID bytes when associated or beaconing.
    pub ssid: Option<Vec<u8>>,
}

impl Interface {
    /// Parse a `NEW_INTERFACE` message.
    ///
    /// Wireless devices without a netdev (P2P device, NAN) carry no ifindex
    /// and yield `None`.
    pub(crate) fn from_message(msg: &GenlMessage) -> Result<Option<Self>> {
        let mut iface = Self::default();
        let mut ifindex = None;

        for (kind, payload) in msg.attrs()? {
            match kind {
                k if k == Nl80211Attr::Ifindex as u16 => ifindex = Some(get::u32_ne(payload)?),
                k if k == Nl80211Attr::Ifname as u16 => {
                    iface.name = get::string(payload)?.to_string()
                }
                k if k == Nl80211Attr::Wiphy as u16 => iface.phy = get::u32_ne(payload)?,
                k if k == Nl80211Attr::Wdev as u16 => iface.wdev = Some(get::u64_ne(payload)?),
                k if k == Nl80211Attr::Iftype as u16 => {
                    iface.mode = InterfaceMode::from_u32(get::u32_ne(payload)?)
                }
                k if k == Nl80211Attr::Mac as u16 => iface.mac = Some(MacAddr::from_slice(payload)?),
                k if k == Nl80211Attr::WiphyFreq as u16 => {
                    iface.frequency = Some(get::u32_ne(payload)?)
                }
                k if k == Nl80211Attr::WiphyChannelType as u16 => {
                    iface.channel_type = ChannelType::from_u32(get::u32_ne(payload)?)
                }
                k if k == Nl80211Attr::ChannelWidth as u16 => {
                    iface.channel_width = Some(ChannelWidth::from_u32(get::u32_ne(payload)?))
                }
                k if k == Nl80211Attr::CenterFreq1 as u16 => {
                    iface.center_freq1 = Some(get::u32_ne(payload)?)
                }
                k if k == Nl80211Attr::WiphyTxPowerLevel as u16 => {
                    iface.tx_power_mbm = Some(get::i32_ne(payload)?)
                }
                k if k == Nl80211Attr::Ssid as u16 => iface.ssid = Some(payload.to_vec()),
                _ => {}
            }
        }

        Ok(ifindex.map(|ifindex| Self { ifindex, ..iface }))
    }

    /// SSID as text, with invalid UTF-8 replaced.
    pub fn ssid_lossy(&self) -> Option<String> {
        self.ssid
            .as_deref()
            .map(|ssid| String::from_utf8_lossy(ssid).into_owned())
    }
}

/// One channel of a band.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frequency {
    /// Center frequency in MHz.
    pub mhz: u32,
    pub disabled: bool,
    /// Initiating radiation (beaconing, probing) is not permitted.
    pub no_ir: bool,
    /// Radar detection is required.
    pub radar: bool,
    /// Maximum transmit power in mBm.
    pub max_tx_power_mbm: Option<u32>,
}

impl Frequency {
    fn parse(data: &[u8]) -> Result<Option<Self>> {
        let mut freq = Self::default();
        let mut mhz = None;
        for (kind, payload) in attr::decode(data)? {
            match kind {
                k if k == FrequencyAttr::Freq as u16 => mhz = Some(get::u32_ne(payload)?),
                k if k == FrequencyAttr::Disabled as u16 => freq.disabled = true,
                k if k == FrequencyAttr::NoIr as u16 => freq.no_ir = true,
                k if k == FrequencyAttr::Radar as u16 => freq.radar = true,
                k if k == FrequencyAttr::MaxTxPower as u16 => {
                    freq.max_tx_power_mbm = Some(get::u32_ne(payload)?)
                }
                _ => {}
            }
        }
        Ok(mhz.map(|mhz| Self { mhz, ..freq }))
    }
}

/// A legacy bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitrate {
    /// Rate in units of 100 kbit/s.
    pub rate: u32,
}

impl Bitrate {
    /// Rate in Mbit/s.
    pub fn mbps(self) -> f64 {
        self.rate as f64 / 10.0
    }
}

/// A frequency band supported by a phy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Band {
    /// Band index (`enum nl80211_band`).
    pub id: u16,
    pub frequencies: Vec<Frequency>,
    pub bitrates: Vec<Bitrate>,
    /// HT capability field, present on 802.11n hardware.
    pub ht_capa: Option<u16>,
    /// VHT capability field, present on 802.11ac hardware.
    pub vht_capa: Option<u32>,
}

impl Band {
    pub fn name(&self) -> &'static str {
        match self.id {
            BAND_2GHZ => "2.4GHz",
            BAND_5GHZ => "5GHz",
            BAND_60GHZ => "60GHz",
            BAND_6GHZ => "6GHz",
            _ => "unknown",
        }
    }

    fn merge(&mut self, data: &[u8]) -> Result<()> {
        for (kind, payload) in attr::decode(data)? {
            match kind {
                k if k == BandAttr::Freqs as u16 => {
                    for (_, entry) in attr::decode(payload)? {
                        if let Some(freq) = Frequency::parse(entry)? {
                            self.frequencies.push(freq);
                        }
                    }
                }
                k if k == BandAttr::Rates as u16 => {
                    for (_, entry) in attr::decode(payload)? {
                        for (rate_kind, rate) in attr::decode(entry)? {
                            if rate_kind == BitrateAttr::Rate as u16 {
                                self.bitrates.push(Bitrate {
                                    rate: get::u32_ne(rate)?,
                                });
                            }
                        }
                    }
                }
                k if k == BandAttr::HtCapa as u16 => self.ht_capa = Some(get::u16_ne(payload)?),
                k if k == BandAttr::VhtCapa as u16 => self.vht_capa = Some(get::u32_ne(payload)?),
                _ => {}
            }
        }
        Ok(())
    }
}

/// Capabilities and settings of a wireless phy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhyInfo {
    pub phy: u32,
    pub name: String,
    pub generation: Option<u32>,
    /// Interface modes the phy supports.
    pub modes: Vec<InterfaceMode>,
    /// Modes that need no driver support (monitor, AP/VLAN).
    pub software_modes: Vec<InterfaceMode>,
    /// Raw command numbers from `SUPPORTED_COMMANDS`.
    pub commands: Vec<u32>,
    pub bands: Vec<Band>,
    pub rts_threshold: Option<Threshold>,
    pub frag_threshold: Option<Threshold>,
    pub retry_short: Option<u8>,
    pub retry_long: Option<u8>,
    pub coverage_class: Option<u8>,
    pub max_scan_ssids: Option<u8>,
    /// Cipher suite selectors (OUI << 8 | type).
    pub cipher_suites: Vec<u32>,
}

impl PhyInfo {
    /// Fold one `NEW_WIPHY` message into this record.
    ///
    /// Split dumps spread a phy over several messages; bands that reappear
    /// have their channel and rate lists extended.
    pub(crate) fn merge(&mut self, msg: &GenlMessage) -> Result<()> {
        for (kind, payload) in msg.attrs()? {
            match kind {
                k if k == Nl80211Attr::Wiphy as u16 => self.phy = get::u32_ne(payload)?,
                k if k == Nl80211Attr::WiphyName as u16 => {
                    self.name = get::string(payload)?.to_string()
                }
                k if k == Nl80211Attr::Generation as u16 => {
                    self.generation = Some(get::u32_ne(payload)?)
                }
                k if k == Nl80211Attr::SupportedIftypes as u16 => {
                    merge_modes(&mut self.modes, payload)?
                }
                k if k == Nl80211Attr::SoftwareIftypes as u16 => {
                    merge_modes(&mut self.software_modes, payload)?
                }
                k if k == Nl80211Attr::SupportedCommands as u16 => {
                    for (_, cmd) in attr::decode(payload)? {
                        let cmd = get::u32_ne(cmd)?;
                        if !self.commands.contains(&cmd) {
                            self.commands.push(cmd);
                        }
                    }
                }
                k if k == Nl80211Attr::WiphyBands as u16 => {
                    for (id, band) in attr::decode(payload)? {
                        self.band_mut(id).merge(band)?;
                    }
                }
                k if k == Nl80211Attr::WiphyRtsThreshold as u16 => {
                    self.rts_threshold = Some(Threshold::from_kernel(get::u32_ne(payload)?))
                }
                k if k == Nl80211Attr::WiphyFragThreshold as u16 => {
                    self.frag_threshold = Some(Threshold::from_kernel(get::u32_ne(payload)?))
                }
                k if k == Nl80211Attr::WiphyRetryShort as u16 => {
                    self.retry_short = Some(get::u8(payload)?)
                }
                k if k == Nl80211Attr::WiphyRetryLong as u16 => {
                    self.retry_long = Some(get::u8(payload)?)
                }
                k if k == Nl80211Attr::WiphyCoverageClass as u16 => {
                    self.coverage_class = Some(get::u8(payload)?)
                }
                k if k == Nl80211Attr::MaxNumScanSsids as u16 => {
                    self.max_scan_ssids = Some(get::u8(payload)?)
                }
                k if k == Nl80211Attr::CipherSuites as u16 => {
                    self.cipher_suites = payload
                        .chunks_exact(4)
                        .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                        .collect();
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn band_mut(&mut self, id: u16) -> &mut Band {
        let pos = match self.bands.iter().position(|b| b.id == id) {
            Some(pos) => pos,
            None => {
                self.bands.push(Band {
                    id,
                    ..Band::default()
                });
                self.bands.len() - 1
            }
        };
        &mut self.bands[pos]
    }

    /// Band by index.
    pub fn band(&self, id: u16) -> Option<&Band> {
        self.bands.iter().find(|b| b.id == id)
    }

    /// Names of the supported commands, in the order the kernel listed them.
    pub fn command_names(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|&cmd| {
                u8::try_from(cmd)
                    .ok()
                    .and_then(Nl80211Cmd::from_u8)
                    .map(|c| c.name().to_string())
                    .unwrap_or_else(|| format!("unknown({cmd})"))
            })
            .collect()
    }

    /// Short and long retry limits, when both are reported.
    pub fn retry_limits(&self) -> Option<RetryLimits> {
        Some(RetryLimits {
            short: self.retry_short?,
            long: self.retry_long?,
        })
    }

    /// 802.11 standards derived from the band capabilities.
    ///
    /// 5 GHz implies a, 2.4 GHz implies b and also g when an OFDM rate
    /// above 11 Mbit/s is offered, HT capabilities imply n and VHT
    /// capabilities ac.
    pub fn standards(&self) -> Vec<Standard> {
        let mut standards = Vec::new();
        if self.band(BAND_5GHZ).is_some() {
            standards.push(Standard::A);
        }
        if let Some(band) = self.band(BAND_2GHZ) {
            standards.push(Standard::B);
            if band.bitrates.iter().any(|r| r.rate > 110) {
                standards.push(Standard::G);
            }
        }
        if self.bands.iter().any(|b| b.ht_capa.is_some()) {
            standards.push(Standard::N);
        }
        if self.bands.iter().any(|b| b.vht_capa.is_some()) {
            standards.push(Standard::Ac);
        }
        standards
    }
}

fn merge_modes(modes: &mut Vec<InterfaceMode>, data: &[u8]) -> Result<()> {
    // A nested set of flags whose attribute types are the modes.
    for (kind, _) in attr::decode(data)? {
        let mode = InterfaceMode::from_u32(kind as u32);
        if !modes.contains(&mode) {
            modes.push(mode);
        }
    }
    Ok(())
}

/// One rule of a regulatory domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegRule {
    /// `NL80211_RRF_*` flags.
    pub flags: u32,
    pub start_khz: u32,
    pub end_khz: u32,
    pub max_bandwidth_khz: u32,
    /// Maximum antenna gain in mBi.
    pub max_antenna_gain_mbi: u32,
    /// Maximum EIRP in mBm.
    pub max_eirp_mbm: u32,
}

impl RegRule {
    fn parse(data: &[u8]) -> Result<Self> {
        let mut rule = Self::default();
        for (kind, payload) in attr::decode(data)? {
            match kind {
                k if k == RegRuleAttr::Flags as u16 => rule.flags = get::u32_ne(payload)?,
                k if k == RegRuleAttr::FreqRangeStart as u16 => {
                    rule.start_khz = get::u32_ne(payload)?
                }
                k if k == RegRuleAttr::FreqRangeEnd as u16 => rule.end_khz = get::u32_ne(payload)?,
                k if k == RegRuleAttr::FreqRangeMaxBw as u16 => {
                    rule.max_bandwidth_khz = get::u32_ne(payload)?
                }
                k if k == RegRuleAttr::PowerRuleMaxAntGain as u16 => {
                    rule.max_antenna_gain_mbi = get::u32_ne(payload)?
                }
                k if k == RegRuleAttr::PowerRuleMaxEirp as u16 => {
                    rule.max_eirp_mbm = get::u32_ne(payload)?
                }
                _ => {}
            }
        }
        Ok(rule)
    }
}

/// Regulatory domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegDomain {
    /// ISO 3166 alpha2 country code, `00` for the world domain.
    pub alpha2: String,
    /// DFS region (`enum nl80211_dfs_regions`).
    pub dfs_region: Option<u8>,
    pub rules: Vec<RegRule>,
}

impl RegDomain {
    pub(crate) fn from_message(msg: &GenlMessage) -> Result<Self> {
        let mut reg = Self::default();
        for (kind, payload) in msg.attrs()? {
            match kind {
                k if k == Nl80211Attr::RegAlpha2 as u16 => {
                    reg.alpha2 = get::string(payload)?.to_string()
                }
                k if k == Nl80211Attr::DfsRegion as u16 => reg.dfs_region = Some(get::u8(payload)?),
                k if k == Nl80211Attr::RegRules as u16 => {
                    for (_, rule) in attr::decode(payload)? {
                        reg.rules.push(RegRule::parse(rule)?);
                    }
                }
                _ => {}
            }
        }
        Ok(reg)
    }
}

/// Association state of a BSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BssStatus {
    Authenticated,
    Associated,
    IbssJoined,
    Unknown(u32),
}

impl BssStatus {
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::Authenticated,
            1 => Self::Associated,
            2 => Self::IbssJoined,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for BssStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticated => f.write_str("authenticated"),
            Self::Associated => f.write_str("associated"),
            Self::IbssJoined => f.write_str("joined"),
            Self::Unknown(value) => write!(f, "unknown({value})"),
        }
    }
}

/// A scan result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bss {
    pub bssid: MacAddr,
    /// Frequency in MHz.
    pub frequency: u32,
    pub tsf: Option<u64>,
    /// Beacon interval in time units (1024 us).
    pub beacon_interval: Option<u16>,
    pub capability: Option<u16>,
    /// Signal strength in mBm.
    pub signal_mbm: Option<i32>,
    pub status: Option<BssStatus>,
    pub seen_ms_ago: Option<u32>,
    /// SSID from information element 0, absent for hidden networks.
    pub ssid: Option<Vec<u8>>,
}

impl Bss {
    /// Parse a `NEW_SCAN_RESULTS` dump message.
    pub(crate) fn from_message(msg: &GenlMessage) -> Result<Option<Self>> {
        let Some(data) = msg.attr(Nl80211Attr::Bss as u16)? else {
            return Ok(None);
        };

        let mut bssid = None;
        let mut bss = Self {
            bssid: MacAddr::ZERO,
            frequency: 0,
            tsf: None,
            beacon_interval: None,
            capability: None,
            signal_mbm: None,
            status: None,
            seen_ms_ago: None,
            ssid: None,
        };

        for (kind, payload) in attr::decode(data)? {
            match kind {
                k if k == BssAttr::Bssid as u16 => bssid = Some(MacAddr::from_slice(payload)?),
                k if k == BssAttr::Frequency as u16 => bss.frequency = get::u32_ne(payload)?,
                k if k == BssAttr::Tsf as u16 => bss.tsf = Some(get::u64_ne(payload)?),
                k if k == BssAttr::BeaconInterval as u16 => {
                    bss.beacon_interval = Some(get::u16_ne(payload)?)
                }
                k if k == BssAttr::Capability as u16 => {
                    bss.capability = Some(get::u16_ne(payload)?)
                }
                k if k == BssAttr::InformationElements as u16 => bss.ssid = ssid_from_ies(payload),
                k if k == BssAttr::SignalMbm as u16 => bss.signal_mbm = Some(get::i32_ne(payload)?),
                k if k == BssAttr::Status as u16 => {
                    bss.status = Some(BssStatus::from_u32(get::u32_ne(payload)?))
                }
                k if k == BssAttr::SeenMsAgo as u16 => {
                    bss.seen_ms_ago = Some(get::u32_ne(payload)?)
                }
                _ => {}
            }
        }

        Ok(bssid.map(|bssid| Self { bssid, ..bss }))
    }

    /// SSID as text, with invalid UTF-8 replaced.
    pub fn ssid_lossy(&self) -> Option<String> {
        self.ssid
            .as_deref()
            .map(|ssid| String::from_utf8_lossy(ssid).into_owned())
    }

    /// Signal strength in dBm.
    pub fn signal_dbm(&self) -> Option<f64> {
        self.signal_mbm.map(|mbm| mbm as f64 / 100.0)
    }
}

/// Find element 0 (SSID) in a buffer of 802.11 information elements.
fn ssid_from_ies(mut ies: &[u8]) -> Option<Vec<u8>> {
    while let [id, len, rest @ ..] = ies {
        let body = rest.get(..*len as usize)?;
        if *id == 0 {
            return Some(body.to_vec());
        }
        ies = &rest[*len as usize..];
    }
    None
}
