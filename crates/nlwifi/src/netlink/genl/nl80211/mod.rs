//! nl80211 wireless configuration via Generic Netlink.
//!
//! nl80211 is the cfg80211 configuration family. Its commands are keyed
//! inconsistently: some take the interface index, some the phy index and a
//! few neither. [`Nl80211Connection`] hides that behind [`Card`] arguments.
//!
//! # Example
//!
//! ```rust,no_run
//! use nlwifi::netlink::Card;
//! use nlwifi::netlink::genl::nl80211::{InterfaceMode, Nl80211Connection};
//!
//! # fn example() -> nlwifi::Result<()> {
//! let mut nl = Nl80211Connection::new()?;
//!
//! for iface in nl.interfaces()? {
//!     println!("{} on phy{}: {}", iface.name, iface.phy, iface.mode);
//! }
//!
//! let card = Card::by_name(&mut nl, "wlan0")?;
//! nl.set_mode(&card, InterfaceMode::Monitor)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Card`]: crate::netlink::Card

mod connection;
mod types;

pub use connection::Nl80211Connection;
pub use types::{
    Band, Bitrate, Bss, BssStatus, ChannelType, ChannelWidth, Frequency, Interface,
    InterfaceMode, MonitorFlag, PhyInfo, RegDomain, RegRule, RetryKind, RetryLimits, Standard,
    Threshold,
};

/// nl80211 Generic Netlink family name.
pub const NL80211_GENL_NAME: &str = "nl80211";

/// nl80211 Generic Netlink version.
pub const NL80211_GENL_VERSION: u8 = 0;

/// Largest RTS threshold accepted by cfg80211.
pub const RTS_THRESHOLD_MAX: u32 = 2347;
/// Smallest fragmentation threshold accepted by cfg80211.
pub const FRAG_THRESHOLD_MIN: u32 = 256;
/// Largest fragmentation threshold accepted by cfg80211.
pub const FRAG_THRESHOLD_MAX: u32 = 2346;

/// nl80211 commands.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nl80211Cmd {
    Unspec = 0,
    GetWiphy = 1,
    SetWiphy = 2,
    NewWiphy = 3,
    DelWiphy = 4,
    GetInterface = 5,
    SetInterface = 6,
    NewInterface = 7,
    DelInterface = 8,
    GetKey = 9,
    SetKey = 10,
    NewKey = 11,
    DelKey = 12,
    GetBeacon = 13,
    SetBeacon = 14,
    StartAp = 15,
    StopAp = 16,
    GetStation = 17,
    SetStation = 18,
    NewStation = 19,
    DelStation = 20,
    GetMpath = 21,
    SetMpath = 22,
    NewMpath = 23,
    DelMpath = 24,
    SetBss = 25,
    SetReg = 26,
    ReqSetReg = 27,
    GetMeshConfig = 28,
    SetMeshConfig = 29,
    SetMgmtExtraIe = 30,
    GetReg = 31,
    GetScan = 32,
    TriggerScan = 33,
    NewScanResults = 34,
    ScanAborted = 35,
    RegChange = 36,
    Authenticate = 37,
    Associate = 38,
    Deauthenticate = 39,
    Disassociate = 40,
    MichaelMicFailure = 41,
    RegBeaconHint = 42,
    JoinIbss = 43,
    LeaveIbss = 44,
    Testmode = 45,
    Connect = 46,
    Roam = 47,
    Disconnect = 48,
    SetWiphyNetns = 49,
    GetSurvey = 50,
    NewSurveyResults = 51,
    SetPmksa = 52,
    DelPmksa = 53,
    FlushPmksa = 54,
    RemainOnChannel = 55,
    CancelRemainOnChannel = 56,
    SetTxBitrateMask = 57,
    RegisterFrame = 58,
    Frame = 59,
    FrameTxStatus = 60,
    SetPowerSave = 61,
    GetPowerSave = 62,
    SetCqm = 63,
    NotifyCqm = 64,
    SetChannel = 65,
    SetWdsPeer = 66,
    FrameWaitCancel = 67,
    JoinMesh = 68,
    LeaveMesh = 69,
}

impl Nl80211Cmd {
    const ALL: [Nl80211Cmd; 70] = [
        Self::Unspec,
        Self::GetWiphy,
        Self::SetWiphy,
        Self::NewWiphy,
        Self::DelWiphy,
        Self::GetInterface,
        Self::SetInterface,
        Self::NewInterface,
        Self::DelInterface,
        Self::GetKey,
        Self::SetKey,
        Self::NewKey,
        Self::DelKey,
        Self::GetBeacon,
        Self::SetBeacon,
        Self::StartAp,
        Self::StopAp,
        Self::GetStation,
        Self::SetStation,
        Self::NewStation,
        Self::DelStation,
        Self::GetMpath,
        Self::SetMpath,
        Self::NewMpath,
        Self::DelMpath,
        Self::SetBss,
        Self::SetReg,
        Self::ReqSetReg,
        Self::GetMeshConfig,
        Self::SetMeshConfig,
        Self::SetMgmtExtraIe,
        Self::GetReg,
        Self::GetScan,
        Self::TriggerScan,
        Self::NewScanResults,
        Self::ScanAborted,
        Self::RegChange,
        Self::Authenticate,
        Self::Associate,
        Self::Deauthenticate,
        Self::Disassociate,
        Self::MichaelMicFailure,
        Self::RegBeaconHint,
        Self::JoinIbss,
        Self::LeaveIbss,
        Self::Testmode,
        Self::Connect,
        Self::Roam,
        Self::Disconnect,
        Self::SetWiphyNetns,
        Self::GetSurvey,
        Self::NewSurveyResults,
        Self::SetPmksa,
        Self::DelPmksa,
        Self::FlushPmksa,
        Self::RemainOnChannel,
        Self::CancelRemainOnChannel,
        Self::SetTxBitrateMask,
        Self::RegisterFrame,
        Self::Frame,
        Self::FrameTxStatus,
        Self::SetPowerSave,
        Self::GetPowerSave,
        Self::SetCqm,
        Self::NotifyCqm,
        Self::SetChannel,
        Self::SetWdsPeer,
        Self::FrameWaitCancel,
        Self::JoinMesh,
        Self::LeaveMesh,
    ];

    /// Look up a command by its wire value.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Name as used by `iw` (`"new_interface"`, `"trigger_scan"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Unspec => "unspec",
            Self::GetWiphy => "get_wiphy",
            Self::SetWiphy => "set_wiphy",
            Self::NewWiphy => "new_wiphy",
            Self::DelWiphy => "del_wiphy",
            Self::GetInterface => "get_interface",
            Self::SetInterface => "set_interface",
            Self::NewInterface => "new_interface",
            Self::DelInterface => "del_interface",
            Self::GetKey => "get_key",
            Self::SetKey => "set_key",
            Self::NewKey => "new_key",
            Self::DelKey => "del_key",
            Self::GetBeacon => "get_beacon",
            Self::SetBeacon => "set_beacon",
            Self::StartAp => "start_ap",
            Self::StopAp => "stop_ap",
            Self::GetStation => "get_station",
            Self::SetStation => "set_station",
            Self::NewStation => "new_station",
            Self::DelStation => "del_station",
            Self::GetMpath => "get_mpath",
            Self::SetMpath => "set_mpath",
            Self::NewMpath => "new_mpath",
            Self::DelMpath => "del_mpath",
            Self::SetBss => "set_bss",
            Self::SetReg => "set_reg",
            Self::ReqSetReg => "reqset_reg",
            Self::GetMeshConfig => "get_mesh_config",
            Self::SetMeshConfig => "set_mesh_config",
            Self::SetMgmtExtraIe => "set_mgmt_extra_ie",
            Self::GetReg => "get_reg",
            Self::GetScan => "get_scan",
            Self::TriggerScan => "trigger_scan",
            Self::NewScanResults => "new_scan_results",
            Self::ScanAborted => "scan_aborted",
            Self::RegChange => "reg_change",
            Self::Authenticate => "authenticate",
            Self::Associate => "associate",
            Self::Deauthenticate => "deauthenticate",
            Self::Disassociate => "disassociate",
            Self::MichaelMicFailure => "michael_mic_failure",
            Self::RegBeaconHint => "reg_beacon_hint",
            Self::JoinIbss => "join_ibss",
            Self::LeaveIbss => "leave_ibss",
            Self::Testmode => "testmode",
            Self::Connect => "connect",
            Self::Roam => "roam",
            Self::Disconnect => "disconnect",
            Self::SetWiphyNetns => "set_wiphy_netns",
            Self::GetSurvey => "get_survey",
            Self::NewSurveyResults => "new_survey_results",
            Self::SetPmksa => "set_pmksa",
            Self::DelPmksa => "del_pmksa",
            Self::FlushPmksa => "flush_pmksa",
            Self::RemainOnChannel => "remain_on_channel",
            Self::CancelRemainOnChannel => "cancel_remain_on_channel",
            Self::SetTxBitrateMask => "set_tx_bitrate_mask",
            Self::RegisterFrame => "register_frame",
            Self::Frame => "frame",
            Self::FrameTxStatus => "frame_tx_status",
            Self::SetPowerSave => "set_power_save",
            Self::GetPowerSave => "get_power_save",
            Self::SetCqm => "set_cqm",
            Self::NotifyCqm => "notify_cqm",
            Self::SetChannel => "set_channel",
            Self::SetWdsPeer => "set_wds_peer",
            Self::FrameWaitCancel => "frame_wait_cancel",
            Self::JoinMesh => "join_mesh",
            Self::LeaveMesh => "leave_mesh",
        }
    }
}

/// Top-level nl80211 attributes used by this crate.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nl80211Attr {
    Unspec = 0,
    Wiphy = 1,
    WiphyName = 2,
    Ifindex = 3,
    Ifname = 4,
    Iftype = 5,
    Mac = 6,
    WiphyBands = 22,
    MntrFlags = 23,
    SupportedIftypes = 32,
    RegAlpha2 = 33,
    RegRules = 34,
    WiphyFreq = 38,
    WiphyChannelType = 39,
    MaxNumScanSsids = 43,
    ScanFrequencies = 44,
    ScanSsids = 45,
    Generation = 46,
    Bss = 47,
    SupportedCommands = 50,
    Ssid = 52,
    CipherSuites = 57,
    WiphyRetryShort = 61,
    WiphyRetryLong = 62,
    WiphyFragThreshold = 63,
    WiphyRtsThreshold = 64,
    WiphyCoverageClass = 89,
    WiphyTxPowerLevel = 98,
    SoftwareIftypes = 121,
    DfsRegion = 146,
    Wdev = 153,
    ChannelWidth = 159,
    CenterFreq1 = 160,
    CenterFreq2 = 161,
    SplitWiphyDump = 174,
}

/// Per-band attributes inside `WIPHY_BANDS`.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandAttr {
    Invalid = 0,
    Freqs = 1,
    Rates = 2,
    HtMcsSet = 3,
    HtCapa = 4,
    HtAmpduFactor = 5,
    HtAmpduDensity = 6,
    VhtMcsSet = 7,
    VhtCapa = 8,
}

/// Per-channel attributes inside `BAND_ATTR_FREQS`.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyAttr {
    Invalid = 0,
    Freq = 1,
    Disabled = 2,
    NoIr = 3,
    NoIbss = 4,
    Radar = 5,
    MaxTxPower = 6,
}

/// Per-rate attributes inside `BAND_ATTR_RATES`.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitrateAttr {
    Invalid = 0,
    Rate = 1,
    ShortPreamble2Ghz = 2,
}

/// Regulatory rule attributes inside `REG_RULES`.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegRuleAttr {
    Invalid = 0,
    Flags = 1,
    FreqRangeStart = 2,
    FreqRangeEnd = 3,
    FreqRangeMaxBw = 4,
    PowerRuleMaxAntGain = 5,
    PowerRuleMaxEirp = 6,
}

/// BSS attributes inside `NL80211_ATTR_BSS`.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BssAttr {
    Invalid = 0,
    Bssid = 1,
    Frequency = 2,
    Tsf = 3,
    BeaconInterval = 4,
    Capability = 5,
    InformationElements = 6,
    SignalMbm = 7,
    SignalUnspec = 8,
    Status = 9,
    SeenMsAgo = 10,
}

/// Band index of the 2.4 GHz band in `WIPHY_BANDS`.
pub const BAND_2GHZ: u16 = 0;
/// Band index of the 5 GHz band in `WIPHY_BANDS`.
pub const BAND_5GHZ: u16 = 1;
/// Band index of the 60 GHz band in `WIPHY_BANDS`.
pub const BAND_60GHZ: u16 = 2;
/// Band index of the 6 GHz band in `WIPHY_BANDS`.
pub const BAND_6GHZ: u16 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_table() {
        for (value, cmd) in Nl80211Cmd::ALL.iter().enumerate() {
            assert_eq!(*cmd as u8 as usize, value);
        }
        assert_eq!(Nl80211Cmd::from_u8(33), Some(Nl80211Cmd::TriggerScan));
        assert_eq!(Nl80211Cmd::from_u8(65).map(Nl80211Cmd::name), Some("set_channel"));
        assert_eq!(Nl80211Cmd::from_u8(200), None);
    }
}
