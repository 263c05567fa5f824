//! nl80211 connection for wireless device configuration.

use std::collections::BTreeMap;

use super::types::{
    Bss, ChannelType, Interface, InterfaceMode, MonitorFlag, PhyInfo, RegDomain, RetryKind,
    RetryLimits, Standard, Threshold,
};
use super::{
    FRAG_THRESHOLD_MAX, FRAG_THRESHOLD_MIN, NL80211_GENL_NAME, NL80211_GENL_VERSION, Nl80211Attr,
    Nl80211Cmd, RTS_THRESHOLD_MAX,
};
use crate::error::{Error, Result};
use crate::netlink::attr::{Attribute, get};
use crate::netlink::card::Card;
use crate::netlink::connection::SocketConfig;
use crate::netlink::genl::{GenlConnection, GenlMessage};
use crate::netlink::socket::{NetlinkSocket, Transport};
use crate::util::ifname;

/// Connection for configuring wireless devices through nl80211.
///
/// Wraps a [`GenlConnection`] and resolves the nl80211 family once at
/// construction. Each operation picks the key (interface index, phy index
/// or none) the kernel's handler for that command expects, so callers only
/// ever pass a [`Card`].
pub struct Nl80211Connection<T: Transport = NetlinkSocket> {
    genl: GenlConnection<T>,
    family_id: u16,
}

impl Nl80211Connection<NetlinkSocket> {
    /// Open a persistent connection with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(SocketConfig::default())
    }

    /// Open a connection with the given socket settings.
    pub fn with_config(config: SocketConfig) -> Result<Self> {
        Self::from_genl(GenlConnection::new(config)?)
    }
}

impl<T: Transport> Nl80211Connection<T> {
    /// Create an nl80211 connection from an existing GENL connection.
    ///
    /// Fails with [`Error::FamilyNotFound`] when cfg80211 is not loaded.
    pub fn from_genl(mut genl: GenlConnection<T>) -> Result<Self> {
        let family_id = genl.family_id(NL80211_GENL_NAME)?;
        Ok(Self { genl, family_id })
    }

    /// Get the underlying GENL connection.
    pub fn genl(&mut self) -> &mut GenlConnection<T> {
        &mut self.genl
    }

    /// Resolved nl80211 family ID.
    pub fn family_id(&self) -> u16 {
        self.family_id
    }

    fn command(&mut self, cmd: Nl80211Cmd, attrs: &[Attribute]) -> Result<Vec<GenlMessage>> {
        self.genl
            .command(self.family_id, cmd as u8, NL80211_GENL_VERSION, attrs)
    }

    fn command_ack(&mut self, cmd: Nl80211Cmd, attrs: &[Attribute]) -> Result<()> {
        self.genl
            .command_ack(self.family_id, cmd as u8, NL80211_GENL_VERSION, attrs)
    }

    fn dump(&mut self, cmd: Nl80211Cmd, attrs: &[Attribute]) -> Result<Vec<GenlMessage>> {
        self.genl
            .dump_command(self.family_id, cmd as u8, NL80211_GENL_VERSION, attrs)
    }

    // ---- interfaces ----

    /// List every wireless interface, ordered by ifindex.
    pub fn interfaces(&mut self) -> Result<Vec<Interface>> {
        let messages = self
            .dump(Nl80211Cmd::GetInterface, &[])
            .map_err(|e| e.with_context("list wireless interfaces"))?;

        let mut interfaces = Vec::with_capacity(messages.len());
        for msg in &messages {
            if let Some(iface) = Interface::from_message(msg)? {
                interfaces.push(iface);
            }
        }
        interfaces.sort_by_key(|iface| iface.ifindex);
        Ok(interfaces)
    }

    /// Get one interface by index.
    pub fn interface(&mut self, ifindex: u32) -> Result<Interface> {
        let not_found = || Error::InterfaceNotFound {
            name: format!("ifindex:{ifindex}"),
        };

        let messages = self
            .command(
                Nl80211Cmd::GetInterface,
                &[Attribute::u32(Nl80211Attr::Ifindex as u16, ifindex)],
            )
            .map_err(|e| match e.errno() {
                Some(libc::ENODEV) => not_found(),
                _ => e.with_context(format!("get interface {ifindex}")),
            })?;

        for msg in &messages {
            if let Some(iface) = Interface::from_message(msg)? {
                return Ok(iface);
            }
        }
        Err(not_found())
    }

    /// Every wireless interface as a [`Card`].
    pub fn cards(&mut self) -> Result<Vec<Card>> {
        Ok(self.interfaces()?.iter().map(Card::from).collect())
    }

    /// Change the operating mode of an interface.
    ///
    /// Most drivers require the interface to be down.
    pub fn set_mode(&mut self, card: &Card, mode: InterfaceMode) -> Result<()> {
        tracing::debug!(card = %card, %mode, "set interface mode");
        self.command_ack(
            Nl80211Cmd::SetInterface,
            &[
                Attribute::u32(Nl80211Attr::Ifindex as u16, card.ifindex()),
                Attribute::u32(Nl80211Attr::Iftype as u16, mode.as_u32()),
            ],
        )
        .map_err(|e| e.with_context(format!("set interface mode on {}", card.dev())))
    }

    /// Create a virtual interface on the card's phy.
    ///
    /// `flags` only applies to monitor interfaces. Returns the new interface.
    pub fn add_interface(
        &mut self,
        card: &Card,
        name: &str,
        mode: InterfaceMode,
        flags: &[MonitorFlag],
    ) -> Result<Card> {
        ifname::validate(name)?;

        let mut attrs = vec![
            Attribute::u32(Nl80211Attr::Wiphy as u16, card.phy()),
            Attribute::string(Nl80211Attr::Ifname as u16, name),
            Attribute::u32(Nl80211Attr::Iftype as u16, mode.as_u32()),
        ];
        if mode == InterfaceMode::Monitor && !flags.is_empty() {
            attrs.push(Attribute::nested(
                Nl80211Attr::MntrFlags as u16,
                flags.iter().map(|f| Attribute::flag(*f as u16)).collect(),
            ));
        }

        tracing::debug!(phy = card.phy(), name, %mode, "add interface");
        let messages = self
            .command(Nl80211Cmd::NewInterface, &attrs)
            .map_err(|e| e.with_context(format!("add interface {name} on phy{}", card.phy())))?;

        for msg in &messages {
            if let Some(iface) = Interface::from_message(msg)? {
                return Ok(Card::from(&iface));
            }
        }

        // Older kernels acknowledge without echoing the new interface.
        Card::by_name(self, name)
    }

    /// Delete a virtual interface.
    pub fn delete_interface(&mut self, card: &Card) -> Result<()> {
        tracing::debug!(card = %card, "delete interface");
        self.command_ack(
            Nl80211Cmd::DelInterface,
            &[Attribute::u32(Nl80211Attr::Ifindex as u16, card.ifindex())],
        )
        .map_err(|e| e.with_context(format!("delete interface {}", card.dev())))
    }

    // ---- phys ----

    /// Capabilities of every phy, ordered by phy index.
    pub fn phys(&mut self) -> Result<Vec<PhyInfo>> {
        let messages = self
            .dump(
                Nl80211Cmd::GetWiphy,
                &[Attribute::flag(Nl80211Attr::SplitWiphyDump as u16)],
            )
            .map_err(|e| e.with_context("list phys"))?;

        Ok(merge_phys(&messages)?.into_values().collect())
    }

    /// Capabilities of one phy.
    pub fn phy_info(&mut self, phy: u32) -> Result<PhyInfo> {
        let messages = self
            .dump(
                Nl80211Cmd::GetWiphy,
                &[
                    Attribute::u32(Nl80211Attr::Wiphy as u16, phy),
                    Attribute::flag(Nl80211Attr::SplitWiphyDump as u16),
                ],
            )
            .map_err(|e| match e.errno() {
                Some(libc::ENODEV) | Some(libc::ENOENT) => Error::PhyNotFound { phy },
                _ => e.with_context(format!("get phy{phy}")),
            })?;

        merge_phys(&messages)?
            .remove(&phy)
            .ok_or(Error::PhyNotFound { phy })
    }

    /// Tune the card to `freq` MHz.
    pub fn set_channel(&mut self, card: &Card, freq: u32, channel_type: ChannelType) -> Result<()> {
        tracing::debug!(card = %card, freq, %channel_type, "set channel");
        self.command_ack(
            Nl80211Cmd::SetWiphy,
            &[
                Attribute::u32(Nl80211Attr::Ifindex as u16, card.ifindex()),
                Attribute::u32(Nl80211Attr::WiphyFreq as u16, freq),
                Attribute::u32(Nl80211Attr::WiphyChannelType as u16, channel_type as u32),
            ],
        )
        .map_err(|e| e.with_context(format!("set channel {freq} on {}", card.dev())))
    }

    fn set_wiphy(&mut self, card: &Card, what: &str, attr: Attribute) -> Result<()> {
        tracing::debug!(phy = card.phy(), what, "set wiphy parameter");
        self.command_ack(
            Nl80211Cmd::SetWiphy,
            &[Attribute::u32(Nl80211Attr::Wiphy as u16, card.phy()), attr],
        )
        .map_err(|e| e.with_context(format!("set {what} on phy{}", card.phy())))
    }

    /// Coverage class (air propagation time, 3 us per step).
    pub fn coverage_class(&mut self, card: &Card) -> Result<u8> {
        self.phy_info(card.phy())?
            .coverage_class
            .ok_or_else(|| unreported(card, "coverage class"))
    }

    pub fn set_coverage_class(&mut self, card: &Card, class: u8) -> Result<()> {
        self.set_wiphy(
            card,
            "coverage class",
            Attribute::u8(Nl80211Attr::WiphyCoverageClass as u16, class),
        )
    }

    /// RTS threshold.
    pub fn rts_threshold(&mut self, card: &Card) -> Result<Threshold> {
        self.phy_info(card.phy())?
            .rts_threshold
            .ok_or_else(|| unreported(card, "RTS threshold"))
    }

    /// Set the RTS threshold; values above 2347 are rejected.
    pub fn set_rts_threshold(&mut self, card: &Card, threshold: Threshold) -> Result<()> {
        if let Threshold::Value(value) = threshold
            && value > RTS_THRESHOLD_MAX
        {
            return Err(Error::InvalidArgument(format!(
                "RTS threshold {value} exceeds {RTS_THRESHOLD_MAX}"
            )));
        }
        self.set_wiphy(
            card,
            "RTS threshold",
            Attribute::u32(Nl80211Attr::WiphyRtsThreshold as u16, threshold.to_kernel()),
        )
    }

    /// Fragmentation threshold.
    pub fn frag_threshold(&mut self, card: &Card) -> Result<Threshold> {
        self.phy_info(card.phy())?
            .frag_threshold
            .ok_or_else(|| unreported(card, "fragmentation threshold"))
    }

    /// Set the fragmentation threshold; values must be even and in 256..=2346.
    pub fn set_frag_threshold(&mut self, card: &Card, threshold: Threshold) -> Result<()> {
        if let Threshold::Value(value) = threshold
            && (!(FRAG_THRESHOLD_MIN..=FRAG_THRESHOLD_MAX).contains(&value) || value % 2 != 0)
        {
            return Err(Error::InvalidArgument(format!(
                "fragmentation threshold {value} must be even and within \
                 {FRAG_THRESHOLD_MIN}..={FRAG_THRESHOLD_MAX}"
            )));
        }
        self.set_wiphy(
            card,
            "fragmentation threshold",
            Attribute::u32(Nl80211Attr::WiphyFragThreshold as u16, threshold.to_kernel()),
        )
    }

    /// Short and long retry limits.
    pub fn retry_limits(&mut self, card: &Card) -> Result<RetryLimits> {
        self.phy_info(card.phy())?
            .retry_limits()
            .ok_or_else(|| unreported(card, "retry limits"))
    }

    /// Set one retry limit; zero is rejected.
    pub fn set_retry_limit(&mut self, card: &Card, kind: RetryKind, limit: u8) -> Result<()> {
        if limit == 0 {
            return Err(Error::InvalidArgument(
                "retry limit must be within 1..=255".into(),
            ));
        }
        let (what, attr) = match kind {
            RetryKind::Short => ("short retry limit", Nl80211Attr::WiphyRetryShort),
            RetryKind::Long => ("long retry limit", Nl80211Attr::WiphyRetryLong),
        };
        self.set_wiphy(card, what, Attribute::u8(attr as u16, limit))
    }

    /// Names of the nl80211 commands the card's driver implements.
    pub fn supported_commands(&mut self, card: &Card) -> Result<Vec<String>> {
        Ok(self.phy_info(card.phy())?.command_names())
    }

    /// Interface modes the card's phy supports.
    pub fn supported_modes(&mut self, card: &Card) -> Result<Vec<InterfaceMode>> {
        Ok(self.phy_info(card.phy())?.modes)
    }

    /// 802.11 standards the card's phy supports.
    pub fn supported_standards(&mut self, card: &Card) -> Result<Vec<Standard>> {
        Ok(self.phy_info(card.phy())?.standards())
    }

    // ---- scanning ----

    /// Start a scan on the card.
    ///
    /// Each entry of `ssids` is probed for; an empty slice sends a single
    /// wildcard probe. Results are fetched with [`scan_results`](Self::scan_results)
    /// once the scan completes.
    pub fn trigger_scan(&mut self, card: &Card, ssids: &[&[u8]]) -> Result<()> {
        let probes: Vec<Attribute> = if ssids.is_empty() {
            vec![Attribute::bytes(1, Vec::new())]
        } else {
            ssids
                .iter()
                .enumerate()
                .map(|(i, ssid)| Attribute::bytes(i as u16 + 1, ssid.to_vec()))
                .collect()
        };

        tracing::debug!(card = %card, probes = probes.len(), "trigger scan");
        self.command_ack(
            Nl80211Cmd::TriggerScan,
            &[
                Attribute::u32(Nl80211Attr::Ifindex as u16, card.ifindex()),
                Attribute::nested(Nl80211Attr::ScanSsids as u16, probes),
            ],
        )
        .map_err(|e| e.with_context(format!("trigger scan on {}", card.dev())))
    }

    /// BSSs currently held in the kernel's scan cache for the card.
    pub fn scan_results(&mut self, card: &Card) -> Result<Vec<Bss>> {
        let messages = self
            .dump(
                Nl80211Cmd::GetScan,
                &[Attribute::u32(Nl80211Attr::Ifindex as u16, card.ifindex())],
            )
            .map_err(|e| e.with_context(format!("get scan results on {}", card.dev())))?;

        let mut results = Vec::with_capacity(messages.len());
        for msg in &messages {
            if let Some(bss) = Bss::from_message(msg)? {
                results.push(bss);
            }
        }
        Ok(results)
    }

    // ---- regulatory ----

    /// Current global regulatory domain.
    pub fn regulatory_domain(&mut self) -> Result<RegDomain> {
        let messages = self
            .command(Nl80211Cmd::GetReg, &[])
            .map_err(|e| e.with_context("get regulatory domain"))?;

        let msg = messages
            .first()
            .ok_or_else(|| Error::InvalidMessage("empty regulatory domain reply".into()))?;
        RegDomain::from_message(msg)
    }

    /// Ask the kernel to apply the regulatory domain of `alpha2`.
    ///
    /// `alpha2` is an ISO 3166 country code or `00` for the world domain.
    pub fn set_regulatory_domain(&mut self, alpha2: &str) -> Result<()> {
        let valid = alpha2.len() == 2
            && (alpha2 == "00" || alpha2.bytes().all(|b| b.is_ascii_alphabetic()));
        if !valid {
            return Err(Error::InvalidArgument(format!(
                "invalid regulatory domain: {alpha2:?}"
            )));
        }
        let alpha2 = alpha2.to_ascii_uppercase();

        tracing::debug!(alpha2 = %alpha2, "request regulatory domain");
        self.command_ack(
            Nl80211Cmd::ReqSetReg,
            &[Attribute::string(Nl80211Attr::RegAlpha2 as u16, &alpha2)],
        )
        .map_err(|e| e.with_context(format!("set regulatory domain {alpha2}")))
    }
}

/// Fold a split `GET_WIPHY` dump into one record per phy.
fn merge_phys(messages: &[GenlMessage]) -> Result<BTreeMap<u32, PhyInfo>> {
    let mut phys = BTreeMap::new();
    for msg in messages {
        let Some(payload) = msg.attr(Nl80211Attr::Wiphy as u16)? else {
            continue;
        };
        let phy = get::u32_ne(payload)?;
        phys.entry(phy)
            .or_insert_with(|| PhyInfo {
                phy,
                ..PhyInfo::default()
            })
            .merge(msg)?;
    }
    Ok(phys)
}

fn unreported(card: &Card, what: &str) -> Error {
    Error::NotSupported(format!("phy{} does not report its {what}", card.phy()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::netlink::attr;
    use crate::netlink::connection::Connection;
    use crate::netlink::fixtures::{self, MockKernel, MockTransport, NL80211_ID};
    use crate::netlink::genl::FamilyCache;
    use crate::netlink::genl::nl80211::{BAND_2GHZ, BandAttr, BitrateAttr};

    fn connect(kernel: &MockKernel) -> Nl80211Connection<MockTransport> {
        let conn = Connection::with_opener(SocketConfig::default(), kernel.opener()).unwrap();
        let genl = GenlConnection::from_connection(conn, Arc::new(FamilyCache::new()));
        Nl80211Connection::from_genl(genl).unwrap()
    }

    fn iface_attrs(ifindex: u32, name: &str, phy: u32) -> Vec<Attribute> {
        vec![
            Attribute::u32(Nl80211Attr::Ifindex as u16, ifindex),
            Attribute::string(Nl80211Attr::Ifname as u16, name),
            Attribute::u32(Nl80211Attr::Wiphy as u16, phy),
            Attribute::u32(Nl80211Attr::Iftype as u16, 2),
        ]
    }

    fn ack_kernel() -> MockKernel {
        fixtures::nl80211_kernel(|msg| vec![fixtures::ack(msg.seq)])
    }

    fn last_request(kernel: &MockKernel) -> GenlMessage {
        kernel.requests().pop().unwrap()
    }

    fn attr_u32(msg: &GenlMessage, kind: Nl80211Attr) -> Option<u32> {
        msg.attr(kind as u16)
            .unwrap()
            .map(|p| get::u32_ne(p).unwrap())
    }

    #[test]
    fn test_family_resolved_once() {
        let kernel = ack_kernel();
        let mut nl = connect(&kernel);
        assert_eq!(nl.family_id(), NL80211_ID);

        let card = Card::new("wlan0", 0, 3);
        nl.set_mode(&card, InterfaceMode::Monitor).unwrap();
        nl.delete_interface(&card).unwrap();

        let requests = kernel.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[1..].iter().all(|r| r.family == NL80211_ID));
    }

    #[test]
    fn test_interfaces_dump() {
        let kernel = fixtures::nl80211_kernel(|msg| {
            let cmd = Nl80211Cmd::NewInterface as u8;
            vec![
                fixtures::datagram(&[
                    fixtures::multi(NL80211_ID, cmd, msg.seq, &iface_attrs(4, "wlan1", 1)),
                    fixtures::multi(NL80211_ID, cmd, msg.seq, &iface_attrs(3, "wlan0", 0)),
                ]),
                fixtures::datagram(&[
                    // P2P device without a netdev
                    fixtures::multi(
                        NL80211_ID,
                        cmd,
                        msg.seq,
                        &[Attribute::u32(Nl80211Attr::Wiphy as u16, 1)],
                    ),
                    fixtures::done(msg.seq),
                ]),
            ]
        });
        let mut nl = connect(&kernel);

        let interfaces = nl.interfaces().unwrap();
        let names: Vec<_> = interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["wlan0", "wlan1"]);
        assert_eq!(interfaces[1].phy, 1);

        let request = last_request(&kernel);
        assert_eq!(request.cmd, Nl80211Cmd::GetInterface as u8);
        assert_eq!(request.attrs().unwrap().len(), 0);
    }

    #[test]
    fn test_interfaces_dump_with_overrunning_attribute() {
        let kernel = fixtures::nl80211_kernel(|msg| {
            let cmd = Nl80211Cmd::NewInterface as u8;
            // Ifindex header claims 255 bytes, only 8 follow.
            let mut broken = fixtures::genl_payload(cmd, &[]);
            broken.extend_from_slice(&255u16.to_ne_bytes());
            broken.extend_from_slice(&(Nl80211Attr::Ifindex as u16).to_ne_bytes());
            broken.extend_from_slice(&4u32.to_ne_bytes());
            vec![fixtures::datagram(&[
                fixtures::multi(NL80211_ID, cmd, msg.seq, &iface_attrs(3, "wlan0", 0)),
                fixtures::message(
                    NL80211_ID,
                    crate::netlink::message::NLM_F_MULTI,
                    msg.seq,
                    &broken,
                ),
                fixtures::done(msg.seq),
            ])]
        });
        let mut nl = connect(&kernel);

        let err = nl.interfaces().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Format);
        assert!(matches!(
            err,
            Error::Truncated {
                expected: 255,
                actual: 8
            }
        ));
    }

    #[test]
    fn test_interface_by_index() {
        let kernel = fixtures::nl80211_kernel(|msg| match attr_u32(msg, Nl80211Attr::Ifindex) {
            Some(3) => vec![
                fixtures::genl_reply(
                    NL80211_ID,
                    Nl80211Cmd::NewInterface as u8,
                    0,
                    msg.seq,
                    &iface_attrs(3, "wlan0", 0),
                ),
                fixtures::ack(msg.seq),
            ],
            _ => vec![fixtures::error(msg.seq, -libc::ENODEV)],
        });
        let mut nl = connect(&kernel);

        assert_eq!(nl.interface(3).unwrap().name, "wlan0");
        let err = nl.interface(9).unwrap_err();
        assert!(matches!(err, Error::InterfaceNotFound { ref name } if name == "ifindex:9"));
    }

    #[test]
    fn test_set_mode_keyed_by_ifindex() {
        let kernel = ack_kernel();
        let mut nl = connect(&kernel);

        nl.set_mode(&Card::new("wlan0", 0, 3), InterfaceMode::Monitor)
            .unwrap();

        let request = last_request(&kernel);
        assert_eq!(request.cmd, Nl80211Cmd::SetInterface as u8);
        assert_eq!(attr_u32(&request, Nl80211Attr::Ifindex), Some(3));
        assert_eq!(attr_u32(&request, Nl80211Attr::Iftype), Some(6));
        assert_eq!(attr_u32(&request, Nl80211Attr::Wiphy), None);
    }

    #[test]
    fn test_kernel_error_has_context() {
        let kernel = fixtures::nl80211_kernel(|msg| vec![fixtures::error(msg.seq, -libc::EBUSY)]);
        let mut nl = connect(&kernel);

        let err = nl
            .set_mode(&Card::new("wlan0", 0, 3), InterfaceMode::Ap)
            .unwrap_err();
        assert!(err.is_busy());
        assert!(err.to_string().contains("set interface mode on wlan0"));
    }

    #[test]
    fn test_add_monitor_interface() {
        let kernel = fixtures::nl80211_kernel(|msg| {
            let mut attrs = iface_attrs(7, "mon0", 0);
            attrs[3] = Attribute::u32(Nl80211Attr::Iftype as u16, 6);
            vec![
                fixtures::genl_reply(
                    NL80211_ID,
                    Nl80211Cmd::NewInterface as u8,
                    0,
                    msg.seq,
                    &attrs,
                ),
                fixtures::ack(msg.seq),
            ]
        });
        let mut nl = connect(&kernel);

        let card = nl
            .add_interface(
                &Card::new("wlan0", 0, 3),
                "mon0",
                InterfaceMode::Monitor,
                &[MonitorFlag::Control, MonitorFlag::OtherBss],
            )
            .unwrap();
        assert_eq!(card, Card::new("mon0", 0, 7));

        let request = last_request(&kernel);
        assert_eq!(request.cmd, Nl80211Cmd::NewInterface as u8);
        assert_eq!(attr_u32(&request, Nl80211Attr::Wiphy), Some(0));
        assert_eq!(attr_u32(&request, Nl80211Attr::Ifindex), None);
        let flags = request.attr(Nl80211Attr::MntrFlags as u16).unwrap().unwrap();
        let flags: Vec<u16> = attr::decode(flags).unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(flags, [3, 4]);
    }

    #[test]
    fn test_add_interface_rejects_bad_name() {
        let kernel = ack_kernel();
        let mut nl = connect(&kernel);
        let err = nl
            .add_interface(
                &Card::new("wlan0", 0, 3),
                "name/with/slash",
                InterfaceMode::Station,
                &[],
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(kernel.requests().len(), 1);
    }

    fn phy_kernel() -> MockKernel {
        fixtures::nl80211_kernel(|msg| {
            let cmd = Nl80211Cmd::NewWiphy as u8;
            let seq = msg.seq;
            let phy0 = |extra: Vec<Attribute>| {
                let mut attrs = vec![Attribute::u32(Nl80211Attr::Wiphy as u16, 0)];
                attrs.extend(extra);
                fixtures::multi(NL80211_ID, cmd, seq, &attrs)
            };
            let mut replies = vec![
                phy0(vec![
                    Attribute::string(Nl80211Attr::WiphyName as u16, "phy0"),
                    Attribute::u8(Nl80211Attr::WiphyRetryShort as u16, 7),
                    Attribute::u8(Nl80211Attr::WiphyRetryLong as u16, 4),
                    Attribute::u32(Nl80211Attr::WiphyRtsThreshold as u16, u32::MAX),
                    Attribute::u8(Nl80211Attr::WiphyCoverageClass as u16, 2),
                ]),
                phy0(vec![Attribute::nested(
                    Nl80211Attr::WiphyBands as u16,
                    vec![Attribute::nested(
                        BAND_2GHZ,
                        vec![Attribute::nested(
                            BandAttr::Rates as u16,
                            vec![Attribute::nested(
                                0,
                                vec![Attribute::u32(BitrateAttr::Rate as u16, 540)],
                            )],
                        )],
                    )],
                )]),
                phy0(vec![Attribute::nested(
                    Nl80211Attr::SupportedCommands as u16,
                    vec![Attribute::u32(1, Nl80211Cmd::GetWiphy as u32)],
                )]),
            ];
            if attr_u32(msg, Nl80211Attr::Wiphy).is_none() {
                replies.push(fixtures::multi(
                    NL80211_ID,
                    cmd,
                    seq,
                    &[
                        Attribute::u32(Nl80211Attr::Wiphy as u16, 1),
                        Attribute::string(Nl80211Attr::WiphyName as u16, "phy1"),
                    ],
                ));
            }
            replies.push(fixtures::done(seq));
            vec![fixtures::datagram(&replies)]
        })
    }

    #[test]
    fn test_phys_merged_per_phy() {
        let kernel = phy_kernel();
        let mut nl = connect(&kernel);

        let phys = nl.phys().unwrap();
        assert_eq!(phys.len(), 2);
        assert_eq!(phys[0].name, "phy0");
        assert_eq!(phys[0].retry_limits(), Some(RetryLimits { short: 7, long: 4 }));
        assert_eq!(phys[0].standards(), vec![Standard::B, Standard::G]);
        assert_eq!(phys[1].name, "phy1");

        let request = last_request(&kernel);
        assert_eq!(request.cmd, Nl80211Cmd::GetWiphy as u8);
        assert!(
            request
                .attr(Nl80211Attr::SplitWiphyDump as u16)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn test_phy_getters() {
        let kernel = phy_kernel();
        let mut nl = connect(&kernel);
        let card = Card::new("wlan0", 0, 3);

        assert_eq!(nl.rts_threshold(&card).unwrap(), Threshold::Off);
        assert_eq!(nl.coverage_class(&card).unwrap(), 2);
        assert_eq!(nl.retry_limits(&card).unwrap().long, 4);
        assert_eq!(nl.supported_commands(&card).unwrap(), ["get_wiphy"]);
        assert!(matches!(
            nl.frag_threshold(&card),
            Err(Error::NotSupported(_))
        ));

        let request = last_request(&kernel);
        assert_eq!(attr_u32(&request, Nl80211Attr::Wiphy), Some(0));
        assert_eq!(attr_u32(&request, Nl80211Attr::Ifindex), None);
    }

    #[test]
    fn test_missing_phy() {
        let kernel = fixtures::nl80211_kernel(|msg| vec![fixtures::done(msg.seq)]);
        let mut nl = connect(&kernel);
        assert!(matches!(nl.phy_info(5), Err(Error::PhyNotFound { phy: 5 })));
    }

    #[test]
    fn test_wiphy_setters_keyed_by_phy() {
        let kernel = ack_kernel();
        let mut nl = connect(&kernel);
        let card = Card::new("wlan1", 1, 4);

        nl.set_rts_threshold(&card, Threshold::Value(500)).unwrap();
        let request = last_request(&kernel);
        assert_eq!(request.cmd, Nl80211Cmd::SetWiphy as u8);
        assert_eq!(attr_u32(&request, Nl80211Attr::Wiphy), Some(1));
        assert_eq!(attr_u32(&request, Nl80211Attr::WiphyRtsThreshold), Some(500));

        nl.set_frag_threshold(&card, Threshold::Off).unwrap();
        assert_eq!(
            attr_u32(&last_request(&kernel), Nl80211Attr::WiphyFragThreshold),
            Some(u32::MAX)
        );

        nl.set_retry_limit(&card, RetryKind::Long, 10).unwrap();
        let limit = last_request(&kernel)
            .attr(Nl80211Attr::WiphyRetryLong as u16)
            .unwrap()
            .map(|p| get::u8(p).unwrap())
            .unwrap();
        assert_eq!(limit, 10);

        nl.set_coverage_class(&card, 3).unwrap();
        assert_eq!(kernel.requests().len(), 5);
    }

    #[test]
    fn test_setter_validation() {
        let kernel = ack_kernel();
        let mut nl = connect(&kernel);
        let card = Card::new("wlan0", 0, 3);

        for bad in [
            nl.set_rts_threshold(&card, Threshold::Value(2348)),
            nl.set_frag_threshold(&card, Threshold::Value(255)),
            nl.set_frag_threshold(&card, Threshold::Value(2347)),
            nl.set_frag_threshold(&card, Threshold::Value(1001)),
            nl.set_retry_limit(&card, RetryKind::Short, 0),
            nl.set_regulatory_domain("USA"),
            nl.set_regulatory_domain("1x"),
        ] {
            assert!(matches!(bad, Err(Error::InvalidArgument(_))));
        }
        // Only the family lookup reached the kernel.
        assert_eq!(kernel.requests().len(), 1);

        nl.set_frag_threshold(&card, Threshold::Value(256)).unwrap();
        nl.set_rts_threshold(&card, Threshold::Value(0)).unwrap();
    }

    #[test]
    fn test_set_channel_keyed_by_ifindex() {
        let kernel = ack_kernel();
        let mut nl = connect(&kernel);

        nl.set_channel(&Card::new("wlan0", 0, 3), 5180, ChannelType::Ht40Plus)
            .unwrap();

        let request = last_request(&kernel);
        assert_eq!(request.cmd, Nl80211Cmd::SetWiphy as u8);
        assert_eq!(attr_u32(&request, Nl80211Attr::Ifindex), Some(3));
        assert_eq!(attr_u32(&request, Nl80211Attr::Wiphy), None);
        assert_eq!(attr_u32(&request, Nl80211Attr::WiphyFreq), Some(5180));
        assert_eq!(attr_u32(&request, Nl80211Attr::WiphyChannelType), Some(3));
    }

    #[test]
    fn test_trigger_scan_ssids() {
        let kernel = ack_kernel();
        let mut nl = connect(&kernel);
        let card = Card::new("wlan0", 0, 3);

        nl.trigger_scan(&card, &[&b"lab"[..], &b"office"[..]])
            .unwrap();
        let request = last_request(&kernel);
        assert_eq!(request.cmd, Nl80211Cmd::TriggerScan as u8);
        assert_eq!(attr_u32(&request, Nl80211Attr::Ifindex), Some(3));
        let ssids = request.attr(Nl80211Attr::ScanSsids as u16).unwrap().unwrap();
        let ssids: Vec<(u16, Vec<u8>)> = attr::decode(ssids)
            .unwrap()
            .into_iter()
            .map(|(k, p)| (k, p.to_vec()))
            .collect();
        assert_eq!(ssids, [(1, b"lab".to_vec()), (2, b"office".to_vec())]);

        nl.trigger_scan(&card, &[]).unwrap();
        let request = last_request(&kernel);
        let ssids = request.attr(Nl80211Attr::ScanSsids as u16).unwrap().unwrap();
        let wildcard = attr::decode(ssids).unwrap();
        assert_eq!(wildcard, [(1, &[][..])]);
    }

    #[test]
    fn test_scan_results() {
        use crate::netlink::genl::nl80211::BssAttr;

        let kernel = fixtures::nl80211_kernel(|msg| {
            let bss = |last: u8, freq: u32| {
                fixtures::multi(
                    NL80211_ID,
                    Nl80211Cmd::NewScanResults as u8,
                    msg.seq,
                    &[
                        Attribute::u32(Nl80211Attr::Ifindex as u16, 3),
                        Attribute::nested(
                            Nl80211Attr::Bss as u16,
                            vec![
                                Attribute::bytes(BssAttr::Bssid as u16, vec![2, 0, 0, 0, 0, last]),
                                Attribute::u32(BssAttr::Frequency as u16, freq),
                            ],
                        ),
                    ],
                )
            };
            vec![fixtures::datagram(&[
                bss(1, 2412),
                bss(2, 5180),
                fixtures::done(msg.seq),
            ])]
        });
        let mut nl = connect(&kernel);

        let results = nl.scan_results(&Card::new("wlan0", 0, 3)).unwrap();
        let freqs: Vec<u32> = results.iter().map(|b| b.frequency).collect();
        assert_eq!(freqs, [2412, 5180]);
        assert_eq!(
            attr_u32(&last_request(&kernel), Nl80211Attr::Ifindex),
            Some(3)
        );
    }

    #[test]
    fn test_regulatory_domain() {
        let kernel = fixtures::nl80211_kernel(|msg| {
            if msg.cmd == Nl80211Cmd::GetReg as u8 {
                vec![
                    fixtures::genl_reply(
                        NL80211_ID,
                        Nl80211Cmd::GetReg as u8,
                        0,
                        msg.seq,
                        &[Attribute::string(Nl80211Attr::RegAlpha2 as u16, "DE")],
                    ),
                    fixtures::ack(msg.seq),
                ]
            } else {
                vec![fixtures::ack(msg.seq)]
            }
        });
        let mut nl = connect(&kernel);

        assert_eq!(nl.regulatory_domain().unwrap().alpha2, "DE");
        assert_eq!(last_request(&kernel).attrs().unwrap().len(), 0);

        nl.set_regulatory_domain("us").unwrap();
        let request = last_request(&kernel);
        assert_eq!(request.cmd, Nl80211Cmd::ReqSetReg as u8);
        let (_, alpha2) = request.attrs().unwrap()[0];
        assert_eq!(get::string(alpha2).unwrap(), "US");
    }
}
