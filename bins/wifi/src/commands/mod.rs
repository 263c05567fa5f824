//! wifi command implementations.

pub mod dev;
pub mod link;
pub mod phy;
pub mod reg;
pub mod rfkill;
pub mod scan;

use nlwifi::netlink::Card;
use nlwifi::netlink::genl::nl80211::Nl80211Connection;
use nlwifi::{Error, Result};

/// Resolve a card from an interface name, an ifindex or `phyN`.
pub(crate) fn resolve_card(nl: &mut Nl80211Connection, target: &str) -> Result<Card> {
    if let Some(phy) = parse_phy(target) {
        return Card::by_phy(nl, phy);
    }
    match target.parse::<u32>() {
        Ok(ifindex) => Card::by_ifindex(nl, ifindex),
        Err(_) => Card::by_name(nl, target),
    }
}

/// Parse `phyN` or a bare phy number.
pub(crate) fn parse_phy(s: &str) -> Option<u32> {
    s.strip_prefix("phy").and_then(|n| n.parse().ok())
}

pub(crate) fn parse_phy_arg(s: &str) -> Result<u32> {
    parse_phy(s)
        .or_else(|| s.parse().ok())
        .ok_or_else(|| Error::InvalidArgument(format!("invalid phy: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_phy() {
        assert_eq!(parse_phy("phy0"), Some(0));
        assert_eq!(parse_phy("phy12"), Some(12));
        assert_eq!(parse_phy("wlan0"), None);
        assert_eq!(parse_phy_arg("3").unwrap(), 3);
        assert!(parse_phy_arg("phyx").is_err());
    }
}
