//! nl80211 integration tests.
//!
//! Read-only queries run against the first wireless card. Tests that
//! change state create their own monitor interface and remove it.

use nlwifi::netlink::Card;
use nlwifi::netlink::connection::SocketConfig;
use nlwifi::netlink::genl::nl80211::{InterfaceMode, MonitorFlag, Nl80211Connection};
use nlwifi::{Error, ErrorKind, Result};

#[test]
fn test_card_resolution_agrees() -> Result<()> {
    require_card!(nl, card);

    let by_name = Card::by_name(&mut nl, card.dev())?;
    let by_index = Card::by_ifindex(&mut nl, card.ifindex())?;
    assert_eq!(by_name, card);
    assert_eq!(by_index, card);
    assert_eq!(by_name.phy(), by_index.phy());
    assert_eq!(by_name.dev(), by_index.dev());

    Ok(())
}

#[test]
fn test_phy_info_matches_card() -> Result<()> {
    require_card!(nl, card);

    let phy = nl.phy_info(card.phy())?;
    assert_eq!(phy.phy, card.phy());
    assert_eq!(phy.name, format!("phy{}", card.phy()));
    assert!(!phy.bands.is_empty());
    assert!(phy.modes.contains(&InterfaceMode::Station));

    let commands = nl.supported_commands(&card)?;
    assert!(commands.iter().any(|c| c == "new_interface"));

    Ok(())
}

#[test]
fn test_regulatory_domain() -> Result<()> {
    require_card!(nl, _card);

    let reg = nl.regulatory_domain()?;
    assert_eq!(reg.alpha2.len(), 2);
    for rule in &reg.rules {
        assert!(rule.start_khz < rule.end_khz);
    }

    Ok(())
}

#[test]
fn test_monitor_interface_lifecycle() -> Result<()> {
    require_root!();
    require_card!(nl, card);

    let name = format!("nlwmon{}", std::process::id() % 10_000);
    let mon = nl.add_interface(&card, &name, InterfaceMode::Monitor, &[MonitorFlag::Control])?;
    assert_eq!(mon.dev(), name);
    assert_eq!(mon.phy(), card.phy());

    let iface = nl.interface(mon.ifindex())?;
    assert_eq!(iface.mode, InterfaceMode::Monitor);

    nl.set_mode(&mon, InterfaceMode::Station)?;
    assert_eq!(nl.interface(mon.ifindex())?.mode, InterfaceMode::Station);

    nl.delete_interface(&mon)?;
    let err = Card::by_name(&mut nl, &name).unwrap_err();
    assert!(err.is_not_found());

    Ok(())
}

#[test]
fn test_reply_larger_than_limit_fails() -> Result<()> {
    require_card!(nl, card);
    nl.phy_info(card.phy())?;

    // Both the controller reply and the wiphy dump exceed 64 bytes.
    let small = SocketConfig::new().max_reply_size(64);
    let err = Nl80211Connection::with_config(small)
        .and_then(|mut nl| nl.phys())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(matches!(err, Error::ReplyTooLarge { limit: 64, .. }));

    Ok(())
}
