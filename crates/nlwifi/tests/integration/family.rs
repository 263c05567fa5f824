//! Generic netlink family resolution tests.
//!
//! These need neither root nor wireless hardware.

use nlwifi::Result;
use nlwifi::netlink::SocketConfig;
use nlwifi::netlink::genl::GenlConnection;

#[test]
fn test_resolve_nlctrl() -> Result<()> {
    let mut conn = GenlConnection::new(SocketConfig::default())?;

    // The controller resolves itself at its fixed id.
    let family = conn.resolve("nlctrl")?;
    assert_eq!(family.name, "nlctrl");
    assert_eq!(family.id, 0x10);
    assert!(family.version >= 1);
    assert!(conn.cache().get("nlctrl").is_some());

    Ok(())
}

#[test]
fn test_unknown_family_not_cached() -> Result<()> {
    let mut conn = GenlConnection::new(SocketConfig::default())?;

    let err = conn.resolve("nlwifi_no_such").unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
    assert!(conn.cache().get("nlwifi_no_such").is_none());

    Ok(())
}
