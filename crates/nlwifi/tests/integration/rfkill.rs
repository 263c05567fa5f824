//! Rfkill integration tests against `/dev/rfkill`.

use nlwifi::Result;
use nlwifi::rfkill::{Rfkill, RfkillType};

#[test]
fn test_list_is_sorted() -> Result<()> {
    require_root!();

    let rfkill = Rfkill::new();
    if !rfkill.path().exists() {
        eprintln!("Skipping test: no rfkill device");
        return Ok(());
    }

    let switches = rfkill.list()?;
    assert!(switches.windows(2).all(|w| w[0].index < w[1].index));

    Ok(())
}

#[test]
fn test_block_unblock_phy() -> Result<()> {
    require_root!();
    require_card!(_nl, card);

    let rfkill = Rfkill::new();
    let index = Rfkill::index_for_phy(card.phy())?;
    assert_eq!(rfkill.get(index)?.kind, RfkillType::Wlan);
    let was_blocked = rfkill.soft_blocked(index)?;

    rfkill.block(index)?;
    assert!(rfkill.soft_blocked(index)?);
    rfkill.unblock(index)?;
    assert!(!rfkill.soft_blocked(index)?);

    rfkill.set_blocked(index, was_blocked)?;
    Ok(())
}
