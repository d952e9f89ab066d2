//! Vendor trades: buying into and selling out of the inventory.

use emberfall_domain::{DomainError, ItemDef, ItemId, Player};

use crate::infrastructure::content::ContentCatalog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub item: String,
    pub quantity: u32,
    pub gold: u64,
}

fn stocked<'a>(catalog: &'a ContentCatalog, item: &str) -> Result<&'a ItemDef, DomainError> {
    catalog
        .item(&ItemId::new(item))
        .filter(|def| def.sold_by_vendor)
        .ok_or_else(|| DomainError::not_found("Vendor item", item))
}

/// Buys `quantity` of a stocked item. Nothing changes unless the gold is
/// there and every unit fits.
pub fn buy(
    player: &mut Player,
    catalog: &ContentCatalog,
    item: &str,
    quantity: u32,
) -> Result<Trade, DomainError> {
    let def = stocked(catalog, item)?;
    let cost = def
        .price
        .checked_mul(u64::from(quantity))
        .ok_or_else(|| DomainError::validation("quantity is too large"))?;
    if player.gold < cost {
        return Err(DomainError::insufficient_gold(cost, player.gold));
    }
    player.inventory.add(&def.id, quantity, def.max_stack)?;
    player.spend_gold(cost)?;
    Ok(Trade {
        item: def.name.clone(),
        quantity,
        gold: cost,
    })
}

/// Sells up to `quantity` from a 1-based inventory slot at half price.
pub fn sell(
    player: &mut Player,
    catalog: &ContentCatalog,
    slot: usize,
    quantity: u32,
) -> Result<Trade, DomainError> {
    let index = slot
        .checked_sub(1)
        .ok_or_else(|| DomainError::validation("slots start at 1"))?;
    let item_id = player
        .inventory
        .slots()
        .get(index)
        .map(|s| s.item_id.clone())
        .ok_or_else(|| DomainError::not_found("Inventory slot", slot.to_string()))?;
    let def = catalog
        .item(&item_id)
        .ok_or_else(|| DomainError::not_found("Item", item_id.as_str()))?;
    let sold = player.inventory.take_from_slot(index, quantity)?;
    let gold = def.sell_price() * u64::from(sold.quantity);
    player.earn_gold(gold);
    Ok(Trade {
        item: def.name.clone(),
        quantity: sold.quantity,
        gold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberfall_domain::{CharacterClass, PlayerId, PlayerName, Vec3};

    fn shopper(gold: u64) -> Player {
        Player::new(
            PlayerId::new(),
            PlayerName::new("Brom").unwrap(),
            CharacterClass::Warrior,
            Vec3::ZERO,
        )
        .with_gold(gold)
    }

    #[test]
    fn buy_charges_price_times_quantity() {
        let catalog = ContentCatalog::builtin();
        let mut player = shopper(100);
        let trade = buy(&mut player, &catalog, "health_potion", 3).unwrap();
        assert_eq!(trade.gold, 30);
        assert_eq!(player.gold, 70);
        assert_eq!(player.inventory.count(&ItemId::new("health_potion")), 3);
    }

    #[test]
    fn failed_purchases_change_nothing() {
        let catalog = ContentCatalog::builtin();
        let mut poor = shopper(5);
        assert_eq!(
            buy(&mut poor, &catalog, "health_potion", 1),
            Err(DomainError::insufficient_gold(10, 5))
        );
        assert!(poor.inventory.is_empty());

        let mut rich = shopper(10_000);
        for _ in 0..20 {
            buy(&mut rich, &catalog, "iron_sword", 1).unwrap();
        }
        let gold = rich.gold;
        assert!(matches!(
            buy(&mut rich, &catalog, "iron_sword", 1),
            Err(DomainError::ContainerFull { .. })
        ));
        assert_eq!(rich.gold, gold);

        assert!(matches!(
            buy(&mut rich, &catalog, "wolf_pelt", 1),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn sell_pays_half_price_and_frees_the_slot() {
        let catalog = ContentCatalog::builtin();
        let mut player = shopper(0);
        player
            .inventory
            .add(&ItemId::new("wolf_pelt"), 3, 20)
            .unwrap();
        let trade = sell(&mut player, &catalog, 1, 5).unwrap();
        assert_eq!(trade.quantity, 3);
        assert_eq!(trade.gold, 12);
        assert_eq!(player.gold, 12);
        assert!(player.inventory.is_empty());
        assert!(sell(&mut player, &catalog, 1, 1).is_err());
    }
}
