use std::time::Duration;

use serde::Serialize;

use crate::{log, SessionRng};
use super::settings::SnakeSessionSettings;
use super::types::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ItemType {
    Food,
    BigFood,
    Bomb,
    Heart,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Item {
    pub position: Point,
    pub item_type: ItemType,
    /// Session-clock instant after which the item is swept.
    pub expires_at: Duration,
}

impl Item {
    pub fn is_expired(&self, now: Duration) -> bool {
        self.expires_at <= now
    }
}

/// The live item set, kept in spawn order. At most one item per cell: a
/// spawn that falls back onto an occupied item cell replaces that item.
#[derive(Clone, Debug, Default)]
pub struct ItemEconomy {
    items: Vec<Item>,
}

impl ItemEconomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_at(&self, point: Point) -> Option<&Item> {
        self.items.iter().find(|item| item.position == point)
    }

    /// Removes and returns the item at `point`, if any.
    pub fn take_at(&mut self, point: Point) -> Option<Item> {
        let index = self.items.iter().position(|item| item.position == point)?;
        Some(self.items.remove(index))
    }

    pub fn insert(&mut self, item: Item) {
        self.items.retain(|existing| existing.position != item.position);
        self.items.push(item);
    }

    /// Places a new item on a free cell. `is_blocked` covers the cells the
    /// economy does not know about (snake, walls); existing items are always
    /// avoided.
    pub fn spawn<F>(
        &mut self,
        item_type: ItemType,
        settings: &SnakeSessionSettings,
        rng: &mut SessionRng,
        now: Duration,
        is_blocked: F,
    ) -> Point
    where
        F: Fn(&Point) -> bool,
    {
        let position = settings.grid.find_free_position(rng, settings.spawn_attempts, |p| {
            is_blocked(p) || self.item_at(*p).is_some()
        });

        self.insert(Item {
            position,
            item_type,
            expires_at: now + settings.lifetime(item_type),
        });
        log!("{:?} spawned at ({}, {})", item_type, position.x, position.y);
        position
    }

    /// Spawns a food item when the board has no items at all.
    pub fn replenish<F>(
        &mut self,
        settings: &SnakeSessionSettings,
        rng: &mut SessionRng,
        now: Duration,
        is_blocked: F,
    ) -> Option<Point>
    where
        F: Fn(&Point) -> bool,
    {
        if !self.items.is_empty() {
            return None;
        }
        Some(self.spawn(ItemType::Food, settings, rng, now, is_blocked))
    }

    /// One roll per safe move. The outer roll gates the branch; inside it the
    /// odds are cumulative and whatever is left spawns nothing, so plain
    /// food never comes from here.
    pub fn roll_bonus(settings: &SnakeSessionSettings, rng: &mut SessionRng) -> Option<ItemType> {
        if rng.unit() >= settings.bonus_spawn_probability {
            return None;
        }

        let roll = rng.unit();
        let odds = &settings.bonus;
        if roll < odds.heart {
            Some(ItemType::Heart)
        } else if roll < odds.heart + odds.bomb {
            Some(ItemType::Bomb)
        } else if roll < odds.heart + odds.bomb + odds.big_food {
            Some(ItemType::BigFood)
        } else {
            None
        }
    }

    /// Drops every item whose lifetime has run out. Returns how many went.
    pub fn sweep_expired(&mut self, now: Duration) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.is_expired(now));
        before - self.items.len()
    }
}
