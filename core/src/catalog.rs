//! Static building catalog shared by every system.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Footprint;

/// Every kind of building the island can host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    /// Basic guest villa, the first money-maker.
    Villa,
    /// Upgraded villa with more rooms.
    VillaPlus,
    /// Front desk where guests check in.
    Reception,
    /// Single road tile.
    Road,
    /// Diesel generator that powers nearby buildings.
    Generator,
    /// Utility building that keeps the resort supplied.
    WaterTower,
    /// Palm tree.
    Palm,
    /// Decorative flower bed.
    FlowerBed,
    /// Decorative lantern post.
    Lantern,
    /// Swimming pool.
    Pool,
    /// Seasonal themed pool.
    PoolHalloween,
    /// Late-night bar.
    #[serde(rename = "nightbar")]
    NightBar,
    /// Beach club on the shoreline.
    #[serde(rename = "beachclub")]
    BeachClub,
    /// DJ booth on the beach.
    BeachDj,
    /// Spa retreat.
    Spa,
    /// Ice cream parlour.
    #[serde(rename = "icecream_parlour")]
    IceCreamParlour,
    /// Burger shop.
    #[serde(rename = "burgershop")]
    BurgerShop,
}

impl BuildingKind {
    /// All building kinds in catalog order.
    pub const ALL: [BuildingKind; 17] = [
        BuildingKind::Villa,
        BuildingKind::VillaPlus,
        BuildingKind::Reception,
        BuildingKind::Road,
        BuildingKind::Generator,
        BuildingKind::WaterTower,
        BuildingKind::Palm,
        BuildingKind::FlowerBed,
        BuildingKind::Lantern,
        BuildingKind::Pool,
        BuildingKind::PoolHalloween,
        BuildingKind::NightBar,
        BuildingKind::BeachClub,
        BuildingKind::BeachDj,
        BuildingKind::Spa,
        BuildingKind::IceCreamParlour,
        BuildingKind::BurgerShop,
    ];

    /// Stable textual identifier of the kind.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Villa => "villa",
            Self::VillaPlus => "villa_plus",
            Self::Reception => "reception",
            Self::Road => "road",
            Self::Generator => "generator",
            Self::WaterTower => "water_tower",
            Self::Palm => "palm",
            Self::FlowerBed => "flower_bed",
            Self::Lantern => "lantern",
            Self::Pool => "pool",
            Self::PoolHalloween => "pool_halloween",
            Self::NightBar => "nightbar",
            Self::BeachClub => "beachclub",
            Self::BeachDj => "beach_dj",
            Self::Spa => "spa",
            Self::IceCreamParlour => "icecream_parlour",
            Self::BurgerShop => "burgershop",
        }
    }

    /// Resolves a kind from its textual identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Villas earn first-activation experience and feed guest spawns.
    #[must_use]
    pub const fn is_villa(self) -> bool {
        matches!(self, Self::Villa | Self::VillaPlus)
    }

    /// Roads form the guest walking network.
    #[must_use]
    pub const fn is_road(self) -> bool {
        matches!(self, Self::Road)
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Shop category used for grouping and balance rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Accommodation.
    Stay,
    /// Infrastructure such as roads and power.
    Utility,
    /// Leisure venues that lift happiness.
    Attraction,
    /// Food outlets.
    Food,
    /// Purely decorative props.
    Decor,
}

/// How a catalog item relates to the power grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PowerProfile {
    /// Works without power.
    #[default]
    Independent,
    /// Earns only while a generator covers its anchor cell.
    Consumer,
    /// Powers every consumer whose anchor lies within `radius` cells.
    Generator {
        /// Coverage radius in cells, measured anchor to anchor.
        radius: u32,
    },
}

impl PowerProfile {
    /// Reports whether the item needs generator coverage to earn.
    #[must_use]
    pub const fn requires_power(&self) -> bool {
        matches!(self, Self::Consumer)
    }

    /// Coverage radius when the item is a generator.
    #[must_use]
    pub const fn generator_radius(&self) -> Option<u32> {
        match self {
            Self::Generator { radius } => Some(*radius),
            _ => None,
        }
    }
}

/// Terrain band an item may be built on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SiteRule {
    /// Grass disc or shore ring.
    #[default]
    Inland,
    /// Shore ring only.
    Shoreline,
}

/// Immutable catalog record describing one buildable item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Kind of building the record describes.
    pub kind: BuildingKind,
    /// Display name.
    pub name: String,
    /// Shop category.
    pub category: Category,
    /// Purchase price in coins.
    pub cost: u32,
    /// Cells covered relative to the anchor.
    #[serde(default)]
    pub footprint: Footprint,
    /// Base income per second before happiness boosts.
    #[serde(default)]
    pub income_per_sec: f64,
    /// Relationship to the power grid.
    #[serde(default)]
    pub power: PowerProfile,
    /// Player level required before the item can be placed.
    #[serde(default = "default_unlock_level")]
    pub unlock_level: u32,
    /// Multiplier applied to the placement experience reward.
    #[serde(default = "default_tier")]
    pub tier: f64,
    /// Terrain band the item may occupy.
    #[serde(default)]
    pub site: SiteRule,
    /// Fixed number of guests the item attracts.
    #[serde(default)]
    pub guest_weight: u32,
}

fn default_unlock_level() -> u32 {
    1
}

fn default_tier() -> f64 {
    1.0
}

impl CatalogItem {
    /// Reports whether the item produces income.
    #[must_use]
    pub fn is_income_bearing(&self) -> bool {
        self.income_per_sec > 0.0
    }

    /// Reports whether guests may walk to buildings of this kind.
    #[must_use]
    pub fn is_guest_destination(&self) -> bool {
        !self.kind.is_road()
            && matches!(
                self.category,
                Category::Attraction | Category::Food | Category::Decor | Category::Utility
            )
    }
}

/// Errors raised while assembling a catalog.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CatalogError {
    /// Two records describe the same kind.
    #[error("catalog lists `{0}` more than once")]
    DuplicateItem(BuildingKind),
    /// A record has a footprint with a zero extent.
    #[error("catalog item `{0}` has an empty footprint")]
    EmptyFootprint(BuildingKind),
    /// A record has a negative or non-finite income.
    #[error("catalog item `{0}` has an invalid income")]
    InvalidIncome(BuildingKind),
    /// A record has a negative or non-finite tier.
    #[error("catalog item `{0}` has an invalid tier")]
    InvalidTier(BuildingKind),
}

/// Ordered, validated list of catalog items.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    index: BTreeMap<BuildingKind, usize>,
}

impl Catalog {
    /// Validates the provided records and builds a catalog preserving order.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (position, item) in items.iter().enumerate() {
            if item.footprint.width() == 0 || item.footprint.depth() == 0 {
                return Err(CatalogError::EmptyFootprint(item.kind));
            }
            if !item.income_per_sec.is_finite() || item.income_per_sec < 0.0 {
                return Err(CatalogError::InvalidIncome(item.kind));
            }
            if !item.tier.is_finite() || item.tier < 0.0 {
                return Err(CatalogError::InvalidTier(item.kind));
            }
            if index.insert(item.kind, position).is_some() {
                return Err(CatalogError::DuplicateItem(item.kind));
            }
        }
        Ok(Self { items, index })
    }

    /// The catalog shipped with the game.
    #[must_use]
    pub fn standard() -> Self {
        let items = vec![
            item(BuildingKind::Villa, "Villa", Category::Stay, 200)
                .footprint(2, 2)
                .income(3.0)
                .power(PowerProfile::Consumer)
                .tier(1.5)
                .guests(6),
            item(BuildingKind::Reception, "Reception", Category::Stay, 300)
                .footprint(2, 2)
                .income(2.0)
                .power(PowerProfile::Consumer)
                .tier(1.2)
                .guests(8),
            item(BuildingKind::Road, "Road", Category::Utility, 10).tier(0.2),
            item(BuildingKind::Generator, "Generator", Category::Utility, 250)
                .power(PowerProfile::Generator { radius: 6 }),
            item(BuildingKind::Palm, "Palm", Category::Decor, 25).tier(0.3),
            item(BuildingKind::FlowerBed, "Flower Bed", Category::Decor, 40).tier(0.3),
            item(BuildingKind::WaterTower, "Water Tower", Category::Utility, 180)
                .unlock(2)
                .tier(0.8),
            item(BuildingKind::Pool, "Pool", Category::Attraction, 500)
                .footprint(2, 2)
                .income(5.0)
                .power(PowerProfile::Consumer)
                .unlock(2)
                .tier(2.0),
            item(BuildingKind::Lantern, "Lantern", Category::Decor, 60)
                .unlock(3)
                .tier(0.4),
            item(
                BuildingKind::IceCreamParlour,
                "Ice Cream Parlour",
                Category::Attraction,
                350,
            )
            .income(4.0)
            .power(PowerProfile::Consumer)
            .unlock(3)
            .tier(1.5)
            .guests(6),
            item(BuildingKind::BurgerShop, "Burger Shop", Category::Food, 400)
                .footprint(2, 1)
                .income(5.0)
                .power(PowerProfile::Consumer)
                .unlock(3)
                .tier(1.5)
                .guests(6),
            item(BuildingKind::VillaPlus, "Villa Plus", Category::Stay, 650)
                .footprint(2, 2)
                .income(8.0)
                .power(PowerProfile::Consumer)
                .unlock(4)
                .tier(2.5)
                .guests(10),
            item(BuildingKind::NightBar, "Night Bar", Category::Attraction, 700)
                .footprint(2, 1)
                .income(7.0)
                .power(PowerProfile::Consumer)
                .unlock(5)
                .tier(2.5),
            item(BuildingKind::BeachDj, "Beach DJ", Category::Attraction, 800)
                .footprint(2, 2)
                .income(8.0)
                .power(PowerProfile::Consumer)
                .unlock(6)
                .tier(3.0)
                .site(SiteRule::Shoreline)
                .guests(8),
            item(
                BuildingKind::PoolHalloween,
                "Halloween Pool",
                Category::Attraction,
                900,
            )
            .footprint(2, 2)
            .income(9.0)
            .power(PowerProfile::Consumer)
            .unlock(6)
            .tier(3.0)
            .guests(10),
            item(BuildingKind::BeachClub, "Beach Club", Category::Attraction, 1200)
                .footprint(3, 2)
                .income(12.0)
                .power(PowerProfile::Consumer)
                .unlock(7)
                .tier(3.5)
                .site(SiteRule::Shoreline)
                .guests(12),
            item(BuildingKind::Spa, "Spa", Category::Attraction, 1000)
                .footprint(2, 2)
                .income(10.0)
                .power(PowerProfile::Consumer)
                .unlock(8)
                .tier(3.0)
                .guests(8),
        ];
        match Self::new(items) {
            Ok(catalog) => catalog,
            Err(error) => panic!("standard catalog is invalid: {error}"),
        }
    }

    /// Looks up the record for the provided kind.
    #[must_use]
    pub fn get(&self, kind: BuildingKind) -> Option<&CatalogItem> {
        self.index
            .get(&kind)
            .and_then(|position| self.items.get(*position))
    }

    /// Iterator over the records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// Number of records in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Reports whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Kinds whose unlock level lies in `(previous_level, level]`.
    #[must_use]
    pub fn unlocked_between(&self, previous_level: u32, level: u32) -> Vec<BuildingKind> {
        self.items
            .iter()
            .filter(|item| item.unlock_level > previous_level && item.unlock_level <= level)
            .map(|item| item.kind)
            .collect()
    }

    /// Consumes the catalog, yielding the underlying records.
    #[must_use]
    pub fn into_items(self) -> Vec<CatalogItem> {
        self.items
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn item(kind: BuildingKind, name: &str, category: Category, cost: u32) -> CatalogItem {
    CatalogItem {
        kind,
        name: name.to_owned(),
        category,
        cost,
        footprint: Footprint::SINGLE,
        income_per_sec: 0.0,
        power: PowerProfile::Independent,
        unlock_level: 1,
        tier: 1.0,
        site: SiteRule::Inland,
        guest_weight: 0,
    }
}

impl CatalogItem {
    fn footprint(mut self, width: u32, depth: u32) -> Self {
        self.footprint = Footprint::new(width, depth);
        self
    }

    fn income(mut self, income_per_sec: f64) -> Self {
        self.income_per_sec = income_per_sec;
        self
    }

    fn power(mut self, power: PowerProfile) -> Self {
        self.power = power;
        self
    }

    fn unlock(mut self, level: u32) -> Self {
        self.unlock_level = level;
        self
    }

    fn tier(mut self, tier: f64) -> Self {
        self.tier = tier;
        self
    }

    fn site(mut self, site: SiteRule) -> Self {
        self.site = site;
        self
    }

    fn guests(mut self, weight: u32) -> Self {
        self.guest_weight = weight;
        self
    }
}
