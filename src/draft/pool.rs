use std::fmt::Debug;

use rand::Rng;

use crate::units::{Category, Unit};

use super::{DraftConfig, DraftError, Res};

/// Order of the draw attempts made by each iteration of the budget loop.
const FILL_ORDER: [Category; 3] = [Category::Monster, Category::Hero, Category::Troop];

/// Category that must always be able to close the remaining budget. Running
/// out of it before the budget is met fails the draft; running out of any
/// other budget category just skips it.
const FILLER: Category = Category::Troop;

/// When a unit of the first category is drawn, the first remaining unit of the
/// second category that is the same character is removed from the pool.
const EXCLUSIONS: &[(Category, Category)] = &[
    (Category::Titan, Category::Monster),
    (Category::Hero, Category::Hero),
];

/// Working copy of a catalog, split by category. Drawing from the pool removes
/// units permanently.
#[derive(Clone, PartialEq, Eq)]
pub struct UnitPool {
    titans: Vec<Unit>,
    gods: Vec<Unit>,
    monsters: Vec<Unit>,
    heroes: Vec<Unit>,
    troops: Vec<Unit>,
}

impl UnitPool {
    pub fn new() -> Self {
        Self {
            titans: Vec::new(),
            gods: Vec::new(),
            monsters: Vec::new(),
            heroes: Vec::new(),
            troops: Vec::new(),
        }
    }

    pub fn from_catalog(catalog: &[Unit]) -> Self {
        let mut pool = Self::new();
        for unit in catalog {
            pool.add(unit.clone());
        }
        pool
    }

    #[cfg(test)]
    pub fn sample(titans: usize, gods: usize, monsters: usize, heroes: usize, troops: usize) -> Self {
        let mut pool = Self::new();
        for _ in 0..titans {
            pool.add(Unit::sample(Category::Titan, 8));
        }
        for _ in 0..gods {
            pool.add(Unit::sample(Category::God, 6));
        }
        for _ in 0..monsters {
            pool.add(Unit::sample(Category::Monster, 4));
        }
        for _ in 0..heroes {
            pool.add(Unit::sample(Category::Hero, 3));
        }
        for _ in 0..troops {
            pool.add(Unit::sample(Category::Troop, 1));
        }
        pool
    }

    pub fn add(&mut self, unit: Unit) {
        self.units_of_mut(unit.category()).push(unit);
    }

    pub fn units_of(&self, category: Category) -> &[Unit] {
        match category {
            Category::Titan => &self.titans,
            Category::God => &self.gods,
            Category::Monster => &self.monsters,
            Category::Hero => &self.heroes,
            Category::Troop => &self.troops,
        }
    }

    fn units_of_mut(&mut self, category: Category) -> &mut Vec<Unit> {
        match category {
            Category::Titan => &mut self.titans,
            Category::God => &mut self.gods,
            Category::Monster => &mut self.monsters,
            Category::Hero => &mut self.heroes,
            Category::Troop => &mut self.troops,
        }
    }

    /// Take a random unit of a category out of the pool. Remaining units keep
    /// their catalog order.
    fn draw<R: Rng>(&mut self, category: Category, rng: &mut R) -> Option<Unit> {
        let units = self.units_of_mut(category);
        if units.is_empty() {
            return None;
        }

        let unit = units.remove(rng.gen_range(0..units.len()));
        tracing::trace!("Drew {} {}.", category, unit.name());
        self.exclude(&unit);
        Some(unit)
    }

    /// Remove the alternate forms of a freshly drawn unit that may not appear
    /// in the same draft. At most one unit is removed per rule.
    fn exclude(&mut self, drawn: &Unit) {
        for &(trigger, target) in EXCLUSIONS {
            if trigger != drawn.category() {
                continue;
            }

            let units = self.units_of_mut(target);
            if let Some(index) = units.iter().position(|u| u.same_character(drawn)) {
                let excluded = units.remove(index);
                tracing::trace!(
                    "Excluded {} {} as it is the same character as {}.",
                    target,
                    excluded.name(),
                    drawn.name()
                );
            }
        }
    }

    fn draw_required<R: Rng>(&mut self, category: Category, rng: &mut R) -> Res<Unit> {
        self.draw(category, rng)
            .ok_or(DraftError::InsufficientUnits(category))
    }

    /// Draft a pool of units. Titans are drawn first, then gods, then
    /// monsters, heroes and troops are drawn in turn until their total cost
    /// is exactly the configured draft size. A drawn unit that does not fit in
    /// the remaining budget is discarded rather than returned to the pool.
    pub fn draft<R: Rng>(&mut self, config: &DraftConfig, rng: &mut R) -> Res<Vec<Unit>> {
        tracing::debug!("Drafting from {:?} with {:?}.", self, config);

        let mut selected = Vec::new();

        for _ in 0..config.titans {
            selected.push(self.draw_required(Category::Titan, rng)?);
        }

        for _ in 0..config.gods {
            selected.push(self.draw_required(Category::God, rng)?);
        }

        let mut total = 0;
        while total != config.draft_size {
            for category in FILL_ORDER {
                let Some(unit) = self.draw(category, rng) else {
                    if category == FILLER && total < config.draft_size {
                        return Err(DraftError::InsufficientUnits(category));
                    }
                    continue;
                };

                if total.saturating_add(unit.cost()) <= config.draft_size {
                    total += unit.cost();
                    selected.push(unit);
                } else {
                    tracing::trace!(
                        "Discarded {} {}, cost {} exceeds remaining budget {}.",
                        category,
                        unit.name(),
                        unit.cost(),
                        config.draft_size - total
                    );
                }
            }
        }

        tracing::debug!("Drafted {} units, {:?} remaining.", selected.len(), self);
        Ok(selected)
    }
}

impl Default for UnitPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for UnitPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [titans, gods, monsters, heroes, troops] = Category::ALL.map(|c| self.units_of(c).len());
        write!(
            f,
            "UnitPool {{ titans: {titans}, gods: {gods}, monsters: {monsters}, heroes: {heroes}, troops: {troops} }}"
        )
    }
}

/// Draft a pool of units from a catalog. The catalog itself is not modified.
pub fn build_draft_pool<R: Rng>(
    catalog: &[Unit],
    config: &DraftConfig,
    rng: &mut R,
) -> Res<Vec<Unit>> {
    UnitPool::from_catalog(catalog).draft(config, rng)
}
