use std::fmt::Display;

pub mod catalog;

pub use catalog::{Catalog, CatalogError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Titan,
    God,
    Monster,
    Hero,
    Troop,
}

impl Category {
    /// Display order of the categories.
    pub const ALL: [Category; 5] = [
        Category::Titan,
        Category::God,
        Category::Monster,
        Category::Hero,
        Category::Troop,
    ];
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Titan => "titan",
            Category::God => "god",
            Category::Monster => "monster",
            Category::Hero => "hero",
            Category::Troop => "troop",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Unit {
    name: String,
    category: Category,
    cost: u32,

    /// Key shared by alternate pieces of the same character, e.g. a titan and
    /// a monster version of Fenrir.
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    strategic_value: Option<u32>,
}

impl Unit {
    /// Troops always cost a single point, whatever cost is passed.
    pub fn new<S: ToString>(name: S, category: Category, cost: u32) -> Self {
        Self {
            name: name.to_string(),
            category,
            cost: if category == Category::Troop { 1 } else { cost },
            group: None,
            strategic_value: None,
        }
    }

    pub fn with_group<S: ToString>(mut self, group: S) -> Self {
        self.group = Some(group.to_string());
        self
    }

    /// Troops carry no strategic value, so this is ignored for them.
    pub fn with_strategic_value(mut self, value: u32) -> Self {
        if self.category != Category::Troop {
            self.strategic_value = Some(value);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Whether this unit is an alternate form of the same character as
    /// `other`. Units without a group are never related.
    pub fn same_character(&self, other: &Unit) -> bool {
        matches!((self.group(), other.group()), (Some(a), Some(b)) if a == b)
    }

    #[cfg(test)]
    pub fn sample(category: Category, cost: u32) -> Self {
        static ID: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(1);

        let id = ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Self::new(format!("{category} {id}"), category, cost)
    }
}

#[cfg(test)]
mod test {
    use super::{Category, Unit};

    #[test]
    fn test_troop_cost_fixed() {
        let troop = Unit::new("Hoplites", Category::Troop, 3).with_strategic_value(2);
        assert_eq!(troop.cost(), 1);
        let value = serde_json::to_value(&troop).unwrap();
        assert!(value.get("strategic_value").is_none());

        let hero = Unit::new("Achilles", Category::Hero, 4).with_strategic_value(2);
        assert_eq!(hero.cost(), 4);
        assert_eq!(serde_json::to_value(&hero).unwrap()["strategic_value"], 2);
    }

    #[test]
    fn test_same_character() {
        let titan = Unit::new("Fenrir", Category::Titan, 8).with_group("Fenrir");
        let monster = Unit::new("Fenrir", Category::Monster, 5).with_group("Fenrir");
        let other = Unit::new("Fenrir", Category::Monster, 5);

        assert!(titan.same_character(&monster));
        assert!(!titan.same_character(&other));
        assert!(!other.same_character(&other.clone()));
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::Monster.to_string(), "monster");
        assert_eq!(
            serde_json::to_string(&Category::Titan).unwrap(),
            "\"titan\""
        );
    }
}
