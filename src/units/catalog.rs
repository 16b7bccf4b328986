use std::path::Path;

use bytes::Buf;

use crate::units::{Category, Unit};

/// The catalog of every published expansion, shipped with the binary.
const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to decode catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown expansion: {0}")]
    UnknownExpansion(String),

    #[error("Unit in expansion {0} has an empty name.")]
    EmptyName(String),

    #[error("Unit {0} has no cost.")]
    MissingCost(String),
}

#[derive(serde::Deserialize, Debug)]
struct JsonUnit {
    name: String,

    category: Category,

    /// Troops may omit their cost, it is always 1.
    cost: Option<u32>,

    /// Character group shared by alternate forms of a character.
    group: Option<String>,

    strategic_value: Option<u32>,
}

impl JsonUnit {
    fn to_unit(self, expansion: &str) -> Result<Unit, CatalogError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyName(expansion.to_string()));
        }

        let cost = match (self.category, self.cost) {
            (Category::Troop, _) => 1,
            (_, Some(cost)) => cost,
            (_, None) => return Err(CatalogError::MissingCost(name.to_string())),
        };

        let mut unit = Unit::new(name, self.category, cost);
        if let Some(group) = self.group.filter(|g| !g.trim().is_empty()) {
            unit = unit.with_group(group.trim());
        }
        if let Some(value) = self.strategic_value {
            unit = unit.with_strategic_value(value);
        }
        Ok(unit)
    }
}

#[derive(serde::Deserialize, Debug)]
struct JsonExpansion {
    name: String,
    units: Vec<JsonUnit>,
}

#[derive(Clone, Debug)]
pub struct Expansion {
    name: String,
    units: Vec<Unit>,
}

impl Expansion {
    pub fn new<S: ToString>(name: S, units: Vec<Unit>) -> Self {
        Self {
            name: name.to_string(),
            units,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    /// Expansions in declaration order. Units drawn from a catalog keep this
    /// order regardless of the order expansions are requested in.
    expansions: Vec<Expansion>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            expansions: Vec::new(),
        }
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        decode_catalog(bytes::Bytes::from_static(BUILTIN_CATALOG.as_bytes()))
    }

    /// Add an expansion, replacing any existing expansion with the same name.
    pub fn add(&mut self, expansion: Expansion) {
        if let Some(existing) = self.position(expansion.name()) {
            self.expansions[existing] = expansion;
        } else {
            self.expansions.push(expansion);
        }
    }

    /// Add all expansions of another catalog to this one. Expansions in
    /// `other` take precedence.
    pub fn merge(&mut self, other: Catalog) {
        for expansion in other.expansions {
            self.add(expansion);
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.expansions.iter().map(Expansion::name).collect()
    }

    pub fn size(&self) -> usize {
        self.expansions.iter().map(|e| e.units.len()).sum()
    }

    /// Collect the units of the named expansions. Expansion names are case
    /// insensitive.
    pub fn units<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Unit>, CatalogError> {
        let mut selected = vec![false; self.expansions.len()];
        for name in names {
            let name: &str = name.as_ref();
            match self.position(name) {
                Some(i) => selected[i] = true,
                None => return Err(CatalogError::UnknownExpansion(name.to_string())),
            }
        }

        Ok(self
            .expansions
            .iter()
            .zip(selected)
            .filter(|(_, selected)| *selected)
            .flat_map(|(e, _)| e.units.iter().cloned())
            .collect())
    }

    /// Every unit in the catalog.
    pub fn all_units(&self) -> Vec<Unit> {
        self.expansions
            .iter()
            .flat_map(|e| e.units.iter().cloned())
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.expansions
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
    }
}

pub fn decode_catalog(bytes: bytes::Bytes) -> Result<Catalog, CatalogError> {
    let expansions: Vec<JsonExpansion> = serde_json::de::from_reader(bytes.reader())?;

    let mut catalog = Catalog::new();
    for expansion in expansions {
        let units = expansion
            .units
            .into_iter()
            .map(|u| u.to_unit(&expansion.name))
            .collect::<Result<Vec<Unit>, CatalogError>>()?;
        catalog.add(Expansion::new(expansion.name.trim(), units));
    }
    Ok(catalog)
}

pub async fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    tracing::debug!("Loading unit catalog from {}.", path.display());
    let raw = tokio::fs::read(path).await?;
    let catalog = decode_catalog(bytes::Bytes::from(raw))?;
    tracing::debug!(
        "Loaded {} units in {} expansions.",
        catalog.size(),
        catalog.expansions.len()
    );
    Ok(catalog)
}
