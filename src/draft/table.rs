use std::fmt::Display;

use crate::units::{Category, Unit};

/// A drafted pool grouped back into a column per category, for display.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct DraftTable {
    titans: Vec<Unit>,
    gods: Vec<Unit>,
    monsters: Vec<Unit>,
    heroes: Vec<Unit>,
    troops: Vec<Unit>,
}

impl DraftTable {
    const HEADERS: [&'static str; 5] = ["Titans", "Gods", "Monsters", "Heroes", "Troops"];

    pub fn new(units: Vec<Unit>) -> Self {
        let mut table = Self::default();
        for unit in units {
            match unit.category() {
                Category::Titan => table.titans.push(unit),
                Category::God => table.gods.push(unit),
                Category::Monster => table.monsters.push(unit),
                Category::Hero => table.heroes.push(unit),
                Category::Troop => table.troops.push(unit),
            }
        }
        table
    }

    pub fn column(&self, category: Category) -> &[Unit] {
        match category {
            Category::Titan => &self.titans,
            Category::God => &self.gods,
            Category::Monster => &self.monsters,
            Category::Hero => &self.heroes,
            Category::Troop => &self.troops,
        }
    }

    /// Cost of the monsters, heroes and troops, i.e. the part of the draft
    /// that counts against the draft size.
    pub fn total_cost(&self) -> u32 {
        [Category::Monster, Category::Hero, Category::Troop]
            .into_iter()
            .flat_map(|c| self.column(c))
            .map(Unit::cost)
            .sum()
    }

    /// Unit names row by row, shorter columns padded with empty cells.
    pub fn rows(&self) -> Vec<[&str; 5]> {
        let height = Category::ALL
            .iter()
            .map(|&c| self.column(c).len())
            .max()
            .unwrap_or(0);

        (0..height)
            .map(|i| Category::ALL.map(|c| self.column(c).get(i).map_or("", Unit::name)))
            .collect()
    }
}

impl Display for DraftTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = self.rows();

        let mut widths = Self::HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let border = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<String>>()
            .join("+");

        writeln!(f, "+{border}+")?;
        write_row(f, &Self::HEADERS, &widths)?;
        writeln!(f, "+{border}+")?;
        for row in &rows {
            write_row(f, row, &widths)?;
        }
        write!(f, "+{border}+")
    }
}

fn write_row(
    f: &mut std::fmt::Formatter<'_>,
    cells: &[&str; 5],
    widths: &[usize; 5],
) -> std::fmt::Result {
    let cells = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!(" {cell:^width$} "))
        .collect::<Vec<String>>()
        .join("|");
    writeln!(f, "|{cells}|")
}
