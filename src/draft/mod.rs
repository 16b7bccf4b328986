use crate::units::Category;

pub mod handlers;
pub mod pool;
pub mod table;

pub use pool::build_draft_pool;
pub use table::DraftTable;

pub type Res<T> = Result<T, DraftError>;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// A pool that a draw requires ran out of units.
    #[error("Insufficient {0}s in pool for the draft.")]
    InsufficientUnits(Category),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftConfig {
    /// Total cost of monsters, heroes and troops in the draft.
    pub draft_size: u32,
    pub gods: usize,
    pub titans: usize,
}

impl Default for DraftConfig {
    fn default() -> Self {
        DraftConfig {
            draft_size: 40,
            gods: 4,
            titans: 0,
        }
    }
}
