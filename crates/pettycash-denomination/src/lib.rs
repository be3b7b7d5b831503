pub mod allocator;
pub mod render;
pub mod tally;

pub use allocator::{Allocation, allocate_from_stock, suggest_initial};
pub use tally::DenominationTally;
