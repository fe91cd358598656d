pub mod segmented_queue;
pub mod slot_arena;

pub use segmented_queue::{SegmentIter, SegmentedQueue};
pub use slot_arena::{SlotArena, SlotId};
