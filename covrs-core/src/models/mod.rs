pub mod bed;
pub mod interval;

// re-export for cleaner imports
pub use self::bed::BedRecord;
pub use self::interval::{GenomicInterval, Strand};
