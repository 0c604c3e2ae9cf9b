mod hit_counter;

pub use hit_counter::{FileServerHits, FileServerHitsService, HitCounter};
