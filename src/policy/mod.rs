//! Policy trait and implementations.

pub mod random;
pub mod seek;
pub mod trait_;

pub use random::RandomPolicy;
pub use seek::SeekTargetPolicy;
pub use trait_::Policy;
