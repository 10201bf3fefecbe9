pub mod bamboo;

pub use bamboo::BambooProvider;
