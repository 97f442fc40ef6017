pub mod bench;
pub mod fixture;
pub mod project_root;
pub mod solutions;

pub use sharetree_core;
