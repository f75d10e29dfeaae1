pub mod quick_set;
pub mod union_find;

pub use quick_set::QuickRemovableSet;
pub use union_find::UnionFind;
