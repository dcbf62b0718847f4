// Topological ordering of tables
pub mod topological;


pub use topological::TopologicalSorter;
