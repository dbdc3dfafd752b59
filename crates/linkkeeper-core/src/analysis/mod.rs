pub mod apply;
pub mod bundling;
pub mod catalog;
pub mod duplicates;
pub mod removal;
