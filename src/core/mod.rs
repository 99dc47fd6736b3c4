pub mod analysis;
pub mod check;
pub mod data;
pub mod diag;
pub mod graph;
pub mod sym;
pub mod trace;
pub mod xref;
