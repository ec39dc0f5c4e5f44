pub mod compare;
pub mod growth;
pub mod ma;
pub mod ratios;
