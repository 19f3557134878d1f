pub mod aggregator;
pub mod combinators;
pub mod fixture;
