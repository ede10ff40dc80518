//! Artifact collection specs

mod collect;
mod durability;
