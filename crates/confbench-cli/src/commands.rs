pub mod archive;
pub mod benchmark;
pub mod collect;
pub mod evaluate;
pub mod sample;
pub mod select;
