// Per-table DDL block capture and ordered output
pub mod blocks;


pub use blocks::DdlReassembler;
