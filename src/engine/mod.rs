pub mod columns;
pub mod hints;
pub mod operation;
pub mod scoring;
