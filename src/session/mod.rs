pub mod demo;
pub mod input;
pub mod lesson;
pub mod plan;
pub mod quiz;
pub mod result;
pub mod tables;
pub mod try_it;
