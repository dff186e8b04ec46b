//! Application workflows built on the infrastructure layer

pub mod use_cases;
