pub mod engine;
pub mod grading;
pub mod model;
pub mod providers;
pub mod storage;
