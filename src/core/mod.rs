pub mod catalog;
pub mod engine;
pub mod geo;
pub mod legs;
pub mod map;
pub mod pipeline;
pub mod tables;

pub use crate::domain::model::{CourseData, RenderedCourse};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, WritePolicy};
pub use crate::utils::error::Result;
