//! Course geometry sources.

mod procedural;

pub use procedural::CourseGenerator;
