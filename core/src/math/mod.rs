pub mod geometry;

pub use geometry::GeometryHelper;
