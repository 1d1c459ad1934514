pub mod buffer;
pub mod convolution;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod histogram;
pub mod operation;
pub mod point;
pub mod recipe;
