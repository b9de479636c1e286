//! sheetscan-transform - Geometric distortion for sheetscan
//!
//! This crate provides the operations used to degrade synthetic sheets
//! and to undo misalignment when reading them:
//!
//! - Rotation about the canvas center (inverse-mapped, nearest neighbor)
//! - Horizontal shear proportional to the offset from the center row
//! - Bounded uniform noise from a caller-supplied generator
//! - [`Distortion`], which composes the three in a fixed order
//! - [`AffineMatrix`], a least-squares affine model between point sets
//!
//! All image operations take a `&Canvas` and return a new canvas of the
//! same size; pixels brought in from outside get the background value.

pub mod affine;
pub mod distort;
mod error;
pub mod noise;
pub mod rotate;
pub mod shear;

pub use affine::AffineMatrix;
pub use distort::Distortion;
pub use error::{TransformError, TransformResult};
pub use noise::add_noise;
pub use rotate::rotate;
pub use shear::skew;
