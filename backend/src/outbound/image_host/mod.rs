//! Image host adapters.

mod cloudinary;

pub use cloudinary::{CloudinaryCredentials, CloudinaryImageHost, DEFAULT_API_BASE};
