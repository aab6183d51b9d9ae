pub mod application;
pub mod assets;
pub mod components;
pub mod form;
pub mod gallery;
pub mod icon;
pub mod id;
pub mod motion;
pub mod prelude;
pub mod provider;
pub mod routes;
pub mod theme;

pub use application::GalleryApplication;
pub use provider::GalleryProvider;
