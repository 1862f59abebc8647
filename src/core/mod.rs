pub mod package;

pub use package::{DependencyRef, PackageKey, PackageRecord};
