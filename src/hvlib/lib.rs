pub mod box_io;
pub mod cfg;
pub mod domain;
pub mod extract;
pub mod file_util;
pub mod glob;
pub mod image_util;
pub mod overlay;
pub mod result;
pub mod store;
pub mod tracing_setup;
pub mod types;

pub use domain::{Shape, BB};
pub use result::{ErrorKind, HvError, HvResult};
pub use store::DatasetStore;
