pub mod error;
pub mod upload;

pub use upload::TempUpload;
