mod demo;
mod file;

#[cfg(feature = "http")]
mod http;

pub use demo::DemoSource;
pub use file::FileSource;

#[cfg(feature = "http")]
pub use http::HttpSource;
