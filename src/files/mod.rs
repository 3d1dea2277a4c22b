/// Uploaded files and download buffers - Gateway

mod output;
mod upload;

pub use output::{DirectorySink, DownloadSink, OutputBuffer};
pub use upload::{replace_extension, UploadedFile};

#[cfg(test)]
pub use output::MockDownloadSink;
