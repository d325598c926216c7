pub use types::Error;
