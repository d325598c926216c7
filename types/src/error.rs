pub use crate::helper_functions_types::Error;
