/// Shared helpers
pub mod audio;
