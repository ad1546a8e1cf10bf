/// Session-scoped ephemeral storage port
///
/// Holds flow-continuation flags that must survive one redirect and are
/// explicitly cleared when the flow completes. Values are plain strings so
/// the store stays a dumb map; well-known keys live in [`keys`].

/// Well-known session keys
pub mod keys {
    /// Route to navigate to after a successful save, captured at flow start
    pub const RETURN_LOCATION: &str = "return_location";

    /// Set while a capture flow is mid-flight
    pub const CAPTURE_IN_PROGRESS: &str = "capture_in_progress";
}

/// Trait for session storage operations - allows for mocking in tests
pub trait SessionStorePort: Send + Sync {
    fn set(&self, key: &str, value: &str);

    fn get(&self, key: &str) -> Option<String>;

    /// Read and remove in one step
    fn take(&self, key: &str) -> Option<String>;

    fn remove(&self, key: &str);
}
