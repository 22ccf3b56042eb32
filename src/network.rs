//! Network constants for the pricing service.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://awx.pro";

/// Static serial/identity header sent with every pricing request.
pub const DEFAULT_SERIAL: &str = "a7307e89-fbeb-4b28-a8ce-55b7fb3c32aa";

/// Request timeout for pricing calls.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
