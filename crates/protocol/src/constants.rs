/// Default collector host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default collector port.
pub const DEFAULT_PORT: &str = "3002";

/// Default number of lines captured on each side of the reporting line.
pub const DEFAULT_SURROUND: u32 = 3;

/// Language tag identifying this client implementation.
pub const LANGUAGE: &str = "Rust";

/// Environment variable that enables environment-gated logging when present.
pub const DEBUG_ENV_VAR: &str = "CODECTRL_DEBUG";

/// Maximum body size of a single frame (16 MB).
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;
