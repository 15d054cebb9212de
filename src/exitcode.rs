//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (unreadable server response)
pub const DATAERR: i32 = 65;

/// Service unavailable (server unreachable)
pub const UNAVAILABLE: i32 = 69;

/// Internal software error (server rejected the request)
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Permission denied
pub const NOPERM: i32 = 77;

/// Configuration error (missing credentials, unreadable config file)
pub const CONFIG: i32 = 78;
