//! Standard exit codes (BSD sysexits.h compatible)

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (inconsistent layer list)
pub const DATAERR: i32 = 65;

/// Cannot open input (no matching image)
pub const NOINPUT: i32 = 66;

/// Service unavailable (engine or layer file unreachable)
pub const UNAVAILABLE: i32 = 69;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
