//! Process exit codes (git conventions)

/// Successful termination
pub const OK: i32 = 0;

/// Command name not recognised
pub const UNKNOWN_COMMAND: i32 = 1;

/// Fatal error: destination not usable, OS failure, engine failure
pub const FATAL: i32 = 128;

/// Command line usage error
pub const USAGE: i32 = 129;

/// Interrupted by signal
pub const INTERRUPTED: i32 = 130;
