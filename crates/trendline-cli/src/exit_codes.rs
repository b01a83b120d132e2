//! Process exit codes. Scripts gate on these, so they only ever grow.

pub const EXIT_SUCCESS: i32 = 0;
/// Every stream the command needed failed to load.
pub const EXIT_LOAD_FAILED: i32 = 1;
/// Unreadable or invalid configuration, or bad arguments.
pub const EXIT_CONFIG_ERROR: i32 = 2;
