//! CLI Exit Code Registry
//!
//! Single source of truth for `labsheet` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | Success                                        |
//! | 1    | General error (config, export, local I/O)      |
//! | 2    | Usage error (bad selection, missing flag)      |
//! | 3    | Template could not be loaded from the backend  |
//! | 4    | Template could not be saved to the backend     |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - anything without a more specific code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Loading styles or content failed, or the content file was unreadable.
pub const EXIT_LOAD_FAILED: u8 = 3;

/// The save request failed or was rejected.
pub const EXIT_SAVE_FAILED: u8 = 4;
