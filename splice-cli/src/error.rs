// ============================================================================
// splice-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias shared by every command
//
// Commands return `CoreError` so that failures from the library and from the
// CLI itself are reported the same way by `main`.

use splice_core::CoreResult;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

