//! The failsafe's default trigger action: kill the whole process, now.
//!
//! This is deliberately *not* a graceful shutdown.  No destructors run, no
//! panic handlers see it, and every other thread stops wherever it is.  Open
//! files are not flushed.  The point is that a runaway automation loop, or a
//! foreground thread stuck in a blocking call, cannot keep the process alive.
//!
//! | Platform | Mechanism                                        |
//! |----------|--------------------------------------------------|
//! | Windows  | `TerminateProcess(GetCurrentProcess(), code)`    |
//! | others   | `std::process::exit(code)`                       |

use tracing::error;

/// Exit code used when the failsafe terminates the process.
pub const FAILSAFE_EXIT_CODE: u32 = 1;

/// Terminates the current process immediately with `exit_code`.
pub fn terminate_process(exit_code: u32) -> ! {
    error!("failsafe terminating process with exit code {exit_code}");

    #[cfg(target_os = "windows")]
    {
        use windows::Win32::System::Threading::{GetCurrentProcess, TerminateProcess};

        // SAFETY: GetCurrentProcess returns a pseudo-handle that is always valid
        // for the calling process; TerminateProcess does not return on success.
        unsafe {
            let _ = TerminateProcess(GetCurrentProcess(), exit_code);
        }
    }

    // Reached on non-Windows targets, or if TerminateProcess was refused.
    std::process::exit(exit_code as i32)
}
