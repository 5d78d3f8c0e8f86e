//! Resident set size readout for the current process.
//!
//! The resident set size (RSS) is the physical memory the operating system currently
//! has mapped for a process. For allocator diagnostics it is the ground truth to hold
//! against the logical bytes a workload knows it retained: the gap between the two is
//! fragmentation.
//!
//! On Linux the value comes from the `VmRSS` line of the `/proc/self/status`
//! pseudo-file. On macOS it comes from the `ps` process-listing utility. On every
//! other platform the probe degrades silently: the functions return `None` and the
//! caller is expected to omit the readout rather than fail.
//!
//! Reading the value is a pure observation. No state is kept and nothing about the
//! probed process is perturbed beyond the transient cost of the read itself.
//!
//! # Example
//!
//! ```
//! match rss_probe::current_process_resident_kb() {
//!     Some(kb) => println!("resident: {kb} kB"),
//!     None => println!("resident set size not available on this platform"),
//! }
//! ```

#[cfg(target_os = "macos")]
mod darwin;
#[cfg(target_os = "linux")]
mod linux;
#[cfg(any(target_os = "linux", test))]
mod parse;

/// Reads the OS-reported resident set size of the current process, in kilobytes.
///
/// Returns `None` if the platform offers no supported source or the source could not
/// be read or parsed.
#[must_use]
pub fn current_process_resident_kb() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        linux::resident_kb()
    }

    #[cfg(target_os = "macos")]
    {
        darwin::resident_kb()
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

/// Returns the raw RSS-bearing line from the platform's process status source,
/// suitable for printing verbatim.
///
/// On Linux this is the `VmRSS:` line of `/proc/self/status`; on macOS it is the
/// process-table line emitted by `ps`. Returns `None` where
/// [`current_process_resident_kb()`] would.
#[must_use]
pub fn vm_rss_line() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        linux::vm_rss_line()
    }

    #[cfg(target_os = "macos")]
    {
        darwin::process_table_line()
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        None
    }
}
