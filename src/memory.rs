//! Peak resident set size of the training process, read with
//! `getrusage`. Reported once at the end of a run; non-Unix targets
//! report zero.

#[cfg(unix)]
pub fn peak_memory_bytes() -> u64 {
    use libc::{getrusage, rusage, RUSAGE_SELF};
    // ru_maxrss is bytes on macOS and kilobytes on the other Unixes.
    #[cfg(target_os = "macos")]
    const SCALE: u64 = 1;
    #[cfg(not(target_os = "macos"))]
    const SCALE: u64 = 1024;
    unsafe {
        let mut usage: rusage = std::mem::zeroed();
        if getrusage(RUSAGE_SELF, &mut usage) == 0 {
            usage.ru_maxrss as u64 * SCALE
        } else {
            0
        }
    }
}

#[cfg(not(unix))]
pub fn peak_memory_bytes() -> u64 {
    0
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn peak_memory_is_reported() {
        // The test process has certainly faulted in more than a page.
        assert!(peak_memory_bytes() > 4096);
    }
}
