//! Process preconditions.

/// Whether the process runs with root privileges. Raw GPIO access needs it.
#[cfg(unix)]
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_root() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Effective uid as the kernel reports it: `Uid:` lists real, effective,
    /// saved and filesystem ids.
    #[cfg(target_os = "linux")]
    fn effective_uid_from_proc() -> String {
        let status = std::fs::read_to_string("/proc/self/status").unwrap();
        let line = status.lines().find(|l| l.starts_with("Uid:")).unwrap();
        line.split_whitespace().nth(2).unwrap().to_string()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn is_root_matches_effective_uid() {
        assert_eq!(is_root(), effective_uid_from_proc() == "0");
    }
}
