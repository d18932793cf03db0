//! Startup privilege check.

/// Failures that stop the daemon before it serves requests.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The process runs with a non-zero effective uid.
    #[error("plughubd must run as root to use the BLE adapter (effective uid {euid})")]
    NotRoot {
        /// Effective uid of the process.
        euid: u32,
    },
    /// The platform has no notion of an effective uid.
    #[error("cannot determine process privileges on this platform")]
    Unsupported,
}

/// Fail unless the process runs with effective uid 0.
///
/// # Errors
///
/// Returns [`StartupError::NotRoot`] for any other uid, or
/// [`StartupError::Unsupported`] on platforms without uids.
pub fn ensure_root() -> Result<(), StartupError> {
    match effective_uid() {
        Some(euid) => check(euid),
        None => Err(StartupError::Unsupported),
    }
}

fn check(euid: u32) -> Result<(), StartupError> {
    if euid == 0 {
        Ok(())
    } else {
        Err(StartupError::NotRoot { euid })
    }
}

#[cfg(unix)]
fn effective_uid() -> Option<u32> {
    Some(nix::unistd::geteuid().as_raw())
}

#[cfg(not(unix))]
fn effective_uid() -> Option<u32> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_root() {
        assert!(check(0).is_ok());
    }

    #[test]
    fn should_reject_regular_user() {
        let err = check(1000).unwrap_err();
        assert!(matches!(err, StartupError::NotRoot { euid: 1000 }));
        assert_eq!(
            err.to_string(),
            "plughubd must run as root to use the BLE adapter (effective uid 1000)"
        );
    }

    /// `/proc/self/status` reports `Uid: real effective saved fs`.
    #[cfg(target_os = "linux")]
    fn kernel_effective_uid() -> u32 {
        let status = std::fs::read_to_string("/proc/self/status").unwrap();
        let line = status
            .lines()
            .find(|line| line.starts_with("Uid:"))
            .unwrap();
        line.split_whitespace().nth(2).unwrap().parse().unwrap()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn should_agree_with_kernel_effective_uid() {
        let euid = kernel_effective_uid();
        assert_eq!(effective_uid(), Some(euid));
        assert_eq!(ensure_root().is_ok(), euid == 0);
    }
}
