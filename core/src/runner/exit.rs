/// Map an exit status to a single code; signals become `128 + signo` as a
/// shell would report them.
pub fn normalize_exit(status: std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(code) = status.code() {
            code
        } else if let Some(sig) = status.signal() {
            128 + sig
        } else {
            1
        }
    }
    #[cfg(not(unix))]
    {
        status.code().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(unix)]
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    #[test]
    fn default_status_is_success() {
        assert_eq!(normalize_exit(ExitStatus::default()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn exit_codes_pass_through() {
        assert_eq!(normalize_exit(ExitStatus::from_raw(0)), 0);
        assert_eq!(normalize_exit(ExitStatus::from_raw(3 << 8)), 3);
    }

    #[cfg(unix)]
    #[test]
    fn signals_map_above_128() {
        // raw wait status 9 = killed by SIGKILL
        assert_eq!(normalize_exit(ExitStatus::from_raw(9)), 137);
    }
}
