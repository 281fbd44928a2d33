//! Single-stream curl GET backend.
//!
//! Downloads to `dest.part` and renames to `dest` on success, so a
//! pre-existing destination always means a prior completed transfer. Resume
//! appends to the side file with `resume_from`; cancellation is observed in
//! the progress callback.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::control::CancelToken;
use crate::retry::TransferError;

use super::{TransferExecutor, TransferOptions};

/// The production transfer backend. Stateless; one `Easy` handle per attempt.
#[derive(Debug, Default)]
pub struct CurlExecutor;

impl CurlExecutor {
    pub fn new() -> Self {
        Self
    }
}

/// Side file holding partial data: `dest` with `.part` appended.
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Parses a user rate string into bytes/sec: plain digits, or a `k`/`m`/`g`
/// suffix (case-insensitive, powers of 1024). Unparseable strings yield None
/// and the transfer runs uncapped.
fn parse_rate_limit(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (digits, mult) = match s.chars().last() {
        Some(c) if c.eq_ignore_ascii_case(&'k') => (&s[..s.len() - 1], 1024u64),
        Some(c) if c.eq_ignore_ascii_case(&'m') => (&s[..s.len() - 1], 1024 * 1024),
        Some(c) if c.eq_ignore_ascii_case(&'g') => (&s[..s.len() - 1], 1024 * 1024 * 1024),
        _ => (s, 1),
    };
    digits.parse::<u64>().ok().map(|n| n.saturating_mul(mult))
}

impl TransferExecutor for CurlExecutor {
    fn transfer(
        &self,
        url: &str,
        dest: &Path,
        opts: &TransferOptions,
        cancel: &CancelToken,
    ) -> Result<(), TransferError> {
        let part = part_path(dest);

        let mut offset = 0u64;
        if opts.resume {
            if let Ok(meta) = fs::metadata(&part) {
                offset = meta.len();
            }
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(offset > 0)
            .write(true)
            .truncate(offset == 0)
            .open(&part)?;

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.fail_on_error(false)?;
        easy.connect_timeout(Duration::from_secs(30))?;
        if let Some(timeout) = opts.timeout {
            easy.timeout(timeout)?;
        }
        if let Some(rate) = opts.rate_limit.as_deref().and_then(parse_rate_limit) {
            easy.max_recv_speed(rate)?;
        }
        if offset > 0 {
            easy.resume_from(offset)?;
        }
        easy.progress(true)?;

        let write_err: RefCell<Option<io::Error>> = RefCell::new(None);
        let perform_result = {
            let mut transfer = easy.transfer();
            transfer.progress_function(|_, _, _, _| !cancel.is_cancelled())?;
            transfer.write_function(|data| match file.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    *write_err.borrow_mut() = Some(e);
                    Ok(0) // abort the transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err.into_inner() {
            return Err(TransferError::Io(e));
        }
        if let Err(e) = perform_result {
            if e.is_aborted_by_callback() && cancel.is_cancelled() {
                return Err(TransferError::Interrupted);
            }
            return Err(TransferError::Curl(e));
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransferError::Http(code));
        }

        file.flush()?;
        drop(file);
        fs::rename(&part, dest)?;
        tracing::debug!(url, dest = %dest.display(), "transfer complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("/dl/file.iso")),
            Path::new("/dl/file.iso.part")
        );
    }

    #[test]
    fn rate_limit_plain_and_suffixed() {
        assert_eq!(parse_rate_limit("4096"), Some(4096));
        assert_eq!(parse_rate_limit("500k"), Some(500 * 1024));
        assert_eq!(parse_rate_limit("2M"), Some(2 * 1024 * 1024));
        assert_eq!(parse_rate_limit("1g"), Some(1024 * 1024 * 1024));
    }

    #[test]
    fn rate_limit_garbage_is_none() {
        assert_eq!(parse_rate_limit(""), None);
        assert_eq!(parse_rate_limit("fast"), None);
        assert_eq!(parse_rate_limit("k"), None);
    }
}
