//! Destination filename derivation from URLs.
//!
//! The task list carries URLs only; the local name comes from the last URL
//! path segment, sanitized for Linux filesystems.

/// Default filename when the URL path yields nothing usable.
const DEFAULT_FILENAME: &str = "download.bin";

/// Derives a safe local filename for saving `url`.
///
/// Uses the last non-empty path segment (query and fragment ignored),
/// sanitized so the result contains no `/`, NUL, or control characters and
/// no leading/trailing dots or spaces. Falls back to `"download.bin"`.
pub fn derive_filename(url: &str) -> String {
    let raw = match filename_from_url_path(url) {
        Some(c) => c,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// Extracts the last path segment from a URL, or `None` if the URL cannot
/// be parsed or the path is empty/root.
fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    // Path segments may be percent-encoded; decode for a readable name.
    let decoded = percent_decode(segment);
    Some(decoded)
}

fn percent_decode(segment: &str) -> String {
    fn hex_val(b: u8) -> Option<u8> {
        (b as char).to_digit(16).map(|v| v as u8)
    }

    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Replaces path separators, NUL, and control characters with `_`, collapses
/// runs of `_`, trims surrounding dots/spaces, and caps at 255 bytes.
fn sanitize_filename(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for c in name.chars() {
        let keep = !(c == '\0' || c == '/' || c == '\\' || c.is_control() || c == ' ' || c == '\t');
        if keep {
            out.push(c);
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');
    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}
