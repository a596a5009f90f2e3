//! Small utility helpers used across modules.

/// File-name friendly account: trimmed, spaces to underscores, lower-cased.
pub fn sanitize_account(account: &str) -> String {
  account.trim().replace(' ', "_").to_lowercase()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}
