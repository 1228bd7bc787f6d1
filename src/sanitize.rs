//! Sanitizing and cleaning of strings bound for `NET USE`.
//!
//! *Sanitizing* removes characters that can never be part of the value (or, for
//! the shell, escapes them). *Cleaning* trims or case-folds a value without
//! changing what it means.

const LOGON_FORBIDDEN: &[char] = &[
    '"', '/', '[', ']', ':', ';', '|', '=', ',', '+', '*', '?', '<', '>', '\0',
];
const PATH_FORBIDDEN: &[char] = &['<', '>', '"', '/', '|', '?', '*'];
const FILE_NAME_FORBIDDEN: &[char] = &[':', '\\'];

/// Escapes every double quote so `value` can sit inside a quoted shell argument.
pub fn sanitize_for_shell(value: &str) -> String {
    value.replace('"', r#"\""#)
}

/// Removes characters that cannot appear in a Windows logon or `domain\logon` name.
pub fn sanitize_logon(value: &str) -> String {
    value.chars().filter(|c| !LOGON_FORBIDDEN.contains(c)).collect()
}

/// Removes characters that cannot appear in a Windows path.
///
/// Backslashes and colons are kept since paths are built from them.
pub fn sanitize_path(value: &str) -> String {
    value.chars().filter(|&c| !is_path_forbidden(c)).collect()
}

/// Removes characters that cannot appear in a single Windows file name.
pub fn sanitize_file_name(value: &str) -> String {
    value
        .chars()
        .filter(|&c| !is_path_forbidden(c) && !FILE_NAME_FORBIDDEN.contains(&c))
        .collect()
}

fn is_path_forbidden(c: char) -> bool {
    c < ' ' || PATH_FORBIDDEN.contains(&c)
}

/// Upper-cases a drive token and drops surrounding whitespace and any trailing
/// `:` or `\`. `"  e:\ "` becomes `"E"`.
pub fn clean_drive_letter(value: &str) -> String {
    value
        .trim()
        .trim_end_matches([':', '\\'])
        .to_uppercase()
}

/// Drops surrounding whitespace from a logon name.
pub fn clean_username(value: &str) -> &str {
    value.trim()
}

/// Drops surrounding whitespace and trailing backslashes from a UNC path.
pub fn clean_unc_path(value: &str) -> &str {
    value.trim().trim_end_matches('\\')
}
