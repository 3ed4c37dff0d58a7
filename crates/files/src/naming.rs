//! Stored-name derivation for uploads.
//!
//! Browsers send the original file name as typed by the user, sometimes percent-encoded, and
//! often containing characters that are illegal on one filesystem or another. These helpers turn
//! that into a [`StoredName`] and generate the `_N` disambiguation candidates used on collision.

use crate::FALLBACK_NAME;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sharebox_types::StoredName;

/// Characters left unescaped by a URI-component encoding (RFC 3986 unreserved plus `!*'()`).
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-decodes `raw` as UTF-8, returning it unchanged if the result is not valid UTF-8.
pub fn decode_original_name(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_owned(),
    }
}

/// Percent-encodes a single URL path component.
pub fn encode_component(name: &str) -> String {
    utf8_percent_encode(name, URI_COMPONENT).to_string()
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || ('\0'..='\u{1f}').contains(&c)
}

/// Decodes and cleans an uploaded file name into a safe stored name.
///
/// Every forbidden character is replaced by `_`; nothing else is touched, so non-ASCII names
/// survive intact. A name that ends up empty, `.` or `..` becomes [`FALLBACK_NAME`].
pub fn clean_file_name(original: &str) -> StoredName {
    let cleaned: String = decode_original_name(original)
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();

    StoredName::new(&cleaned).unwrap_or_else(|_| fallback_name())
}

fn fallback_name() -> StoredName {
    StoredName::new(FALLBACK_NAME).expect("fallback name is a valid stored name")
}

/// Splits a name into stem and extension, the extension including its dot.
///
/// The extension starts at the last `.` unless that dot is the first character, so
/// `archive.tar.gz` splits as (`archive.tar`, `.gz`) and `.profile` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Returns the `attempt`-th candidate for `base`: the name itself for 0, else `stem_N.ext`.
pub fn candidate_name(base: &StoredName, attempt: usize) -> StoredName {
    if attempt == 0 {
        return base.clone();
    }
    let (stem, ext) = split_extension(base.as_str());
    StoredName::new(format!("{}_{}{}", stem, attempt, ext))
        .expect("suffixing a valid stored name keeps it valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_replaces_forbidden_characters() {
        assert_eq!(
            clean_file_name("a<b>c:d\"e|f?g*h.txt").as_str(),
            "a_b_c_d_e_f_g_h.txt"
        );
        assert_eq!(clean_file_name("dir/sub\\file.pdf").as_str(), "dir_sub_file.pdf");
        assert_eq!(clean_file_name("tab\there\u{1f}.txt").as_str(), "tab_here_.txt");
    }

    #[test]
    fn test_clean_decodes_percent_encoding() {
        assert_eq!(
            clean_file_name("%E5%B9%B4%E5%BA%A6%E6%8A%A5%E5%91%8A.docx").as_str(),
            "年度报告.docx"
        );
        assert_eq!(clean_file_name("my%20notes.txt").as_str(), "my notes.txt");
        // Encoded separators are cleaned after decoding
        assert_eq!(clean_file_name("..%2F..%2Fetc%2Fpasswd").as_str(), ".._.._etc_passwd");
    }

    #[test]
    fn test_clean_keeps_raw_name_when_decoding_is_not_utf8() {
        assert_eq!(clean_file_name("bad%FFname.txt").as_str(), "bad%FFname.txt");
    }

    #[test]
    fn test_clean_falls_back_for_unusable_names() {
        assert_eq!(clean_file_name("").as_str(), FALLBACK_NAME);
        assert_eq!(clean_file_name(".").as_str(), FALLBACK_NAME);
        assert_eq!(clean_file_name("..").as_str(), FALLBACK_NAME);
        assert_eq!(clean_file_name("%2E%2E").as_str(), FALLBACK_NAME);
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("report.pdf"), ("report", ".pdf"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension(".profile"), (".profile", ""));
        assert_eq!(split_extension("README"), ("README", ""));
    }

    #[test]
    fn test_candidate_names() {
        let base = StoredName::new("report.pdf").unwrap();
        assert_eq!(candidate_name(&base, 0).as_str(), "report.pdf");
        assert_eq!(candidate_name(&base, 1).as_str(), "report_1.pdf");
        assert_eq!(candidate_name(&base, 12).as_str(), "report_12.pdf");

        let dotfile = StoredName::new(".env").unwrap();
        assert_eq!(candidate_name(&dotfile, 2).as_str(), ".env_2");
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("my notes.txt"), "my%20notes.txt");
        assert_eq!(encode_component("a_b-c.(1)!.pdf"), "a_b-c.(1)!.pdf");
        assert_eq!(encode_component("年.txt"), "%E5%B9%B4.txt");
        assert_eq!(encode_component("a%b#c"), "a%25b%23c");
    }
}
