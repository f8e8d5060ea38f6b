//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters that cannot appear raw in a URL path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/');

/// Encode a single path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Decode a percent-encoded string, keeping invalid UTF-8 lossy
pub fn decode(s: &str) -> String {
    percent_encoding::percent_decode_str(s)
        .decode_utf8_lossy()
        .into_owned()
}

/// Join the content root, a post folder and a relative asset path
///
/// # Examples
/// ```ignore
/// asset_url("post", "hello", "img.png") // -> "post/hello/img.png"
/// ```
pub fn asset_url(content_root: &str, folder: &str, path: &str) -> String {
    let root = content_root.trim_end_matches('/');
    let folder = encode_segment(folder);
    let path = path.trim_start_matches("./");

    if root.is_empty() {
        format!("{}/{}", folder, path)
    } else {
        format!("{}/{}/{}", root, folder, path)
    }
}

/// Whether a reference is absolute: has a URL scheme or starts with `/`
pub fn is_absolute(reference: &str) -> bool {
    if reference.starts_with('/') {
        return true;
    }

    match reference.find(':') {
        Some(pos) if pos > 0 => {
            let scheme = &reference[..pos];
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_url() {
        assert_eq!(asset_url("post", "abc", "img1.png"), "post/abc/img1.png");
        assert_eq!(asset_url("post/", "abc", "./img1.png"), "post/abc/img1.png");
        assert_eq!(asset_url("", "abc", "img1.png"), "abc/img1.png");
        assert_eq!(asset_url("post", "my post", "a.png"), "post/my%20post/a.png");
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("http://x/y.png"));
        assert!(is_absolute("https://x/y.png"));
        assert!(is_absolute("data:image/png;base64,AAAA"));
        assert!(is_absolute("/z.png"));
        assert!(is_absolute("//cdn.example.com/z.png"));
        assert!(!is_absolute("img1.png"));
        assert!(!is_absolute("images/a:b.png"));
        assert!(!is_absolute("1http:/x.png"));
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("post%20one"), "post one");
        assert_eq!(decode("%E4%B8%AD"), "中");
    }
}
