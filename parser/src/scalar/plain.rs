use std::borrow::Cow;

use super::Folder;
use crate::{char_traits::is_blank, line::lines};

/// Resolve the value of a plain scalar.
///
/// `raw` spans from the first to the last non-blank character of the scalar. A single-line scalar
/// is its own value.
pub(crate) fn resolve(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['\n', '\r']) {
        return Cow::Borrowed(raw);
    }
    let mut folder = Folder::default();
    for line in lines(raw) {
        folder.line(line.trim_matches(is_blank));
    }
    Cow::Owned(folder.finish())
}

#[cfg(test)]
mod test {
    use std::borrow::Cow;

    use super::resolve;

    #[test]
    fn test_single_line() {
        assert!(matches!(resolve("a b  c"), Cow::Borrowed("a b  c")));
    }

    #[test]
    fn test_folding() {
        assert_eq!(resolve("a\n  b\n\tc"), "a b c");
        assert_eq!(resolve("trimmed\n\n\n\nlines"), "trimmed\n\n\nlines");
        assert_eq!(resolve("a  \n\n  b"), "a\nb");
        assert_eq!(resolve("a\r\n\r\nb"), "a\nb");
    }
}
