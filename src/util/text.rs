use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Terminal columns occupied by `s`.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Byte offset of the longest prefix of `s` that fits in `cols` columns.
fn prefix_end(s: &str, cols: usize) -> usize {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > cols {
            return idx;
        }
        used += w;
    }
    s.len()
}

/// Shorten `s` to at most `max_width` columns, marking the cut with `...`.
///
/// Widths of three columns or fewer leave no room for the marker, so the text is
/// simply clipped. Returns the input unchanged (borrowed) when it already fits.
///
/// ```
/// use econ_atlas::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Market Design", 20), "Market Design");
/// assert_eq!(truncate_to_width("Market Design", 9), "Market...");
/// assert_eq!(truncate_to_width("Market", 2), "Ma");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS.len() {
        return Cow::Owned(s[..prefix_end(s, max_width)].to_string());
    }
    let end = prefix_end(s, max_width - ELLIPSIS.len());
    Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
}

fn is_stripped_control(b: u8) -> bool {
    b == 0x7f || (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r'))
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ST`) sequences are dropped
/// whole; a lone ESC and C0 controls other than tab, newline, and carriage
/// return are dropped individually. Clean input is returned borrowed.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().any(|&b| b == 0x1b || is_stripped_control(b)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b => {
                i += 1;
                match bytes.get(i) {
                    Some(b'[') => {
                        i += 1;
                        while let Some(&c) = bytes.get(i) {
                            i += 1;
                            if (0x40..=0x7e).contains(&c) {
                                break;
                            }
                        }
                    }
                    Some(b']') => {
                        i += 1;
                        while let Some(&c) = bytes.get(i) {
                            if c == 0x07 {
                                i += 1;
                                break;
                            }
                            if c == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                                i += 2;
                                break;
                            }
                            i += 1;
                        }
                    }
                    _ => {}
                }
            }
            b if is_stripped_control(b) => i += 1,
            _ => {
                let start = i;
                while i < bytes.len() && bytes[i] != 0x1b && !is_stripped_control(bytes[i]) {
                    i += 1;
                }
                // Only ASCII bytes end a run, so the slice stays on char boundaries.
                out.push_str(&s[start..i]);
            }
        }
    }
    Cow::Owned(out)
}
