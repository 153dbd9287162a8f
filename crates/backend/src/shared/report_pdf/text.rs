//! Text measurement for the base-14 Helvetica faces.
//!
//! Advance widths come from the Adobe font metrics of Helvetica and
//! Helvetica-Bold, in thousandths of the font size, indexed by WinAnsi code.

pub const ELLIPSIS: char = '…';

const TOLERANCE: f32 = 0.01;

/// Codes 0x20..=0x7E
#[rustfmt::skip]
const REGULAR_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Codes 0xA0..=0xFF
#[rustfmt::skip]
const REGULAR_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// WinAnsi byte for `c`, if the encoding has one
pub(super) fn win_ansi(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match c {
            '€' => Some(0x80),
            '‚' => Some(0x82),
            '„' => Some(0x84),
            '…' => Some(0x85),
            '‘' => Some(0x91),
            '’' => Some(0x92),
            '“' => Some(0x93),
            '”' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            _ => None,
        },
    }
}

/// Advance width of one glyph in thousandths of an em
fn glyph_units(c: char, bold: bool) -> u16 {
    // unencodable characters are drawn as '?'
    let byte = win_ansi(c).unwrap_or(b'?');
    match (byte, bold) {
        (0x20..=0x7E, false) => REGULAR_ASCII[(byte - 0x20) as usize],
        (0x20..=0x7E, true) => BOLD_ASCII[(byte - 0x20) as usize],
        (0xA0..=0xFF, false) => REGULAR_LATIN1[(byte - 0xA0) as usize],
        (0xA0..=0xFF, true) => BOLD_LATIN1[(byte - 0xA0) as usize],
        (0x82 | 0x91 | 0x92, false) => 222,
        (0x82 | 0x91 | 0x92, true) => 278,
        (0x84 | 0x93 | 0x94, false) => 333,
        (0x84 | 0x93 | 0x94, true) => 500,
        (0x85 | 0x97, _) => 1000,
        (0x95, _) => 350,
        _ => 556,
    }
}

pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_units(c, bold) as u32).sum();
    units as f32 * size / 1000.0
}

/// Byte length of the longest prefix of `word` that fits in `max_width`,
/// never less than one character
fn fitting_prefix(word: &str, max_width: f32, size: f32, bold: bool) -> usize {
    let mut width = 0.0;
    let mut end = 0;
    for (i, c) in word.char_indices() {
        width += glyph_units(c, bold) as f32 * size / 1000.0;
        if i > 0 && width > max_width + TOLERANCE {
            return i;
        }
        end = i + c.len_utf8();
    }
    end
}

/// Greedy word wrap against the measured width. Always returns at least one
/// line; words wider than a line are broken between characters.
pub fn wrap(text: &str, max_width: f32, size: f32, bold: bool) -> Vec<String> {
    let space = text_width(" ", size, bold);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0f32;

        for word in paragraph.split_whitespace() {
            let mut word = word;

            // hard-break words that cannot fit on any line
            while text_width(word, size, bold) > max_width + TOLERANCE {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                let (head, rest) = word.split_at(fitting_prefix(word, max_width, size, bold));
                lines.push(head.to_string());
                word = rest;
            }
            if word.is_empty() {
                continue;
            }

            let width = text_width(word, size, bold);
            if !current.is_empty() && current_width + space + width > max_width + TOLERANCE {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_width += space;
            }
            current.push_str(word);
            current_width += width;
        }

        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Keep the first `max_lines` lines, marking the cut on the last one kept
pub fn truncate_lines(mut lines: Vec<String>, max_lines: usize) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines.max(1));
    if let Some(last) = lines.last_mut() {
        last.pop();
        last.push(ELLIPSIS);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_helvetica_metrics() {
        assert!(close(text_width("0123456789", 10.0, false), 55.6));
        assert!(close(text_width("DE", 9.0, false), 12.501));
        assert!(close(text_width("Más", 10.0, false), 8.33 + 5.56 + 5.0));
        assert!(text_width("Total", 9.0, true) > text_width("Total", 9.0, false));
        // drawn as '?'
        assert!(close(text_width("Ж", 10.0, false), text_width("?", 10.0, false)));
    }

    #[test]
    fn test_wrap_by_words() {
        // uno 16.68, dos 16.12, tres 16.67, cuatro 27.79, cinco 23.34, space 2.78
        let lines = wrap("uno dos tres cuatro cinco", 50.0, 10.0, false);
        assert_eq!(lines, vec!["uno dos", "tres cuatro", "cinco"]);
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let lines = wrap("abcdefghijklmnopqrstuvwxyz", 50.0, 10.0, false);
        assert_eq!(lines, vec!["abcdefghij", "klmnopqrst", "uvwxyz"]);
    }

    #[test]
    fn test_uppercase_name_wraps_in_client_column() {
        let name = "DISTRIBUIDORA MAYORISTA DEL NORTE SA DE CV";
        // 205pt column less 3pt padding on each side
        let lines = wrap(name, 199.0, 9.0, false);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines.join(" "), name);
        for line in &lines {
            assert!(text_width(line, 9.0, false) <= 199.0, "{:?} overflows", line);
        }
    }

    #[test]
    fn test_bold_wraps_earlier() {
        // 67.8pt regular, 73.3pt bold at 10pt
        assert_eq!(wrap("Pedidos Abono", 70.0, 10.0, false).len(), 1);
        assert_eq!(wrap("Pedidos Abono", 70.0, 10.0, true).len(), 2);
    }

    #[test]
    fn test_wrap_empty_is_one_line() {
        assert_eq!(wrap("", 50.0, 10.0, false), vec![String::new()]);
        assert_eq!(wrap("   ", 50.0, 10.0, false), vec![String::new()]);
    }

    #[test]
    fn test_wrap_keeps_explicit_newlines() {
        assert_eq!(wrap("a\nb", 100.0, 10.0, false), vec!["a", "b"]);
    }

    #[test]
    fn test_truncate_marks_cut() {
        let lines = vec!["uno".to_string(), "dos".to_string(), "tres".to_string()];
        assert_eq!(truncate_lines(lines.clone(), 3), lines);
        assert_eq!(truncate_lines(lines, 2), vec!["uno", "do…"]);
    }
}
