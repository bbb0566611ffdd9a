use heapless::String;

use crate::config::RX_BUFFER_LEN;

/// Text accumulated from the serial line during one read pass.
///
/// Each pass starts from an empty buffer. When the modem produces more than
/// [`RX_BUFFER_LEN`] bytes in a single pass the oldest half is dropped, so the
/// status line at the tail is never lost.
pub struct ReceiveBuffer {
    text: String<RX_BUFFER_LEN>,
}

impl Default for ReceiveBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiveBuffer {
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn push_str(&mut self, chunk: &str) {
        let mut rest = chunk;
        while !rest.is_empty() {
            let room = RX_BUFFER_LEN - self.text.len();
            if room == 0 {
                self.compact();
                continue;
            }
            let take = floor_char_boundary(rest, room);
            if take == 0 {
                // Next character is wider than the remaining room.
                self.compact();
                continue;
            }
            let (head, tail) = rest.split_at(take);
            // Cannot fail: `head` fits in the remaining capacity.
            let _ = self.text.push_str(head);
            rest = tail;
        }
    }

    pub fn push(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.push_str(c.encode_utf8(&mut utf8));
    }

    /// `true` when `token` occurs anywhere after the first byte.
    ///
    /// An occurrence at offset 0 is the echo of the command that was just
    /// sent, not the modem's status line.
    pub fn contains_after_start(&self, token: &str) -> bool {
        find_after_start(self.as_str(), token).is_some()
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.text.contains(phrase)
    }

    /// Drop the oldest half. The kept text is led by a line feed so nothing
    /// the modem sent lands at offset 0, where it would pass for an echo.
    fn compact(&mut self) {
        let keep_from = ceil_char_boundary(self.text.as_str(), self.text.len() / 2);
        let mut kept: String<RX_BUFFER_LEN> = String::new();
        let _ = kept.push('\n');
        let _ = kept.push_str(&self.text[keep_from..]);
        self.text = kept;
    }
}

/// Offset of the first occurrence of `token` at an offset strictly greater
/// than zero.
pub fn find_after_start(text: &str, token: &str) -> Option<usize> {
    text.match_indices(token)
        .map(|(idx, _)| idx)
        .find(|&idx| idx > 0)
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if max >= s.len() {
        return s.len();
    }
    let mut idx = max;
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(s: &str, min: usize) -> usize {
    let mut idx = min;
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn echo_at_start_is_not_a_match() {
        let mut buf = ReceiveBuffer::new();
        buf.push_str("OK");
        assert!(!buf.contains_after_start("OK"));

        buf.push_str("\r\n\r\nOK\r\n");
        assert!(buf.contains_after_start("OK"));
        assert_eq!(find_after_start(buf.as_str(), "OK"), Some(6));
    }

    #[test]
    fn overflow_keeps_the_tail() {
        let mut buf = ReceiveBuffer::new();
        for _ in 0..RX_BUFFER_LEN {
            buf.push('x');
        }
        assert_eq!(buf.len(), RX_BUFFER_LEN);

        buf.push_str("\r\nOK\r\n");
        assert!(buf.len() <= RX_BUFFER_LEN);
        assert!(buf.as_str().ends_with("\r\nOK\r\n"));
        assert!(buf.contains_after_start("OK"));
    }

    #[test]
    fn token_at_the_cut_is_not_an_echo() {
        let half = RX_BUFFER_LEN / 2;
        let mut buf = ReceiveBuffer::new();
        buf.push_str(&"x".repeat(half));
        buf.push_str("OK");
        buf.push_str(&"x".repeat(half - 2));
        assert_eq!(buf.len(), RX_BUFFER_LEN);

        buf.push('y');
        assert!(buf.as_str().ends_with('y'));
        assert!(buf.contains_after_start("OK"));
    }

    #[test]
    fn multibyte_characters_survive_compaction() {
        let mut buf = ReceiveBuffer::new();
        for _ in 0..(RX_BUFFER_LEN / 3 + 1) {
            buf.push('€');
        }
        assert!(buf.as_str().trim_start_matches('\n').chars().all(|c| c == '€'));
    }
}
