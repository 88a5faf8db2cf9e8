//! Prompt detection over raw terminal output

/// Upper bound on output buffered while waiting for one prompt
pub const MAX_REPLY_BYTES: usize = 1024 * 1024;

/// Strip ANSI escape sequences (CSI and OSC) from terminal output.
///
/// Carriage returns are kept; the controller's line splitting drops them.
pub fn strip_ansi_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some(&'[') => {
                chars.next();
                // parameter and intermediate bytes (0x20-0x3F)
                while chars
                    .peek()
                    .is_some_and(|next| next.is_ascii() && (0x20..=0x3F).contains(&(*next as u8)))
                {
                    chars.next();
                }
                // final byte (0x40-0x7E)
                if chars
                    .peek()
                    .is_some_and(|next| next.is_ascii() && (0x40..=0x7E).contains(&(*next as u8)))
                {
                    chars.next();
                }
            }
            Some(&']') => {
                chars.next();
                // terminated by BEL or ESC \
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            Some(_) => {
                chars.next();
            }
            None => {}
        }
    }
    result
}

/// Bytes after a line start examined for the prompt, beyond its own length
const PROMPT_SLACK: usize = 64;

/// Accumulates console output and splits it at the prompt marker.
///
/// The marker only counts at the start of a line, so listing text that
/// happens to contain the prompt does not end a reply. Bytes are kept
/// undecoded until a reply is cut, and each complete line is examined once.
#[derive(Debug)]
pub struct PromptScanner {
    prompt: String,
    raw: Vec<u8>,
    line_start: usize,
    scanned: usize,
}

impl PromptScanner {
    /// Scanner for the given prompt text
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            raw: Vec::new(),
            line_start: 0,
            scanned: 0,
        }
    }

    /// Bytes buffered and not yet returned
    pub fn buffered(&self) -> usize {
        self.raw.len()
    }

    /// Append a chunk read from the terminal
    pub fn push(&mut self, chunk: &[u8]) {
        self.raw.extend_from_slice(chunk);
    }

    /// If a prompt has arrived, return the text before it and keep
    /// whatever followed it for the next reply.
    pub fn take_reply(&mut self) -> Option<String> {
        loop {
            if let Some(end) = self.prompt_at(self.line_start) {
                let reply = strip_ansi_escapes(&String::from_utf8_lossy(
                    &self.raw[..self.line_start],
                ));
                self.raw.drain(..end);
                self.line_start = 0;
                self.scanned = 0;
                return Some(reply);
            }
            let from = self.scanned.max(self.line_start);
            match self.raw[from..].iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    self.line_start = from + pos + 1;
                    self.scanned = self.line_start;
                }
                None => {
                    self.scanned = self.raw.len();
                    return None;
                }
            }
        }
    }

    /// Raw offset just past the prompt and its padding, if the line at
    /// `start` begins with the prompt
    fn prompt_at(&self, start: usize) -> Option<usize> {
        let limit = self.raw.len().min(start + self.prompt.len() + PROMPT_SLACK);
        let window = strip_ansi_escapes(&String::from_utf8_lossy(&self.raw[start..limit]));
        if !window.starts_with(&self.prompt) {
            return None;
        }
        let mut end = start;
        while end < limit {
            end += 1;
            if strip_ansi_escapes(&String::from_utf8_lossy(&self.raw[start..end])) == self.prompt {
                break;
            }
        }
        Some(skip_padding(&self.raw, end))
    }

    /// Discard anything buffered
    pub fn reset(&mut self) {
        self.raw.clear();
        self.line_start = 0;
        self.scanned = 0;
    }
}

/// Skip spaces and complete CSI sequences that trail the prompt
fn skip_padding(raw: &[u8], mut pos: usize) -> usize {
    while pos < raw.len() {
        if raw[pos] == b' ' {
            pos += 1;
            continue;
        }
        if raw[pos] != 0x1b || raw.get(pos + 1) != Some(&b'[') {
            break;
        }
        let params = raw[pos + 2..]
            .iter()
            .take_while(|b| (0x20..=0x3F).contains(*b))
            .count();
        match raw.get(pos + 2 + params) {
            Some(b) if (0x40..=0x7E).contains(b) => pos += 3 + params,
            _ => break,
        }
    }
    pos
}

/// Remove the terminal's echo of `sent` from the front of `reply`
pub fn strip_echo(reply: &str, sent: &str) -> String {
    let body = reply.trim_start_matches(['\r', '\n']);
    let (first, rest) = match body.find('\n') {
        Some(idx) => (&body[..idx], &body[idx + 1..]),
        None => (body, ""),
    };
    if first.trim() == sent.trim() {
        rest.to_string()
    } else {
        reply.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_escapes() {
        let input = "\x1b[32mGlobal\x1b[0m  node1\r\n";
        assert_eq!(strip_ansi_escapes(input), "Global  node1\r\n");
        assert_eq!(strip_ansi_escapes("\x1b]0;title\x07text"), "text");
        assert_eq!(strip_ansi_escapes("\x1b=ready"), "ready");
    }

    #[test]
    fn test_prompt_split_across_chunks() {
        let mut scanner = PromptScanner::new("netutil>");
        scanner.push(b"Global  node1  dbuser\r\nnetu");
        assert!(scanner.take_reply().is_none());
        scanner.push(b"til> ");
        assert_eq!(scanner.take_reply().unwrap(), "Global  node1  dbuser\r\n");
        assert_eq!(scanner.buffered(), 0);
    }

    #[test]
    fn test_prompt_keeps_following_output() {
        let mut scanner = PromptScanner::new("netutil>");
        scanner.push(b"banner\r\nnetutil> SHOW");
        assert_eq!(scanner.take_reply().unwrap(), "banner\r\n");
        scanner.push(b" * LOGIN *\r\nnetutil> ");
        assert_eq!(scanner.take_reply().unwrap(), "SHOW * LOGIN *\r\n");
    }

    #[test]
    fn test_prompt_behind_color_codes() {
        let mut scanner = PromptScanner::new("netutil>");
        scanner.push(b"ok\r\n\x1b[1mnetutil>\x1b[0m ");
        assert_eq!(scanner.take_reply().unwrap(), "ok\r\n");
    }

    #[test]
    fn test_prompt_text_inside_a_line_is_not_a_prompt() {
        let mut scanner = PromptScanner::new("netutil>");
        scanner.push(b"Global  node1  netutil>\r\nnotice: netutil> busy\r\n");
        assert!(scanner.take_reply().is_none());
        scanner.push(b"netutil> ");
        assert_eq!(
            scanner.take_reply().unwrap(),
            "Global  node1  netutil>\r\nnotice: netutil> busy\r\n"
        );
    }

    #[test]
    fn test_back_to_back_prompts() {
        let mut scanner = PromptScanner::new("netutil>");
        scanner.push(b"quiesced\r\nnetutil> STOP 42\r\naccepted\r\nnetutil> ");
        assert_eq!(scanner.take_reply().unwrap(), "quiesced\r\n");
        assert_eq!(scanner.take_reply().unwrap(), "STOP 42\r\naccepted\r\n");
        assert!(scanner.take_reply().is_none());
    }

    #[test]
    fn test_split_character_after_prompt_survives() {
        let mut scanner = PromptScanner::new("netutil>");
        scanner.push(b"ok\r\nnetutil> \xc3");
        assert_eq!(scanner.take_reply().unwrap(), "ok\r\n");
        assert_eq!(scanner.buffered(), 1);
        scanner.push(b"\xa9t\xc3\xa9\r\nnetutil> ");
        assert_eq!(scanner.take_reply().unwrap(), "\u{e9}t\u{e9}\r\n");
    }

    #[test]
    fn test_reset() {
        let mut scanner = PromptScanner::new("netutil>");
        scanner.push(b"partial\r\nnetu");
        assert!(scanner.take_reply().is_none());
        scanner.reset();
        assert_eq!(scanner.buffered(), 0);
        scanner.push(b"netutil> ");
        assert_eq!(scanner.take_reply().unwrap(), "");
    }

    #[test]
    fn test_strip_echo() {
        let reply = "SHOW GLOBAL LOGIN *\r\nGlobal node1 dbuser\r\n";
        assert_eq!(
            strip_echo(reply, "SHOW GLOBAL LOGIN *"),
            "Global node1 dbuser\r\n"
        );
        assert_eq!(strip_echo("unrelated\r\n", "STOP *"), "unrelated\r\n");
        assert_eq!(strip_echo("STOP *\r\n", "STOP *"), "");
    }
}
