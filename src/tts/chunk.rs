//! Splits text into request-sized chunks for the TTS endpoint.
//!
//! Whole sentences are packed together while they fit. A sentence that is
//! too long on its own is packed word by word, and a single word longer than
//! the limit is cut on character boundaries.

/// Characters that end a sentence when followed by whitespace or end of text.
const SENTENCE_ENDERS: &[char] = &['.', '!', '?', ';', ':'];

/// Full-width enders that end a sentence unconditionally.
const CJK_ENDERS: &[char] = &['。', '！', '？', '；'];

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Whitespace runs are collapsed to single spaces. Returns an empty vector
/// for blank input. A `max_chars` of 0 is treated as 1.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max = max_chars.max(1);
    let mut packer = Packer::new(max);

    for sentence in sentences(text) {
        if char_len(&sentence) <= max {
            packer.push(&sentence);
            continue;
        }
        for word in sentence.split_whitespace() {
            if char_len(word) <= max {
                packer.push(word);
            } else {
                packer.flush();
                for piece in split_chars(word, max) {
                    packer.push(&piece);
                }
            }
        }
    }

    packer.finish()
}

/// Greedy accumulator joining pieces with a single space.
struct Packer {
    max: usize,
    current: String,
    current_len: usize,
    chunks: Vec<String>,
}

impl Packer {
    fn new(max: usize) -> Self {
        Self {
            max,
            current: String::new(),
            current_len: 0,
            chunks: Vec::new(),
        }
    }

    fn push(&mut self, piece: &str) {
        let len = char_len(piece);
        if self.current_len > 0 && self.current_len + 1 + len > self.max {
            self.flush();
        }
        if self.current_len > 0 {
            self.current.push(' ');
            self.current_len += 1;
        }
        self.current.push_str(piece);
        self.current_len += len;
    }

    fn flush(&mut self) {
        if self.current_len > 0 {
            self.chunks.push(std::mem::take(&mut self.current));
            self.current_len = 0;
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

/// Break `text` into whitespace-normalised sentences.
fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        buf.push(c);
        let ends = CJK_ENDERS.contains(&c)
            || (SENTENCE_ENDERS.contains(&c)
                && chars.peek().map_or(true, |next| next.is_whitespace()));
        if ends {
            push_normalised(&mut out, &buf);
            buf.clear();
        }
    }
    push_normalised(&mut out, &buf);
    out
}

fn push_normalised(out: &mut Vec<String>, raw: &str) {
    let normalised = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !normalised.is_empty() {
        out.push(normalised);
    }
}

fn split_chars(word: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars.chunks(max).map(|c| c.iter().collect()).collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
