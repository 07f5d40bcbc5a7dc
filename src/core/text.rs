//! Text helpers for embed field bodies.
//!
//! Field bodies are Discord markdown: questions are rendered as a block quote
//! wrapped in a masked link back to the original message, so square brackets
//! in user text have to be escaped before anything else happens to it.

use std::fmt::Display;

/// Block-quote marker prepended to every quoted line.
pub const QUOTE_MARKER: &str = "> ";

/// Builds a jump link to a message.
#[must_use]
pub fn message_link(
    server_id: impl Display,
    channel_id: impl Display,
    message_id: impl Display,
) -> String {
    format!("https://discord.com/channels/{server_id}/{channel_id}/{message_id}")
}

/// Number of characters in `text`, which is what Discord limits count.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Escapes `[` and `]` so user text cannot close the masked link.
#[must_use]
pub fn escape_markup(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

/// Escaped question text with each line trimmed and re-prefixed as a quote.
///
/// The first line carries no marker; callers open the quote themselves.
#[must_use]
pub fn quote_lines(question: &str) -> String {
    escape_markup(question)
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(&format!("\n{QUOTE_MARKER}"))
}

/// Body of a question that fits in one field: the quoted question linked to
/// its origin, followed by the answer on the next line.
#[must_use]
pub fn whole_body(question: &str, link: &str, answer: &str) -> String {
    format!("[{QUOTE_MARKER}{}]({link})\n{answer}", quote_lines(question))
}

/// Discord rejects embed field values longer than this.
pub const FIELD_VALUE_LIMIT: usize = 1024;

/// Splits a question into linked block-quote chunks.
///
/// Lines are trimmed and re-quoted as in [`quote_lines`]. A chunk is closed
/// once it exceeds `ceiling` characters, or earlier if the next word would
/// push it, closing link markup included, past [`FIELD_VALUE_LIMIT`].
#[must_use]
pub fn question_chunks(question: &str, link: &str, ceiling: usize) -> Vec<String> {
    let suffix = format!("]({link})");
    let quoted = quote_lines(question);
    let words = quoted.split(' ').map(str::to_string);
    let hard_cap = FIELD_VALUE_LIMIT.saturating_sub(char_len(&suffix));

    fill_chunks(words, &format!("[{QUOTE_MARKER}"), ceiling, hard_cap)
        .into_iter()
        .map(|chunk| format!("{chunk}{suffix}"))
        .collect()
}

/// Splits an answer into plain chunks closed once they exceed `ceiling`,
/// never longer than [`FIELD_VALUE_LIMIT`].
#[must_use]
pub fn answer_chunks(answer: &str, ceiling: usize) -> Vec<String> {
    let escaped = escape_markup(answer);
    fill_chunks(escaped.split(' ').map(str::to_string), "", ceiling, FIELD_VALUE_LIMIT)
}

/// Cuts a word into pieces of at most `room` characters.
fn split_word(word: String, room: usize) -> Vec<String> {
    if char_len(&word) <= room {
        return vec![word];
    }
    word.chars()
        .collect::<Vec<_>>()
        .chunks(room)
        .map(|piece| piece.iter().collect())
        .collect()
}

fn fill_chunks(
    words: impl Iterator<Item = String>,
    prefix: &str,
    ceiling: usize,
    hard_cap: usize,
) -> Vec<String> {
    let room = hard_cap.saturating_sub(char_len(prefix)).max(1);
    let mut chunks = Vec::new();
    let mut chunk = prefix.to_string();
    let mut chunk_len = char_len(prefix);
    let mut empty = true;

    for word in words.flat_map(|word| split_word(word, room)) {
        let word_len = char_len(&word);
        if !empty && (chunk_len > ceiling || chunk_len + 1 + word_len > hard_cap) {
            chunks.push(std::mem::replace(&mut chunk, prefix.to_string()));
            chunk_len = char_len(prefix);
            empty = true;
        }
        if !empty {
            chunk.push(' ');
            chunk_len += 1;
        }
        chunk_len += word_len;
        chunk.push_str(&word);
        empty = false;
    }
    chunks.push(chunk);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = "https://discord.com/channels/1/2/3";

    #[test]
    fn test_message_link_format() {
        assert_eq!(
            message_link(328_399_532_368_855_041_u64, 508_588_908_829_736_970_u64, "770767582244503622"),
            "https://discord.com/channels/328399532368855041/508588908829736970/770767582244503622"
        );
    }

    #[test]
    fn test_escape_markup_brackets() {
        assert_eq!(escape_markup("see [this] link"), "see \\[this\\] link");
        assert_eq!(escape_markup("plain"), "plain");
    }

    #[test]
    fn test_quote_lines_prefixes_every_line() {
        assert_eq!(quote_lines("first\n  second \nthird"), "first\n> second\n> third");
    }

    #[test]
    fn test_whole_body_layout() {
        assert_eq!(
            whole_body("What's your [favorite] color?", LINK, "Blue"),
            format!("[> What's your \\[favorite\\] color?]({LINK})\nBlue")
        );
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = question_chunks("short question", LINK, 900);
        assert_eq!(chunks, vec![format!("[> short question]({LINK})")]);
        assert_eq!(answer_chunks("short answer", 950), vec!["short answer".to_string()]);
    }

    #[test]
    fn test_chunks_respect_soft_ceiling() {
        let answer = "word ".repeat(600);
        let chunks = answer_chunks(answer.trim_end(), 950);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            // ceiling plus one separator and one word of overflow
            assert!(char_len(chunk) <= 950 + 1 + 4, "chunk too long: {}", char_len(chunk));
        }
        assert_eq!(chunks.join(" "), answer.trim_end());
    }

    #[test]
    fn test_question_chunks_requote_newlines() {
        let chunks = question_chunks("line one\nline two", LINK, 900);
        assert_eq!(chunks, vec![format!("[> line one\n> line two]({LINK})")]);
    }

    #[test]
    fn test_question_chunks_reconstruct_text() {
        let question = format!("{} [x]", "lorem ipsum dolor ".repeat(120));
        let chunks = question_chunks(&question, LINK, 900);
        assert!(chunks.len() > 1);

        let suffix = format!("]({LINK})");
        let rebuilt = chunks
            .iter()
            .map(|c| {
                c.strip_prefix("[> ")
                    .and_then(|c| c.strip_suffix(&suffix))
                    .unwrap_or_default()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rebuilt, escape_markup(&question));
    }

    #[test]
    fn test_question_chunks_trim_lines_like_whole_body() {
        let chunks = question_chunks("  line one  \n   line two ", LINK, 900);
        assert_eq!(chunks, vec![format!("[> {}]({LINK})", quote_lines("line one\nline two"))]);
    }

    #[test]
    fn test_long_url_never_overflows_field() {
        let url = format!("https://example.com/{}", "a".repeat(100));
        let answer = format!("{} {url} and more words after", "word ".repeat(190).trim_end());
        let chunks = answer_chunks(&answer, 950);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(char_len(chunk) <= FIELD_VALUE_LIMIT, "answer chunk too long: {}", char_len(chunk));
        }
        assert!(chunks.iter().any(|c| c.contains(&url)));

        let question = format!("{} {url} right?", "why ".repeat(225).trim_end());
        for chunk in question_chunks(&question, LINK, 900) {
            assert!(char_len(&chunk) <= FIELD_VALUE_LIMIT, "question chunk too long: {}", char_len(&chunk));
            assert!(chunk.ends_with(&format!("]({LINK})")));
        }
    }

    #[test]
    fn test_single_huge_word_is_cut() {
        let blob = "x".repeat(3000);
        let chunks = answer_chunks(&blob, 950);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| char_len(c) <= FIELD_VALUE_LIMIT));
        assert_eq!(chunks.concat(), blob);

        for chunk in question_chunks(&blob, LINK, 900) {
            assert!(char_len(&chunk) <= FIELD_VALUE_LIMIT);
        }
    }
}
