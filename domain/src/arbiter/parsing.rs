//! Answer extraction for arbitration.
//!
//! Pure text matching over participant messages; no I/O.
//!
//! | Priority | Pattern                          | Example                  |
//! |----------|----------------------------------|--------------------------|
//! | 1        | last `Answer:` line              | `**Final answer:** 42`   |
//! | 2        | text after the last `####`       | `#### 42`                |
//! | 3        | last number in the text          | `... so we get 42.`      |
//! | 4        | last non-empty line              | `Paris`                  |

use crate::message::Message;

/// Extract the answer a message commits to.
///
/// Returns `None` only for blank text.
pub fn extract_answer(text: &str) -> Option<String> {
    answer_line(text)
        .or_else(|| marker_answer(text))
        .or_else(|| last_number(text))
        .or_else(|| {
            text.lines()
                .map(str::trim)
                .rfind(|line| !line.is_empty())
                .map(str::to_string)
        })
}

/// Canonical form used to compare answers.
///
/// Numbers compare by value (`1,000.0` equals `1000`), everything else
/// case-insensitively with collapsed whitespace.
pub fn normalize_answer(answer: &str) -> String {
    let trimmed = answer
        .trim()
        .trim_matches('*')
        .trim()
        .trim_end_matches('.')
        .trim();

    let numeric: String = trimmed
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if let Ok(value) = numeric.parse::<f64>() {
        return value.to_string();
    }

    trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Latest message of each sender, ordered by the sender's first appearance
pub fn latest_by_sender(messages: &[Message]) -> Vec<&Message> {
    let mut latest: Vec<&Message> = Vec::new();
    for message in messages {
        match latest.iter_mut().find(|m| m.sender() == message.sender()) {
            Some(slot) => *slot = message,
            None => latest.push(message),
        }
    }
    latest
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

fn answer_line(text: &str) -> Option<String> {
    text.lines().rev().find_map(|line| {
        let line = line.trim().trim_start_matches('*').trim_start();
        let line = strip_prefix_ignore_case(line, "final ").unwrap_or(line);
        let rest = strip_prefix_ignore_case(line, "answer")?;
        let rest = rest.trim_start_matches('*').trim_start();
        let rest = rest.strip_prefix(':')?;
        let value = rest.trim().trim_matches('*').trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn marker_answer(text: &str) -> Option<String> {
    let index = text.rfind("####")?;
    let value = text[index + 4..].lines().next()?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn last_number(text: &str) -> Option<String> {
    text.split(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | ',' | '-')))
        .rfind(|token| token.chars().any(|c| c.is_ascii_digit()))
        .map(|token| {
            token
                .trim_end_matches(['.', ',', '-'])
                .trim_start_matches(['.', ','])
                .to_string()
        })
}
