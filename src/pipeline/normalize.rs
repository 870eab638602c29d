//! Text normalisation: fit one ad asset into its character window.
//!
//! Language models are good at persuasive copy and bad at counting. A
//! headline asked to stay under 30 characters regularly comes back at 34,
//! and a description that should land between 80 and 90 characters often
//! stops at 62 or runs to 110 with a dangling "for the". Ad platforms reject
//! over-length assets outright, and truncated fragments read as broken copy,
//! so every string the model returns passes through [`normalize`] before it
//! reaches an [`crate::output::AdAssetSet`].
//!
//! ## Rule Order
//!
//! 1. **Truncate** at the last whitespace at or before `hard_limit`
//!    (hard cut when a single token is longer than the window)
//! 2. **Strip hanging words** such as "for", "the", "&", "Secure", repeatedly
//! 3. **Complete the sentence**: cut back to the last `.`, `!` or `?`
//! 4. **Pad** short text with generic calls to action, never past `hard_limit`;
//!    when the greedy pass falls short, any suffix combination that fits wins
//!
//! All lengths are measured in Unicode scalar values (`char`s), not bytes.

/// Trailing words and symbols that leave an asset reading as unfinished.
///
/// Compared case-insensitively against the final whitespace-delimited token.
pub const HANGING_WORDS: &[&str] = &[
    "for", "with", "and", "the", "our", "get", "on", "a", "your", "free", "of", "in", "to", "is",
    "or", "by", "&", "+", "-", "secure", "start", "find", "compare",
];

/// Generic call-to-action suffixes used to pad short text, longest first.
///
/// Each starts with a space so it can be appended directly.
pub const PADDING_SUFFIXES: &[&str] = &[
    " Visit our official site now to explore all benefits and start your journey today.",
    " Get started today for the best results and take advantage of our limited offer.",
    " Click here to learn more and see if you qualify for our exclusive offer today!",
    " Secure your results and start today with our expert team.",
    " Learn more at our site today.",
];

const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Fit `text` into at most `hard_limit` characters, ending on a complete clause.
///
/// When `min_len > 0` and the cleaned text is shorter than `min_len`, padding
/// suffixes are appended (longest first, skipping any that would overflow
/// `hard_limit`) until the minimum is reached. If that leaves the text short,
/// every combination of suffixes is tried and the first one that fits the
/// window is used. Padding is best-effort: the result can still be shorter
/// than `min_len` when no combination fits, but it is never longer than
/// `hard_limit`.
pub fn normalize(text: &str, hard_limit: usize, min_len: usize) -> String {
    let text = truncate_at_word(text.trim(), hard_limit);
    let text = strip_hanging_words(text);
    let text = complete_sentence(text);

    if min_len > 0 && char_len(text) < min_len {
        pad_to_min(text, hard_limit, min_len)
    } else {
        text.to_string()
    }
}

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Whether `s` ends in `.`, `!` or `?`.
pub fn ends_with_terminal(s: &str) -> bool {
    s.ends_with(TERMINAL_PUNCTUATION)
}

// ── Rule 1: Truncate at a word boundary ──────────────────────────────────────

fn truncate_at_word(text: &str, limit: usize) -> &str {
    let Some((cut, next)) = text.char_indices().nth(limit) else {
        return text;
    };
    let prefix = &text[..cut];

    // The boundary falls exactly at `limit`: the whole prefix is whole words.
    if next.is_whitespace() {
        return prefix.trim_end();
    }

    match prefix.rfind(char::is_whitespace) {
        Some(space) if space > 0 => prefix[..space].trim_end(),
        _ => prefix,
    }
}

// ── Rule 2: Strip hanging words ──────────────────────────────────────────────

fn strip_hanging_words(mut text: &str) -> &str {
    // Each pass removes one token, so the token count bounds the loop.
    let max_passes = text.split_whitespace().count();

    for _ in 0..max_passes {
        let start = text
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());
        let last = &text[start..];
        if !is_hanging(last) {
            break;
        }
        text = text[..start].trim_end();
    }

    text
}

fn is_hanging(token: &str) -> bool {
    HANGING_WORDS.iter().any(|w| token.eq_ignore_ascii_case(w))
}

// ── Rule 3: Complete the sentence ────────────────────────────────────────────

fn complete_sentence(text: &str) -> &str {
    if ends_with_terminal(text) {
        return text;
    }
    match text.rfind(TERMINAL_PUNCTUATION) {
        // Terminal punctuation is ASCII, so `i + 1` is a char boundary.
        Some(i) => text[..=i].trim_end(),
        None => text,
    }
}

// ── Rule 4: Pad up to the minimum ────────────────────────────────────────────

fn pad_to_min(text: &str, hard_limit: usize, min_len: usize) -> String {
    let mut out = pad_greedy(text, hard_limit, min_len);
    if char_len(&out) < min_len {
        if let Some(exact) = pad_exact(text, hard_limit, min_len) {
            out = exact;
        }
    }

    if !out.is_empty() && !ends_with_terminal(&out) && char_len(&out) < hard_limit {
        out.push('.');
    }

    out
}

/// Append suffixes longest first, skipping any that would overflow.
fn pad_greedy(text: &str, hard_limit: usize, min_len: usize) -> String {
    let mut out = text.to_string();
    let mut len = char_len(&out);

    for suffix in PADDING_SUFFIXES {
        let suffix = if out.is_empty() { suffix.trim_start() } else { suffix };
        let suffix_len = char_len(suffix);
        if len + suffix_len > hard_limit {
            continue;
        }
        out.push_str(suffix);
        len += suffix_len;
        if len >= min_len {
            break;
        }
    }

    out
}

/// First suffix subset, in list order, that lands the text inside
/// `min_len..=hard_limit`.
fn pad_exact(text: &str, hard_limit: usize, min_len: usize) -> Option<String> {
    let base = char_len(text);
    let lens: Vec<usize> = PADDING_SUFFIXES.iter().map(|s| char_len(s)).collect();

    (1u32..1 << PADDING_SUFFIXES.len())
        .find(|&mask| {
            let sum: usize = selected(mask).map(|i| lens[i]).sum();
            // The first suffix loses its leading space on empty text.
            let total = base + sum - usize::from(base == 0);
            (min_len..=hard_limit).contains(&total)
        })
        .map(|mask| {
            let mut out = text.to_string();
            for i in selected(mask) {
                let suffix = PADDING_SUFFIXES[i];
                out.push_str(if out.is_empty() { suffix.trim_start() } else { suffix });
            }
            out
        })
}

fn selected(mask: u32) -> impl Iterator<Item = usize> {
    (0..PADDING_SUFFIXES.len()).filter(move |i| mask & (1 << i) != 0)
}
