//! Text form of the `Labels` column.
//!
//! Label lists are stored as a bracketed, quoted list such as
//! `['INBOX', 'JOB/Applied']`, which is what CSV exports from earlier tooling
//! contain. Plain comma-separated lists are accepted on input as well.

/// Formats label names as a bracketed list of quoted strings.
#[must_use]
pub fn format_label_list<S: AsRef<str>>(labels: &[S]) -> String {
    let items: Vec<String> = labels.iter().map(|l| quote(l.as_ref())).collect();
    format!("[{}]", items.join(", "))
}

/// Parses a `Labels` cell into label names.
///
/// Accepts the bracketed form written by [`format_label_list`] and plain
/// `A, B` lists. Empty entries are dropped.
#[must_use]
pub fn parse_label_list(cell: &str) -> Vec<String> {
    let cell = cell.trim();
    match cell.strip_prefix('[').and_then(|c| c.strip_suffix(']')) {
        Some(inner) => parse_bracketed(inner),
        None => split_plain(cell),
    }
}

fn quote(label: &str) -> String {
    let delimiter = if label.contains('\'') && !label.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(label.len() + 2);
    out.push(delimiter);
    for c in label.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

fn parse_bracketed(inner: &str) -> Vec<String> {
    let mut labels = Vec::new();
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\'' && c != '"' {
            // Unquoted fragment: read up to the next comma.
            if c == ',' || c.is_whitespace() {
                continue;
            }
            let mut item = String::from(c);
            for next in chars.by_ref() {
                if next == ',' {
                    break;
                }
                item.push(next);
            }
            push_trimmed(&mut labels, &item);
            continue;
        }

        let delimiter = c;
        let mut item = String::new();
        while let Some(next) = chars.next() {
            match next {
                '\\' => match chars.next() {
                    Some('n') => item.push('\n'),
                    Some('r') => item.push('\r'),
                    Some('t') => item.push('\t'),
                    Some(other) => item.push(other),
                    None => {}
                },
                n if n == delimiter => break,
                n => item.push(n),
            }
        }
        push_trimmed(&mut labels, &item);
    }

    labels
}

fn split_plain(cell: &str) -> Vec<String> {
    let mut labels = Vec::new();
    for item in cell.split(',') {
        push_trimmed(&mut labels, item);
    }
    labels
}

fn push_trimmed(labels: &mut Vec<String>, item: &str) {
    let item = item.trim();
    if !item.is_empty() {
        labels.push(item.to_string());
    }
}
