//! Tolerant repair of almost-JSON produced by translation providers
//!
//! The pass rewrites the text in one left-to-right scan and fixes:
//! - raw control characters inside strings (escaped)
//! - invalid escape sequences inside strings (the backslash is escaped)
//! - trailing commas before `}` or `]`
//! - missing commas between adjacent values
//! - unterminated strings and unclosed containers at end of input
//!
//! The output is not guaranteed to parse; callers re-run the strict parser.

/// Rewrite `input` into text the strict JSON parser is more likely to accept
#[must_use]
pub fn repair_json(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 16);
    let mut closers: Vec<char> = Vec::new();
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            match c {
                '"' => {
                    in_string = false;
                    out.push('"');
                }
                '\\' => match chars.peek().copied() {
                    Some(next @ ('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't')) => {
                        chars.next();
                        out.push('\\');
                        out.push(next);
                    }
                    Some('u') if has_hex4(chars.clone().skip(1)) => {
                        out.push('\\');
                    }
                    _ => out.push_str("\\\\"),
                },
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
                c => out.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                if needs_comma(&out) {
                    out.push(',');
                }
                in_string = true;
                out.push('"');
            }
            '{' | '[' => {
                if needs_comma(&out) {
                    out.push(',');
                }
                closers.push(if c == '{' { '}' } else { ']' });
                out.push(c);
            }
            '}' | ']' => {
                drop_trailing_comma(&mut out);
                // Close anything left open inside this container first.
                while let Some(open) = closers.pop() {
                    out.push(open);
                    if open == c {
                        break;
                    }
                }
            }
            c => out.push(c),
        }
    }

    if in_string {
        out.push('"');
    }
    if out.trim_end().ends_with(':') {
        out.push_str("null");
    }
    drop_trailing_comma(&mut out);
    while let Some(close) = closers.pop() {
        out.push(close);
    }

    out
}

fn has_hex4(mut rest: impl Iterator<Item = char>) -> bool {
    (0..4).all(|_| rest.next().is_some_and(|c| c.is_ascii_hexdigit()))
}

/// A value or key starts right after another complete value
fn needs_comma(out: &str) -> bool {
    matches!(
        out.trim_end().chars().last(),
        Some('"' | '}' | ']' | '0'..='9' | 'e' | 'l')
    )
}

fn drop_trailing_comma(out: &mut String) {
    let trimmed = out.trim_end().len();
    if out[..trimmed].ends_with(',') {
        out.truncate(trimmed - 1);
    }
}
