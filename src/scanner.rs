use logos::Logos;

/// Tokens of an operand list, i.e. everything after the opcode on a line.
#[derive(PartialEq, Debug, Clone, Logos)]
pub enum TokenKind {
    #[token(",")]
    Comma,

    // Quotes are stripped, inner text is kept verbatim (commas included).
    #[regex("'[^']*'", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    Text(String),

    // Register name or numeric literal, see `Operand::classify`.
    #[regex(r"[^ \t\f\r\n,']+")]
    Word,

    #[error]
    #[regex(r"[ \t\f]+", logos::skip)]
    Error,
}

/// A cleaned source line and its 1-based position in the original text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line<'src> {
    pub number: usize,
    pub text: &'src str,
}

/// Strip comments and surrounding whitespace, dropping lines left empty.
pub fn lines(source: &str) -> Vec<Line<'_>> {
    source
        .lines()
        .enumerate()
        .map(|(idx, raw)| Line {
            number: idx + 1,
            text: strip_comment(raw).trim(),
        })
        .filter(|line| !line.text.is_empty())
        .collect()
}

/// Cut a line at the first `;` that is not inside a quoted literal.
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (idx, c) in line.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            ';' if !quoted => return &line[..idx],
            _ => {}
        }
    }
    line
}
