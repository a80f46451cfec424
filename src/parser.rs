use memchr::memchr;

/// One `{identifier}` placeholder, borrowed from the body it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The placeholder including its braces, e.g. `{prenom}`.
    pub raw: &'a str,
    /// The identifier between the braces.
    pub key: &'a str,
    /// Byte offset of the opening brace.
    pub position: usize,
}

impl Token<'_> {
    /// Byte offset just past the closing brace.
    #[inline]
    pub fn end(&self) -> usize {
        self.position + self.raw.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedBody<'a> {
    pub tokens: Vec<Token<'a>>,
    /// Set when the body holds a different number of `{` and `}`,
    /// whatever the tokens look like.
    pub brace_balance_error: bool,
}

impl<'a> ParsedBody<'a> {
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.tokens.iter().map(|token| token.key)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Text,
    Key { open: usize },
}

#[inline]
fn is_key_byte(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

pub struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn remaining(&self) -> &'a [u8] {
        self.bytes.get(self.pos..).unwrap_or_default()
    }

    pub fn parse(mut self) -> ParsedBody<'a> {
        let opens = memchr::memchr_iter(b'{', self.bytes).count();
        let closes = memchr::memchr_iter(b'}', self.bytes).count();

        let mut tokens = Vec::with_capacity(opens.min(closes));
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }

        ParsedBody {
            tokens,
            brace_balance_error: opens != closes,
        }
    }

    /// Advance to the next well-formed placeholder. Candidates that turn out
    /// malformed are dropped and scanning resumes right after the offending
    /// byte, so `{{name}` still yields `{name}`.
    fn next_token(&mut self) -> Option<Token<'a>> {
        let mut state = State::Text;

        while self.pos < self.bytes.len() {
            match state {
                State::Text => {
                    let open = self.pos + memchr(b'{', self.remaining())?;
                    state = State::Key { open };
                    self.pos = open + 1;
                }
                State::Key { open } => match self.bytes[self.pos] {
                    b'}' if self.pos > open + 1 => {
                        let end = self.pos + 1;
                        self.pos = end;
                        return Some(Token {
                            raw: &self.input[open..end],
                            key: &self.input[open + 1..end - 1],
                            position: open,
                        });
                    }
                    b'{' => {
                        state = State::Key { open: self.pos };
                        self.pos += 1;
                    }
                    byte if is_key_byte(byte) => self.pos += 1,
                    _ => {
                        state = State::Text;
                        self.pos += 1;
                    }
                },
            }
        }

        None
    }
}

pub fn parse_tokens(body: &str) -> ParsedBody<'_> {
    Parser::new(body).parse()
}
