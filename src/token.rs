/// One lexical token of the indentation-sensitive frontend dialect.
///
/// `Indent` and `Dedent` are synthetic: they never correspond to source
/// characters but mark a change of nesting depth between logical lines.
#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Eof,
    Newline,
    Indent,
    Dedent,

    Ident(String),
    Number(String),
    Str(String),
    /// An interpolated string literal (`f"..."`), braces kept verbatim.
    FStr(String),

    // Keywords
    True,
    False,
    None,
    If,
    Elif,
    Else,
    For,
    While,
    Def,
    Return,
    Import,
    From,
    As,
    Class,
    Try,
    Except,
    Finally,
    With,
    Pass,
    Break,
    Continue,
    In,
    And,
    Or,
    Not,
    Lambda,
    Raise,

    // Punctuation and operators
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    At,
    Eq,
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    SlashSlash,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,
}

impl Tok {
    pub fn from_keyword(text: &str) -> Option<Tok> {
        let tok = match text {
            "True" => Tok::True,
            "False" => Tok::False,
            "None" => Tok::None,
            "if" => Tok::If,
            "elif" => Tok::Elif,
            "else" => Tok::Else,
            "for" => Tok::For,
            "while" => Tok::While,
            "def" => Tok::Def,
            "return" => Tok::Return,
            "import" => Tok::Import,
            "from" => Tok::From,
            "as" => Tok::As,
            "class" => Tok::Class,
            "try" => Tok::Try,
            "except" => Tok::Except,
            "finally" => Tok::Finally,
            "with" => Tok::With,
            "pass" => Tok::Pass,
            "break" => Tok::Break,
            "continue" => Tok::Continue,
            "in" => Tok::In,
            "and" => Tok::And,
            "or" => Tok::Or,
            "not" => Tok::Not,
            "lambda" => Tok::Lambda,
            "raise" => Tok::Raise,
            _ => return None,
        };
        Some(tok)
    }

    /// Human-readable description for error messages.
    pub fn description(&self) -> String {
        match self {
            Tok::Eof => "end of file".to_string(),
            Tok::Newline => "newline".to_string(),
            Tok::Indent => "indentation".to_string(),
            Tok::Dedent => "end of indented block".to_string(),
            Tok::Ident(name) => format!("identifier '{}'", name),
            Tok::Number(text) => format!("number '{}'", text),
            Tok::Str(_) => "string literal".to_string(),
            Tok::FStr(_) => "f-string literal".to_string(),
            Tok::True => "'True'".to_string(),
            Tok::False => "'False'".to_string(),
            Tok::None => "'None'".to_string(),
            Tok::If => "'if'".to_string(),
            Tok::Elif => "'elif'".to_string(),
            Tok::Else => "'else'".to_string(),
            Tok::For => "'for'".to_string(),
            Tok::While => "'while'".to_string(),
            Tok::Def => "'def'".to_string(),
            Tok::Return => "'return'".to_string(),
            Tok::Import => "'import'".to_string(),
            Tok::From => "'from'".to_string(),
            Tok::As => "'as'".to_string(),
            Tok::Class => "'class'".to_string(),
            Tok::Try => "'try'".to_string(),
            Tok::Except => "'except'".to_string(),
            Tok::Finally => "'finally'".to_string(),
            Tok::With => "'with'".to_string(),
            Tok::Pass => "'pass'".to_string(),
            Tok::Break => "'break'".to_string(),
            Tok::Continue => "'continue'".to_string(),
            Tok::In => "'in'".to_string(),
            Tok::And => "'and'".to_string(),
            Tok::Or => "'or'".to_string(),
            Tok::Not => "'not'".to_string(),
            Tok::Lambda => "'lambda'".to_string(),
            Tok::Raise => "'raise'".to_string(),
            Tok::LParen => "'('".to_string(),
            Tok::RParen => "')'".to_string(),
            Tok::LBracket => "'['".to_string(),
            Tok::RBracket => "']'".to_string(),
            Tok::LBrace => "'{'".to_string(),
            Tok::RBrace => "'}'".to_string(),
            Tok::Comma => "','".to_string(),
            Tok::Colon => "':'".to_string(),
            Tok::Semicolon => "';'".to_string(),
            Tok::Dot => "'.'".to_string(),
            Tok::At => "'@'".to_string(),
            Tok::Eq => "'='".to_string(),
            Tok::EqEq => "'=='".to_string(),
            Tok::NotEq => "'!='".to_string(),
            Tok::Lt => "'<'".to_string(),
            Tok::Gt => "'>'".to_string(),
            Tok::LtEq => "'<='".to_string(),
            Tok::GtEq => "'>='".to_string(),
            Tok::Plus => "'+'".to_string(),
            Tok::Minus => "'-'".to_string(),
            Tok::Star => "'*'".to_string(),
            Tok::Slash => "'/'".to_string(),
            Tok::Percent => "'%'".to_string(),
            Tok::StarStar => "'**'".to_string(),
            Tok::SlashSlash => "'//'".to_string(),
            Tok::PlusEq => "'+='".to_string(),
            Tok::MinusEq => "'-='".to_string(),
            Tok::StarEq => "'*='".to_string(),
            Tok::SlashEq => "'/='".to_string(),
            Tok::Amp => "'&'".to_string(),
            Tok::Pipe => "'|'".to_string(),
            Tok::Caret => "'^'".to_string(),
            Tok::Tilde => "'~'".to_string(),
            Tok::Shl => "'<<'".to_string(),
            Tok::Shr => "'>>'".to_string(),
        }
    }
}
