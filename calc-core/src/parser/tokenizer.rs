//! # 分词器
//!
//! 将源文本按需切分为词法标记，记录每个标记的起始字节偏移。
//!
//! 标记之间的空白（空格、制表符、换行、回车、垂直制表符）被跳过；
//! 空白与紧邻与否不影响语义，`1+2` 与 `1 + 2` 等价。
//! 由解析器以 pull 模式驱动：`next` 消费一个标记，`peek` 提供
//! 单标记前瞻。

use crate::error::{CalcError, CalcResult};
use crate::value::{MAX_NUMBER_LEN, NumberKind};

/// 词法标记类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// 数字字面量（`Hex` 时 text 不含 `0x` 前缀）
    Number { text: &'a str, kind: NumberKind },
    /// 标识符（变量名或函数名）
    Ident(&'a str),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `**`
    StarStar,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `&`
    Amp,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `~`
    Tilde,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// 输入结束
    End,
}

impl TokenKind<'_> {
    /// 标记的源文本形式（用于错误信息）
    pub fn describe(&self) -> &str {
        match self {
            TokenKind::Number { text, .. } => text,
            TokenKind::Ident(name) => name,
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::StarStar => "**",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Amp => "&",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Tilde => "~",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::End => "输入结束",
        }
    }
}

/// 词法标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// 标记起始处的字节偏移
    pub offset: usize,
}

/// 分词器
///
/// 只持有当前扫描位置，生命周期局限于单次求值，不跨调用共享。
/// 扫描到结尾后持续产出 [`TokenKind::End`]；越过结尾取标记不是
/// 分词错误，由解析器判定为表达式意外结束。
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    peeked: Option<Token<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            peeked: None,
        }
    }

    /// 查看下一个标记但不消费
    pub fn peek(&mut self) -> CalcResult<Token<'a>> {
        if let Some(token) = self.peeked {
            return Ok(token);
        }
        let token = self.scan()?;
        self.peeked = Some(token);
        Ok(token)
    }

    /// 消费并返回下一个标记
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> CalcResult<Token<'a>> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }
        self.scan()
    }

    fn scan(&mut self) -> CalcResult<Token<'a>> {
        self.skip_whitespace();
        let offset = self.pos;

        let Some(c) = self.current() else {
            return Ok(Token {
                kind: TokenKind::End,
                offset,
            });
        };

        let kind = match c {
            b'0'..=b'9' => return self.scan_number(),
            b'a'..=b'z' | b'A'..=b'Z' => return Ok(self.scan_ident()),
            b'*' => {
                // `**` 是单个标记，贪婪匹配
                if self.lookahead(1) == Some(b'*') {
                    self.pos += 2;
                    TokenKind::StarStar
                } else {
                    self.pos += 1;
                    TokenKind::Star
                }
            }
            b'<' => {
                if self.lookahead(1) == Some(b'<') {
                    self.pos += 2;
                    TokenKind::Shl
                } else {
                    return Err(self.unexpected_char(offset));
                }
            }
            b'>' => {
                if self.lookahead(1) == Some(b'>') {
                    self.pos += 2;
                    TokenKind::Shr
                } else {
                    return Err(self.unexpected_char(offset));
                }
            }
            b'+' => {
                self.pos += 1;
                TokenKind::Plus
            }
            b'-' => {
                self.pos += 1;
                TokenKind::Minus
            }
            b'/' => {
                self.pos += 1;
                TokenKind::Slash
            }
            b'%' => {
                self.pos += 1;
                TokenKind::Percent
            }
            b'|' => {
                self.pos += 1;
                TokenKind::Pipe
            }
            b'^' => {
                self.pos += 1;
                TokenKind::Caret
            }
            b'&' => {
                self.pos += 1;
                TokenKind::Amp
            }
            b'~' => {
                self.pos += 1;
                TokenKind::Tilde
            }
            b'(' => {
                self.pos += 1;
                TokenKind::LeftParen
            }
            b')' => {
                self.pos += 1;
                TokenKind::RightParen
            }
            _ => return Err(self.unexpected_char(offset)),
        };

        Ok(Token { kind, offset })
    }

    /// 扫描数字字面量
    ///
    /// 文法：
    /// - 十六进制：`0x` / `0X` 后接一个或多个十六进制数字
    /// - 十进制：数字，可选单个 `.` 后接一个或多个数字，可选
    ///   `e` / `E` 指数（可带符号，符号后必须有数字）
    ///
    /// 含 `.` 或指数的字面量分类为 [`NumberKind::Float`]；
    /// 能否用于当前数值类型在转换阶段判定。
    fn scan_number(&mut self) -> CalcResult<Token<'a>> {
        let start = self.pos;

        // 十六进制
        if self.current() == Some(b'0') && matches!(self.lookahead(1), Some(b'x') | Some(b'X')) {
            self.pos += 2;
            let digits_start = self.pos;
            while matches!(self.current(), Some(c) if c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            if self.pos == digits_start {
                return Err(CalcError::MalformedNumber {
                    offset: start,
                    message: "0x 前缀后缺少十六进制数字".to_string(),
                });
            }
            if self.pos - digits_start > MAX_NUMBER_LEN {
                return Err(CalcError::Overflow { offset: start });
            }
            return Ok(Token {
                kind: TokenKind::Number {
                    text: &self.input[digits_start..self.pos],
                    kind: NumberKind::Hex,
                },
                offset: start,
            });
        }

        // 整数部分
        self.eat_digits();
        let mut kind = NumberKind::Integer;

        // 小数部分
        if self.current() == Some(b'.') {
            self.pos += 1;
            if self.current() == Some(b'.') {
                return Err(CalcError::MalformedNumber {
                    offset: start,
                    message: "多个小数点".to_string(),
                });
            }
            if !matches!(self.current(), Some(c) if c.is_ascii_digit()) {
                return Err(CalcError::MalformedNumber {
                    offset: start,
                    message: "小数点后缺少数字".to_string(),
                });
            }
            self.eat_digits();
            if self.current() == Some(b'.') {
                return Err(CalcError::MalformedNumber {
                    offset: start,
                    message: "多个小数点".to_string(),
                });
            }
            kind = NumberKind::Float;
        }

        // 指数部分
        if matches!(self.current(), Some(b'e') | Some(b'E')) {
            self.pos += 1;
            if matches!(self.current(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            if !matches!(self.current(), Some(c) if c.is_ascii_digit()) {
                return Err(CalcError::MalformedNumber {
                    offset: start,
                    message: "指数缺少数字".to_string(),
                });
            }
            self.eat_digits();
            kind = NumberKind::Float;
        }

        let text = &self.input[start..self.pos];
        if text.len() > MAX_NUMBER_LEN {
            return Err(CalcError::Overflow { offset: start });
        }
        Ok(Token {
            kind: TokenKind::Number { text, kind },
            offset: start,
        })
    }

    /// 扫描标识符：ASCII 字母开头，后接字母 / 数字 / 下划线
    ///
    /// 下划线不能作为首字符，这是有意的文法限制。
    fn scan_ident(&mut self) -> Token<'a> {
        let start = self.pos;
        while let Some(c) = self.current() {
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        Token {
            kind: TokenKind::Ident(&self.input[start..self.pos]),
            offset: start,
        }
    }

    fn eat_digits(&mut self) {
        while matches!(self.current(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current() {
            match c {
                b' ' | b'\t' | b'\n' | b'\r' | 0x0B => self.pos += 1,
                _ => break,
            }
        }
    }

    fn current(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn lookahead(&self, ahead: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + ahead).copied()
    }

    fn unexpected_char(&self, offset: usize) -> CalcError {
        // offset 指向一个字符的首字节，取完整字符放进错误信息
        let c = self.input[offset..].chars().next().unwrap_or('?');
        CalcError::Syntax {
            offset,
            message: format!("意外的字符 '{c}'"),
        }
    }
}
