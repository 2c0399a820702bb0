//! # Parser 模块
//!
//! 边解析边求值的表达式求值器（手写递归下降 + 优先级爬升，无 AST）。
//!
//! ## 架构
//!
//! ```text
//! 源文本 → [Tokenizer: 按需分词] → [优先级爬升, 逐层求值] → T / CalcError
//! ```
//!
//! ## 设计原则
//!
//! - 不构造语法树：每层文法函数递归求出操作数后立即应用运算符，
//!   "树"只存在于调用栈中
//! - 二元运算符的优先级由单个以最小绑定强度为参数的爬升循环编码；
//!   `**`（右结合）与一元运算符由专门的互递归函数处理
//! - 标识符在求值时对照符号表解析为变量或函数调用
//! - 遇到第一个错误立即终止整个求值并原样上抛
//!
//! ## 优先级（从松到紧）
//!
//! ```text
//! |  <  ^  <  &  <  << >>  <  + -  <  * / %  <  **  <  一元 + - ~
//! ```
//!
//! ## 模块结构
//!
//! - `tokenizer`: 分词器

mod tokenizer;


use crate::error::{CalcError, CalcResult};
use crate::symbols::SymbolTable;
use crate::value::{BinaryOp, Number, NumericError, UnaryOp};

pub use tokenizer::{Token, TokenKind, Tokenizer};

/// 括号与函数调用参数的最大嵌套深度
///
/// 递归深度与源文本的嵌套深度成正比；超过上限报
/// [`CalcError::TooDeep`]，不冒耗尽调用栈的风险。
pub const MAX_DEPTH: usize = 256;

/// 可复用的表达式求值器
///
/// 持有一张符号表；除符号表外不在多次 `eval` 之间保留任何状态，
/// 分词器状态是单次调用的局部量。复用同一个实例做多次求值是
/// 预期用法：重建求值器本身很廉价，重新填充符号表则不是。
///
/// 跨线程共享同一实例时由调用方负责同步；`eval` 与 `set_*`
/// 期间假定独占访问，内部不加锁。
///
/// # 示例
///
/// ```ignore
/// use calc_core::ExpressionParser;
///
/// let mut parser = ExpressionParser::<f64>::new();
/// parser.set_var("x", 2.0);
/// parser.set_fn("double", |v| v * 2.0);
/// assert_eq!(parser.eval("double(x) + 3")?, 7.0);
/// ```
#[derive(Debug, Clone)]
pub struct ExpressionParser<T> {
    symbols: SymbolTable<T>,
}

impl<T: Number> ExpressionParser<T> {
    /// 创建空符号表的求值器
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
        }
    }

    /// 绑定/覆盖变量，同名的函数绑定会被替换
    pub fn set_var(&mut self, name: impl Into<String>, value: T) {
        self.symbols.set_var(name, value);
    }

    /// 绑定/覆盖一元函数，同名的变量绑定会被替换
    pub fn set_fn(&mut self, name: impl Into<String>, f: fn(T) -> T) {
        self.symbols.set_fn(name, f);
    }

    /// 对照当前符号表求值表达式
    ///
    /// 解析与求值在同一趟完成，必须恰好消费整个输入；完整表达式
    /// 之后的任何多余标记都是语法错误。
    pub fn eval(&self, expr: &str) -> CalcResult<T> {
        let mut state = EvalState {
            tokens: Tokenizer::new(expr),
            symbols: &self.symbols,
            depth: 0,
        };
        let value = state.expression(0)?;

        let trailing = state.tokens.next()?;
        if trailing.kind != TokenKind::End {
            return Err(CalcError::Syntax {
                offset: trailing.offset,
                message: format!(
                    "表达式结束后存在多余的标记 '{}'",
                    trailing.kind.describe()
                ),
            });
        }
        Ok(value)
    }
}

impl<T: Number> Default for ExpressionParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// 一次性求值
///
/// 使用用完即弃的空符号表；表达式中引用任何标识符都会失败。
/// 每次调用独立构造自己的状态，可以安全地并发调用。
pub fn eval<T: Number>(expr: &str) -> CalcResult<T> {
    ExpressionParser::<T>::new().eval(expr)
}

/// 单次求值的内部状态
///
/// 生命周期局限于一次 `eval` 调用。
struct EvalState<'a, T> {
    tokens: Tokenizer<'a>,
    symbols: &'a SymbolTable<T>,
    depth: usize,
}

impl<T: Number> EvalState<'_, T> {
    /// 二元运算符的绑定强度；非二元运算标记返回 None
    ///
    /// `**` 不在此表中：右结合，由 [`Self::power`] 单独处理
    fn binding(kind: TokenKind) -> Option<(u8, BinaryOp)> {
        let entry = match kind {
            TokenKind::Pipe => (1, BinaryOp::Or),
            TokenKind::Caret => (2, BinaryOp::Xor),
            TokenKind::Amp => (3, BinaryOp::And),
            TokenKind::Shl => (4, BinaryOp::Shl),
            TokenKind::Shr => (4, BinaryOp::Shr),
            TokenKind::Plus => (5, BinaryOp::Add),
            TokenKind::Minus => (5, BinaryOp::Sub),
            TokenKind::Star => (6, BinaryOp::Mul),
            TokenKind::Slash => (6, BinaryOp::Div),
            TokenKind::Percent => (6, BinaryOp::Rem),
            _ => return None,
        };
        Some(entry)
    }

    /// 优先级爬升：解析并求值绑定强度不低于 `min_binding` 的二元运算序列
    ///
    /// 表内运算符全部左结合，右操作数用 `binding + 1` 递归
    fn expression(&mut self, min_binding: u8) -> CalcResult<T> {
        let mut value = self.unary()?;
        loop {
            let token = self.tokens.peek()?;
            let Some((binding, op)) = Self::binding(token.kind) else {
                break;
            };
            if binding < min_binding {
                break;
            }
            self.tokens.next()?;
            let rhs = self.expression(binding + 1)?;
            value = apply_binary(value, op, rhs, token.offset)?;
        }
        Ok(value)
    }

    /// 一元层：`('+' | '-' | '~') unary | power`
    ///
    /// 一元负号对底数的绑定比 `**` 松：`-2 ** 2` 是 `-(2 ** 2)`；
    /// 而 `**` 的右操作数重新进入本层：`2 ** -1` 是 `2 ** (-1)`
    fn unary(&mut self) -> CalcResult<T> {
        let token = self.tokens.peek()?;
        let op = match token.kind {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Tilde => UnaryOp::Not,
            _ => return self.power(),
        };
        self.tokens.next()?;

        // 一元链（如 `-~x`、幂的右操作数链）也计入嵌套深度
        self.enter(token.offset)?;
        let value = self.unary()?;
        self.depth -= 1;

        value.apply_unary(op).map_err(|e| match e {
            NumericError::Unsupported => CalcError::UnsupportedOperator {
                offset: token.offset,
                op: op.symbol(),
            },
            _ => CalcError::Overflow {
                offset: token.offset,
            },
        })
    }

    /// 幂层：`primary ('**' unary)?`
    ///
    /// 右结合由右操作数递归回一元层实现
    fn power(&mut self) -> CalcResult<T> {
        let base = self.primary()?;
        let token = self.tokens.peek()?;
        if token.kind == TokenKind::StarStar {
            self.tokens.next()?;
            self.enter(token.offset)?;
            let exp = self.unary()?;
            self.depth -= 1;
            return apply_binary(base, BinaryOp::Pow, exp, token.offset);
        }
        Ok(base)
    }

    /// 基本元素：数字字面量、标识符（变量或函数调用）、括号子表达式
    fn primary(&mut self) -> CalcResult<T> {
        let token = self.tokens.peek()?;
        match token.kind {
            TokenKind::Number { text, kind } => {
                self.tokens.next()?;
                T::from_literal(text, kind).map_err(|e| match e {
                    NumericError::DecimalInIntegerMode => CalcError::DecimalInIntegerMode {
                        offset: token.offset,
                    },
                    _ => CalcError::Overflow {
                        offset: token.offset,
                    },
                })
            }
            TokenKind::Ident(name) => {
                self.tokens.next()?;
                self.identifier(name, token.offset)
            }
            TokenKind::LeftParen => {
                self.tokens.next()?;
                self.grouped(token.offset)
            }
            TokenKind::End => Err(CalcError::Syntax {
                offset: token.offset,
                message: "表达式意外结束，期望一个值".to_string(),
            }),
            other => Err(CalcError::Syntax {
                offset: token.offset,
                message: format!("期望一个值，遇到 '{}'", other.describe()),
            }),
        }
    }

    /// 标识符解析：后随 `(` 视为函数调用，否则视为变量
    ///
    /// 两种查找失败给出不同的错误类别。函数只接受单个参数，
    /// 参数本身是一个完整表达式。
    fn identifier(&mut self, name: &str, offset: usize) -> CalcResult<T> {
        let next = self.tokens.peek()?;
        if next.kind == TokenKind::LeftParen {
            self.tokens.next()?;
            let arg = self.grouped(next.offset)?;
            let Some(f) = self.symbols.get_fn(name) else {
                return Err(CalcError::UndefinedFunction {
                    offset,
                    name: name.to_string(),
                });
            };
            return Ok(f(arg));
        }

        self.symbols
            .get_var(name)
            .ok_or_else(|| CalcError::UndefinedVariable {
                offset,
                name: name.to_string(),
            })
    }

    /// 括号子表达式：`(` 已消费，解析完整表达式并要求匹配的 `)`
    fn grouped(&mut self, open_offset: usize) -> CalcResult<T> {
        self.enter(open_offset)?;
        let value = self.expression(0)?;
        self.depth -= 1;

        let token = self.tokens.next()?;
        match token.kind {
            TokenKind::RightParen => Ok(value),
            TokenKind::End => Err(CalcError::Syntax {
                offset: token.offset,
                message: "缺少右括号 ')'".to_string(),
            }),
            other => Err(CalcError::Syntax {
                offset: token.offset,
                message: format!("期望 ')'，遇到 '{}'", other.describe()),
            }),
        }
    }

    /// 进入一层嵌套；超过 [`MAX_DEPTH`] 报错
    fn enter(&mut self, offset: usize) -> CalcResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::TooDeep { offset });
        }
        self.depth += 1;
        Ok(())
    }
}

/// 应用二元运算；除法与取模先做除零检查
///
/// 除零检查对浮点同样生效：`1.0 / 0.0` 报错而不是产出无穷
fn apply_binary<T: Number>(lhs: T, op: BinaryOp, rhs: T, offset: usize) -> CalcResult<T> {
    if matches!(op, BinaryOp::Div | BinaryOp::Rem) && rhs.is_zero() {
        return Err(CalcError::DivisionByZero {
            offset,
            op: op.symbol(),
        });
    }
    lhs.apply_binary(op, rhs).map_err(|e| match e {
        NumericError::Unsupported => CalcError::UnsupportedOperator {
            offset,
            op: op.symbol(),
        },
        _ => CalcError::Overflow { offset },
    })
}
