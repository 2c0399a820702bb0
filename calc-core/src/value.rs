//! # Value 模块
//!
//! 定义数值类型抽象 [`Number`]，求值器对具体数值类型完全泛化。
//!
//! ## 设计原则
//!
//! - 整数与浮点的能力差异（位运算、取模仅整数合法）通过各自的
//!   trait 实现在编译期区分，不引入运行时类型标签
//! - 整数算术全部使用 checked 运算，溢出显式报错而不是静默回绕
//! - 字面量到数值的转换由类型自己负责，分词器只做词法分类
//!
//! 错误以不带位置的 [`NumericError`] 上抛，解析器捕获后映射为
//! 带字节偏移的 [`CalcError`](crate::CalcError)。

use std::fmt;

/// 数字字面量的词法分类
///
/// 由分词器在扫描时确定，转换在 [`Number::from_literal`] 中完成。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// 十进制整数，如 `42`
    Integer,
    /// 十六进制整数，如 `0xFF`（字面量文本不含 `0x` 前缀）
    Hex,
    /// 含小数点或指数的十进制数，如 `1.5`、`2e10`
    Float,
}

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `|`
    Or,
    /// `^`
    Xor,
    /// `&`
    And,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `**`
    Pow,
}

impl BinaryOp {
    /// 运算符的源文本形式（用于错误信息）
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::And => "&",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
        }
    }
}

/// 一元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Neg,
    /// `~`
    Not,
}

impl UnaryOp {
    /// 运算符的源文本形式（用于错误信息）
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "~",
        }
    }
}

/// 数值运算失败原因
///
/// 不携带位置信息；由解析器映射为带偏移的错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    /// 字面量超出范围或运算溢出
    Overflow,
    /// 运算不支持当前类型
    Unsupported,
    /// 整数类型遇到小数或科学计数法字面量
    DecimalInIntegerMode,
}

/// 数字字面量的长度上限（不含 `0x` 前缀与符号）
///
/// 超长的数字串在尝试转换前直接拒绝，病态输入不会进入逐位转换。
pub const MAX_NUMBER_LEN: usize = 64;

/// 求值器支持的数值类型
///
/// 对 `i32` / `i64` / `f32` / `f64` 实现。整数实现中位运算与取模
/// 合法、算术溢出报错；浮点实现对位运算、取模和 `~` 返回
/// [`NumericError::Unsupported`]，其余遵循 IEEE 语义。
pub trait Number: Copy + PartialEq + PartialOrd + fmt::Debug + fmt::Display {
    /// 从字面量文本转换
    ///
    /// `text` 是分词器切出的字面量原文（`Hex` 时不含 `0x` 前缀）。
    /// 整数类型遇到 `Float` 分类的字面量返回
    /// [`NumericError::DecimalInIntegerMode`]，不做截断。
    fn from_literal(text: &str, kind: NumberKind) -> Result<Self, NumericError>;

    /// 零值（除零检查用）
    fn zero() -> Self;

    /// 应用二元运算
    ///
    /// 除零已由解析器预先排除；整数 `MIN / -1` 这类仍会溢出的
    /// 情况在这里报错。
    fn apply_binary(self, op: BinaryOp, rhs: Self) -> Result<Self, NumericError>;

    /// 应用一元运算
    fn apply_unary(self, op: UnaryOp) -> Result<Self, NumericError>;

    /// 是否为零
    fn is_zero(self) -> bool {
        self == Self::zero()
    }
}

macro_rules! impl_number_for_integer {
    ($t:ty) => {
        impl Number for $t {
            fn from_literal(text: &str, kind: NumberKind) -> Result<Self, NumericError> {
                if text.len() > MAX_NUMBER_LEN {
                    return Err(NumericError::Overflow);
                }
                match kind {
                    NumberKind::Integer => text.parse::<$t>().map_err(|_| NumericError::Overflow),
                    NumberKind::Hex => {
                        <$t>::from_str_radix(text, 16).map_err(|_| NumericError::Overflow)
                    }
                    NumberKind::Float => Err(NumericError::DecimalInIntegerMode),
                }
            }

            fn zero() -> Self {
                0
            }

            fn apply_binary(self, op: BinaryOp, rhs: Self) -> Result<Self, NumericError> {
                let value = match op {
                    BinaryOp::Or => self | rhs,
                    BinaryOp::Xor => self ^ rhs,
                    BinaryOp::And => self & rhs,
                    BinaryOp::Shl => {
                        // 移位位数必须落在 0..位宽 内
                        let amount =
                            u32::try_from(rhs).map_err(|_| NumericError::Overflow)?;
                        self.checked_shl(amount).ok_or(NumericError::Overflow)?
                    }
                    BinaryOp::Shr => {
                        let amount =
                            u32::try_from(rhs).map_err(|_| NumericError::Overflow)?;
                        self.checked_shr(amount).ok_or(NumericError::Overflow)?
                    }
                    BinaryOp::Add => self.checked_add(rhs).ok_or(NumericError::Overflow)?,
                    BinaryOp::Sub => self.checked_sub(rhs).ok_or(NumericError::Overflow)?,
                    BinaryOp::Mul => self.checked_mul(rhs).ok_or(NumericError::Overflow)?,
                    BinaryOp::Div => self.checked_div(rhs).ok_or(NumericError::Overflow)?,
                    BinaryOp::Rem => self.checked_rem(rhs).ok_or(NumericError::Overflow)?,
                    BinaryOp::Pow => {
                        // 快速幂；指数 <= 0 时循环不执行，结果为 1
                        let mut base = self;
                        let mut exp = rhs;
                        let mut acc: $t = 1;
                        while exp > 0 {
                            if exp & 1 == 1 {
                                acc = acc.checked_mul(base).ok_or(NumericError::Overflow)?;
                            }
                            exp >>= 1;
                            if exp > 0 {
                                base = base.checked_mul(base).ok_or(NumericError::Overflow)?;
                            }
                        }
                        acc
                    }
                };
                Ok(value)
            }

            fn apply_unary(self, op: UnaryOp) -> Result<Self, NumericError> {
                match op {
                    UnaryOp::Plus => Ok(self),
                    UnaryOp::Neg => self.checked_neg().ok_or(NumericError::Overflow),
                    UnaryOp::Not => Ok(!self),
                }
            }
        }
    };
}

macro_rules! impl_number_for_float {
    ($t:ty) => {
        impl Number for $t {
            fn from_literal(text: &str, kind: NumberKind) -> Result<Self, NumericError> {
                if text.len() > MAX_NUMBER_LEN {
                    return Err(NumericError::Overflow);
                }
                let value = match kind {
                    NumberKind::Integer | NumberKind::Float => {
                        text.parse::<$t>().map_err(|_| NumericError::Overflow)?
                    }
                    NumberKind::Hex => {
                        // 逐位累加；超出表示范围的结果由下方的有穷检查拦截
                        let mut acc: $t = 0.0;
                        for c in text.chars() {
                            let digit = c.to_digit(16).ok_or(NumericError::Overflow)?;
                            acc = acc * 16.0 + digit as $t;
                        }
                        acc
                    }
                };
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(NumericError::Overflow)
                }
            }

            fn zero() -> Self {
                0.0
            }

            fn apply_binary(self, op: BinaryOp, rhs: Self) -> Result<Self, NumericError> {
                let value = match op {
                    BinaryOp::Add => self + rhs,
                    BinaryOp::Sub => self - rhs,
                    BinaryOp::Mul => self * rhs,
                    BinaryOp::Div => self / rhs,
                    BinaryOp::Pow => self.powf(rhs),
                    BinaryOp::Rem
                    | BinaryOp::Or
                    | BinaryOp::Xor
                    | BinaryOp::And
                    | BinaryOp::Shl
                    | BinaryOp::Shr => return Err(NumericError::Unsupported),
                };
                Ok(value)
            }

            fn apply_unary(self, op: UnaryOp) -> Result<Self, NumericError> {
                match op {
                    UnaryOp::Plus => Ok(self),
                    UnaryOp::Neg => Ok(-self),
                    UnaryOp::Not => Err(NumericError::Unsupported),
                }
            }
        }
    };
}

impl_number_for_integer!(i32);
impl_number_for_integer!(i64);
impl_number_for_float!(f32);
impl_number_for_float!(f64);
