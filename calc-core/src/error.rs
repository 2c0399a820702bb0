//! # Error 模块
//!
//! 定义 calc-core 中使用的错误类型。
//!
//! 解析与求值在同一趟完成，任何失败都在发生处立即构造错误并终止
//! 整个求值，不做恢复、重试或累积；如何处理由调用方决定。
//! 每个错误都携带出错标记在源文本中的字节偏移，便于定位。

use thiserror::Error;

/// 表达式求值错误
///
/// 唯一的失败信号：出错时不返回任何部分结果。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// 语法错误（不完整的表达式、括号不匹配、多余的标记等）
    #[error("位置 {offset}：语法错误 - {message}")]
    Syntax { offset: usize, message: String },

    /// 非法的数字字面量
    #[error("位置 {offset}：非法的数字字面量 - {message}")]
    MalformedNumber { offset: usize, message: String },

    /// 整数模式下出现小数或科学计数法字面量
    #[error("位置 {offset}：整数模式下不允许小数或科学计数法字面量")]
    DecimalInIntegerMode { offset: usize },

    /// 数值过大（字面量超出范围或运算溢出）
    #[error("位置 {offset}：数值过大或运算溢出")]
    Overflow { offset: usize },

    /// 未定义的变量
    #[error("位置 {offset}：未定义的变量 '{name}'")]
    UndefinedVariable { offset: usize, name: String },

    /// 未定义的函数
    #[error("位置 {offset}：未定义的函数 '{name}'")]
    UndefinedFunction { offset: usize, name: String },

    /// 运算符不支持当前数值类型
    #[error("位置 {offset}：运算符 '{op}' 不支持当前数值类型")]
    UnsupportedOperator { offset: usize, op: &'static str },

    /// 除数为零
    #[error("位置 {offset}：运算符 '{op}' 的除数为零")]
    DivisionByZero { offset: usize, op: &'static str },

    /// 表达式嵌套过深
    #[error("位置 {offset}：表达式嵌套过深")]
    TooDeep { offset: usize },
}

impl CalcError {
    /// 出错标记的起始字节偏移
    pub fn offset(&self) -> usize {
        match self {
            CalcError::Syntax { offset, .. }
            | CalcError::MalformedNumber { offset, .. }
            | CalcError::DecimalInIntegerMode { offset }
            | CalcError::Overflow { offset }
            | CalcError::UndefinedVariable { offset, .. }
            | CalcError::UndefinedFunction { offset, .. }
            | CalcError::UnsupportedOperator { offset, .. }
            | CalcError::DivisionByZero { offset, .. }
            | CalcError::TooDeep { offset } => *offset,
        }
    }
}

/// Result 类型别名
pub type CalcResult<T> = Result<T, CalcError>;
