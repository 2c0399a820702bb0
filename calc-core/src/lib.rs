//! # Calc Core
//!
//! 可嵌入的算术表达式求值核心库。
//!
//! ## 架构概述
//!
//! `calc-core` 是纯计算核心，无 IO、无阻塞，也不依赖外部解析器
//! 生成器。给定表达式文本、命名变量和命名一元函数，直接产出调用方
//! 选定数值类型（`i32` / `i64` / `f32` / `f64`）的结果：
//!
//! ```text
//! 调用方                           求值器
//!   │                                │
//!   │── set_var / set_fn ──────────►│ （填充符号表）
//!   │── eval(text) ────────────────►│
//!   │                                │ 按需分词 → 优先级爬升 → 逐层求值
//!   │◄── Result<T, CalcError> ──────│
//! ```
//!
//! 解析与求值在同一趟完成，不构造也不保留 AST；适合高频反复调用。
//!
//! ## 核心类型
//!
//! - [`ExpressionParser`]：持有符号表的可复用求值器
//! - [`eval`]：空符号表的一次性求值入口
//! - [`SymbolTable`] / [`Binding`]：名字 → 变量值或一元函数
//! - [`Number`]：数值类型抽象，整数/浮点能力差异在编译期区分
//! - [`CalcError`]：统一错误类型，携带出错位置的字节偏移
//!
//! ## 使用示例
//!
//! ```ignore
//! use calc_core::{ExpressionParser, eval};
//!
//! // 一次性求值
//! let x: i32 = eval("(1 + 2) * 3")?;
//! assert_eq!(x, 9);
//!
//! // 复用求值器与符号表
//! let mut parser = ExpressionParser::<f64>::new();
//! parser.set_var("r", 2.0);
//! parser.set_fn("sq", |v| v * v);
//! let area = parser.eval("3.14 * sq(r)")?;
//! ```
//!
//! ## 模块结构
//!
//! - [`error`]：错误类型定义
//! - [`value`]：数值类型抽象与运算符定义
//! - [`symbols`]：符号表
//! - [`parser`]：分词器与边解析边求值的解析器

pub mod error;
pub mod parser;
pub mod symbols;
pub mod value;

// 重导出核心类型
pub use error::{CalcError, CalcResult};
pub use parser::{ExpressionParser, MAX_DEPTH, Token, TokenKind, Tokenizer, eval};
pub use symbols::{Binding, SymbolTable};
pub use value::{BinaryOp, MAX_NUMBER_LEN, Number, NumberKind, NumericError, UnaryOp};
