//! # Calc CLI
//!
//! 算术表达式求值工具 - calc-core 的命令行前端。
//!
//! ## 用法
//!
//! ```bash
//! # 一次性求值（默认 f64 模式）
//! cargo run -p calc-cli -- "1 + 2 * 3"
//! cargo run -p calc-cli -- --mode i64 "0xFF << 4"
//!
//! # 预置变量
//! cargo run -p calc-cli -- --var x=2.5 "x ** 2"
//! cargo run -p calc-cli -- --vars presets.json "r * r * pi"
//!
//! # 交互模式（无表达式参数时进入）
//! cargo run -p calc-cli
//!
//! # 或安装后直接使用
//! cargo install --path tools/calc-cli
//! calc "sqrt(2) * 100"
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};

use calc_core::{ExpressionParser, Number};

/// 数值求值模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    I32,
    I64,
    F32,
    F64,
}

#[derive(Parser)]
#[command(name = "calc")]
#[command(about = "算术表达式求值工具 - 支持变量、一元函数与多种数值类型")]
#[command(version)]
struct Cli {
    /// 要求值的表达式；缺省时进入交互模式
    expr: Option<String>,

    /// 数值模式
    #[arg(short, long, value_enum, default_value = "f64")]
    mode: Mode,

    /// 预置变量，格式 name=value，可重复
    #[arg(long = "var", value_name = "NAME=VALUE")]
    vars: Vec<String>,

    /// 从 JSON 文件加载变量（对象：名字 → 数值）
    #[arg(long = "vars", value_name = "FILE")]
    vars_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.mode {
        Mode::I32 => run(&cli, ExpressionParser::<i32>::new()),
        Mode::I64 => run(&cli, ExpressionParser::<i64>::new()),
        Mode::F32 => run(&cli, ExpressionParser::<f32>::new()),
        Mode::F64 => {
            let mut parser = ExpressionParser::<f64>::new();
            register_math_fns(&mut parser);
            run(&cli, parser)
        }
    };

    if let Err(e) = result {
        eprintln!("错误: {e:#}");
        std::process::exit(1);
    }
}

/// 注册常用一元数学函数（仅 f64 模式）
fn register_math_fns(parser: &mut ExpressionParser<f64>) {
    parser.set_fn("sin", f64::sin);
    parser.set_fn("cos", f64::cos);
    parser.set_fn("tan", f64::tan);
    parser.set_fn("sqrt", f64::sqrt);
    parser.set_fn("abs", f64::abs);
    parser.set_fn("ln", f64::ln);
    parser.set_fn("log10", f64::log10);
    parser.set_fn("exp", f64::exp);
    parser.set_fn("floor", f64::floor);
    parser.set_fn("ceil", f64::ceil);
    parser.set_fn("round", f64::round);
}

fn run<T>(cli: &Cli, mut parser: ExpressionParser<T>) -> anyhow::Result<()>
where
    T: Number + FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    load_vars(cli, &mut parser)?;

    match &cli.expr {
        Some(expr) => {
            let value = parser.eval(expr)?;
            println!("{value}");
            Ok(())
        }
        None => repl(parser),
    }
}

/// 从 --var 与 --vars 填充符号表
fn load_vars<T>(cli: &Cli, parser: &mut ExpressionParser<T>) -> anyhow::Result<()>
where
    T: Number + FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(path) = &cli.vars_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("无法读取变量文件 {}", path.display()))?;
        let map: HashMap<String, serde_json::Value> = serde_json::from_str(&text)
            .with_context(|| format!("变量文件 {} 不是合法的 JSON 对象", path.display()))?;

        for (name, value) in map {
            let serde_json::Value::Number(num) = value else {
                bail!("变量 '{name}' 的值不是数字");
            };
            let parsed: T = num
                .to_string()
                .parse()
                .with_context(|| format!("变量 '{name}' 的值 {num} 无法用于当前数值模式"))?;
            parser.set_var(name, parsed);
        }
    }

    // --var 晚于 --vars 应用，同名时覆盖文件里的值
    for def in &cli.vars {
        let Some((name, value)) = def.split_once('=') else {
            bail!("无效的变量定义 '{def}'，期望 name=value");
        };
        let parsed: T = value
            .trim()
            .parse()
            .with_context(|| format!("变量 '{}' 的值 '{}' 无法解析", name.trim(), value.trim()))?;
        parser.set_var(name.trim(), parsed);
    }

    Ok(())
}

/// 交互模式
///
/// 逐行求值；`name = 表达式` 形式求值后绑定变量；`quit` / `exit`
/// 或 EOF 退出。单行出错只打印错误并继续，恢复策略属于使用者。
fn repl<T: Number>(mut parser: ExpressionParser<T>) -> anyhow::Result<()> {
    println!("calc 交互模式（quit 退出）");
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        // `name = 表达式`：求值成功后绑定变量
        if let Some((name, expr)) = split_assignment(line) {
            match parser.eval(expr) {
                Ok(value) => {
                    println!("{name} = {value}");
                    parser.set_var(name, value);
                }
                Err(e) => eprintln!("错误: {e}"),
            }
            continue;
        }

        match parser.eval(line) {
            Ok(value) => println!("{value}"),
            Err(e) => eprintln!("错误: {e}"),
        }
    }

    Ok(())
}

/// 识别 `name = 表达式` 形式
///
/// 名字必须是合法标识符（ASCII 字母开头）；不满足时整行按表达式处理
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let (left, right) = line.split_once('=')?;
    let name = left.trim();

    let mut chars = name.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((name, right.trim()))
}
