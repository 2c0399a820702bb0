//! # Symbols 模块
//!
//! 名字到绑定（变量值或一元函数）的符号表。
//!
//! ## 设计原则
//!
//! - 一个名字同一时刻只能是变量或函数之一：单一映射加带标签的
//!   [`Binding`] 枚举，互斥性由结构保证而非约定维护
//! - 只由调用方通过 `set_var` / `set_fn` 显式修改，解析过程绝不写入

use std::collections::HashMap;

/// 名字的绑定内容
///
/// 函数是普通函数指针，绑定可以整体复制。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding<T> {
    /// 变量值
    Variable(T),
    /// 一元函数
    Function(fn(T) -> T),
}

/// 符号表
///
/// 由一个 [`ExpressionParser`](crate::ExpressionParser) 独占持有，
/// 生命周期与其一致；一次性求值使用用完即弃的空表。
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTable<T> {
    bindings: HashMap<String, Binding<T>>,
}

impl<T: Copy> SymbolTable<T> {
    /// 创建空符号表
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// 绑定/覆盖变量，同名的函数绑定会被替换
    pub fn set_var(&mut self, name: impl Into<String>, value: T) {
        self.bindings.insert(name.into(), Binding::Variable(value));
    }

    /// 绑定/覆盖一元函数，同名的变量绑定会被替换
    pub fn set_fn(&mut self, name: impl Into<String>, f: fn(T) -> T) {
        self.bindings.insert(name.into(), Binding::Function(f));
    }

    /// 查找变量；名字不存在或绑定的是函数时返回 None
    pub fn get_var(&self, name: &str) -> Option<T> {
        match self.bindings.get(name) {
            Some(Binding::Variable(value)) => Some(*value),
            _ => None,
        }
    }

    /// 查找函数；名字不存在或绑定的是变量时返回 None
    pub fn get_fn(&self, name: &str) -> Option<fn(T) -> T> {
        match self.bindings.get(name) {
            Some(Binding::Function(f)) => Some(*f),
            _ => None,
        }
    }
}

impl<T: Copy> Default for SymbolTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
