//! 条件编译日志宏
//!
//! wasm32 目标输出到浏览器控制台，原生目标（测试）走标准输出，
//! 保持逻辑层在两种目标下都可编译运行。

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub(crate) use {log_info, log_warn};
