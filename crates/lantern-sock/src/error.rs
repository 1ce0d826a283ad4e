//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 为套接字核心对外暴露的两类失败提供集中定义：预算耗尽与系统级 I/O 失败；
//! - 等待期间的 `EINTR` 在引擎内部完全恢复，因此刻意不设对应变体。
//!
//! ## 设计要求（What）
//! - 错误类型实现 `thiserror::Error` 以兼容 `std::error::Error`；
//! - 系统级失败携带原始 [`std::io::Error`]，调用方仍可经
//!   [`std::io::Error::raw_os_error`] 取回裸错误码做精细分流。

use std::io;

use thiserror::Error;

/// 套接字核心的错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：把 read/write/destroy 的失败收敛为两个稳定类别，
///   让上层协议栈只需区分“再给预算重试”与“连接已不可用”。
/// - **契约 (What)**：
///   - [`SockError::TimedOut`]：预算在进入时已为负，或就绪等待在预算内
///     未观察到可读/可写；
///   - [`SockError::Socket`]：其余一切系统级失败，包括 close 失败与在已
///     销毁句柄上发起的调用（`ErrorKind::NotConnected`）；
///   - 读写两条路径的失败统一走本枚举，不存在未归一的裸返回值。
/// - **权衡 (Trade-offs)**：`io::Error` 不可 `Clone`，本枚举因此也不派生
///   `Clone`；需要跨线程广播错误的调用方应先降级为错误码或字符串。
#[derive(Debug, Error)]
pub enum SockError {
    /// 时间预算在调用前已为负，或就绪等待超时。
    #[error("I/O wait exceeded the remaining timeout budget")]
    TimedOut,

    /// 套接字系统调用失败。
    #[error("socket call failed: {0}")]
    Socket(#[source] io::Error),
}

impl SockError {
    /// 在已销毁（哨兵态）的句柄上发起调用时返回的错误。
    pub(crate) fn destroyed() -> Self {
        Self::Socket(io::Error::new(
            io::ErrorKind::NotConnected,
            "endpoint has already been destroyed",
        ))
    }
}

impl From<io::Error> for SockError {
    fn from(err: io::Error) -> Self {
        Self::Socket(err)
    }
}

/// 本 crate 的统一结果别名。
pub type SockResult<T> = Result<T, SockError>;
