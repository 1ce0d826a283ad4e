//! # engine 模块说明
//!
//! ## 角色定位（Why）
//! - 每次读/写调用的主干：Validate → Wait → Transfer → Account 四个阶段，
//!   终止于传输结果或就绪等待的超时/失败。
//!
//! ## 设计要求（What）
//! - Validate：预算为负时不发出任何系统调用，直接报超时——区分
//!   “额度已超支”与“用剩余额度继续等”两种语义；
//! - Wait：单描述符就绪等待，`EINTR` 由平台层透明重试；
//! - Transfer：读方向单次 recv；写方向循环 send 直至写满或失败；
//! - Account：仅在成功时、且预算有界时，按整秒截断扣减墙钟耗时。

use std::io;
use std::time::Instant;

use socket2::Socket;

use crate::budget::TimeoutBudget;
use crate::error::{SockError, SockResult};
use crate::platform;

/// 就绪等待关注的方向。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Interest {
    Read,
    Write,
}

/// 读方向：一次 recv，最多 `buf.len()` 字节；对端关闭得 0 不是错误。
pub(crate) fn recv_bounded(
    socket: &Socket,
    buf: &mut [u8],
    budget: &mut TimeoutBudget,
) -> SockResult<usize> {
    bounded(socket, Interest::Read, budget, |socket| {
        platform::recv(socket, buf)
    })
}

/// 写方向：把整个 `buf` 驱动到完成或失败。
pub(crate) fn send_bounded(
    socket: &Socket,
    buf: &[u8],
    budget: &mut TimeoutBudget,
) -> SockResult<usize> {
    bounded(socket, Interest::Write, budget, |socket| {
        send_to_completion(socket, buf)
    })
}

/// 循环补发剩余字节。任何一次 send 失败立即中止并上报该失败，
/// 已送出的前缀不回滚（语义同上游：部分发送后的失败就是失败）。
fn send_to_completion(socket: &Socket, buf: &[u8]) -> io::Result<usize> {
    let mut sent = 0;
    while sent < buf.len() {
        sent += platform::send(socket, &buf[sent..])?;
    }
    Ok(sent)
}

/// 四阶段主干。传输闭包固定方向差异，等待与记账两端完全共享。
///
/// 失败路径不扣预算：上游实现只在成功返回前做减法，保持一致以便
/// 调用方用同一额度重试。
fn bounded<F>(
    socket: &Socket,
    interest: Interest,
    budget: &mut TimeoutBudget,
    transfer: F,
) -> SockResult<usize>
where
    F: FnOnce(&Socket) -> io::Result<usize>,
{
    if budget.is_expired() {
        return Err(SockError::TimedOut);
    }
    let started = Instant::now();

    if !platform::wait_ready(socket, interest, budget.wait_limit())? {
        tracing::trace!(?interest, remaining = budget.remaining_secs(), "readiness wait timed out");
        return Err(SockError::TimedOut);
    }

    let _sigpipe = platform::SigpipeGuard::engage(socket);
    let transferred = transfer(socket)?;

    budget.charge(started.elapsed());
    Ok(transferred)
}
