//! # endpoint 模块说明
//!
//! ## 角色定位（Why）
//! - 以哨兵化的句柄包装一个已连接描述符与可选的对端地址，承载生命周期
//!   （构造/销毁）、读写门面与阻塞模式切换。

use std::net::Shutdown as StdShutdown;

use socket2::{SockAddr, Socket};

use crate::budget::TimeoutBudget;
use crate::engine;
use crate::error::{SockError, SockResult};
use crate::platform;

/// 对单个已连接传输端点的句柄。
///
/// # 教案式注释
///
/// ## 意图 (Why)
/// - 集中管理描述符的独占关闭权：同一描述符恰有一个 `Endpoint` 负责
///   shutdown/close，杜绝二次关闭；
/// - 为上层提供“字节数或分类错误”的最小读写面，时间额度经
///   [`TimeoutBudget`] 显式穿过每次调用。
///
/// ## 逻辑 (How)
/// - `socket` 用 `Option` 表达哨兵：`None` 即已销毁/未绑定；
/// - 读写委托 `engine` 的四阶段主干；
/// - [`Endpoint::destroy`] 先按方向 shutdown（失败忽略，与上游一致），再
///   close 并上报 errno；无论 close 成败都先回到哨兵态。
///
/// ## 契约 (What)
/// - **前置条件**：传入的 [`Socket`] 已连接；
/// - **后置条件**：`destroy` 之后句柄永久处于哨兵态，再次 `destroy` 是
///   no-op 成功，读写返回 [`SockError::Socket`]（`NotConnected`）；
/// - 若从未显式销毁，`Drop` 由内部 [`Socket`] 兜底关闭，错误静默。
///
/// ## 注意事项 (Trade-offs)
/// - 读写取 `&self` 但描述符层面没有内部互斥；同一句柄的并发使用由调用方
///   自律，不同句柄之间无需协调；
/// - close 失败时描述符从句柄视角已经脱管（绝不重试 close），代价是该
///   描述符可能泄漏——这是刻意选择。
#[derive(Debug)]
pub struct Endpoint {
    socket: Option<Socket>,
    peer_addr: Option<SockAddr>,
}

impl Endpoint {
    /// 从已连接的套接字构造句柄。必定成功。
    pub fn from_socket(socket: Socket) -> Self {
        Self {
            socket: Some(socket),
            peer_addr: None,
        }
    }

    /// 构造并记录对端地址。必定成功。
    pub fn with_peer_addr(socket: Socket, peer_addr: SockAddr) -> Self {
        Self {
            socket: Some(socket),
            peer_addr: Some(peer_addr),
        }
    }

    /// 对端地址；仅带地址的构造函数填充。
    pub fn peer_addr(&self) -> Option<&SockAddr> {
        self.peer_addr.as_ref()
    }

    /// 句柄是否仍持有活的描述符。
    pub fn is_live(&self) -> bool {
        self.socket.is_some()
    }

    /// 读取至多 `buf.len()` 字节。
    ///
    /// 返回实际收到的字节数；对端关闭连接时 0 是合法结果而非错误。
    /// `budget` 的三值语义与扣减规则见 [`TimeoutBudget`]。
    pub fn read(&self, buf: &mut [u8], budget: &mut TimeoutBudget) -> SockResult<usize> {
        engine::recv_bounded(self.live_socket()?, buf, budget)
    }

    /// 把整个 `buf` 写出：成功即恰好 `buf.len()` 字节，短写在内部被驱动
    /// 到完成或失败，绝不以部分发送冒充成功。
    pub fn write(&self, buf: &[u8], budget: &mut TimeoutBudget) -> SockResult<usize> {
        engine::send_bounded(self.live_socket()?, buf, budget)
    }

    /// 清除描述符的非阻塞位（F_GETFL 读改写）。
    pub fn set_blocking(&self) -> SockResult<()> {
        self.live_socket()?.set_nonblocking(false)?;
        Ok(())
    }

    /// 置位描述符的非阻塞位。
    pub fn set_nonblocking(&self) -> SockResult<()> {
        self.live_socket()?.set_nonblocking(true)?;
        Ok(())
    }

    /// 按方向 shutdown 后关闭描述符。
    ///
    /// shutdown 的失败被忽略（对端可能已先行关闭）；close 失败上报
    /// [`SockError::Socket`]。无论结果如何句柄都回到哨兵态，哨兵态上的
    /// 再次调用是 no-op 成功。
    pub fn destroy(&mut self, direction: ShutdownDirection) -> SockResult<()> {
        let Some(socket) = self.socket.take() else {
            return Ok(());
        };
        let _ = socket.shutdown(direction.into());
        if let Err(err) = platform::close(socket) {
            tracing::warn!(error = %err, "closing endpoint descriptor failed");
            return Err(SockError::Socket(err));
        }
        Ok(())
    }

    fn live_socket(&self) -> SockResult<&Socket> {
        self.socket.as_ref().ok_or_else(SockError::destroyed)
    }
}

/// 销毁时 shutdown 的方向。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownDirection {
    /// 关闭读半部。
    Read,
    /// 关闭写半部。
    Write,
    /// 同时关闭读写半部。
    Both,
}

impl From<ShutdownDirection> for StdShutdown {
    fn from(value: ShutdownDirection) -> Self {
        match value {
            ShutdownDirection::Read => StdShutdown::Read,
            ShutdownDirection::Write => StdShutdown::Write,
            ShutdownDirection::Both => StdShutdown::Both,
        }
    }
}
