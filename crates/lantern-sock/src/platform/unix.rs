//! Unix 能力实现：`poll` 就绪等待、带 `MSG_NOSIGNAL` 的收发、
//! `SO_NOSIGPIPE` 作用域 guard 与带 errno 上报的 close。

use std::io;
use std::os::fd::{AsRawFd, IntoRawFd};
use std::time::{Duration, Instant};

use socket2::Socket;

use crate::engine::Interest;

/// 发送/接收统一附带的 flag。Apple 系没有 `MSG_NOSIGNAL`，由
/// [`SigpipeGuard`] 的 `SO_NOSIGPIPE` 路径补齐同等语义。
#[cfg(not(target_vendor = "apple"))]
const TRANSFER_FLAGS: libc::c_int = libc::MSG_NOSIGNAL;
#[cfg(target_vendor = "apple")]
const TRANSFER_FLAGS: libc::c_int = 0;

/// 阻塞等待描述符按方向就绪。
///
/// # 教案式说明
/// - **契约 (What)**：`limit` 为 `None` 时无限等待；返回 `Ok(true)` 表示
///   已就绪，`Ok(false)` 表示在时限内未就绪（超时），`Err` 为其余系统失败。
/// - **逻辑 (How)**：`EINTR` 在循环内重试，且每轮按入口截止时间重新计算
///   剩余等待时长，打断对调用方不可见、不多耗预算。
pub(crate) fn wait_ready(
    socket: &Socket,
    interest: Interest,
    limit: Option<Duration>,
) -> io::Result<bool> {
    let deadline = limit.map(|limit| Instant::now() + limit);
    let events = match interest {
        Interest::Read => libc::POLLIN,
        Interest::Write => libc::POLLOUT,
    };

    loop {
        let timeout_ms: libc::c_int = match deadline {
            None => -1,
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .as_millis()
                .min(libc::c_int::MAX as u128) as libc::c_int,
        };
        let mut pollfd = libc::pollfd {
            fd: socket.as_raw_fd(),
            events,
            revents: 0,
        };
        // SAFETY: pollfd 指向本栈帧上的单元素数组，生命周期覆盖整个调用。
        let rc = unsafe { libc::poll(&mut pollfd, 1, timeout_ms) };
        match rc {
            0 => return Ok(false),
            -1 => {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    tracing::trace!(?interest, "readiness wait interrupted, retrying");
                    continue;
                }
                return Err(err);
            }
            _ => return Ok(true),
        }
    }
}

/// 单次接收，最多填满 `buf`。对端关闭返回 `Ok(0)`。
pub(crate) fn recv(socket: &Socket, buf: &mut [u8]) -> io::Result<usize> {
    // SAFETY: 缓冲区指针与长度来自同一个合法的 &mut [u8]。
    let rc = unsafe {
        libc::recv(
            socket.as_raw_fd(),
            buf.as_mut_ptr().cast(),
            buf.len(),
            TRANSFER_FLAGS,
        )
    };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(rc as usize)
}

/// 单次发送，返回本次实际送出的字节数（可能短于 `buf`）。
pub(crate) fn send(socket: &Socket, buf: &[u8]) -> io::Result<usize> {
    // SAFETY: 缓冲区指针与长度来自同一个合法的 &[u8]。
    let rc = unsafe {
        libc::send(
            socket.as_raw_fd(),
            buf.as_ptr().cast(),
            buf.len(),
            TRANSFER_FLAGS,
        )
    };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(rc as usize)
}

/// 关闭描述符并上报 errno。所有权被消费，失败时描述符也已脱离句柄管理。
pub(crate) fn close(socket: Socket) -> io::Result<()> {
    let fd = socket.into_raw_fd();
    // SAFETY: fd 刚从 into_raw_fd 取得，本函数是唯一的关闭方。
    if unsafe { libc::close(fd) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(target_vendor = "apple")]
mod sigpipe {
    use std::io;
    use std::mem;
    use std::os::fd::AsRawFd;

    use socket2::Socket;

    /// 传输期间置位 `SO_NOSIGPIPE`、drop 时恢复旧值的作用域 guard。
    ///
    /// 读取旧值失败时按“原本未置位”处理，与上游实现一样尽力而为。
    pub(crate) struct SigpipeGuard<'a> {
        socket: &'a Socket,
        previous: libc::c_int,
    }

    impl<'a> SigpipeGuard<'a> {
        pub(crate) fn engage(socket: &'a Socket) -> Self {
            let fd = socket.as_raw_fd();
            let mut previous: libc::c_int = 0;
            let mut len = mem::size_of::<libc::c_int>() as libc::socklen_t;
            let on: libc::c_int = 1;
            // SAFETY: 出参指针与长度匹配 c_int 大小，fd 在 guard 存续期内有效。
            unsafe {
                libc::getsockopt(
                    fd,
                    libc::SOL_SOCKET,
                    libc::SO_NOSIGPIPE,
                    (&mut previous as *mut libc::c_int).cast(),
                    &mut len,
                );
                libc::setsockopt(
                    fd,
                    libc::SOL_SOCKET,
                    libc::SO_NOSIGPIPE,
                    (&on as *const libc::c_int).cast(),
                    mem::size_of::<libc::c_int>() as libc::socklen_t,
                );
            }
            Self { socket, previous }
        }
    }

    impl Drop for SigpipeGuard<'_> {
        fn drop(&mut self) {
            let fd = self.socket.as_raw_fd();
            // SAFETY: 同 engage；恢复失败只记录，不得在 Drop 中上抛。
            let rc = unsafe {
                libc::setsockopt(
                    fd,
                    libc::SOL_SOCKET,
                    libc::SO_NOSIGPIPE,
                    (&self.previous as *const libc::c_int).cast(),
                    mem::size_of::<libc::c_int>() as libc::socklen_t,
                )
            };
            if rc == -1 {
                tracing::warn!(
                    error = %io::Error::last_os_error(),
                    "failed to restore SO_NOSIGPIPE"
                );
            }
        }
    }
}

#[cfg(not(target_vendor = "apple"))]
mod sigpipe {
    use socket2::Socket;

    /// 非 Apple 目标依赖 `MSG_NOSIGNAL`，无需套接字级开关。
    pub(crate) struct SigpipeGuard;

    impl SigpipeGuard {
        pub(crate) fn engage(_socket: &Socket) -> Self {
            Self
        }
    }
}

pub(crate) use sigpipe::SigpipeGuard;
