//! # platform 模块说明
//!
//! ## 角色定位（Why）
//! - 把按操作系统家族分支的能力收拢为一个小接口：就绪等待、带 flag 的
//!   recv/send、SIGPIPE 抑制与带错误上报的 close。引擎与句柄层只面向
//!   这组函数，不出现任何内联的平台分支。
//!
//! ## 扩展建议（How）
//! - Windows 后端（WSAPoll + ioctlsocket + 无 SIGPIPE 概念的空 guard）
//!   应作为新的子模块接入，保持导出面不变。

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub(crate) use unix::{SigpipeGuard, close, recv, send, wait_ready};

#[cfg(not(unix))]
compile_error!("lantern-sock currently ships a Unix backend only; port the `platform` module to add another target family");
