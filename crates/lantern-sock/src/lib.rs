#![doc = r#"
# lantern-sock

## 设计动机（Why）
- **定位**：该 crate 是 lantern 协议栈的同步套接字核心，对一个**已连接**的
  传输端点执行受截止时间约束、可容忍信号打断的读写，并提供阻塞/非阻塞
  模式切换。
- **架构角色**：连接建立、accept、协议帧化与设备发现都是外部协作者；
  本 crate 只接收现成的描述符（可选地附带对端地址），返回字节数或分类错误。
- **设计理念**：把裸套接字调用默认做错的三件事收拢到一处——
  (a) 为可能无限阻塞的调用设定墙钟上限；(b) 对 `EINTR` 透明重试而非上抛
  伪错误；(c) 把短写驱动到完成或失败，绝不以部分发送冒充成功。

## 核心契约（What）
- **输入条件**：调用方提供已连接的 [`socket2::Socket`] 与一个按 `&mut`
  传递的 [`TimeoutBudget`]；
- **输出保障**：[`Endpoint::read`]/[`Endpoint::write`] 返回非负字节数，或
  [`SockError::TimedOut`]/[`SockError::Socket`]；成功调用按整秒粒度原地
  扣减预算，使多次调用可共享同一截止时间额度；
- **前置约束**：同一 [`Endpoint`] 不得被两个调用方并发使用，描述符层面
  没有内部互斥。

## 实现策略（How）
- **就绪等待**：`libc::poll` 单描述符等待，`EINTR` 在循环内按入口截止
  时间重新武装后重试，对调用方完全不可见；
- **信号抑制**：发送路径带 `MSG_NOSIGNAL`（平台支持时）；Apple/BSD 系
  目标在传输期间以 RAII guard 置位并恢复 `SO_NOSIGPIPE`；
- **平台能力**：所有条件编译集中在 `platform` 模块，向未来的 Windows
  后端（WSAPoll/ioctlsocket）暴露同一接缝。

## 风险与考量（Trade-offs）
- **时间粒度**：耗时记账以整秒截断采样，极快的调用可能记为 0 秒；
- **预算归零**：有界预算被扣减到恰好 0 后，下一次调用进入无限等待——
  这是对上游语义的刻意保留，调用方应以负值表达“已经超支”。
"#]

mod budget;
mod endpoint;
mod engine;
mod error;
mod platform;

pub use budget::TimeoutBudget;
pub use endpoint::{Endpoint, ShutdownDirection};
pub use error::{SockError, SockResult};
