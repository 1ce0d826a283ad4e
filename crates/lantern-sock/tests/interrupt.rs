//! 信号打断契约测试：就绪等待被信号打断时必须在内部重试，
//! 调用方观察到的结果与一次未被打断的成功等待完全相同。
//!
//! # 测试结构（What）
//! - 安装不带 `SA_RESTART` 的 SIGUSR1 处理器，保证阻塞中的 `poll`
//!   以 `EINTR` 返回而非由内核自动重启；
//! - 读线程阻塞在有界预算的 read 上，主线程用 `pthread_kill` 连续打断
//!   数次后才真正写入数据。
//!
//! 仅在 Linux 上运行：`pthread_t` 在其他平台不可跨线程传递。
#![cfg(target_os = "linux")]

use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use lantern_sock::{Endpoint, TimeoutBudget};
use socket2::Socket;

unsafe extern "C" fn noop_handler(_sig: libc::c_int) {}

/// 安装可打断（无 SA_RESTART）的 SIGUSR1 处理器。
fn install_interruptible_handler() {
    // SAFETY: sigaction 结构零初始化后按 POSIX 填写；处理器本身无副作用。
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = noop_handler as libc::sighandler_t;
        libc::sigemptyset(&mut action.sa_mask);
        action.sa_flags = 0;
        assert_eq!(
            libc::sigaction(libc::SIGUSR1, &action, std::ptr::null_mut()),
            0,
            "install SIGUSR1 handler"
        );
    }
}

#[test]
fn interrupted_wait_is_invisible_to_the_caller() {
    install_interruptible_handler();

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener local addr");
    let client = TcpStream::connect(addr).expect("connect loopback");
    let (server, _) = listener.accept().expect("accept loopback");
    let client = Endpoint::from_socket(Socket::from(client));
    let server = Endpoint::from_socket(Socket::from(server));

    let (tid_tx, tid_rx) = mpsc::channel();
    let reader = thread::spawn(move || {
        // SAFETY: 仅取本线程 id 供 pthread_kill 定向打断。
        tid_tx
            .send(unsafe { libc::pthread_self() })
            .expect("publish reader tid");
        let mut buf = [0u8; 8];
        let mut budget = TimeoutBudget::from_secs(10);
        let n = server
            .read(&mut buf, &mut budget)
            .expect("read across interruptions");
        buf[..n].to_vec()
    });

    let tid = tid_rx.recv().expect("reader tid");
    // 等读线程进入 poll 后连续打断几次，再给出真正的数据。
    thread::sleep(Duration::from_millis(300));
    for _ in 0..3 {
        // SAFETY: tid 来自仍然存活的读线程。
        unsafe { libc::pthread_kill(tid, libc::SIGUSR1) };
        thread::sleep(Duration::from_millis(100));
    }

    let mut budget = TimeoutBudget::from_secs(5);
    client.write(b"ping", &mut budget).expect("write after signals");

    assert_eq!(reader.join().expect("reader thread"), b"ping");
}
