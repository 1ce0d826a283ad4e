//! # budget 模块说明
//!
//! ## 角色定位（Why）
//! - 把“调用方持有、跨多次 I/O 调用共享的剩余秒数”从隐式的裸整数别名
//!   提升为显式值对象，使共享预算的契约出现在每个调用签名里。
//!
//! ## 设计要求（What）
//! - 三种取值语义：负 → 已超支，立即失败；0 → 无限等待；正 → 最多等待该秒数；
//! - 只减不增：成功调用按整秒截断扣减，内部绝不重置或补偿。

use std::time::Duration;

/// 跨一串 I/O 调用共享的剩余时间预算，以整秒计。
///
/// # 教案式说明
/// - **意图 (Why)**：一次协议交互往往由多次 read/write 组成，它们应共享
///   同一个墙钟额度；本类型以 `&mut` 形式穿过每次调用，由引擎在成功返回
///   前原地扣减。
/// - **契约 (What)**：
///   - [`TimeoutBudget::UNBOUNDED`]（内部值 0）永不衰减，表示“无截止时间”
///     而非“剩余 0 秒”；
///   - 负值在任何系统调用发出前就被引擎拒绝为超时；
///   - 扣减可穿越 0：有界预算被整秒耗时减到恰好 0 后，下一次调用进入无限
///     等待。需要表达“已经超支”的调用方应传入负值。
/// - **权衡 (Trade-offs)**：整秒粒度意味着快于 1 秒的调用记账为 0；换来的
///   是与上游多调用序列完全一致的收敛行为。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeoutBudget {
    secs: i64,
}

impl TimeoutBudget {
    /// 无截止时间：就绪等待可以无限阻塞，且预算永不衰减。
    pub const UNBOUNDED: Self = Self { secs: 0 };

    /// 以带符号秒数构造预算。
    ///
    /// 负值表示“已超支”，0 等价于 [`Self::UNBOUNDED`]，正值是最大等待秒数。
    pub const fn from_secs(secs: i64) -> Self {
        Self { secs }
    }

    /// 当前剩余秒数（带符号，保留三值语义）。
    pub const fn remaining_secs(&self) -> i64 {
        self.secs
    }

    /// 预算是否已超支（负值）。
    pub const fn is_expired(&self) -> bool {
        self.secs < 0
    }

    /// 预算是否为无限等待模式。
    pub const fn is_unbounded(&self) -> bool {
        self.secs == 0
    }

    /// 就绪等待允许阻塞的时长；`None` 表示无限等待。
    ///
    /// 前置条件：调用方已用 [`Self::is_expired`] 排除负值。
    pub(crate) fn wait_limit(&self) -> Option<Duration> {
        if self.is_unbounded() {
            None
        } else {
            Some(Duration::from_secs(self.secs as u64))
        }
    }

    /// 按整秒截断扣减本次调用的墙钟耗时；无限模式下为 no-op。
    pub(crate) fn charge(&mut self, elapsed: Duration) {
        if !self.is_unbounded() {
            self.secs -= elapsed.as_secs() as i64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TimeoutBudget;
    use std::time::Duration;

    #[test]
    fn negative_budget_is_expired() {
        let budget = TimeoutBudget::from_secs(-1);
        assert!(budget.is_expired());
        assert!(!budget.is_unbounded());
    }

    #[test]
    fn unbounded_budget_never_decays() {
        let mut budget = TimeoutBudget::UNBOUNDED;
        budget.charge(Duration::from_secs(30));
        assert_eq!(budget.remaining_secs(), 0);
        assert!(budget.is_unbounded());
        assert_eq!(budget.wait_limit(), None);
    }

    #[test]
    fn bounded_budget_charges_whole_seconds_only() {
        let mut budget = TimeoutBudget::from_secs(5);
        budget.charge(Duration::from_millis(900));
        assert_eq!(budget.remaining_secs(), 5);
        budget.charge(Duration::from_millis(2300));
        assert_eq!(budget.remaining_secs(), 3);
    }

    #[test]
    fn bounded_budget_may_cross_zero() {
        let mut budget = TimeoutBudget::from_secs(2);
        budget.charge(Duration::from_secs(3));
        assert_eq!(budget.remaining_secs(), -1);
        assert!(budget.is_expired());
    }

    #[test]
    fn wait_limit_maps_positive_budget() {
        let budget = TimeoutBudget::from_secs(7);
        assert_eq!(budget.wait_limit(), Some(Duration::from_secs(7)));
    }
}
