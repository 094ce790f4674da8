//! 倒计时
//!
//! 由外部节拍驱动（每秒一次 `tick`），自身不持有任何定时资源。
//! 归零时 `tick` 返回 [`TickOutcome::Expired`]，每次 `start` 最多一次。

use tracing::{debug, warn};

/// 剩余时间低于该值时界面应高亮提示
pub const LOW_TIME_THRESHOLD_SECS: u32 = 60;

/// 单次节拍的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 未在计时（未启动、已取消或已到期）
    Idle,
    /// 正常扣减一秒
    Ticked { remaining: u32 },
    /// 本次节拍归零，触发自动提交
    Expired,
}

#[derive(Debug, Default)]
pub struct CountdownTimer {
    remaining: Option<u32>,
    running: bool,
    expired_fired: bool,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初始化剩余时间并开始计时
    ///
    /// 只有从未启动过的计时器才能启动；重复调用返回 `false` 且不重置时钟。
    pub fn start(&mut self, total_seconds: u32) -> bool {
        if self.remaining.is_some() {
            warn!(
                "⏱️ 倒计时已初始化 (剩余 {:?} 秒)，忽略重复启动",
                self.remaining
            );
            return false;
        }
        self.remaining = Some(total_seconds);
        self.running = true;
        debug!("⏱️ 倒计时启动: {} 秒", total_seconds);
        true
    }

    /// 推进一秒
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        let next = self.remaining.unwrap_or(0).saturating_sub(1);
        self.remaining = Some(next);

        if next > 0 {
            return TickOutcome::Ticked { remaining: next };
        }

        self.running = false;
        if self.expired_fired {
            return TickOutcome::Idle;
        }
        self.expired_fired = true;
        debug!("⏰ 倒计时归零");
        TickOutcome::Expired
    }

    /// 停止计时且不触发到期；可重复调用，到期后调用也无副作用
    pub fn cancel(&mut self) {
        if self.running {
            debug!("⏹️ 倒计时已取消 (剩余 {:?} 秒)", self.remaining);
        }
        self.running = false;
    }

    /// 剩余秒数，未启动时为 `None`
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_expired(&self) -> bool {
        self.expired_fired
    }

    /// 是否还有剩余时间；未启动视为有
    pub fn has_time_left(&self) -> bool {
        self.remaining.map_or(true, |r| r > 0)
    }

    pub fn is_low(&self) -> bool {
        matches!(self.remaining, Some(r) if r > 0 && r < LOW_TIME_THRESHOLD_SECS)
    }
}
