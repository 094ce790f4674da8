//! 节拍调度器 - 基础设施层
//!
//! 单线程协作式定时：每次只挂一个 `sleep(period)`，触发后由调用方决定是否再挂下一个。
//! 每个节拍互相独立，不做漂移补偿；`cancel` 可重复调用。

use std::future::pending;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, Sleep};

pub struct TickScheduler {
    period: Duration,
    next: Option<Pin<Box<Sleep>>>,
}

impl TickScheduler {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// 挂上下一个节拍；已挂时不重置
    pub fn arm(&mut self) {
        if self.next.is_none() {
            self.next = Some(Box::pin(sleep(self.period)));
        }
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// 等待当前节拍触发；未挂节拍时永不完成
    ///
    /// 可安全地放在 `tokio::select!` 中反复轮询，不会重启计时。
    pub async fn fired(&mut self) {
        match self.next.as_mut() {
            Some(tick) => {
                tick.await;
                self.next = None;
            }
            None => pending::<()>().await,
        }
    }
}
