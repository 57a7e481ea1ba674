use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 请求进行中的标记。克隆出来的句柄共享同一个状态，界面可以在请求期间读取。
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// guard 被丢弃时复位，请求中途被取消也一样
    pub(crate) fn start(&self) -> InFlightGuard {
        self.0.store(true, Ordering::Release);
        InFlightGuard(self.clone())
    }
}

pub(crate) struct InFlightGuard(InFlight);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.0.store(false, Ordering::Release);
    }
}
