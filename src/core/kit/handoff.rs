//! 单槽交接通道
//!
//! 生产者与消费者之间的阻塞式交接：槽位容量为 1，`send` 会一直阻塞到
//! 消费者取走该元素为止（rendezvous），从而形成背压。
//!
//! 两端各自持有一个信号：
//! - 发送端销毁 => `closed`，消费者读完槽位后得到 `HandoffError::Closed`
//! - 接收端取消/销毁 => `cancelled`，阻塞中的生产者得到 `HandoffError::Cancelled`

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use thiserror::Error;

/// 交接通道可能产生的错误类型
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum HandoffError {
    /// 消费者已放弃，元素未被取走
    #[error("Receiver cancelled the handoff")]
    Cancelled,

    /// 生产者已结束且槽位为空
    #[error("Sender closed and slot is empty")]
    Closed,

    /// 互斥锁被污染（poisoned）
    #[error("Mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// 两端共享的状态
struct Shared<T> {
    inner: Mutex<Inner<T>>,
    /// 槽位被清空，或接收端取消
    taken: Condvar,
    /// 槽位被填充，或发送端关闭
    filled: Condvar,
}

/// 受 Mutex 保护的内部数据
struct Inner<T> {
    slot: Option<T>,
    closed: bool,
    cancelled: bool,
}

impl<T> Shared<T> {
    fn lock(&self) -> Result<MutexGuard<'_, Inner<T>>, HandoffError> {
        self.inner
            .lock()
            .map_err(|e| HandoffError::MutexPoisoned(e.to_string()))
    }
}

/// 创建一对交接端点
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let shared = Arc::new(Shared {
        inner: Mutex::new(Inner {
            slot: None,
            closed: false,
            cancelled: false,
        }),
        taken: Condvar::new(),
        filled: Condvar::new(),
    });

    (
        Sender {
            shared: Arc::clone(&shared),
        },
        Receiver { shared },
    )
}

/// 发送端（每个通道唯一的写者）
pub struct Sender<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Sender<T> {
    /// 交出一个元素（阻塞式）：直到消费者取走或取消才返回
    pub fn send(&self, item: T) -> Result<(), HandoffError> {
        let shared = &self.shared;
        let mut inner = shared.lock()?;

        // 等待槽位空闲
        while inner.slot.is_some() && !inner.cancelled {
            inner = shared
                .taken
                .wait(inner)
                .map_err(|e| HandoffError::MutexPoisoned(e.to_string()))?;
        }

        if inner.cancelled {
            return Err(HandoffError::Cancelled);
        }

        inner.slot = Some(item);
        shared.filled.notify_one();

        // 等待消费者取走
        while inner.slot.is_some() && !inner.cancelled {
            inner = shared
                .taken
                .wait(inner)
                .map_err(|e| HandoffError::MutexPoisoned(e.to_string()))?;
        }

        if inner.slot.take().is_some() {
            return Err(HandoffError::Cancelled);
        }

        Ok(())
    }

    /// 接收端是否已经放弃
    pub fn is_cancelled(&self) -> bool {
        match self.shared.lock() {
            Ok(inner) => inner.cancelled,
            // 锁被污染时无法再交接，视为取消
            Err(_) => true,
        }
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.shared.lock() {
            inner.closed = true;
        }
        self.shared.filled.notify_all();
    }
}

/// 接收端（每个通道唯一的读者）
pub struct Receiver<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Receiver<T> {
    /// 获取下一个元素（阻塞式）：槽位为空时等待，发送端关闭后返回 `Closed`
    pub fn recv(&self) -> Result<T, HandoffError> {
        let shared = &self.shared;
        let mut inner = shared.lock()?;

        while inner.slot.is_none() && !inner.closed {
            inner = shared
                .filled
                .wait(inner)
                .map_err(|e| HandoffError::MutexPoisoned(e.to_string()))?;
        }

        match inner.slot.take() {
            Some(item) => {
                shared.taken.notify_all();
                Ok(item)
            }
            None => Err(HandoffError::Closed),
        }
    }

    /// 放弃接收：唤醒阻塞中的生产者。可重复调用
    pub fn cancel(&self) {
        if let Ok(mut inner) = self.shared.lock() {
            // 未取走的元素由仍在等待的发送端收回
            inner.cancelled = true;
        }
        self.shared.taken.notify_all();
    }

    /// 发送端是否已经结束
    pub fn is_closed(&self) -> bool {
        match self.shared.lock() {
            Ok(inner) => inner.closed,
            Err(_) => true,
        }
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
