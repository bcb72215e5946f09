//! 惰性生成器
//!
//! 后台生产者线程 + 前台消费者，通过单槽交接通道（[`handoff`]）连接。
//! 生成器是普通的 [`Iterator`]：`next()` 阻塞到有元素或序列结束，
//! 结束后持续返回 `None`（单遍、不可重启）。
//!
//! 销毁生成器会取消通道并等待生产者线程退出，
//! 生产者持有的上游生成器随之销毁，取消信号逐级向上传播。
//!
//! [`handoff`]: crate::core::kit::handoff

mod combinators;
mod peekable;

pub use combinators::{drain, filter, into_peekable, tap, transform, try_drain};
pub use peekable::Peekable;

use std::any::Any;
use std::iter::FusedIterator;
use std::panic;
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::core::kit::handoff::{self, HandoffError, Receiver, Sender};

/// 生成器错误
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// 无法启动后台生产者线程
    #[error("failed to spawn producer '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

pub type GenResult<T> = Result<T, GeneratorError>;

/// 生产者侧句柄，交给生产者闭包使用
pub struct Yielder<T> {
    tx: Sender<T>,
}

impl<T> Yielder<T> {
    /// 交出一个元素，阻塞到消费者取走为止
    ///
    /// 返回 `Err` 表示消费者已经放弃，生产者应尽快返回。
    pub fn send(&self, item: T) -> Result<(), HandoffError> {
        self.tx.send(item)
    }

    /// 消费者是否已经放弃
    pub fn is_cancelled(&self) -> bool {
        self.tx.is_cancelled()
    }
}

/// 由后台线程驱动的惰性序列
pub struct Generator<T> {
    name: String,
    rx: Receiver<T>,
    worker: Option<JoinHandle<()>>,
    exhausted: bool,
}

impl<T: Send + 'static> Generator<T> {
    /// 启动生产者线程，立即开始生产
    ///
    /// 生产者闭包返回即表示序列结束。
    pub fn spawn<F>(name: &str, body: F) -> GenResult<Self>
    where
        F: FnOnce(Yielder<T>) + Send + 'static,
    {
        let (tx, rx) = handoff::channel();
        let yielder = Yielder { tx };

        let worker = thread::Builder::new()
            .name(name.replace('\0', "\\0"))
            .spawn(move || {
                trace!(target: "llamac::generator", "producer started");
                body(yielder);
                trace!(target: "llamac::generator", "producer finished");
            })
            .map_err(|source| GeneratorError::Spawn {
                name: name.to_string(),
                source,
            })?;

        debug!(target: "llamac::generator", name, "generator spawned");

        Ok(Self {
            name: name.to_string(),
            rx,
            worker: Some(worker),
            exhausted: false,
        })
    }

    /// 将任意迭代器放到后台线程中逐个产出
    pub fn from_source<I>(name: &str, source: I) -> GenResult<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        let mut source = source.into_iter();
        Self::spawn(name, move |y| {
            while !y.is_cancelled() {
                match source.next() {
                    Some(item) => {
                        if y.send(item).is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        })
    }
}

impl<T> Generator<T> {
    /// 生产者线程名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 序列是否已经结束
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// 等待生产者线程退出；生产者 panic 时返回其 payload
    fn join_worker(&mut self) -> Option<Box<dyn Any + Send + 'static>> {
        let worker = self.worker.take()?;
        match worker.join() {
            Ok(()) => None,
            Err(payload) => {
                warn!(target: "llamac::generator", name = %self.name, "producer panicked");
                Some(payload)
            }
        }
    }
}

impl<T> Iterator for Generator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        match self.rx.recv() {
            Ok(item) => Some(item),
            Err(err) => {
                if let HandoffError::MutexPoisoned(msg) = &err {
                    warn!(target: "llamac::generator", name = %self.name, error = %msg, "handoff broken");
                }
                self.exhausted = true;
                // 生产者 panic 不能表现为正常结束，在消费者一侧重新抛出
                if let Some(payload) = self.join_worker() {
                    panic::resume_unwind(payload);
                }
                None
            }
        }
    }
}

impl<T> FusedIterator for Generator<T> {}

impl<T> Drop for Generator<T> {
    fn drop(&mut self) {
        if !self.exhausted {
            debug!(target: "llamac::generator", name = %self.name, "generator dropped early, cancelling");
        }
        self.rx.cancel();
        // 析构中只记录，不再抛出
        let _ = self.join_worker();
    }
}

impl<T> std::fmt::Debug for Generator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("name", &self.name)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}
