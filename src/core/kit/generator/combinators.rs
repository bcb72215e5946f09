//! 生成器组合子
//!
//! 每个组合子都拥有并运行自己的后台生产者线程：
//! 上游迭代器被移入该线程，线程结束时上游随之销毁。

use std::io::Write;

use tracing::{debug, warn};

use super::{GenResult, Generator, Peekable};

/// 映射：第 i 个输出为 `f(upstream[i])`
pub fn transform<I, U, F>(upstream: I, mut f: F) -> GenResult<Generator<U>>
where
    I: Iterator + Send + 'static,
    U: Send + 'static,
    F: FnMut(I::Item) -> U + Send + 'static,
{
    let mut upstream = upstream;
    Generator::spawn("transform", move |y| {
        while !y.is_cancelled() {
            let Some(item) = upstream.next() else { break };
            if y.send(f(item)).is_err() {
                break;
            }
        }
    })
}

/// 过滤：只保留 `predicate` 成立的元素，保持相对顺序
pub fn filter<I, P>(upstream: I, mut predicate: P) -> GenResult<Generator<I::Item>>
where
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
    P: FnMut(&I::Item) -> bool + Send + 'static,
{
    let mut upstream = upstream;
    Generator::spawn("filter", move |y| {
        // 每拉取一个上游元素都检查一次取消，全部不满足时也能及时退出
        while !y.is_cancelled() {
            let Some(item) = upstream.next() else { break };
            if predicate(&item) && y.send(item).is_err() {
                break;
            }
        }
    })
}

/// 包装为可预读的生成器
pub fn into_peekable<I: Iterator>(upstream: I) -> Peekable<I> {
    Peekable::new(upstream)
}

/// 旁路输出：把每个元素的文本投影写入 `writer`，元素原样向下游传递
///
/// `projection` 返回 `None` 的元素不产生输出。
/// 写入失败只记录一次警告，之后不再写入，主数据流不受影响。
pub fn tap<I, W, F>(upstream: I, writer: W, mut projection: F) -> GenResult<Generator<I::Item>>
where
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
    W: Write + Send + 'static,
    F: FnMut(&I::Item) -> Option<String> + Send + 'static,
{
    let mut upstream = upstream;
    let mut writer = Some(writer);
    Generator::spawn("tap", move |y| {
        while !y.is_cancelled() {
            let Some(item) = upstream.next() else { break };

            let written = match (writer.as_mut(), projection(&item)) {
                (Some(w), Some(text)) => writeln!(w, "{}", text),
                _ => Ok(()),
            };
            if let Err(e) = written {
                warn!(target: "llamac::generator", error = %e, "tap writer failed, output disabled");
                writer = None;
            }

            if y.send(item).is_err() {
                break;
            }
        }

        if let Some(mut w) = writer {
            if let Err(e) = w.flush() {
                warn!(target: "llamac::generator", error = %e, "tap writer flush failed");
            }
        }
    })
}

/// 完全消费上游，仅为其副作用；返回丢弃的元素个数
pub fn drain<I: Iterator>(upstream: I) -> usize {
    let count = upstream.fold(0usize, |n, item| {
        drop(item);
        n + 1
    });
    debug!(target: "llamac::generator", count, "drained");
    count
}

/// 消费 `Result` 序列，遇到第一个 `Err` 即停止并返回它
///
/// 正常结束时返回消费的元素个数。剩余上游随迭代器一起销毁（取消）。
pub fn try_drain<I, T, E>(upstream: I) -> Result<usize, E>
where
    I: Iterator<Item = Result<T, E>>,
{
    let mut count = 0usize;
    for item in upstream {
        item?;
        count += 1;
    }
    debug!(target: "llamac::generator", count, "drained");
    Ok(count)
}
