//! 优先级资源
//!
//! 容量为 N 的独占资源：持有数永不超过容量；等待队列按
//! （优先级，到达序号）排序，优先级数值小者先获授予，同级先到先得。

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::ProcId;

/// 一次资源请求的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// 当场授予，调用方可立即继续
    Granted,
    /// 容量耗尽，已入队等待；授予时经由 `release` 的返回值交还
    Queued,
}

struct Waiter {
    priority: u32,
    seq: u64,
    proc_id: ProcId,
}

// BinaryHeap 是 max-heap；我们需要最小 (priority, seq) 优先，因此反向比较。
impl Ord for Waiter {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.priority.cmp(&other.priority) {
            Ordering::Equal => self.seq.cmp(&other.seq),
            ord => ord,
        }
        .reverse()
    }
}

impl PartialOrd for Waiter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Waiter {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for Waiter {}

/// 容量受限的优先级资源（站台或区间线路）。
///
/// 请求不会失败：容量不足时只会无限期等待，由释放驱动授予。
pub struct PriorityResource {
    capacity: usize,
    held: usize,
    next_seq: u64,
    waiting: BinaryHeap<Waiter>,
}

impl PriorityResource {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            held: 0,
            next_seq: 0,
            waiting: BinaryHeap::new(),
        }
    }

    /// 请求一个容量单位。容量允许则当场授予，否则按优先级入队。
    pub fn request(&mut self, priority: u32, proc_id: ProcId) -> RequestOutcome {
        if self.held < self.capacity && self.waiting.is_empty() {
            self.held += 1;
            return RequestOutcome::Granted;
        }
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.waiting.push(Waiter {
            priority,
            seq,
            proc_id,
        });
        RequestOutcome::Queued
    }

    /// 释放一个容量单位。
    ///
    /// 若有等待者，容量单位直接转移给 (priority, seq) 最小者并返回其句柄，
    /// 持有数保持不变；否则持有数减一。
    pub fn release(&mut self) -> Option<ProcId> {
        debug_assert!(self.held > 0, "release without holder");
        match self.waiting.pop() {
            Some(w) => Some(w.proc_id),
            None => {
                self.held = self.held.saturating_sub(1);
                None
            }
        }
    }

    /// 当前是否还有空余容量（调度器的占用视图）
    pub fn has_free(&self) -> bool {
        self.held < self.capacity
    }

    pub fn held(&self) -> usize {
        self.held
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }
}
