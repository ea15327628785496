//! 约束求解优化器
//!
//! 在 `[now, now + horizon]` 的整分钟格点上为视界内列车指派出发时刻。
//! 约束：两两车头时距 ≥ 最小间隔（任一先后均可）、共享区间不得同刻
//! 出发（单占用）、动态优先级更紧迫者不得晚于较宽松者出发、扰动封锁
//! 窗口内不得驶向被封锁区间。目标函数最小化优先级加权的出发时刻加上
//! 对原计划的偏离。
//!
//! 求解采用带剪枝的深度优先搜索，受墙钟预算约束：搜索完整视为已证
//! 最优（置信度 0.9）；预算耗尽但已有可行解则返回现任解（置信度
//! 0.7）；否则返回空时刻表，调度器自动退回规则二/三，绝不报错。

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::schedule::{SystemState, TargetEntry, TargetSchedule, TrainSnapshot};
use super::scorer::{PriorityScorer, StaticPriority};
use crate::audit::{EventKind, EventLog};
use crate::rail::Disruption;
use crate::sim::SimTime;

/// 优化器配置选项
#[derive(Debug, Clone)]
pub struct OptimizerOpts {
    /// 滚动时间视界（分钟）
    pub horizon_min: u64,
    /// 求解墙钟预算，独立于仿真时间
    pub solver_budget: Duration,
    /// 最小车头时距（分钟）
    pub min_headway_min: u64,
    /// 扰动下快速重排的视界上限（分钟）
    pub reopt_horizon_cap_min: u64,
}

impl Default for OptimizerOpts {
    fn default() -> Self {
        Self {
            horizon_min: 30,
            solver_budget: Duration::from_secs(30),
            min_headway_min: 5,
            reopt_horizon_cap_min: 15,
        }
    }
}

/// 一次求解的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// 搜索完整，现任解已证最优
    Optimal,
    /// 预算耗尽，返回现任可行解
    Feasible,
    /// 无解（不可行或预算内一无所获），等价于空时刻表
    NoSchedule,
}

/// 求解历史条目（用于事后检视）
#[derive(Debug, Clone)]
pub struct SolveRecord {
    pub t_secs: u64,
    pub trains: usize,
    pub status: SolveStatus,
    pub solve_time: Duration,
}

const HISTORY_CAP: usize = 256;

/// 约束求解优化器。只读取列车/扰动快照，从不持有资源。
pub struct Optimizer {
    opts: OptimizerOpts,
    scorer: Box<dyn PriorityScorer>,
    history: VecDeque<SolveRecord>,
}

impl Optimizer {
    pub fn new(opts: OptimizerOpts) -> Self {
        Self::with_scorer(opts, Box::new(StaticPriority))
    }

    pub fn with_scorer(opts: OptimizerOpts, scorer: Box<dyn PriorityScorer>) -> Self {
        Self {
            opts,
            scorer,
            history: VecDeque::new(),
        }
    }

    pub fn opts(&self) -> &OptimizerOpts {
        &self.opts
    }

    pub fn history(&self) -> impl Iterator<Item = &SolveRecord> {
        self.history.iter()
    }

    /// 按配置视界求解目标时刻表。
    pub fn optimize(
        &mut self,
        now: SimTime,
        trains: &[TrainSnapshot],
        disruptions: &[Disruption],
        state: &SystemState,
        log: &mut EventLog,
    ) -> TargetSchedule {
        self.optimize_with_horizon(self.opts.horizon_min, now, trains, disruptions, state, log)
    }

    /// 扰动下的快速重排：以收窄的局部视界重新求解。
    ///
    /// 视界收窄只作用于本次调用，配置的视界保持不变。
    pub fn reoptimize_under_disruption(
        &mut self,
        now: SimTime,
        trains: &[TrainSnapshot],
        disruption: &Disruption,
        state: &SystemState,
        log: &mut EventLog,
    ) -> TargetSchedule {
        log.log(
            now,
            EventKind::Optimizer,
            "SYSTEM",
            format!("Re-optimizing due to disruption: {}", disruption.description),
        );
        let horizon = self.opts.horizon_min.min(self.opts.reopt_horizon_cap_min);
        self.optimize_with_horizon(
            horizon,
            now,
            trains,
            std::slice::from_ref(disruption),
            state,
            log,
        )
    }

    fn optimize_with_horizon(
        &mut self,
        horizon_min: u64,
        now: SimTime,
        trains: &[TrainSnapshot],
        disruptions: &[Disruption],
        state: &SystemState,
        log: &mut EventLog,
    ) -> TargetSchedule {
        let started = Instant::now();
        let lo = now.ceil_minutes();
        let hi = lo.saturating_add(horizon_min);

        // 视界内待发车的列车
        let mut in_horizon: Vec<(f64, &TrainSnapshot)> = trains
            .iter()
            .filter(|t| t.next_departure.0 <= hi.saturating_mul(60))
            .map(|t| (self.scorer.score(t, now, state), t))
            .collect();

        if in_horizon.is_empty() {
            log.log(
                now,
                EventKind::Optimizer,
                "SYSTEM",
                "No trains in horizon for optimization.",
            );
            self.push_history(now, 0, SolveStatus::NoSchedule, started.elapsed());
            return TargetSchedule::new();
        }

        // 按（动态优先级，id）排序：求解顺序即优先序约束的赋值顺序
        in_horizon.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.id.cmp(&b.1.id))
        });

        let csp = Csp {
            trains: &in_horizon,
            lo,
            hi,
            headway: self.opts.min_headway_min,
            disruptions,
            deadline: started + self.opts.solver_budget,
        };
        let (status, assignment) = csp.solve();
        let solve_time = started.elapsed();

        let mut schedule = TargetSchedule::new();
        match (status, assignment) {
            (SolveStatus::Optimal | SolveStatus::Feasible, Some(departures)) => {
                let confidence = if status == SolveStatus::Optimal { 0.9 } else { 0.7 };
                log.log(
                    now,
                    EventKind::Optimizer,
                    "SYSTEM",
                    format!("Optimization successful. Status: {status:?}"),
                );
                info!(trains = in_horizon.len(), ?status, ?solve_time, "求解完成");
                for ((score, train), dep) in in_horizon.iter().zip(departures) {
                    schedule.insert(
                        train.id,
                        TargetEntry {
                            target_departure: SimTime::from_minutes(dep),
                            dynamic_priority: *score,
                            confidence,
                            constraints_satisfied: true,
                        },
                    );
                }
            }
            _ => {
                log.log(
                    now,
                    EventKind::Optimizer,
                    "SYSTEM",
                    "Optimization failed. Using fallback strategy.",
                );
                debug!(trains = in_horizon.len(), ?solve_time, "无可行解，返回空时刻表");
            }
        }

        self.push_history(now, in_horizon.len(), status, solve_time);
        schedule
    }

    fn push_history(&mut self, now: SimTime, trains: usize, status: SolveStatus, solve_time: Duration) {
        if self.history.len() == HISTORY_CAP {
            self.history.pop_front();
        }
        self.history.push_back(SolveRecord {
            t_secs: now.0,
            trains,
            status,
            solve_time,
        });
    }
}

// ── 搜索内核 ──────────────────────────────────────────────────────────────────

struct Csp<'a> {
    /// 按（动态优先级，id）升序
    trains: &'a [(f64, &'a TrainSnapshot)],
    lo: u64,
    hi: u64,
    headway: u64,
    disruptions: &'a [Disruption],
    deadline: Instant,
}

impl Csp<'_> {
    fn solve(&self) -> (SolveStatus, Option<Vec<u64>>) {
        let mut best: Option<(f64, Vec<u64>)> = None;
        let mut assign = Vec::with_capacity(self.trains.len());
        let complete = self.search(0, 0.0, &mut assign, &mut best);
        match (complete, best) {
            (true, Some((_, a))) => (SolveStatus::Optimal, Some(a)),
            (false, Some((_, a))) => (SolveStatus::Feasible, Some(a)),
            (_, None) => (SolveStatus::NoSchedule, None),
        }
    }

    /// 深度优先赋值。返回该子树是否被完整搜索（未因预算中断）。
    fn search(
        &self,
        idx: usize,
        partial_cost: f64,
        assign: &mut Vec<u64>,
        best: &mut Option<(f64, Vec<u64>)>,
    ) -> bool {
        if Instant::now() >= self.deadline {
            return false;
        }
        if idx == self.trains.len() {
            if best.as_ref().is_none_or(|(c, _)| partial_cost < *c) {
                *best = Some((partial_cost, assign.clone()));
            }
            return true;
        }

        let mut complete = true;
        for cand in self.lo..=self.hi {
            if !self.feasible(idx, cand, assign) {
                continue;
            }
            let cost = partial_cost + self.cost_term(idx, cand);
            // 代价项均非负，部分代价即下界
            if best.as_ref().is_some_and(|(c, _)| cost >= *c) {
                continue;
            }
            assign.push(cand);
            complete &= self.search(idx + 1, cost, assign, best);
            assign.pop();
            if Instant::now() >= self.deadline {
                return false;
            }
        }
        complete
    }

    fn feasible(&self, idx: usize, cand: u64, assign: &[u64]) -> bool {
        let (score, train) = &self.trains[idx];

        // 扰动：活动窗口内不得驶向被封锁区间
        for d in self.disruptions {
            if d.window_contains_minute(cand) && train.route.iter().any(|t| d.blocks_track(*t)) {
                return false;
            }
        }

        for (j, &other_dep) in assign.iter().enumerate() {
            let (other_score, other) = &self.trains[j];
            // 车头时距（任一先后均可，间隔须达标）
            if cand.abs_diff(other_dep) < self.headway {
                return false;
            }
            // 优先序：严格更紧迫者不得晚于较宽松者出发
            if *other_score < *score && other_dep > cand {
                return false;
            }
            // 区间单占用：共享区间的列车不得同刻出发
            if cand == other_dep && shares_track(train, other) {
                return false;
            }
        }
        true
    }

    fn cost_term(&self, idx: usize, cand: u64) -> f64 {
        let (score, train) = &self.trains[idx];
        let weight = (10.0 - *score).max(1.0);
        let mut cost = weight * cand as f64;
        if let Some(sched) = train.scheduled_departure_min {
            cost += 0.1 * (cand as f64 - sched as f64).abs();
        }
        cost
    }
}

fn shares_track(a: &TrainSnapshot, b: &TrainSnapshot) -> bool {
    a.route.iter().any(|t| b.route.contains(t))
}
