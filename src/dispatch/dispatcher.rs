//! 调度器
//!
//! 对处于区间 `leg` 前的列车给出三种决策之一：持车、放行（指定线路）
//! 或等待。决策函数对合法输入全定义，永不失败；区间占用簿记
//! （`update_track_occupancy`）由仿真引擎在实际走行前后显式调用，
//! 不在决策内部发生。

use std::collections::HashMap;

use tracing::trace;

use crate::audit::{EventKind, EventLog};
use crate::opt::TargetSchedule;
use crate::rail::{Corridor, LineKind, TrackId, Train, TrainId};
use crate::resource::ResourceTable;
use crate::sim::SimTime;

/// 固定让行时长：非高等级列车为临近高等级列车让行 10 分钟。
const PRIORITY_HOLD: SimTime = SimTime(10 * 60);

/// 调度决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// 持车指定时长后重新评估
    Hold(SimTime),
    /// 放行，申请指定线路
    Proceed(LineKind),
    /// 两线皆忙，短暂等待后重试
    Wait,
}

/// 规则式调度器。每次决策无持久副作用，占用表与目标时刻表
/// 由仿真引擎显式喂入。
pub struct Dispatcher {
    occupancy: HashMap<TrackId, Option<TrainId>>,
    target_schedule: TargetSchedule,
}

impl Dispatcher {
    pub fn new(corridor: &Corridor) -> Self {
        Self {
            occupancy: corridor.tracks().iter().map(|t| (t.id, None)).collect(),
            target_schedule: TargetSchedule::new(),
        }
    }

    /// 喂入优化器的目标时刻表。整体替换，从不部分合并。
    pub fn set_target_schedule(&mut self, schedule: TargetSchedule) {
        self.target_schedule = schedule;
    }

    /// 列车进入/离开区间时由仿真引擎调用。
    pub fn update_track_occupancy(&mut self, track: TrackId, train: Option<TrainId>) {
        self.occupancy.insert(track, train);
    }

    pub fn occupant(&self, track: TrackId) -> Option<TrainId> {
        self.occupancy.get(&track).copied().flatten()
    }

    /// 按固定顺序评估三条规则，总是返回一个决策。
    pub fn decide(
        &self,
        now: SimTime,
        train: &Train,
        leg: usize,
        corridor: &Corridor,
        resources: &ResourceTable,
        log: &mut EventLog,
    ) -> Decision {
        let train_id = train.id;
        let priority = train.priority;

        // 规则一：优化器目标出发仍在未来，持车等到目标时刻
        if let Some(entry) = self.target_schedule.get(&train_id) {
            if entry.target_departure > now {
                let hold = entry.target_departure.saturating_sub(now);
                log.log(
                    now,
                    EventKind::DispatchDecision,
                    format!("{}", train_id.0),
                    format!(
                        "Train {} (P{priority}) held to meet optimizer target departure at {:.2}. Hold duration: {:.2} minutes.",
                        train_id.0,
                        entry.target_departure.as_minutes_f64(),
                        hold.as_minutes_f64(),
                    ),
                );
                return Decision::Hold(hold);
            }
        }

        // 规则二：非高等级列车为身后区间上的高等级列车让行
        if priority > 2 && self.high_priority_behind(train, leg, corridor) {
            log.log(
                now,
                EventKind::DispatchDecision,
                format!("{}", train_id.0),
                format!(
                    "Train {} (P{priority}) held at track {leg} for approaching high-priority train.",
                    train_id.0
                ),
            );
            return Decision::Hold(PRIORITY_HOLD);
        }

        // 规则三：按当前占用选线
        let track = corridor.track(leg);
        let dedicated = train.direction.dedicated_line();
        let dedicated_free = resources.line(track.id, dedicated).has_free();
        let central_free = resources.line(track.id, LineKind::Central).has_free();
        trace!(
            track = track.id.0,
            dedicated_free,
            central_free,
            "线路占用视图"
        );

        if dedicated_free && central_free {
            // 两线皆空：高等级走专用线，低等级走中线把专用线留给后车
            if train.is_high_priority() {
                log.log(
                    now,
                    EventKind::DispatchDecision,
                    format!("{}", train_id.0),
                    format!(
                        "Train {} (P{priority}) assigned to dedicated {} for track {} (priority-based selection).",
                        train_id.0,
                        dedicated.label(),
                        track.id.0
                    ),
                );
                Decision::Proceed(dedicated)
            } else {
                log.log(
                    now,
                    EventKind::DispatchDecision,
                    format!("{}", train_id.0),
                    format!(
                        "Train {} (P{priority}) assigned to fallback CENTRAL line for track {} (priority-based selection to free dedicated line).",
                        train_id.0, track.id.0
                    ),
                );
                Decision::Proceed(LineKind::Central)
            }
        } else if dedicated_free {
            log.log(
                now,
                EventKind::DispatchDecision,
                format!("{}", train_id.0),
                format!(
                    "Train {} assigned to dedicated {} for track {}.",
                    train_id.0,
                    dedicated.label(),
                    track.id.0
                ),
            );
            Decision::Proceed(dedicated)
        } else if central_free {
            log.log(
                now,
                EventKind::DispatchDecision,
                format!("{}", train_id.0),
                format!(
                    "Train {} assigned to fallback CENTRAL line for track {}. Dedicated line was busy.",
                    train_id.0, track.id.0
                ),
            );
            Decision::Proceed(LineKind::Central)
        } else {
            // 两线皆忙：资源队列会按优先级授予，这里只需等待重试
            log.log(
                now,
                EventKind::DispatchDecision,
                format!("{}", train_id.0),
                format!(
                    "Train {} must wait for a free line (Dedicated or Central) for track {}.",
                    train_id.0, track.id.0
                ),
            );
            Decision::Wait
        }
    }

    /// 回望行进方向上刚驶过的一个区间，是否被高等级列车占用。
    fn high_priority_behind(&self, train: &Train, leg: usize, corridor: &Corridor) -> bool {
        let Some(behind) = corridor.leg_behind(leg, train.direction) else {
            return false;
        };
        let Some(occupant) = self.occupant(corridor.track(behind).id) else {
            return false;
        };
        corridor
            .train_by_id(occupant)
            .is_some_and(|t| t.is_high_priority())
    }
}
