//! 铁路仿真世界
//!
//! `RailWorld` 在一次运行内独占全部资源实例，持有走廊数据快照、
//! 调度器、优化器与审计日志，并实现列车/扰动状态机的全部推进逻辑。
//! 优化器与调度器只经由方法调用读取投影，从不直接持有资源。

use std::any::Any;
use std::time::Instant;

use serde_json::json;
use tracing::{debug, info};

use super::config::RunConfig;
use super::events::{ArriveTrain, DepartTrain, DispatchTick, EndDisruption, GrantProc, StartTrain, StartDisruption};
use super::proc::{DisruptionPhase, DisruptionProc, TrainPhase, TrainProc};
use crate::audit::{EventDetails, EventKind, EventLog};
use crate::dispatch::{Decision, Dispatcher};
use crate::opt::{Optimizer, TrainSnapshot};
use crate::rail::{Corridor, Disruption, DisruptionKind, LineKind, Train};
use crate::resource::{ProcId, RequestOutcome, ResourceTable};
use crate::sim::{SimTime, Simulator, World};

/// 一次仿真运行的世界。
pub struct RailWorld {
    corridor: Corridor,
    config: RunConfig,
    resources: ResourceTable,
    dispatcher: Dispatcher,
    optimizer: Optimizer,
    log: EventLog,
    trains: Vec<TrainProc>,
    disruptions: Vec<DisruptionProc>,
}

impl World for RailWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl RailWorld {
    pub fn new(corridor: Corridor, config: RunConfig, optimizer: Optimizer) -> Self {
        let resources = ResourceTable::build(&corridor);
        let dispatcher = Dispatcher::new(&corridor);
        let trains = corridor
            .trains()
            .iter()
            .map(|_| TrainProc {
                phase: TrainPhase::Pending,
            })
            .collect();
        Self {
            corridor,
            config,
            resources,
            dispatcher,
            optimizer,
            log: EventLog::default(),
            trains,
            disruptions: Vec::new(),
        }
    }

    /// 附加脚本化扰动事件。
    pub fn with_disruptions(mut self, disruptions: Vec<Disruption>) -> Self {
        self.disruptions = disruptions
            .into_iter()
            .map(|disruption| DisruptionProc {
                disruption,
                phase: DisruptionPhase::Pending,
            })
            .collect();
        self
    }

    /// 调度所有起始事件：列车按实际出发延迟进入，扰动按窗口起点触发。
    pub fn seed(&self, sim: &mut Simulator) {
        for (i, train) in self.corridor.trains().iter().enumerate() {
            sim.schedule(SimTime::from_minutes(train.start_delay_min), StartTrain { train: i });
        }
        for (i, proc) in self.disruptions.iter().enumerate() {
            sim.schedule(proc.disruption.start(), StartDisruption { idx: i });
        }
    }

    pub fn corridor(&self) -> &Corridor {
        &self.corridor
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub(crate) fn log_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    pub fn into_log(self) -> EventLog {
        self.log
    }

    /// 走完全程的列车数
    pub fn completed_trains(&self) -> usize {
        self.trains
            .iter()
            .filter(|p| p.phase == TrainPhase::Complete)
            .count()
    }

    // ── 列车状态机 ────────────────────────────────────────────────────────────

    pub(crate) fn start_train(&mut self, idx: usize, sim: &mut Simulator) {
        let train = self.corridor.train(idx).clone();
        let start = self.corridor.start_station(train.direction);
        info!(train = train.id.0, priority = train.priority, "列车进入路网");
        self.log.log(
            sim.now(),
            EventKind::TrainStart,
            format!("{}", train.id.0),
            format!(
                "Train {} (P{}, {:?}) starting journey from {}",
                train.id.0, train.priority, train.direction, start.name
            ),
        );
        let leg = self.corridor.first_leg(train.direction);
        self.enter_leg(idx, leg, sim);
    }

    /// 申请本区间到达站的站台；授予前挂起。
    fn enter_leg(&mut self, idx: usize, leg: usize, sim: &mut Simulator) {
        let train = self.corridor.train(idx).clone();
        let station_idx = self.corridor.arrival_station_index(leg, train.direction);
        let station = self.corridor.station(station_idx).clone();
        self.log.log(
            sim.now(),
            EventKind::PlatformRequest,
            format!("{}", train.id.0),
            format!("Train {} waiting for platform at {}", train.id.0, station.name),
        );
        match self
            .resources
            .platform_mut(station.id)
            .request(train.priority, ProcId::Train(idx))
        {
            RequestOutcome::Granted => self.platform_acquired(idx, leg, sim),
            RequestOutcome::Queued => {
                self.trains[idx].phase = TrainPhase::AwaitPlatform { leg };
            }
        }
    }

    /// 站台到手：本段行程先求解目标时刻表并喂入调度器，再进调度循环。
    fn platform_acquired(&mut self, idx: usize, leg: usize, sim: &mut Simulator) {
        let now = sim.now();
        let train = self.corridor.train(idx).clone();
        let station_idx = self.corridor.arrival_station_index(leg, train.direction);
        let station_name = self.corridor.station(station_idx).name.clone();
        self.log.log(
            now,
            EventKind::PlatformAcquired,
            format!("{}", train.id.0),
            format!("Train {} acquired platform at {}", train.id.0, station_name),
        );

        let snapshot = TrainSnapshot::of(&train, &self.corridor, now);
        let active: Vec<Disruption> = self
            .disruptions
            .iter()
            .filter(|p| p.phase != DisruptionPhase::Done && p.disruption.end() > now)
            .map(|p| p.disruption.clone())
            .collect();
        let started = Instant::now();
        let schedule = self.optimizer.optimize(
            now,
            std::slice::from_ref(&snapshot),
            &active,
            &self.config.system_state,
            &mut self.log,
        );
        let exec_time = started.elapsed();
        let entry = schedule.get(&train.id);
        self.log.log_decision(
            now,
            "OPTIMIZATION",
            format!("{}", train.id.0),
            json!({ "train_id": train.id.0, "track_id": self.corridor.track(leg).id.0 }),
            serde_json::to_value(entry).unwrap_or(serde_json::Value::Null),
            entry.map_or(0.0, |e| e.confidence),
            exec_time,
            entry.is_some(),
        );
        self.dispatcher.set_target_schedule(schedule);

        self.trains[idx].phase = TrainPhase::Dispatching { leg };
        self.dispatch(idx, sim);
    }

    /// 调度循环的一次评估。持车/等待重新入队，放行转入线路申请。
    pub(crate) fn dispatch(&mut self, idx: usize, sim: &mut Simulator) {
        let TrainPhase::Dispatching { leg } = self.trains[idx].phase else {
            panic!("dispatch tick for train index {idx} outside dispatch loop");
        };
        let now = sim.now();
        let train = self.corridor.train(idx).clone();
        let decision = self.dispatcher.decide(
            now,
            &train,
            leg,
            &self.corridor,
            &self.resources,
            &mut self.log,
        );
        debug!(train = train.id.0, leg, ?decision, "调度决策");

        match decision {
            Decision::Hold(duration) => {
                self.log.log_details(
                    now,
                    EventKind::TrainHold,
                    format!("{}", train.id.0),
                    format!(
                        "Train {} held for {:.2} minutes by dispatcher.",
                        train.id.0,
                        duration.as_minutes_f64()
                    ),
                    EventDetails {
                        hold_secs: Some(duration.0),
                        ..EventDetails::default()
                    },
                );
                sim.schedule_in(duration, DispatchTick { train: idx });
            }
            Decision::Wait => {
                self.log.log(
                    now,
                    EventKind::TrainWait,
                    format!("{}", train.id.0),
                    format!(
                        "Train {} waiting for a line to clear for track {}.",
                        train.id.0,
                        self.corridor.track(leg).id.0
                    ),
                );
                sim.schedule_in(self.config.retry_interval, DispatchTick { train: idx });
            }
            Decision::Proceed(line) => {
                let track_id = self.corridor.track(leg).id;
                match self
                    .resources
                    .line_mut(track_id, line)
                    .request(train.priority, ProcId::Train(idx))
                {
                    RequestOutcome::Granted => self.line_acquired(idx, leg, line, now, sim),
                    RequestOutcome::Queued => {
                        self.trains[idx].phase = TrainPhase::AwaitLine {
                            leg,
                            line,
                            requested_at: now,
                        };
                    }
                }
            }
        }
    }

    /// 线路到手：标记占用并开始走行。
    fn line_acquired(
        &mut self,
        idx: usize,
        leg: usize,
        line: LineKind,
        requested_at: SimTime,
        sim: &mut Simulator,
    ) {
        let now = sim.now();
        let train = self.corridor.train(idx).clone();
        let track = self.corridor.track(leg).clone();
        let station_idx = self.corridor.arrival_station_index(leg, train.direction);
        let station_name = self.corridor.station(station_idx).name.clone();
        let waited = now.saturating_sub(requested_at);

        self.log.log_details(
            now,
            EventKind::TrackAcquired,
            format!("{}", train.id.0),
            format!(
                "Train {} (P{}) got {} to {}. Waited {:.2} mins.",
                train.id.0,
                train.priority,
                line.label(),
                station_name,
                waited.as_minutes_f64()
            ),
            EventDetails {
                track_id: Some(track.id),
                line: Some(line),
                waited_secs: Some(waited.0),
                ..EventDetails::default()
            },
        );
        self.dispatcher.update_track_occupancy(track.id, Some(train.id));

        let travel = travel_time(&track, &train, self.config.speed_multiplier);
        debug!(train = train.id.0, track = track.id.0, ?travel, "开始走行");
        self.trains[idx].phase = TrainPhase::Travelling { leg, line };
        sim.schedule_in(travel, ArriveTrain { train: idx });
    }

    /// 走行结束：清占用、释放线路、进入停站。
    pub(crate) fn arrive(&mut self, idx: usize, sim: &mut Simulator) {
        let TrainPhase::Travelling { leg, line } = self.trains[idx].phase else {
            panic!("arrival for train index {idx} that is not travelling");
        };
        let now = sim.now();
        let train = self.corridor.train(idx).clone();
        let track_id = self.corridor.track(leg).id;
        let station_idx = self.corridor.arrival_station_index(leg, train.direction);
        let station_name = self.corridor.station(station_idx).name.clone();

        self.dispatcher.update_track_occupancy(track_id, None);
        self.log.log_details(
            now,
            EventKind::TrackReleased,
            format!("{}", train.id.0),
            format!("Train {} arrived at {}", train.id.0, station_name),
            EventDetails {
                track_id: Some(track_id),
                line: Some(line),
                ..EventDetails::default()
            },
        );
        if let Some(next) = self.resources.line_mut(track_id, line).release() {
            sim.schedule(now, GrantProc { proc_id: next });
        }

        self.trains[idx].phase = TrainPhase::Dwelling { leg };
        sim.schedule_in(self.config.dwell, DepartTrain { train: idx });
    }

    /// 停站结束：释放站台，进入下一区间或终到。
    pub(crate) fn depart(&mut self, idx: usize, sim: &mut Simulator) {
        let TrainPhase::Dwelling { leg } = self.trains[idx].phase else {
            panic!("departure for train index {idx} that is not dwelling");
        };
        let now = sim.now();
        let train = self.corridor.train(idx).clone();
        let station_idx = self.corridor.arrival_station_index(leg, train.direction);
        let station = self.corridor.station(station_idx).clone();
        let is_final = self.corridor.is_final_leg(leg, train.direction);

        if !is_final {
            self.log.log_details(
                now,
                EventKind::PlatformReleased,
                format!("{}", train.id.0),
                format!("Train {} departing {}", train.id.0, station.name),
                EventDetails {
                    station_id: Some(station.id),
                    ..EventDetails::default()
                },
            );
        }
        if let Some(next) = self.resources.platform_mut(station.id).release() {
            sim.schedule(now, GrantProc { proc_id: next });
        }

        match self.corridor.next_leg(leg, train.direction) {
            Some(next_leg) => self.enter_leg(idx, next_leg, sim),
            None => {
                self.trains[idx].phase = TrainPhase::Complete;
                info!(train = train.id.0, now = ?now, "列车终到");
                self.log.log(
                    now,
                    EventKind::TrainComplete,
                    format!("{}", train.id.0),
                    format!("Train {} completed its journey at {}", train.id.0, station.name),
                );
            }
        }
    }

    /// 资源授予回调：按进程当前状态续跑。
    pub(crate) fn grant(&mut self, proc_id: ProcId, sim: &mut Simulator) {
        match proc_id {
            ProcId::Train(idx) => match self.trains[idx].phase {
                TrainPhase::AwaitPlatform { leg } => self.platform_acquired(idx, leg, sim),
                TrainPhase::AwaitLine {
                    leg,
                    line,
                    requested_at,
                } => self.line_acquired(idx, leg, line, requested_at, sim),
                other => panic!("resource granted to train index {idx} in phase {other:?}"),
            },
            ProcId::Disruption(i) => self.disruption_active(i, sim),
        }
    }

    // ── 扰动状态机 ────────────────────────────────────────────────────────────

    pub(crate) fn start_disruption(&mut self, i: usize, sim: &mut Simulator) {
        let now = sim.now();
        let disruption = self.disruptions[i].disruption.clone();
        self.log.log(
            now,
            EventKind::DisruptionStart,
            "SYSTEM",
            format!("Disruption: {}", disruption.description),
        );
        match disruption.kind {
            DisruptionKind::TrackBlocked { track_id, line } => {
                // 以最高优先级抢占目标线路；被占用时排到队首，封锁自占得起计时
                match self
                    .resources
                    .line_mut(track_id, line)
                    .request(0, ProcId::Disruption(i))
                {
                    RequestOutcome::Granted => self.disruption_active(i, sim),
                    RequestOutcome::Queued => {
                        self.disruptions[i].phase = DisruptionPhase::AwaitLine;
                    }
                }
            }
            DisruptionKind::WeatherImpact { .. } => {
                self.disruptions[i].phase = DisruptionPhase::Active;
                sim.schedule_in(
                    SimTime::from_minutes(disruption.duration),
                    EndDisruption { idx: i },
                );
            }
        }
    }

    fn disruption_active(&mut self, i: usize, sim: &mut Simulator) {
        let now = sim.now();
        let disruption = self.disruptions[i].disruption.clone();
        self.disruptions[i].phase = DisruptionPhase::Active;
        if let DisruptionKind::TrackBlocked { track_id, line } = disruption.kind {
            self.log.log_details(
                now,
                EventKind::TrackBlocked,
                format!("{}", track_id.0),
                format!(
                    "Track {} {} blocked for {} minutes.",
                    track_id.0,
                    line.label(),
                    disruption.duration
                ),
                EventDetails {
                    track_id: Some(track_id),
                    line: Some(line),
                    ..EventDetails::default()
                },
            );
        }
        sim.schedule_in(
            SimTime::from_minutes(disruption.duration),
            EndDisruption { idx: i },
        );
    }

    pub(crate) fn end_disruption(&mut self, i: usize, sim: &mut Simulator) {
        let now = sim.now();
        let disruption = self.disruptions[i].disruption.clone();
        self.disruptions[i].phase = DisruptionPhase::Done;
        if let DisruptionKind::TrackBlocked { track_id, line } = disruption.kind {
            if let Some(next) = self.resources.line_mut(track_id, line).release() {
                sim.schedule(now, GrantProc { proc_id: next });
            }
            self.log.log_details(
                now,
                EventKind::TrackUnblocked,
                format!("{}", track_id.0),
                format!("Track {} {} unblocked.", track_id.0, line.label()),
                EventDetails {
                    track_id: Some(track_id),
                    line: Some(line),
                    ..EventDetails::default()
                },
            );
        }
        self.log.log(
            now,
            EventKind::DisruptionEnd,
            "SYSTEM",
            format!("Disruption ended: {}", disruption.description),
        );
    }
}

/// 走行时间 = 里程 / (速度 × 倍率)。速度经走廊校验必为正。
fn travel_time(track: &crate::rail::Track, train: &Train, multiplier: f64) -> SimTime {
    let kph = f64::from(train.speed_kph) * multiplier;
    SimTime(((f64::from(track.distance_km) / kph) * 3600.0).round() as u64)
}
