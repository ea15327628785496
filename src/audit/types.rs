//! 审计事件类型
//!
//! 定义运行事件记录、决策记录与内存日志收集器（仿真结束可写 CSV）。

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rail::{LineKind, StationId, TrackId};
use crate::sim::SimTime;

/// 运行事件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    TrainStart,
    PlatformRequest,
    PlatformAcquired,
    PlatformReleased,
    DispatchDecision,
    TrainHold,
    TrainWait,
    TrackAcquired,
    TrackReleased,
    TrainComplete,
    Optimizer,
    ScenarioModification,
    DisruptionStart,
    DisruptionEnd,
    TrackBlocked,
    TrackUnblocked,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::TrainStart => "TRAIN_START",
            EventKind::PlatformRequest => "PLATFORM_REQUEST",
            EventKind::PlatformAcquired => "PLATFORM_ACQUIRED",
            EventKind::PlatformReleased => "PLATFORM_RELEASED",
            EventKind::DispatchDecision => "DISPATCH_DECISION",
            EventKind::TrainHold => "TRAIN_HOLD",
            EventKind::TrainWait => "TRAIN_WAIT",
            EventKind::TrackAcquired => "TRACK_ACQUIRED",
            EventKind::TrackReleased => "TRACK_RELEASED",
            EventKind::TrainComplete => "TRAIN_COMPLETE",
            EventKind::Optimizer => "OPTIMIZER",
            EventKind::ScenarioModification => "SCENARIO_MODIFICATION",
            EventKind::DisruptionStart => "DISRUPTION_START",
            EventKind::DisruptionEnd => "DISRUPTION_END",
            EventKind::TrackBlocked => "TRACK_BLOCKED",
            EventKind::TrackUnblocked => "TRACK_UNBLOCKED",
        }
    }
}

/// 事件的类型化附加字段，指标读取这些字段而不解析描述文本。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<TrackId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<StationId>,
    /// 本次持车时长（秒）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_secs: Option<u64>,
    /// 线路请求到授予的等待时长（秒）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waited_secs: Option<u64>,
}

/// 一条运行事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// 仿真时刻（秒）
    pub t_secs: u64,
    pub kind: EventKind,
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub details: EventDetails,
}

/// 一条优化/调度决策记录（fire-and-forget）
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub t_secs: u64,
    pub decision_type: String,
    pub subject: String,
    pub input: serde_json::Value,
    pub output: serde_json::Value,
    pub confidence: f64,
    pub exec_time_secs: f64,
    pub success: bool,
}

/// 内存内只追加的运行日志。
#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
    decisions: Vec<DecisionRecord>,
}

impl EventLog {
    pub fn log(
        &mut self,
        t: SimTime,
        kind: EventKind,
        subject: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.log_details(t, kind, subject, description, EventDetails::default());
    }

    pub fn log_details(
        &mut self,
        t: SimTime,
        kind: EventKind,
        subject: impl Into<String>,
        description: impl Into<String>,
        details: EventDetails,
    ) {
        let rec = EventRecord {
            t_secs: t.0,
            kind,
            subject: subject.into(),
            description: description.into(),
            details,
        };
        debug!(t_secs = rec.t_secs, kind = kind.label(), subject = %rec.subject, "审计事件");
        self.records.push(rec);
    }

    pub fn log_decision(
        &mut self,
        t: SimTime,
        decision_type: impl Into<String>,
        subject: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
        confidence: f64,
        exec_time: Duration,
        success: bool,
    ) {
        self.decisions.push(DecisionRecord {
            t_secs: t.0,
            decision_type: decision_type.into(),
            subject: subject.into(),
            input,
            output,
            confidence,
            exec_time_secs: exec_time.as_secs_f64(),
            success,
        });
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn decisions(&self) -> &[DecisionRecord] {
        &self.decisions
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 写出 CSV 运行日志（timestamp 为仿真分钟）。
    pub fn write_csv<W: Write>(&self, writer: W) -> std::io::Result<()> {
        let mut w = csv::Writer::from_writer(writer);
        w.write_record(["timestamp", "event_type", "item_id", "description", "details"])
            .map_err(std::io::Error::other)?;
        for rec in &self.records {
            let details = if rec.details == EventDetails::default() {
                String::new()
            } else {
                serde_json::to_string(&rec.details).unwrap_or_default()
            };
            w.write_record([
                format!("{:.2}", rec.t_secs as f64 / 60.0),
                rec.kind.label().to_string(),
                rec.subject.clone(),
                rec.description.clone(),
                details,
            ])
            .map_err(std::io::Error::other)?;
        }
        w.flush()
    }

    pub fn write_csv_path(&self, path: &Path) -> std::io::Result<()> {
        self.write_csv(std::fs::File::create(path)?)
    }
}
