//! 列车与扰动事件
//!
//! 定义驱动状态机的仿真事件。每个事件把世界向下转型为
//! `RailWorld` 后调用对应的状态推进方法。

use tracing::trace;

use super::world::RailWorld;
use crate::resource::ProcId;
use crate::sim::{Event, Simulator, World};

fn rail_world(world: &mut dyn World) -> &mut RailWorld {
    world
        .as_any_mut()
        .downcast_mut::<RailWorld>()
        .expect("world must be RailWorld")
}

/// 事件：列车按实际出发延迟进入路网。
#[derive(Debug)]
pub(crate) struct StartTrain {
    pub train: usize,
}

impl Event for StartTrain {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        trace!(train = self.train, now = ?sim.now(), "StartTrain");
        rail_world(world).start_train(self.train, sim);
    }
}

/// 事件：重新评估一次调度决策（持车期满或等待重试）。
#[derive(Debug)]
pub(crate) struct DispatchTick {
    pub train: usize,
}

impl Event for DispatchTick {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        trace!(train = self.train, now = ?sim.now(), "DispatchTick");
        rail_world(world).dispatch(self.train, sim);
    }
}

/// 事件：走行结束，列车到达区间终点站。
#[derive(Debug)]
pub(crate) struct ArriveTrain {
    pub train: usize,
}

impl Event for ArriveTrain {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        trace!(train = self.train, now = ?sim.now(), "ArriveTrain");
        rail_world(world).arrive(self.train, sim);
    }
}

/// 事件：停站结束，释放站台并进入下一区间。
#[derive(Debug)]
pub(crate) struct DepartTrain {
    pub train: usize,
}

impl Event for DepartTrain {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        trace!(train = self.train, now = ?sim.now(), "DepartTrain");
        rail_world(world).depart(self.train, sim);
    }
}

/// 事件：资源释放后授予队列中的下一个进程。
#[derive(Debug)]
pub(crate) struct GrantProc {
    pub proc_id: ProcId,
}

impl Event for GrantProc {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        trace!(proc_id = ?self.proc_id, now = ?sim.now(), "GrantProc");
        rail_world(world).grant(self.proc_id, sim);
    }
}

/// 事件：扰动窗口开始。
#[derive(Debug)]
pub(crate) struct StartDisruption {
    pub idx: usize,
}

impl Event for StartDisruption {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        trace!(idx = self.idx, now = ?sim.now(), "StartDisruption");
        rail_world(world).start_disruption(self.idx, sim);
    }
}

/// 事件：扰动窗口结束。
#[derive(Debug)]
pub(crate) struct EndDisruption {
    pub idx: usize,
}

impl Event for EndDisruption {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        trace!(idx = self.idx, now = ?sim.now(), "EndDisruption");
        rail_world(world).end_disruption(self.idx, sim);
    }
}
