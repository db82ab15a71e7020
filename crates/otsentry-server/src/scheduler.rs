use crate::cycle::CycleRunner;
use std::time::Duration;
use tokio::time;

/// 固定间隔的周期调度器。
///
/// 周期严格顺序执行，前一个周期未结束时不会启动新周期；
/// 周期间的等待可被 ctrl-c 打断，干净退出（磁盘状态只在阶段边界写入）。
pub struct CycleScheduler {
    runner: CycleRunner,
    interval: Duration,
}

impl CycleScheduler {
    pub fn new(runner: CycleRunner, interval: Duration) -> Self {
        Self { runner, interval }
    }

    pub async fn run(mut self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Cycle scheduler started"
        );

        // 首次 tick 立即触发：启动后先跑一轮，再进入固定间隔
        let mut tick = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    // 任何周期错误只记录，进程继续等待下一周期
                    if let Err(e) = self.runner.run_cycle().await {
                        tracing::error!(error = ?e, "Agent cycle failed");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Scheduler interrupted, shutting down");
                    break;
                }
            }
        }
    }
}
