use anyhow::{Context, Result};
use otsentry_ai::OtClassifier;
use otsentry_feed::{FetchWindow, NvdClient, SeenCache};
use otsentry_report::{build_report, render_summary, ReportStore};

/// 单个周期的执行结果
#[derive(Debug, Clone, Copy)]
pub struct CycleOutcome {
    pub fetched: usize,
    pub relevant: usize,
    pub report_written: bool,
}

/// 完整流水线的执行者：抓取 → 分类 → 报告，严格串行。
///
/// 缓存与报告文件只在阶段边界写入，周期之间可以安全中断。
pub struct CycleRunner {
    nvd: NvdClient,
    classifier: OtClassifier,
    store: ReportStore,
    cache: SeenCache,
    window: FetchWindow,
}

impl CycleRunner {
    pub fn new(
        nvd: NvdClient,
        classifier: OtClassifier,
        store: ReportStore,
        cache: SeenCache,
        window: FetchWindow,
    ) -> Self {
        Self {
            nvd,
            classifier,
            store,
            cache,
            window,
        }
    }

    /// 执行一个完整周期。
    ///
    /// 抓取阶段的传输错误不致命：记录日志后按空批次继续。
    /// 报告写入失败向上传播，由调度器记录并等待下一周期。
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        tracing::info!("Starting agent cycle");

        // Phase 1: 抓取
        let records = match self.nvd.fetch(self.window, &mut self.cache).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "CVE fetch failed, continuing with empty batch");
                Vec::new()
            }
        };

        let fetched = records.len();
        if records.is_empty() {
            tracing::info!("No new CVEs found in this cycle");
            return Ok(CycleOutcome {
                fetched: 0,
                relevant: 0,
                report_written: false,
            });
        }

        // Phase 2: 两级 OT 相关性分类
        let threats = self.classifier.classify(records).await;
        let relevant = threats.len();

        if threats.is_empty() {
            tracing::info!(fetched, "No OT-relevant threats detected");
            return Ok(CycleOutcome {
                fetched,
                relevant: 0,
                report_written: false,
            });
        }

        // Phase 3: 报告组装与持久化
        let report = build_report(threats);
        self.store
            .save(&report)
            .context("Failed to write threat report")?;

        tracing::info!("\n{}", render_summary(&report));
        tracing::info!(
            fetched,
            relevant,
            critical = report.severity_breakdown.critical,
            high = report.severity_breakdown.high,
            medium = report.severity_breakdown.medium,
            low = report.severity_breakdown.low,
            "Cycle complete"
        );

        Ok(CycleOutcome {
            fetched,
            relevant,
            report_written: true,
        })
    }
}
