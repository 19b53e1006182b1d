// ==========================================
// 每日库存模拟 - 引擎编排器
// ==========================================
// 用途: 按固定顺序串联各引擎，单线程、一次性批处理
// 主流程:
//   源数据 → 对照表 → 已知料号/期初库存 → 时间序列归一化
//   → 逐日推演 → 别名解析 → 报表组装 → 导出
// 红线: 任一步骤失败即中止，不导出部分结果
// ==========================================

use crate::domain::horizon::SimulationHorizon;
use crate::domain::report::InventoryReport;
use crate::engine::alias_resolver::{AliasResolver, ResolutionSummary};
use crate::engine::balance::BalanceMatrixBuilder;
use crate::engine::normalizer::{NormalizationStats, TimeSeriesNormalizer};
use crate::engine::report_assembler::ReportAssembler;
use crate::error::SimulationResult;
use crate::exporter::report_sink::ReportSink;
use crate::importer::mapping_loader::AliasMappingProvider;
use crate::repository::source_provider::SourceDataProvider;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use uuid::Uuid;

// ==========================================
// SimulationRun - 演算结果（未导出）
// ==========================================
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub report: InventoryReport,
    pub horizon: SimulationHorizon,
    pub stats: NormalizationStats,
    pub summary: ResolutionSummary,
}

// ==========================================
// SimulationOutcome - 运行结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct SimulationOutcome {
    pub run_id: String,
    pub report_path: PathBuf,
    pub horizon: SimulationHorizon,
    pub part_count: usize,
    pub stats: NormalizationStats,
    pub summary: ResolutionSummary,
}

// ==========================================
// InventorySimulation - 编排器
// ==========================================
pub struct InventorySimulation {
    source: Box<dyn SourceDataProvider>,
    mapping: Box<dyn AliasMappingProvider>,
    sink: Box<dyn ReportSink>,
    normalizer: TimeSeriesNormalizer,
    builder: BalanceMatrixBuilder,
    resolver: AliasResolver,
    assembler: ReportAssembler,
}

impl InventorySimulation {
    /// 创建编排器
    ///
    /// # 参数
    /// - source: 源数据提供者
    /// - mapping: 料号对照规则提供者
    /// - sink: 报表输出端
    pub fn new(
        source: Box<dyn SourceDataProvider>,
        mapping: Box<dyn AliasMappingProvider>,
        sink: Box<dyn ReportSink>,
    ) -> Self {
        Self {
            source,
            mapping,
            sink,
            normalizer: TimeSeriesNormalizer::new(),
            builder: BalanceMatrixBuilder::new(),
            resolver: AliasResolver::new(),
            assembler: ReportAssembler::new(),
        }
    }

    /// 执行完整流程并导出报表
    pub fn run(&self, as_of: NaiveDate) -> SimulationResult<SimulationOutcome> {
        let generated_at = Local::now().naive_local();
        self.run_at(as_of, generated_at)
    }

    /// 执行完整流程并导出报表（指定生成时间，决定报表文件名）
    pub fn run_at(
        &self,
        as_of: NaiveDate,
        generated_at: NaiveDateTime,
    ) -> SimulationResult<SimulationOutcome> {
        let run = self.simulate_at(as_of, generated_at)?;

        let span = info_span!("export", run_id = %run.report.run_id);
        let _guard = span.enter();
        let report_path = self.sink.export(&run.report)?;

        info!(
            path = %report_path.display(),
            parts = run.report.rows.len(),
            negative_cells = run.report.negative_cell_count(),
            "库存模拟运行完成"
        );

        Ok(SimulationOutcome {
            run_id: run.report.run_id.clone(),
            report_path,
            horizon: run.horizon,
            part_count: run.report.rows.len(),
            stats: run.stats,
            summary: run.summary,
        })
    }

    /// 执行导出之前的全部步骤
    pub fn simulate(&self, as_of: NaiveDate) -> SimulationResult<SimulationRun> {
        self.simulate_at(as_of, Local::now().naive_local())
    }

    pub fn simulate_at(
        &self,
        as_of: NaiveDate,
        generated_at: NaiveDateTime,
    ) -> SimulationResult<SimulationRun> {
        let run_id = Uuid::new_v4().to_string();
        let horizon = SimulationHorizon::for_run_date(as_of);

        let span = info_span!("simulation", run_id = %run_id);
        let _guard = span.enter();

        info!(
            as_of = %as_of,
            start = %horizon.start(),
            end = %horizon.end(),
            "开始库存模拟"
        );

        // ==========================================
        // 步骤1: 读取源数据与料号对照表
        // ==========================================
        let snapshot = self.source.fetch_snapshot()?;
        let rules = self.mapping.load_rules()?;
        debug!(rules = rules.len(), "料号对照规则就绪");

        // ==========================================
        // 步骤2: 已知料号与期初库存
        // ==========================================
        let parts = self.builder.known_parts(&snapshot.products);
        let starting = self.builder.starting_quantities(&parts, &snapshot.products);

        // ==========================================
        // 步骤3: 时间序列归一化
        // ==========================================
        let series = self.normalizer.normalize(
            horizon,
            &parts,
            &snapshot.shipments,
            &snapshot.orders,
        )?;

        // ==========================================
        // 步骤4: 逐日推演
        // ==========================================
        let matrix = self
            .builder
            .build(&parts, &starting, &series.inbound, &series.outbound);

        // ==========================================
        // 步骤5: 料号别名解析
        // ==========================================
        let (matrix, summary) = self.resolver.resolve(matrix, &rules);

        // ==========================================
        // 步骤6: 报表组装
        // ==========================================
        let report = self
            .assembler
            .assemble(&matrix, &snapshot.products, &run_id, generated_at);

        Ok(SimulationRun {
            report,
            horizon,
            stats: series.stats,
            summary,
        })
    }
}
