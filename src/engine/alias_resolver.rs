// ==========================================
// 每日库存模拟 - 料号别名解析器
// ==========================================
// 职责: 按别名规则折叠余额矩阵的列
// 顺序（固定）: 排除 → 一对一 → 多对一
// 规则:
// - 排除: 列存在则删除
// - 一对一 (free → main):
//     free 与 main 均存在 → main += free，删除 free
//     仅 free 存在       → free 改名为 main（不做运算）
// - 多对一 (main ← alias...):
//     alias 与 main 均存在 → main += alias，删除 alias
//     仅 alias 存在        → alias 的序列成为 main，删除 alias
// - 规则引用的列已不存在 → 跳过（不是错误）
// 说明: 每条规则消费旧矩阵、产出新矩阵；日期轴不变
// ==========================================

use crate::domain::alias::{AliasRuleSet, ManyToOneGroup, OneToOneRule};
use crate::domain::matrix::BalanceMatrix;
use serde::Serialize;
use tracing::{debug, info};

// ==========================================
// ResolutionSummary - 解析统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionSummary {
    pub excluded: usize, // 被排除删除的列
    pub renamed: usize,  // 一对一改名
    pub merged: usize,   // 累加后删除的列
    pub seeded: usize,   // 多对一中以别名列作为主料号起始序列
    pub skipped: usize,  // 引用列不存在而跳过的规则
}

// ==========================================
// AliasResolver
// ==========================================
#[derive(Debug, Default)]
pub struct AliasResolver;

impl AliasResolver {
    pub fn new() -> Self {
        Self
    }

    /// 依次应用全部规则
    pub fn resolve(
        &self,
        matrix: BalanceMatrix,
        rules: &AliasRuleSet,
    ) -> (BalanceMatrix, ResolutionSummary) {
        let columns_before = matrix.part_count();
        let mut summary = ResolutionSummary::default();

        let matrix = rules
            .exclusions()
            .iter()
            .fold(matrix, |m, part_no| self.apply_exclusion(m, part_no, &mut summary));

        let matrix = rules
            .one_to_one_rules()
            .iter()
            .fold(matrix, |m, rule| self.apply_one_to_one(m, rule, &mut summary));

        let matrix = rules
            .many_to_one_groups()
            .iter()
            .fold(matrix, |m, group| self.apply_many_to_one(m, group, &mut summary));

        info!(
            columns_before,
            columns_after = matrix.part_count(),
            excluded = summary.excluded,
            renamed = summary.renamed,
            merged = summary.merged,
            seeded = summary.seeded,
            skipped = summary.skipped,
            "料号别名解析完成"
        );

        (matrix, summary)
    }

    /// 排除规则
    pub fn apply_exclusion(
        &self,
        matrix: BalanceMatrix,
        part_no: &str,
        summary: &mut ResolutionSummary,
    ) -> BalanceMatrix {
        if !matrix.contains_part(part_no) {
            summary.skipped += 1;
            return matrix;
        }
        debug!(part_no = %part_no, "已排除");
        summary.excluded += 1;
        matrix.without_column(part_no)
    }

    /// 一对一规则
    pub fn apply_one_to_one(
        &self,
        matrix: BalanceMatrix,
        rule: &OneToOneRule,
        summary: &mut ResolutionSummary,
    ) -> BalanceMatrix {
        let free = rule.free_part_no.as_str();
        let main = rule.main_part_no.as_str();

        if free == main || !matrix.contains_part(free) {
            summary.skipped += 1;
            return matrix;
        }

        if matrix.contains_part(main) {
            debug!(free = %free, main = %main, "一对一合并");
            summary.merged += 1;
            matrix.with_column_added_into(free, main)
        } else {
            debug!(free = %free, main = %main, "一对一改名");
            summary.renamed += 1;
            matrix.with_column_renamed(free, main)
        }
    }

    /// 多对一规则（单个主料号分组）
    pub fn apply_many_to_one(
        &self,
        matrix: BalanceMatrix,
        group: &ManyToOneGroup,
        summary: &mut ResolutionSummary,
    ) -> BalanceMatrix {
        let main = group.main_part_no.as_str();

        group.alias_part_nos.iter().fold(matrix, |m, alias| {
            let alias = alias.as_str();
            if alias == main || !m.contains_part(alias) {
                summary.skipped += 1;
                return m;
            }

            if m.contains_part(main) {
                debug!(alias = %alias, main = %main, "多对一合并");
                summary.merged += 1;
                m.with_column_added_into(alias, main)
            } else {
                debug!(alias = %alias, main = %main, "多对一起始序列");
                summary.seeded += 1;
                m.with_column_moved_to_end(alias, main)
            }
        })
    }
}
