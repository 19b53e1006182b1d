// ==========================================
// 每日库存模拟 - 料号别名规则
// ==========================================
// 规则种类: 排除 / 一对一 / 多对一
// 应用顺序固定: 排除 → 一对一 → 多对一（不同种类不可交错）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// AliasRule - 单条规则
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AliasRule {
    /// 整列删除
    Exclude { part_no: String },
    /// 自由料号并入主料号
    OneToOne {
        free_part_no: String,
        main_part_no: String,
    },
    /// 别名料号并入主料号（按主料号分组）
    ManyToOne {
        main_part_no: String,
        alias_part_no: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneToOneRule {
    pub free_part_no: String,
    pub main_part_no: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManyToOneGroup {
    pub main_part_no: String,
    pub alias_part_nos: Vec<String>,
}

// ==========================================
// AliasRuleSet - 按种类分组的规则集合
// ==========================================
// 一对一规则保持输入顺序；
// 多对一规则按主料号升序分组，组内保持输入顺序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRuleSet {
    exclusions: Vec<String>,
    one_to_one: Vec<OneToOneRule>,
    many_to_one: BTreeMap<String, Vec<String>>,
}

impl AliasRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = AliasRule>,
    {
        rules.into_iter().fold(Self::new(), |set, rule| set.with_rule(rule))
    }

    pub fn with_rule(self, rule: AliasRule) -> Self {
        match rule {
            AliasRule::Exclude { part_no } => self.exclude(&part_no),
            AliasRule::OneToOne {
                free_part_no,
                main_part_no,
            } => self.one_to_one(&free_part_no, &main_part_no),
            AliasRule::ManyToOne {
                main_part_no,
                alias_part_no,
            } => self.many_to_one(&main_part_no, &alias_part_no),
        }
    }

    pub fn exclude(mut self, part_no: &str) -> Self {
        self.exclusions.push(part_no.to_string());
        self
    }

    pub fn one_to_one(mut self, free_part_no: &str, main_part_no: &str) -> Self {
        self.one_to_one.push(OneToOneRule {
            free_part_no: free_part_no.to_string(),
            main_part_no: main_part_no.to_string(),
        });
        self
    }

    pub fn many_to_one(mut self, main_part_no: &str, alias_part_no: &str) -> Self {
        self.many_to_one
            .entry(main_part_no.to_string())
            .or_default()
            .push(alias_part_no.to_string());
        self
    }

    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    pub fn one_to_one_rules(&self) -> &[OneToOneRule] {
        &self.one_to_one
    }

    pub fn many_to_one_groups(&self) -> Vec<ManyToOneGroup> {
        self.many_to_one
            .iter()
            .map(|(main, aliases)| ManyToOneGroup {
                main_part_no: main.clone(),
                alias_part_nos: aliases.clone(),
            })
            .collect()
    }

    /// 规则总条数
    pub fn len(&self) -> usize {
        self.exclusions.len()
            + self.one_to_one.len()
            + self.many_to_one.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
