// ==========================================
// 每日库存模拟 - 源数据记录
// ==========================================
// 来源: 工厂出货表 / 订单表 / 产品主数据表
// 说明: 记录保持源表的原始形态（日期为文本、数量可能缺失或非数值），
//       解析与过滤由时间序列归一化器负责
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// RawQuantity - 原始数量
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawQuantity {
    Absent,
    Number(f64),
    Text(String),
}

impl RawQuantity {
    /// 缺失或空白文本
    pub fn is_absent(&self) -> bool {
        match self {
            RawQuantity::Absent => true,
            RawQuantity::Number(v) => v.is_nan(),
            RawQuantity::Text(s) => s.trim().is_empty(),
        }
    }

    /// 尝试解析为数值（文本会去除千分位逗号后再解析）
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawQuantity::Absent => None,
            RawQuantity::Number(v) if v.is_finite() => Some(*v),
            RawQuantity::Number(_) => None,
            RawQuantity::Text(s) => s
                .trim()
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite()),
        }
    }
}

impl From<f64> for RawQuantity {
    fn from(value: f64) -> Self {
        RawQuantity::Number(value)
    }
}

impl From<Option<f64>> for RawQuantity {
    fn from(value: Option<f64>) -> Self {
        value.map_or(RawQuantity::Absent, RawQuantity::Number)
    }
}

// ==========================================
// ShipmentRecord - 工厂出货（入库）记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub part_no: String,        // 料号
    pub eta: Option<String>,    // 预计到货日期（原始文本）
    pub qty: RawQuantity,       // 数量
    pub status: Option<String>, // 出货状态（仅透传，不参与过滤）
}

impl ShipmentRecord {
    pub fn new(part_no: &str, eta: &str, qty: f64) -> Self {
        Self {
            part_no: part_no.to_string(),
            eta: Some(eta.to_string()),
            qty: RawQuantity::Number(qty),
            status: None,
        }
    }
}

// ==========================================
// OrderRecord - 订单（出库）记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub product_name: String,           // 料号
    pub shipment_date: Option<String>,  // 实际出货日，缺失时取预计出货日
    pub quantity: RawQuantity,          // 数量
    pub quotation_status: Option<String>, // 报价/订单状态
}

impl OrderRecord {
    pub fn new(product_name: &str, shipment_date: &str, quantity: f64, status: &str) -> Self {
        Self {
            product_name: product_name.to_string(),
            shipment_date: Some(shipment_date.to_string()),
            quantity: RawQuantity::Number(quantity),
            quotation_status: Some(status.to_string()),
        }
    }
}

// ==========================================
// ProductRecord - 产品主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub part_no: Option<String>,         // 料号
    pub month_end_inventory: RawQuantity, // 月末 SAP 库存（期初库存）
    pub model: Option<String>,           // 机型
}

impl ProductRecord {
    pub fn new(part_no: &str, month_end_inventory: f64, model: Option<&str>) -> Self {
        Self {
            part_no: Some(part_no.to_string()),
            month_end_inventory: RawQuantity::Number(month_end_inventory),
            model: model.map(|m| m.to_string()),
        }
    }

    /// 料号去空白后非空时返回
    pub fn normalized_part_no(&self) -> Option<&str> {
        self.part_no
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

// ==========================================
// SourceSnapshot - 单次运行读取的全部源数据
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSnapshot {
    pub shipments: Vec<ShipmentRecord>,
    pub orders: Vec<OrderRecord>,
    pub products: Vec<ProductRecord>,
}
