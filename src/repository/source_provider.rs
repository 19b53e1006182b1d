// ==========================================
// 每日库存模拟 - 源数据提供者 Trait
// ==========================================
// 职责: 定义源数据读取接口（不包含实现）
// 红线: 不含业务规则，只返回源表原始记录
// ==========================================

use crate::domain::source::{OrderRecord, ProductRecord, ShipmentRecord, SourceSnapshot};
use crate::repository::error::RepositoryResult;
use tracing::info;

// ==========================================
// SourceDataProvider Trait
// ==========================================
// 实现者: SqliteSourceRepository（使用 rusqlite）
pub trait SourceDataProvider {
    /// 工厂出货记录 {part_no, eta_fltc, qty, status}
    fn fetch_shipments(&self) -> RepositoryResult<Vec<ShipmentRecord>>;

    /// 订单记录 {product_name, shipment_date, quantity, quotation_status}
    fn fetch_orders(&self) -> RepositoryResult<Vec<OrderRecord>>;

    /// 产品主数据 {part_no, month_end_inventory, model}
    fn fetch_products(&self) -> RepositoryResult<Vec<ProductRecord>>;

    /// 一次性读取三张源表
    fn fetch_snapshot(&self) -> RepositoryResult<SourceSnapshot> {
        let snapshot = SourceSnapshot {
            shipments: self.fetch_shipments()?,
            orders: self.fetch_orders()?,
            products: self.fetch_products()?,
        };
        info!(
            shipments = snapshot.shipments.len(),
            orders = snapshot.orders.len(),
            products = snapshot.products.len(),
            "源数据读取完成"
        );
        Ok(snapshot)
    }
}

// ==========================================
// InMemorySourceProvider - 内存源数据
// ==========================================
// 用途: 测试与离线演算
#[derive(Debug, Clone, Default)]
pub struct InMemorySourceProvider {
    snapshot: SourceSnapshot,
}

impl InMemorySourceProvider {
    pub fn new(snapshot: SourceSnapshot) -> Self {
        Self { snapshot }
    }
}

impl SourceDataProvider for InMemorySourceProvider {
    fn fetch_shipments(&self) -> RepositoryResult<Vec<ShipmentRecord>> {
        Ok(self.snapshot.shipments.clone())
    }

    fn fetch_orders(&self) -> RepositoryResult<Vec<OrderRecord>> {
        Ok(self.snapshot.orders.clone())
    }

    fn fetch_products(&self) -> RepositoryResult<Vec<ProductRecord>> {
        Ok(self.snapshot.products.clone())
    }
}
