// ==========================================
// 每日库存模拟 - SQLite 源数据仓储
// ==========================================
// 源表:
// - factory_shipment(part_no, eta_fltc, qty, status)
// - order_info(product_name, actual_shipment_date, estimated_shipment_date,
//              quantity, quotation_status)
// - product_info(delta_part_no, month_end_sap_inventory, model)
// 红线: Repository 不含业务逻辑（过滤/解析由归一化器负责）
// ==========================================

use crate::db::open_source_connection;
use crate::domain::source::{OrderRecord, ProductRecord, RawQuantity, ShipmentRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::source_provider::SourceDataProvider;
use rusqlite::types::Value;
use rusqlite::{Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

const SHIPMENT_SQL: &str = r#"
    SELECT part_no, eta_fltc, qty, status
    FROM factory_shipment
"#;

const ORDER_SQL: &str = r#"
    SELECT
        product_name,
        COALESCE(actual_shipment_date, estimated_shipment_date) AS shipment_date,
        quantity,
        quotation_status
    FROM order_info
"#;

const PRODUCT_SQL: &str = r#"
    SELECT delta_part_no, month_end_sap_inventory, model
    FROM product_info
"#;

// ==========================================
// SqliteSourceRepository - 源数据仓储
// ==========================================
pub struct SqliteSourceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSourceRepository {
    /// 以只读方式打开源数据库
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Err(DatabaseConnectionError): 文件不存在或无法打开
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_source_connection(db_path).map_err(|e| {
            RepositoryError::DatabaseConnectionError {
                path: db_path.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl SourceDataProvider for SqliteSourceRepository {
    fn fetch_shipments(&self) -> RepositoryResult<Vec<ShipmentRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(SHIPMENT_SQL)?;

        let records = stmt
            .query_map([], |row| {
                Ok(ShipmentRecord {
                    part_no: value_to_text(row.get(0)?).unwrap_or_default(),
                    eta: value_to_text(row.get(1)?),
                    qty: value_to_quantity(row.get(2)?),
                    status: value_to_text(row.get(3)?),
                })
            })?
            .collect::<SqliteResult<Vec<ShipmentRecord>>>()?;

        debug!(rows = records.len(), "factory_shipment 读取完成");
        Ok(records)
    }

    fn fetch_orders(&self) -> RepositoryResult<Vec<OrderRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(ORDER_SQL)?;

        let records = stmt
            .query_map([], |row| {
                Ok(OrderRecord {
                    product_name: value_to_text(row.get(0)?).unwrap_or_default(),
                    shipment_date: value_to_text(row.get(1)?),
                    quantity: value_to_quantity(row.get(2)?),
                    quotation_status: value_to_text(row.get(3)?),
                })
            })?
            .collect::<SqliteResult<Vec<OrderRecord>>>()?;

        debug!(rows = records.len(), "order_info 读取完成");
        Ok(records)
    }

    fn fetch_products(&self) -> RepositoryResult<Vec<ProductRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(PRODUCT_SQL)?;

        let records = stmt
            .query_map([], |row| {
                Ok(ProductRecord {
                    part_no: value_to_text(row.get(0)?),
                    month_end_inventory: value_to_quantity(row.get(1)?),
                    model: value_to_text(row.get(2)?),
                })
            })?
            .collect::<SqliteResult<Vec<ProductRecord>>>()?;

        debug!(rows = records.len(), "product_info 读取完成");
        Ok(records)
    }
}

// ==========================================
// 动态类型列转换
// ==========================================
// SQLite 列无强类型，同一列可能混存文本与数值

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Text(s) => Some(s),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(r) => Some(r.to_string()),
        Value::Blob(b) => Some(String::from_utf8_lossy(&b).into_owned()),
    }
}

fn value_to_quantity(value: Value) -> RawQuantity {
    match value {
        Value::Null => RawQuantity::Absent,
        Value::Integer(i) => RawQuantity::Number(i as f64),
        Value::Real(r) => RawQuantity::Number(r),
        Value::Text(s) => RawQuantity::Text(s),
        Value::Blob(b) => RawQuantity::Text(String::from_utf8_lossy(&b).into_owned()),
    }
}
