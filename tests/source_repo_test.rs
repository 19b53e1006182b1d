// ==========================================
// SqliteSourceRepository 集成测试
// ==========================================
// 测试目标: 验证三张源表在真实数据库文件上的读取
// ==========================================


use inventory_simulate::domain::source::RawQuantity;
use inventory_simulate::repository::{RepositoryError, SourceDataProvider, SqliteSourceRepository};
use test_helpers::{
    create_test_db, insert_order, insert_product, insert_shipment, open_test_connection,
    seed_standard_scenario,
};

#[test]
fn test_fetch_snapshot_from_file() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    seed_standard_scenario(&conn).expect("Failed to seed scenario");

    let repo = SqliteSourceRepository::new(&db_path).expect("Failed to open repository");
    let snapshot = repo.fetch_snapshot().expect("Failed to fetch snapshot");

    assert_eq!(snapshot.products.len(), 3);
    assert_eq!(snapshot.shipments.len(), 1);
    assert_eq!(snapshot.orders.len(), 1);

    let shipment = &snapshot.shipments[0];
    assert_eq!(shipment.part_no, "X");
    assert_eq!(shipment.eta.as_deref(), Some("2026-10-03"));
    assert_eq!(shipment.qty.as_number(), Some(5.0));
    assert_eq!(shipment.status.as_deref(), Some("shipped"));
}

#[test]
fn test_order_date_prefers_actual() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_order(&conn, "P1", Some("2026-10-05"), Some("2026-10-09"), 1.0, None).unwrap();
    insert_order(&conn, "P1", None, Some("2026-10-09"), 2.0, Some("cancel")).unwrap();

    let repo = SqliteSourceRepository::new(&db_path).unwrap();
    let orders = repo.fetch_orders().unwrap();

    assert_eq!(orders[0].shipment_date.as_deref(), Some("2026-10-05"));
    assert_eq!(orders[1].shipment_date.as_deref(), Some("2026-10-09"));
    assert_eq!(orders[1].quotation_status.as_deref(), Some("cancel"));
}

#[test]
fn test_missing_values_are_absent() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_product(&conn, "P1", None, None).unwrap();
    insert_shipment(&conn, "P1", None, 4.0, None).unwrap();

    let repo = SqliteSourceRepository::new(&db_path).unwrap();
    let products = repo.fetch_products().unwrap();
    let shipments = repo.fetch_shipments().unwrap();

    assert_eq!(products[0].month_end_inventory, RawQuantity::Absent);
    assert!(products[0].model.is_none());
    assert!(shipments[0].eta.is_none());
}

#[test]
fn test_missing_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.db");
    let result = SqliteSourceRepository::new(missing.to_str().unwrap());
    assert!(matches!(
        result,
        Err(RepositoryError::DatabaseConnectionError { .. })
    ));
}

#[test]
fn test_missing_table_is_fatal() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();
    {
        let conn = open_test_connection(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE product_info \
             (delta_part_no TEXT, month_end_sap_inventory, model TEXT);",
        )
        .unwrap();
    }

    let repo = SqliteSourceRepository::new(&db_path).unwrap();
    assert!(repo.fetch_products().is_ok());
    assert!(matches!(
        repo.fetch_snapshot(),
        Err(RepositoryError::TableMissing(_))
    ));
}
