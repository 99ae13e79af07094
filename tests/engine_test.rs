use rql::prelude::*;

async fn seeded_db() -> RqlDB {
    let db = RqlDB::connect_with("sqlite::memory:", 1)
        .await
        .expect("in-memory sqlite should open");

    db.execute(
        "CREATE TABLE groups (group_id INTEGER PRIMARY KEY, name TEXT NOT NULL, category TEXT NOT NULL)",
        &[],
    )
    .await
    .unwrap();

    let rows = [
        (1, "alpha", "RG"),
        (2, "bravo", "RG"),
        (3, "charlie", "XT"),
        (4, "delta", "RG"),
        (5, "echo", "RG"),
    ];
    for (id, name, category) in rows {
        db.execute(
            "INSERT INTO groups (group_id, name, category) VALUES ($1, $2, $3)",
            &[Value::Int(id), Value::from(name), Value::from(category)],
        )
        .await
        .unwrap();
    }
    db
}

fn request(query: &str) -> PaginationRequest {
    PaginationRequest::builder()
        .base_query("SELECT group_id, name, category FROM groups")
        .query_string(query)
        .allow(["group_id", "name", "category"])
        .alias("g")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_paginate_counts_all_matches() {
    let db = seeded_db().await;
    let stmt = rql::compile(&request(
        "filters[category:eq]=RG&sort=-group_id&page[size]=3&page[number]=1",
    ))
    .unwrap();

    let page = db.paginate(&stmt).await.unwrap();
    assert_eq!(page.rows.len(), 3);
    assert_eq!(page.meta, PageMeta { page: 1, size: 3, total: 4 });
    assert_eq!(page.meta.pages(), 2);
}

#[tokio::test]
async fn test_last_page_is_partial() {
    let db = seeded_db().await;
    let stmt = rql::compile(&request(
        "filters[category:eq]=RG&sort=group_id&page[size]=3&page[number]=2",
    ))
    .unwrap();

    let page = db.paginate(&stmt).await.unwrap();
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.meta.total, 4);
}

#[tokio::test]
async fn test_integer_filter_binding() {
    let db = seeded_db().await;
    let stmt = rql::compile(&request("filters[group_id:gt]=3")).unwrap();

    assert_eq!(db.count(&stmt).await.unwrap(), 2);
}
