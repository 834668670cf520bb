//! Product repository for SQLite operations
//!
//! `images` and `features` are stored as JSON text. `ratings` and
//! `num_of_reviews` are never written here; see the review repository.
//! Every write of `name` also writes `name_folded`, the lowercased name
//! that keyword search matches against.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::data::filters::{ProductQuery, SqlParams, SqlValue};
use crate::data::sqlite::SqliteError;
use crate::data::types::{NewProduct, ProductCategory, ProductRow, ProductUpdate};
use crate::utils::sql::fold_case;

const PRODUCT_COLUMNS: &str = "id, name, price, description, images, category, brand, stock, ratings, num_of_reviews, features, created_by, created_at, updated_at";

type ProductTuple = (
    String,
    String,
    f64,
    String,
    String,
    String,
    String,
    i64,
    f64,
    i64,
    String,
    Option<String>,
    i64,
    i64,
);

fn row_to_product(row: ProductTuple) -> Result<ProductRow, SqliteError> {
    let (
        id,
        name,
        price,
        description,
        images,
        category,
        brand,
        stock,
        ratings,
        num_of_reviews,
        features,
        created_by,
        created_at,
        updated_at,
    ) = row;

    let category = ProductCategory::parse(&category)
        .ok_or_else(|| SqliteError::Decode(format!("unknown product category: {}", category)))?;

    Ok(ProductRow {
        id,
        name,
        price,
        description,
        images: serde_json::from_str(&images)?,
        category,
        brand,
        stock,
        ratings,
        num_of_reviews,
        features: serde_json::from_str(&features)?,
        created_by,
        created_at,
        updated_at,
    })
}

/// Create a new product with a generated CUID2 ID
pub async fn create_product(
    pool: &SqlitePool,
    input: &NewProduct,
) -> Result<ProductRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();
    let images = serde_json::to_string(&input.images)?;
    let features = serde_json::to_string(&input.features)?;

    sqlx::query(
        "INSERT INTO products (id, name, name_folded, price, description, images, category, brand, stock, features, created_by, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&input.name)
    .bind(fold_case(&input.name))
    .bind(input.price)
    .bind(&input.description)
    .bind(&images)
    .bind(input.category.as_str())
    .bind(&input.brand)
    .bind(input.stock)
    .bind(&features)
    .bind(input.created_by.as_deref())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(ProductRow {
        id,
        name: input.name.clone(),
        price: input.price,
        description: input.description.clone(),
        images: input.images.clone(),
        category: input.category,
        brand: input.brand.clone(),
        stock: input.stock,
        ratings: 0.0,
        num_of_reviews: 0,
        features: input.features.clone(),
        created_by: input.created_by.clone(),
        created_at: now,
        updated_at: now,
    })
}

async fn fetch_product<'e, E>(executor: E, id: &str) -> Result<Option<ProductRow>, SqliteError>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {} FROM products WHERE id = ?", PRODUCT_COLUMNS);
    let row = sqlx::query_as::<_, ProductTuple>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.map(row_to_product).transpose()
}

/// Get a product by ID
pub async fn get_product(pool: &SqlitePool, id: &str) -> Result<Option<ProductRow>, SqliteError> {
    fetch_product(pool, id).await
}

/// List products matching a built query.
///
/// Returns the requested window and the total number of matching products.
/// The count and the page are read concurrently without a shared snapshot;
/// a write landing between them can make the two disagree.
pub async fn list_products(
    pool: &SqlitePool,
    query: &ProductQuery,
) -> Result<(Vec<ProductRow>, u64), SqliteError> {
    let mut params = SqlParams::default();
    let where_clause = query.where_clause(&mut params);

    let count_sql = format!("SELECT COUNT(*) FROM products {}", where_clause);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for value in &params.values {
        count_query = match value {
            SqlValue::Text(s) => count_query.bind(s.as_str()),
            SqlValue::Real(v) => count_query.bind(*v),
        };
    }

    let limit_clause = if query.window().is_some() {
        "LIMIT ? OFFSET ?"
    } else {
        ""
    };
    let fetch_sql = format!(
        "SELECT {} FROM products {} ORDER BY created_at DESC, id {}",
        PRODUCT_COLUMNS, where_clause, limit_clause
    );
    let mut fetch_query = sqlx::query_as::<_, ProductTuple>(&fetch_sql);
    for value in &params.values {
        fetch_query = match value {
            SqlValue::Text(s) => fetch_query.bind(s.as_str()),
            SqlValue::Real(v) => fetch_query.bind(*v),
        };
    }
    if let Some(window) = query.window() {
        fetch_query = fetch_query
            .bind(i64::from(window.page_size))
            .bind(i64::try_from(window.skip).unwrap_or(i64::MAX));
    }

    let (count_result, fetch_result) =
        tokio::join!(count_query.fetch_one(pool), fetch_query.fetch_all(pool));

    if let Err(e) = &count_result {
        tracing::error!(error = %e, "Product count query failed");
    }
    if let Err(e) = &fetch_result {
        tracing::error!(error = %e, "Product page query failed");
    }

    let total = count_result?;
    let products = fetch_result?
        .into_iter()
        .map(row_to_product)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((products, total.max(0) as u64))
}

/// List every product, newest first
pub async fn list_all_products(pool: &SqlitePool) -> Result<Vec<ProductRow>, SqliteError> {
    let sql = format!(
        "SELECT {} FROM products ORDER BY created_at DESC, id",
        PRODUCT_COLUMNS
    );
    sqlx::query_as::<_, ProductTuple>(&sql)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(row_to_product)
        .collect()
}

/// Apply a partial update. Returns the updated product if found.
pub async fn update_product(
    pool: &SqlitePool,
    id: &str,
    update: &ProductUpdate,
) -> Result<Option<ProductRow>, SqliteError> {
    let mut tx = pool.begin().await?;

    let Some(mut product) = fetch_product(&mut *tx, id).await? else {
        return Ok(None);
    };

    if let Some(name) = &update.name {
        product.name = name.clone();
    }
    if let Some(price) = update.price {
        product.price = price;
    }
    if let Some(description) = &update.description {
        product.description = description.clone();
    }
    if let Some(images) = &update.images {
        product.images = images.clone();
    }
    if let Some(category) = update.category {
        product.category = category;
    }
    if let Some(brand) = &update.brand {
        product.brand = brand.clone();
    }
    if let Some(stock) = update.stock {
        product.stock = stock;
    }
    if let Some(features) = &update.features {
        product.features = features.clone();
    }
    product.updated_at = chrono::Utc::now().timestamp();

    sqlx::query(
        "UPDATE products SET name = ?, name_folded = ?, price = ?, description = ?, images = ?, category = ?, brand = ?, stock = ?, features = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&product.name)
    .bind(fold_case(&product.name))
    .bind(product.price)
    .bind(&product.description)
    .bind(serde_json::to_string(&product.images)?)
    .bind(product.category.as_str())
    .bind(&product.brand)
    .bind(product.stock)
    .bind(serde_json::to_string(&product.features)?)
    .bind(product.updated_at)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some(product))
}

/// Delete a product and (by cascade) its reviews. Returns true if deleted.
pub async fn delete_product(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::data::types::ProductFeature;

    pub(crate) async fn setup_test_pool() -> SqlitePool {
        SqliteService::open_in_memory()
            .await
            .unwrap()
            .pool()
            .clone()
    }

    pub(crate) fn new_product(name: &str, price: f64, category: ProductCategory) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price,
            description: format!("{} description", name),
            images: vec![format!("https://img.example.com/{}.png", name.replace(' ', "-"))],
            category,
            brand: "Acme".to_string(),
            stock: 10,
            features: vec![ProductFeature {
                name: "Color".to_string(),
                value: "Black".to_string(),
            }],
            created_by: Some("admin-1".to_string()),
        }
    }

    fn query(items: &[(&str, &str)]) -> ProductQuery {
        ProductQuery::new(
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    async fn names(pool: &SqlitePool, q: ProductQuery) -> (Vec<String>, u64) {
        let (products, total) = list_products(pool, &q).await.unwrap();
        let mut names: Vec<String> = products.into_iter().map(|p| p.name).collect();
        names.sort();
        (names, total)
    }

    #[tokio::test]
    async fn test_create_product() {
        let pool = setup_test_pool().await;
        let product = create_product(&pool, &new_product("Pixel", 499.0, ProductCategory::Phones))
            .await
            .unwrap();

        assert!(!product.id.is_empty());
        assert_eq!(product.ratings, 0.0);
        assert_eq!(product.num_of_reviews, 0);
        assert_eq!(product.created_at, product.updated_at);

        let stored = get_product(&pool, &product.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Pixel");
        assert_eq!(stored.category, ProductCategory::Phones);
        assert_eq!(stored.images, product.images);
        assert_eq!(stored.features, product.features);
        assert_eq!(stored.created_by.as_deref(), Some("admin-1"));
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let pool = setup_test_pool().await;
        assert!(get_product(&pool, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_keyword_matches_case_insensitive_substring() {
        let pool = setup_test_pool().await;
        for name in ["super phone X", "Headphones", "Charger"] {
            create_product(&pool, &new_product(name, 20.0, ProductCategory::Other))
                .await
                .unwrap();
        }

        let (found, total) = names(&pool, query(&[("keyword", "Phone")]).search()).await;
        assert_eq!(found, vec!["Headphones", "super phone X"]);
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_keyword_wildcards_are_literal() {
        let pool = setup_test_pool().await;
        create_product(&pool, &new_product("100% cotton case", 5.0, ProductCategory::Accessories))
            .await
            .unwrap();
        create_product(&pool, &new_product("1000 mAh battery", 5.0, ProductCategory::Accessories))
            .await
            .unwrap();

        let (found, _) = names(&pool, query(&[("keyword", "100%")]).search()).await;
        assert_eq!(found, vec!["100% cotton case"]);
    }

    #[tokio::test]
    async fn test_price_range_is_inclusive_and_anded() {
        let pool = setup_test_pool().await;
        for (name, price) in [("cheap", 50.0), ("mid", 300.0), ("low edge", 100.0), ("pricey", 900.0)] {
            create_product(&pool, &new_product(name, price, ProductCategory::Gadgets))
                .await
                .unwrap();
        }

        let q = query(&[("price[gte]", "100"), ("price[lte]", "500")])
            .search()
            .filter()
            .unwrap();
        let (found, total) = names(&pool, q).await;
        assert_eq!(found, vec!["low edge", "mid"]);
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_category_and_keyword_combined() {
        let pool = setup_test_pool().await;
        create_product(&pool, &new_product("phone case", 10.0, ProductCategory::Accessories))
            .await
            .unwrap();
        create_product(&pool, &new_product("phone", 400.0, ProductCategory::Phones))
            .await
            .unwrap();

        let q = query(&[("keyword", "phone"), ("category", "phones")])
            .search()
            .filter()
            .unwrap();
        let (found, _) = names(&pool, q).await;
        assert_eq!(found, vec!["phone"]);
    }

    #[tokio::test]
    async fn test_keyword_folds_non_ascii_case() {
        let pool = setup_test_pool().await;
        create_product(&pool, &new_product("ÉCRAN Pro", 200.0, ProductCategory::Gadgets))
            .await
            .unwrap();
        create_product(&pool, &new_product("Stand", 20.0, ProductCategory::Accessories))
            .await
            .unwrap();

        for keyword in ["écran", "ÉCRAN", "Écran pro"] {
            let (found, total) = names(&pool, query(&[("keyword", keyword)]).search()).await;
            assert_eq!(found, vec!["ÉCRAN Pro"], "keyword {}", keyword);
            assert_eq!(total, 1);
        }
    }

    #[tokio::test]
    async fn test_renamed_product_is_searchable_by_new_name() {
        let pool = setup_test_pool().await;
        let product = create_product(&pool, &new_product("Old", 1.0, ProductCategory::Other))
            .await
            .unwrap();
        let update = ProductUpdate {
            name: Some("Ünique".to_string()),
            ..Default::default()
        };
        update_product(&pool, &product.id, &update)
            .await
            .unwrap()
            .unwrap();

        let (found, _) = names(&pool, query(&[("keyword", "üniq")]).search()).await;
        assert_eq!(found, vec!["Ünique"]);
        let (found, _) = names(&pool, query(&[("keyword", "old")]).search()).await;
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_name_and_description_equality_filters() {
        let pool = setup_test_pool().await;
        create_product(&pool, &new_product("Pixel", 500.0, ProductCategory::Phones))
            .await
            .unwrap();
        create_product(&pool, &new_product("Pixel Case", 15.0, ProductCategory::Accessories))
            .await
            .unwrap();

        let q = query(&[("name", "Pixel")]).filter().unwrap();
        let (found, total) = names(&pool, q).await;
        assert_eq!(found, vec!["Pixel"]);
        assert_eq!(total, 1);

        let q = query(&[("description", "Pixel Case description")])
            .filter()
            .unwrap();
        let (found, _) = names(&pool, q).await;
        assert_eq!(found, vec!["Pixel Case"]);
    }

    #[tokio::test]
    async fn test_stock_equality_on_integer_column() {
        let pool = setup_test_pool().await;
        let mut input = new_product("limited", 10.0, ProductCategory::Other);
        input.stock = 3;
        create_product(&pool, &input).await.unwrap();
        create_product(&pool, &new_product("plenty", 10.0, ProductCategory::Other))
            .await
            .unwrap();

        let q = query(&[("stock", "3")]).filter().unwrap();
        let (found, _) = names(&pool, q).await;
        assert_eq!(found, vec!["limited"]);
    }

    #[tokio::test]
    async fn test_pagination_windows_and_total() {
        let pool = setup_test_pool().await;
        for i in 0..5 {
            create_product(&pool, &new_product(&format!("item {}", i), 1.0, ProductCategory::Other))
                .await
                .unwrap();
        }

        let (first, total) = list_products(&pool, &query(&[]).paginate(2)).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(total, 5);

        let (last, total) = list_products(&pool, &query(&[("page", "3")]).paginate(2))
            .await
            .unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(total, 5);

        let mut seen: Vec<String> = Vec::new();
        for page in ["1", "2", "3"] {
            let (rows, _) = list_products(&pool, &query(&[("page", page)]).paginate(2))
                .await
                .unwrap();
            seen.extend(rows.into_iter().map(|p| p.id));
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 5);
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_empty() {
        let pool = setup_test_pool().await;
        create_product(&pool, &new_product("only", 1.0, ProductCategory::Other))
            .await
            .unwrap();

        let (rows, total) = list_products(&pool, &query(&[("page", "99")]).paginate(8))
            .await
            .unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 1);

        let huge = u64::MAX.to_string();
        for page in [huge.as_str(), "18446744073709551616", "1e30"] {
            let (rows, _) = list_products(&pool, &query(&[("page", page)]).paginate(8))
                .await
                .unwrap();
            assert!(rows.is_empty(), "page {}", page);
        }

        let (rows, _) = list_products(&pool, &query(&[("page", "2.0")]).paginate(8))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_no_matches_is_empty() {
        let pool = setup_test_pool().await;
        let q = query(&[("brand", "Nobody")]).filter().unwrap().paginate(8);
        let (rows, total) = list_products(&pool, &q).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_list_all_products() {
        let pool = setup_test_pool().await;
        create_product(&pool, &new_product("a", 1.0, ProductCategory::Other))
            .await
            .unwrap();
        create_product(&pool, &new_product("b", 2.0, ProductCategory::Other))
            .await
            .unwrap();

        assert_eq!(list_all_products(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_product_partial() {
        let pool = setup_test_pool().await;
        let product = create_product(&pool, &new_product("old", 10.0, ProductCategory::Other))
            .await
            .unwrap();

        let update = ProductUpdate {
            name: Some("new".to_string()),
            stock: Some(0),
            ..Default::default()
        };
        let updated = update_product(&pool, &product.id, &update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "new");
        assert_eq!(updated.stock, 0);
        assert_eq!(updated.price, 10.0);

        let stored = get_product(&pool, &product.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "new");
        assert_eq!(stored.images, product.images);
    }

    #[tokio::test]
    async fn test_update_product_not_found() {
        let pool = setup_test_pool().await;
        let update = ProductUpdate {
            price: Some(1.0),
            ..Default::default()
        };
        assert!(update_product(&pool, "missing", &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_product() {
        let pool = setup_test_pool().await;
        let product = create_product(&pool, &new_product("gone", 1.0, ProductCategory::Other))
            .await
            .unwrap();

        assert!(delete_product(&pool, &product.id).await.unwrap());
        assert!(!delete_product(&pool, &product.id).await.unwrap());
        assert!(get_product(&pool, &product.id).await.unwrap().is_none());
    }
}
