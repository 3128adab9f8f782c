//! Create/read/update/delete for product records.
//!
//! Every mutating path goes through the validators in [`crate::validation`]
//! before any statement is issued, so a record is either written whole or
//! not at all. The update path resolves caller-supplied field names against
//! the static [`ProductField`] whitelist; only whitelist literals ever
//! appear in query text, caller input is bound as parameters.

use crate::db::{DbPool, NewProduct, Product};
use crate::error::CoreError;
use crate::validation::FieldKind;

/// Updatable columns. `id` and `created_at` are deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    ProductName,
    FgPart,
    FgPartRev,
    PcbPart,
    PcbPartRev,
    SmdTop,
    SmdTopRev,
    SmdBottom,
    SmdBottomRev,
    SwWrapper,
    SwWrapperRev,
    EcuVersion,
    Checksum,
    ProtoNumber,
    Status,
    Remark,
}

impl ProductField {
    pub const ALL: [ProductField; 16] = [
        ProductField::ProductName,
        ProductField::FgPart,
        ProductField::FgPartRev,
        ProductField::PcbPart,
        ProductField::PcbPartRev,
        ProductField::SmdTop,
        ProductField::SmdTopRev,
        ProductField::SmdBottom,
        ProductField::SmdBottomRev,
        ProductField::SwWrapper,
        ProductField::SwWrapperRev,
        ProductField::EcuVersion,
        ProductField::Checksum,
        ProductField::ProtoNumber,
        ProductField::Status,
        ProductField::Remark,
    ];

    /// Resolve a caller-supplied field name, or None when it is not in the
    /// recognized set.
    pub fn parse(name: &str) -> Option<ProductField> {
        ProductField::ALL
            .into_iter()
            .find(|field| field.column() == name)
    }

    /// Storage column name. These literals are the only identifiers that
    /// ever reach query text.
    pub fn column(&self) -> &'static str {
        match self {
            ProductField::ProductName => "product_name",
            ProductField::FgPart => "fg_part",
            ProductField::FgPartRev => "fg_part_rev",
            ProductField::PcbPart => "pcb_part",
            ProductField::PcbPartRev => "pcb_part_rev",
            ProductField::SmdTop => "smd_top",
            ProductField::SmdTopRev => "smd_top_rev",
            ProductField::SmdBottom => "smd_bottom",
            ProductField::SmdBottomRev => "smd_bottom_rev",
            ProductField::SwWrapper => "sw_wrapper",
            ProductField::SwWrapperRev => "sw_wrapper_rev",
            ProductField::EcuVersion => "ecu_version",
            ProductField::Checksum => "checksum",
            ProductField::ProtoNumber => "proto_number",
            ProductField::Status => "status",
            ProductField::Remark => "remark",
        }
    }

    /// The grammar this field's values must satisfy.
    pub fn kind(&self) -> FieldKind {
        match self {
            ProductField::FgPart
            | ProductField::PcbPart
            | ProductField::SmdTop
            | ProductField::SmdBottom
            | ProductField::SwWrapper => FieldKind::PartId,
            ProductField::FgPartRev
            | ProductField::PcbPartRev
            | ProductField::SmdTopRev
            | ProductField::SmdBottomRev
            | ProductField::SwWrapperRev => FieldKind::Revision,
            ProductField::EcuVersion => FieldKind::EcuVersion,
            ProductField::Checksum => FieldKind::Checksum,
            ProductField::ProtoNumber => FieldKind::ProtoNumber,
            ProductField::ProductName | ProductField::Status | ProductField::Remark => {
                FieldKind::FreeText
            }
        }
    }

    /// The draft value for this field, if the draft carries one.
    fn draft_value<'a>(&self, draft: &'a NewProduct) -> Option<&'a str> {
        match self {
            ProductField::ProductName => Some(&draft.product_name),
            ProductField::FgPart => Some(&draft.fg_part),
            ProductField::FgPartRev => Some(&draft.fg_part_rev),
            ProductField::PcbPart => Some(&draft.pcb_part),
            ProductField::PcbPartRev => Some(&draft.pcb_part_rev),
            ProductField::SmdTop => Some(&draft.smd_top),
            ProductField::SmdTopRev => Some(&draft.smd_top_rev),
            ProductField::SmdBottom => Some(&draft.smd_bottom),
            ProductField::SmdBottomRev => Some(&draft.smd_bottom_rev),
            ProductField::SwWrapper => Some(&draft.sw_wrapper),
            ProductField::SwWrapperRev => Some(&draft.sw_wrapper_rev),
            ProductField::EcuVersion => Some(&draft.ecu_version),
            ProductField::Checksum => Some(&draft.checksum),
            ProductField::ProtoNumber => draft.proto_number.as_deref(),
            ProductField::Status => Some(&draft.status),
            ProductField::Remark => Some(&draft.remark),
        }
    }
}

/// Validate every present field of a trimmed draft against its grammar.
fn validate_draft(draft: &NewProduct) -> Result<(), CoreError> {
    for field in ProductField::ALL {
        if let Some(value) = field.draft_value(draft) {
            field
                .kind()
                .validate(value)
                .map_err(|reason| CoreError::validation(field.column(), reason))?;
        }
    }
    Ok(())
}

fn parse_proto_number(value: &str) -> Result<i64, CoreError> {
    value
        .parse::<i64>()
        .map_err(|_| CoreError::validation("proto_number", "must be a 4-digit number"))
}

/// Validate and insert a new product, returning the store-assigned id.
///
/// All string fields are trimmed before validation and storage; the first
/// grammar failure aborts before any statement is issued.
pub async fn create_product(db: &DbPool, draft: &NewProduct) -> Result<i64, CoreError> {
    let draft = draft.trimmed();
    validate_draft(&draft)?;

    let proto_number = match &draft.proto_number {
        Some(value) => Some(parse_proto_number(value)?),
        None => None,
    };
    let now = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        r#"
        INSERT INTO products
            (product_name, fg_part, fg_part_rev, pcb_part, pcb_part_rev,
             smd_top, smd_top_rev, smd_bottom, smd_bottom_rev,
             sw_wrapper, sw_wrapper_rev, ecu_version, checksum,
             proto_number, status, remark, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&draft.product_name)
    .bind(&draft.fg_part)
    .bind(&draft.fg_part_rev)
    .bind(&draft.pcb_part)
    .bind(&draft.pcb_part_rev)
    .bind(&draft.smd_top)
    .bind(&draft.smd_top_rev)
    .bind(&draft.smd_bottom)
    .bind(&draft.smd_bottom_rev)
    .bind(&draft.sw_wrapper)
    .bind(&draft.sw_wrapper_rev)
    .bind(&draft.ecu_version)
    .bind(&draft.checksum)
    .bind(proto_number)
    .bind(&draft.status)
    .bind(&draft.remark)
    .bind(&now)
    .execute(db)
    .await?;

    let id = result.last_insert_rowid();
    tracing::info!(id, product_name = %draft.product_name, "product created");
    Ok(id)
}

/// All records, id ascending (insertion order).
pub async fn list_products(db: &DbPool) -> Result<Vec<Product>, CoreError> {
    let products = sqlx::query_as("SELECT * FROM products ORDER BY id ASC")
        .fetch_all(db)
        .await?;
    Ok(products)
}

/// A single record by id.
pub async fn get_product(db: &DbPool, id: i64) -> Result<Product, CoreError> {
    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    product.ok_or(CoreError::NotFound(id))
}

/// Update a single field, re-validated with the same grammar as at create.
pub async fn update_product(
    db: &DbPool,
    id: i64,
    field: &str,
    value: &str,
) -> Result<(), CoreError> {
    let field = ProductField::parse(field)
        .ok_or_else(|| CoreError::validation(field, "not an updatable field"))?;

    let value = value.trim();
    field
        .kind()
        .validate(value)
        .map_err(|reason| CoreError::validation(field.column(), reason))?;

    // Column name comes from the whitelist enum, never from the caller.
    let sql = format!("UPDATE products SET {} = ? WHERE id = ?", field.column());
    let result = if field == ProductField::ProtoNumber {
        let proto = parse_proto_number(value)?;
        sqlx::query(&sql).bind(proto).bind(id).execute(db).await?
    } else {
        sqlx::query(&sql).bind(value).bind(id).execute(db).await?
    };

    if result.rows_affected() == 0 {
        return Err(CoreError::NotFound(id));
    }
    tracing::info!(id, field = field.column(), "product updated");
    Ok(())
}

/// Delete by id. Deleting an absent record yields `NotFound`, so a second
/// delete is the same outcome as the first miss.
pub async fn delete_product(db: &DbPool, id: i64) -> Result<(), CoreError> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CoreError::NotFound(id));
    }
    tracing::info!(id, "product deleted");
    Ok(())
}
