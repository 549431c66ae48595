use stockroom_core::AppResult;

use crate::{FieldDefinition, FieldKind, ListOrdering, RecordType, RecordTypeCatalog};

/// Logical name of the unit-of-measure record type.
pub const UOM: &str = "uom";
/// Logical name of the item category record type.
pub const CATEGORY: &str = "category";
/// Logical name of the document type record type.
pub const DOCTYPE: &str = "doctype";
/// Logical name of the stock item record type.
pub const ITEM: &str = "item";
/// Logical name of the stock movement record type.
pub const MOVEMENT: &str = "movement";

/// Builds the stock movements catalog over the pre-existing `stock_*` tables.
pub fn stock_catalog() -> AppResult<RecordTypeCatalog> {
    RecordTypeCatalog::new(vec![
        named_lookup(UOM, "Unit of measure", "stock_items_uom")?,
        named_lookup(CATEGORY, "Item category", "stock_items_categories")?,
        named_lookup(DOCTYPE, "Document type", "stock_document_type")?,
        RecordType::new(
            ITEM,
            "Stock item",
            "stock_items",
            vec![
                FieldDefinition::new("code", "Code", FieldKind::Text, true)?,
                FieldDefinition::new("description", "Description", FieldKind::LongText, false)?,
                FieldDefinition::new("category", "Category", foreign_key(CATEGORY, true), true)?,
                FieldDefinition::new("uom", "Unit of measure", foreign_key(UOM, false), true)?,
            ],
            ListOrdering::Ascending,
        )?
        .with_search_fields(&["code", "description"])?,
        RecordType::new(
            MOVEMENT,
            "Stock movement",
            "stock_movements",
            vec![
                FieldDefinition::new("item", "Item", foreign_key(ITEM, false), true)?,
                FieldDefinition::new(
                    "document_type",
                    "Document type",
                    foreign_key(DOCTYPE, false),
                    true,
                )?,
                FieldDefinition::new(
                    "document_number",
                    "Document number",
                    FieldKind::Integer,
                    true,
                )?,
                FieldDefinition::new(
                    "document_reference",
                    "Document reference",
                    FieldKind::LongText,
                    false,
                )?,
                FieldDefinition::new("quantity", "Quantity", FieldKind::Integer, true)?,
                FieldDefinition::new(
                    "movement_date",
                    "Movement date",
                    FieldKind::DateTime,
                    true,
                )?,
            ],
            ListOrdering::Descending,
        )?
        .with_search_fields(&["document_reference", "document_number"])?,
    ])
}

fn named_lookup(
    logical_name: &str,
    display_name: &str,
    table_name: &str,
) -> AppResult<RecordType> {
    RecordType::new(
        logical_name,
        display_name,
        table_name,
        vec![
            FieldDefinition::new("name", "Name", FieldKind::Text, true)?,
            FieldDefinition::new("description", "Description", FieldKind::LongText, false)?,
        ],
        ListOrdering::Ascending,
    )?
    .with_search_fields(&["name"])
}

fn foreign_key(target: &str, active_only: bool) -> FieldKind {
    FieldKind::ForeignKey {
        target: target.to_owned(),
        active_only,
    }
}

#[cfg(test)]
mod tests {
    use super::{CATEGORY, ITEM, MOVEMENT, UOM, stock_catalog};
    use crate::{FieldKind, ListOrdering};

    #[test]
    fn stock_catalog_is_consistent() {
        let catalog = stock_catalog();
        assert!(catalog.is_ok());
        assert_eq!(catalog.map(|value| value.record_types().len()).unwrap_or(0), 5);
    }

    #[test]
    fn movements_list_newest_first() {
        let catalog = stock_catalog().unwrap_or_else(|_| unreachable!());
        let movement = catalog.get(MOVEMENT).unwrap_or_else(|| unreachable!());
        assert_eq!(movement.ordering(), ListOrdering::Descending);
        assert_eq!(
            catalog.get(UOM).map(|value| value.ordering()),
            Some(ListOrdering::Ascending)
        );
    }

    #[test]
    fn every_type_declares_search_fields() {
        let catalog = stock_catalog().unwrap_or_else(|_| unreachable!());

        assert!(
            catalog
                .record_types()
                .iter()
                .all(|record_type| !record_type.search_fields().is_empty())
        );
        assert_eq!(
            catalog.get(ITEM).map(|value| value.search_fields().to_vec()),
            Some(vec!["code".to_owned(), "description".to_owned()])
        );
    }

    #[test]
    fn item_category_accepts_only_active_targets() {
        let catalog = stock_catalog().unwrap_or_else(|_| unreachable!());
        let item = catalog.get(ITEM).unwrap_or_else(|| unreachable!());
        let category = item.field("category").unwrap_or_else(|| unreachable!());

        assert_eq!(
            category.kind(),
            &FieldKind::ForeignKey {
                target: CATEGORY.to_owned(),
                active_only: true,
            }
        );
        assert!(category.is_required());
    }
}
