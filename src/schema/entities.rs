//! Entity catalog for the restaurant domain

use super::types::{EntitySchema, FieldDef, FieldType};

/// Order fields that carry binary-encoded foreign references
pub const ORDER_REFERENCE_FIELDS: [&str; 2] = ["restaurants_id", "address_id"];

pub fn restaurant() -> EntitySchema {
    EntitySchema::new("restaurants", "restaurants", "restaurants_id")
        .with_label("Restaurant")
        .with_list_path("restaurants")
        .field("restaurants_id", FieldDef::required_int())
        .field("res_name", FieldDef::required_string())
        .field("res_email", FieldDef::required_string())
        .field("res_website", FieldDef::required_string())
        .field("res_desc", FieldDef::required_string())
        .field("res_added", FieldDef::created_now())
        .field("res_active", FieldDef::required_bool())
        .field("city_id", FieldDef::required_string())
        .field("state_id", FieldDef::required_string())
}

/// Owning restaurant and address are plain references; nothing checks they exist.
pub fn branch() -> EntitySchema {
    EntitySchema::new("branch", "Branch", "branch_id")
        .with_label("Branch")
        .with_list_path("branches")
        .field("branch_id", FieldDef::required_int())
        .field("branch_name", FieldDef::required_string())
        .field("branch_email", FieldDef::required_string())
        .field("branch_phone", FieldDef::required_string())
        .field("branch_website", FieldDef::required_string())
        .field("branch_desc", FieldDef::required_string())
        .field("branch_added", FieldDef::created_now())
        .field("branch_active", FieldDef::required_bool())
        .field("restaurants_id", FieldDef::required_string().nullable())
        .field("address_id", FieldDef::required_string().nullable())
}

/// Password is stored exactly as received.
pub fn user() -> EntitySchema {
    EntitySchema::new("user", "userData", "id")
        .with_label("User")
        .field("id", FieldDef::required_int())
        .field("firstname", FieldDef::required_string())
        .field("lastname", FieldDef::required_string())
        .field("email", FieldDef::required_string())
        .field("phone", FieldDef::required_string())
        .field("password", FieldDef::required_string())
        .field("address_street", FieldDef::required_string())
        .field("address_city", FieldDef::required_string())
        .field("address_state", FieldDef::required_string())
        .field("address_zip", FieldDef::required_int())
        .field("user_active", FieldDef::required_bool())
        .field("role", FieldDef::required_string())
}

pub fn menu_item() -> EntitySchema {
    EntitySchema::new("menu-item", "menu", "item_id")
        .with_label("Menu item")
        .field("item_id", FieldDef::required_string())
        .field("name", FieldDef::required_string())
        .field("description", FieldDef::required_string())
        .field("price", FieldDef::required_float())
        .field("category", FieldDef::required_string())
        .field("available", FieldDef::required_bool())
}

pub fn order() -> EntitySchema {
    let [restaurants_ref, address_ref] = ORDER_REFERENCE_FIELDS;

    EntitySchema::new("order", "orders", "order_id")
        .with_label("Order")
        .field("order_id", FieldDef::required_string())
        .field("customer", FieldDef::required(FieldType::Object))
        .field("order_type", FieldDef::required_string())
        .field("store", FieldDef::required(FieldType::Object))
        .field("items", FieldDef::required(FieldType::records()))
        .field("total_price", FieldDef::required_float())
        .field("payment_method", FieldDef::required_string())
        .field("order_status", FieldDef::required_string())
        .field("order_date", FieldDef::required(FieldType::Timestamp))
        .field(restaurants_ref, FieldDef::optional(FieldType::BinaryRef))
        .field(address_ref, FieldDef::optional(FieldType::BinaryRef))
}

pub fn inventory_item() -> EntitySchema {
    EntitySchema::new("inventory-item", "inventory", "inventory_id")
        .with_label("Inventory item")
        .field("inventory_id", FieldDef::required_string())
        .field("branch_id", FieldDef::required_int())
        .field("item_name", FieldDef::required_string())
        .field("quantity", FieldDef::required_int())
        .field("unit", FieldDef::required_string())
        .field("reorder_level", FieldDef::optional(FieldType::Int))
        .field("updated_at", FieldDef::created_now())
}

// Back-office records under `/admin/...`. The store assigns their `_id`.

pub fn admin_item() -> EntitySchema {
    EntitySchema::store_keyed("admin-item", "admin_items", "admin/items")
        .with_label("Item")
        .field("name", FieldDef::required_string())
        .field("description", FieldDef::required_string())
        .field("price", FieldDef::required_float())
}

/// `items` holds item names or ids; nothing resolves them.
pub fn admin_menu() -> EntitySchema {
    EntitySchema::store_keyed("admin-menu", "admin_menus", "admin/menus")
        .with_label("Menu")
        .field("name", FieldDef::required_string())
        .field(
            "items",
            FieldDef::required(FieldType::Array {
                element_type: Box::new(FieldType::String),
            }),
        )
}

pub fn admin_customer() -> EntitySchema {
    EntitySchema::store_keyed("admin-customer", "admin_customers", "admin/customers")
        .with_label("Customer")
        .field("name", FieldDef::required_string())
        .field("email", FieldDef::required_string())
        .field("phone", FieldDef::required_string())
}

pub fn admin_branch() -> EntitySchema {
    EntitySchema::store_keyed("admin-branch", "admin_branches", "admin/branches")
        .with_label("Branch")
        .field("name", FieldDef::required_string())
        .field("location", FieldDef::required_string())
        .field("contact_number", FieldDef::required_string())
}

pub fn admin_inventory() -> EntitySchema {
    EntitySchema::store_keyed("admin-inventory", "admin_inventory", "admin/inventory")
        .with_label("Inventory item")
        .field("item_name", FieldDef::required_string())
        .field("quantity", FieldDef::required_int())
}

/// Every entity kind served over HTTP
pub fn all() -> Vec<EntitySchema> {
    vec![
        restaurant(),
        branch(),
        user(),
        menu_item(),
        order(),
        inventory_item(),
        admin_item(),
        admin_menu(),
        admin_customer(),
        admin_branch(),
        admin_inventory(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::KeyType;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_schemas_are_well_formed() {
        for schema in all() {
            assert!(schema.validate_structure().is_ok(), "{}", schema.kind);
        }
    }

    #[test]
    fn test_routes_and_collections_are_distinct() {
        let schemas = all();
        let paths: HashSet<_> = schemas.iter().map(|s| s.path.clone()).collect();
        let collections: HashSet<_> = schemas.iter().map(|s| s.collection.clone()).collect();
        assert_eq!(paths.len(), schemas.len());
        assert_eq!(collections.len(), schemas.len());
    }

    #[test]
    fn test_key_types() {
        assert_eq!(branch().key_type().unwrap(), KeyType::Int);
        assert_eq!(user().key_type().unwrap(), KeyType::Int);
        assert_eq!(menu_item().key_type().unwrap(), KeyType::Str);
        assert_eq!(order().key_type().unwrap(), KeyType::Str);
        assert_eq!(admin_menu().key_type().unwrap(), KeyType::ObjectId);
    }

    #[test]
    fn test_only_admin_records_are_store_keyed() {
        let keyed: Vec<_> = all()
            .into_iter()
            .filter(|s| s.is_store_keyed())
            .map(|s| s.path)
            .collect();
        assert_eq!(
            keyed,
            vec![
                "admin/items",
                "admin/menus",
                "admin/customers",
                "admin/branches",
                "admin/inventory"
            ]
        );
    }

    #[test]
    fn test_only_orders_carry_binary_refs() {
        assert_eq!(order().binary_ref_fields(), ORDER_REFERENCE_FIELDS.to_vec());
        assert!(branch().binary_ref_fields().is_empty());
    }

    #[test]
    fn test_list_paths() {
        assert_eq!(branch().list_path, "branches");
        assert_eq!(menu_item().list_path, "menu-items");
        assert_eq!(restaurant().list_path, "restaurants");
    }
}
