use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

use crate::schema::{items, menu_items, menus, restaurants};

#[derive(Queryable, Selectable, Identifiable, Serialize, ToSchema, Debug, Clone, PartialEq)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Restaurant {
    /// Unique identifier for the restaurant
    pub id: i32,
    /// Name of the restaurant
    pub name: String,
    /// Where the restaurant is
    pub location: String,
    /// Kind of food served
    pub cuisine: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurant<'a> {
    pub name: &'a str,
    pub location: &'a str,
    pub cuisine: &'a str,
}

/// Fields left as `None` keep their stored value.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = restaurants)]
pub struct RestaurantChangeset {
    pub name: Option<String>,
    pub location: Option<String>,
    pub cuisine: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(
    Queryable, Selectable, Identifiable, Associations, Serialize, ToSchema, Debug, Clone, PartialEq,
)]
#[diesel(belongs_to(Restaurant))]
#[diesel(table_name = menus)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Menu {
    /// Unique identifier for the menu
    pub id: i32,
    /// Title of the menu, e.g. "Lunch"
    pub title: String,
    /// Owning restaurant, if the menu is attached to one
    pub restaurant_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = menus)]
pub struct NewMenu<'a> {
    pub title: &'a str,
    pub restaurant_id: Option<i32>,
}

#[derive(Queryable, Selectable, Identifiable, Serialize, ToSchema, Debug, Clone, PartialEq)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Item {
    /// Unique identifier for the item
    pub id: i32,
    /// Name of the item
    pub name: String,
    /// Image reference for the item
    pub image: String,
    /// Price of the item, with two decimal places
    #[serde(serialize_with = "serialize_price")]
    #[schema(value_type = String, example = "10.95")]
    pub price: BigDecimal,
    /// Whether the item is vegetarian
    pub vegetarian: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = items)]
pub struct NewItem<'a> {
    pub name: &'a str,
    pub image: &'a str,
    pub price: BigDecimal,
    pub vegetarian: bool,
}

/// SQLite keeps decimals as REAL, so stored prices come back with binary
/// noise. Report them at the column's scale.
fn serialize_price<S: Serializer>(price: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    price.round(2).with_scale(2).serialize(serializer)
}

#[derive(
    Queryable, Selectable, Identifiable, Associations, Insertable, Debug, Clone, Copy, PartialEq,
)]
#[diesel(belongs_to(Menu))]
#[diesel(belongs_to(Item))]
#[diesel(table_name = menu_items)]
#[diesel(primary_key(menu_id, item_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MenuItem {
    pub menu_id: i32,
    pub item_id: i32,
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct MenuWithItems {
    #[serde(flatten)]
    pub menu: Menu,
    /// Items listed on the menu
    pub items: Vec<Item>,
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct RestaurantWithMenus {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    /// Menus owned by the restaurant
    pub menus: Vec<MenuWithItems>,
}
