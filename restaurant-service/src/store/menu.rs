use chrono::Utc;
use diesel::prelude::*;

use crate::models::{Item, Menu, MenuItem, NewItem, NewMenu};
use crate::schema::{items, menu_items, menus};

pub fn create_menu(conn: &mut SqliteConnection, menu: &NewMenu) -> QueryResult<Menu> {
    diesel::insert_into(menus::table)
        .values(menu)
        .returning(Menu::as_returning())
        .get_result(conn)
}

pub fn create_menus(conn: &mut SqliteConnection, new_menus: &[NewMenu]) -> QueryResult<usize> {
    diesel::insert_into(menus::table)
        .values(new_menus)
        .execute(conn)
}

pub fn find_menu(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Menu>> {
    menus::table
        .find(id)
        .select(Menu::as_select())
        .first(conn)
        .optional()
}

/// Inserts all items in one transaction and returns them in input order.
pub fn create_items(conn: &mut SqliteConnection, new_items: &[NewItem]) -> QueryResult<Vec<Item>> {
    conn.transaction(|conn| {
        new_items
            .iter()
            .map(|item| {
                diesel::insert_into(items::table)
                    .values(item)
                    .returning(Item::as_returning())
                    .get_result(conn)
            })
            .collect()
    })
}

/// Links items to a menu. Pairs that are already linked are skipped, so the
/// returned count only includes new links.
pub fn add_items(conn: &mut SqliteConnection, menu_id: i32, item_ids: &[i32]) -> QueryResult<usize> {
    if item_ids.is_empty() {
        return Ok(0);
    }

    let links = item_ids
        .iter()
        .map(|&item_id| MenuItem { menu_id, item_id })
        .collect::<Vec<_>>();

    diesel::insert_or_ignore_into(menu_items::table)
        .values(&links)
        .execute(conn)
}

/// Makes `restaurant_id` the owner of the menu, replacing any previous owner.
/// Returns `None` when the menu does not exist.
pub fn set_restaurant(
    conn: &mut SqliteConnection,
    menu_id: i32,
    restaurant_id: i32,
) -> QueryResult<Option<Menu>> {
    diesel::update(menus::table.find(menu_id))
        .set((
            menus::restaurant_id.eq(Some(restaurant_id)),
            menus::updated_at.eq(Utc::now().naive_utc()),
        ))
        .returning(Menu::as_returning())
        .get_result(conn)
        .optional()
}

pub fn menus_of_restaurant(
    conn: &mut SqliteConnection,
    restaurant_id: i32,
) -> QueryResult<Vec<Menu>> {
    menus::table
        .filter(menus::restaurant_id.eq(restaurant_id))
        .order(menus::id.asc())
        .select(Menu::as_select())
        .load(conn)
}

pub fn items_of_menu(conn: &mut SqliteConnection, menu_id: i32) -> QueryResult<Vec<Item>> {
    menu_items::table
        .inner_join(items::table)
        .filter(menu_items::menu_id.eq(menu_id))
        .order(items::id.asc())
        .select(Item::as_select())
        .load(conn)
}

pub fn menus_of_item(conn: &mut SqliteConnection, item_id: i32) -> QueryResult<Vec<Menu>> {
    menu_items::table
        .inner_join(menus::table)
        .filter(menu_items::item_id.eq(item_id))
        .order(menus::id.asc())
        .select(Menu::as_select())
        .load(conn)
}

/// Items for each of `parents`, in the same order as `parents`.
pub fn items_grouped(conn: &mut SqliteConnection, parents: &[Menu]) -> QueryResult<Vec<Vec<Item>>> {
    let links = MenuItem::belonging_to(parents)
        .inner_join(items::table)
        .order(items::id.asc())
        .select((MenuItem::as_select(), Item::as_select()))
        .load::<(MenuItem, Item)>(conn)?;

    Ok(links
        .grouped_by(parents)
        .into_iter()
        .map(|group| group.into_iter().map(|(_, item)| item).collect())
        .collect())
}
